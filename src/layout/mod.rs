pub mod assembler;
pub mod field;
pub mod ids;
pub mod writer;

#[cfg(test)]
mod assembler_test;

pub use assembler::assemble;
pub use field::{GRID_COLUMNS, GRID_PADDING_DP, GridLayout, LayoutField};
pub use writer::write_layout;

use serde::Serialize;
use std::io::Read;

use crate::config::ConvertOptions;
use crate::error::ConvertResult;
use crate::hierarchy::{HierarchyNode, parse_hierarchy, read_hierarchy};
use crate::stats::ConversionStats;

/// Result of converting one hierarchy dump.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub layout: GridLayout,
    pub stats: ConversionStats,
}

impl Conversion {
    pub fn from_tree(root: &HierarchyNode, options: &ConvertOptions) -> ConvertResult<Self> {
        let (layout, stats) = assemble(root, options)?;
        Ok(Self { layout, stats })
    }

    pub fn to_xml(&self) -> String {
        write_layout(&self.layout)
    }
}

/// Convert a hierarchy dump into an Android layout resource string.
pub fn convert(input: &str, options: &ConvertOptions) -> ConvertResult<String> {
    convert_with_stats(input, options).map(|conversion| conversion.to_xml())
}

pub fn convert_with_stats(input: &str, options: &ConvertOptions) -> ConvertResult<Conversion> {
    let root = parse_hierarchy(input)?;
    Conversion::from_tree(&root, options)
}

pub fn convert_reader<R: Read>(reader: R, options: &ConvertOptions) -> ConvertResult<String> {
    let root = read_hierarchy(reader)?;
    Conversion::from_tree(&root, options).map(|conversion| conversion.to_xml())
}
