pub mod classify;
pub mod config;
pub mod controls;
pub mod error;
pub mod hierarchy;
pub mod inputs;
pub mod layout;
pub mod profiling;
pub mod report;
pub mod stats;

pub use classify::{ScreenMetrics, WidgetKind, classify};
pub use config::{ConvertOptions, DuplicateIdPolicy};
pub use controls::{ControlInfo, extract_controls};
pub use error::{ConvertError, ConvertResult};
pub use hierarchy::{Bounds, HierarchyNode, parse_hierarchy, parse_hierarchy_bytes, read_hierarchy};
pub use inputs::{InputSource, resolve_inputs};
pub use layout::{
    Conversion, GridLayout, LayoutField, assemble, convert, convert_reader, convert_with_stats,
    write_layout,
};
pub use report::{Outcome, OutputFormat};
pub use stats::{ConversionStats, format_statistics};
