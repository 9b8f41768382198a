use serde::{Deserialize, Serialize};

use crate::classify::WidgetKind;

pub const GRID_COLUMNS: u32 = 3;
pub const GRID_PADDING_DP: u32 = 16;

/// One synthesized element of the generated layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutField {
    pub kind: WidgetKind,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_description: Option<String>,
    pub layout_width_dp: u32,
    pub min_width_dp: u32,
    pub min_height_dp: u32,
    pub row: u32,
    pub column: u32,
}

/// Flat grid holding every field in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub column_count: u32,
    pub padding_dp: u32,
    pub fields: Vec<LayoutField>,
}

impl GridLayout {
    pub fn new() -> Self {
        Self {
            column_count: GRID_COLUMNS,
            padding_dp: GRID_PADDING_DP,
            fields: Vec::new(),
        }
    }

    /// Cell (row, column) of the next field to be placed.
    pub fn next_cell(&self) -> (u32, u32) {
        let index = self.fields.len() as u32;
        (index / self.column_count, index % self.column_count)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn row_count(&self) -> u32 {
        (self.fields.len() as u32).div_ceil(self.column_count)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new()
    }
}
