use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ConvertError, ConvertResult};
use crate::hierarchy::HierarchyNode;

/// Target widget kind of a generated layout field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    EditableField,
    StaticText,
    Button,
    IconButton,
    Image,
    Container,
}

impl WidgetKind {
    /// Android view class used for this kind in the generated layout.
    pub fn android_tag(self) -> &'static str {
        match self {
            WidgetKind::EditableField => "EditText",
            WidgetKind::StaticText => "TextView",
            WidgetKind::Button => "Button",
            WidgetKind::IconButton => "ImageButton",
            WidgetKind::Image => "ImageView",
            WidgetKind::Container => "View",
        }
    }

    pub fn shows_text(self) -> bool {
        matches!(
            self,
            WidgetKind::EditableField | WidgetKind::StaticText | WidgetKind::Button
        )
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.android_tag())
    }
}

const EDITABLE_CLASSES: &[&str] = &[
    "EditText",
    "AutoCompleteTextView",
    "MultiAutoCompleteTextView",
    "SearchView",
];

const LABEL_CLASSES: &[&str] = &["TextView", "CheckedTextView"];

const BUTTON_CLASSES: &[&str] = &[
    "Button",
    "ToggleButton",
    "CompoundButton",
    "CheckBox",
    "RadioButton",
    "Switch",
];

const IMAGE_CLASSES: &[&str] = &["ImageView", "Image"];

/// Classify a captured element. Unknown classes become containers.
pub fn classify(node: &HierarchyNode) -> WidgetKind {
    let class = node.simple_class_name();

    if EDITABLE_CLASSES.contains(&class) {
        WidgetKind::EditableField
    } else if LABEL_CLASSES.contains(&class) {
        WidgetKind::StaticText
    } else if BUTTON_CLASSES.contains(&class) {
        tappable_kind(node)
    } else if class == "ImageButton" {
        WidgetKind::IconButton
    } else if IMAGE_CLASSES.contains(&class) {
        if node.clickable {
            WidgetKind::IconButton
        } else {
            WidgetKind::Image
        }
    } else if class == "View" && node.clickable {
        tappable_kind(node)
    } else {
        WidgetKind::Container
    }
}

fn tappable_kind(node: &HierarchyNode) -> WidgetKind {
    if node.has_text() {
        WidgetKind::Button
    } else {
        WidgetKind::IconButton
    }
}

/// Whether a classified element becomes a field in the generated layout.
///
/// Only leaves are emitted, so a clickable wrapper yields its content rather
/// than a field of its own. Editable fields are the exception: they are kept
/// even when the dump nests their hint or text inside them.
pub fn is_emitted(kind: WidgetKind, node: &HierarchyNode) -> bool {
    match kind {
        WidgetKind::Container => false,
        WidgetKind::EditableField => true,
        WidgetKind::StaticText => node.is_leaf() && node.has_text(),
        WidgetKind::Button | WidgetKind::IconButton | WidgetKind::Image => node.is_leaf(),
    }
}

pub const DEFAULT_SCREEN_WIDTH: u32 = 1080;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1920;
pub const DEFAULT_DENSITY: f32 = 3.0;

/// Reference screen the generated layout is sized against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    pub width_px: u32,
    pub height_px: u32,
    pub density: f32,
}

impl ScreenMetrics {
    pub fn new(width_px: u32, height_px: u32, density: f32) -> ConvertResult<Self> {
        if width_px == 0 || height_px == 0 {
            return Err(ConvertError::InvalidMetrics {
                details: format!("screen size must be non-zero, got {width_px}x{height_px}"),
            });
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(ConvertError::InvalidMetrics {
                details: format!("density must be a positive number, got {density}"),
            });
        }
        Ok(Self {
            width_px,
            height_px,
            density,
        })
    }

    /// Minimum width and height of every field: a quarter of the screen width, in dp.
    pub fn min_footprint_dp(&self) -> u32 {
        self.px_to_dp(f64::from(self.width_px) / 4.0)
    }

    /// Width given to every field: half the screen width, in dp.
    pub fn max_field_width_dp(&self) -> u32 {
        self.px_to_dp(f64::from(self.width_px) / 2.0)
    }

    /// Rounds up, so the dp value never covers fewer pixels than `px`.
    fn px_to_dp(&self, px: f64) -> u32 {
        (px / f64::from(self.density)).ceil() as u32
    }
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        Self {
            width_px: DEFAULT_SCREEN_WIDTH,
            height_px: DEFAULT_SCREEN_HEIGHT,
            density: DEFAULT_DENSITY,
        }
    }
}
