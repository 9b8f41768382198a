use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::classify::ScreenMetrics;

/// What to do when two fields derive the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIdPolicy {
    /// Rename later duplicates `name_2`, `name_3`, ...
    #[default]
    Suffix,
    /// Emit duplicates as they are.
    Keep,
    /// Fail the conversion.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvertOptions {
    pub metrics: ScreenMetrics,
    pub duplicate_ids: DuplicateIdPolicy,
}

impl ConvertOptions {
    pub fn with_metrics(metrics: ScreenMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            metrics: ScreenMetrics::default(),
            duplicate_ids: DuplicateIdPolicy::Suffix,
        }
    }
}
