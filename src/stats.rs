use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::WidgetKind;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub inputs: usize,
    pub total_nodes: usize,
    pub emitted_fields: usize,
    pub skipped_containers: usize,
    pub skipped_empty: usize,
    pub renamed_ids: usize,
    pub kind_counts: BTreeMap<WidgetKind, usize>,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self {
            inputs: 1,
            ..Self::default()
        }
    }

    pub fn record_node(&mut self) {
        self.total_nodes += 1;
    }

    pub fn record_field(&mut self, kind: WidgetKind) {
        self.emitted_fields += 1;
        *self.kind_counts.entry(kind).or_insert(0) += 1;
    }

    pub fn record_skipped(&mut self, kind: WidgetKind) {
        if kind == WidgetKind::Container {
            self.skipped_containers += 1;
        } else {
            self.skipped_empty += 1;
        }
    }

    /// Fold another conversion's counts into this one.
    pub fn merge(&mut self, other: &ConversionStats) {
        self.inputs += other.inputs;
        self.total_nodes += other.total_nodes;
        self.emitted_fields += other.emitted_fields;
        self.skipped_containers += other.skipped_containers;
        self.skipped_empty += other.skipped_empty;
        self.renamed_ids += other.renamed_ids;
        for (kind, count) in &other.kind_counts {
            *self.kind_counts.entry(*kind).or_insert(0) += count;
        }
    }
}

pub fn format_statistics(stats: &ConversionStats, use_color: bool) -> String {
    use colored::Colorize;

    let mut kinds: Vec<_> = stats.kind_counts.iter().collect();
    kinds.sort_by_key(|(_, count)| std::cmp::Reverse(**count));

    let mut output = String::new();

    if use_color {
        output.push_str(&"Conversion Statistics".bright_blue().bold().to_string());
        output.push('\n');
        output.push_str(&"═".repeat(60).bright_blue().to_string());
        output.push_str("\n\n");

        for (label, value) in summary_rows(stats) {
            output.push_str(&format!(
                "{}: {}\n",
                label.bright_yellow(),
                value.to_string().bright_green()
            ));
        }

        if !kinds.is_empty() {
            output.push_str(&format!("\n{}\n", "Fields by Kind".bright_yellow().bold()));
            output.push_str(&"─".repeat(30).bright_blue().to_string());
            output.push('\n');

            for (kind, count) in kinds {
                let percentage = percentage(*count, stats.emitted_fields);
                output.push_str(&format!(
                    "  {}: {} ({}%)\n",
                    kind.to_string().bright_cyan(),
                    count.to_string().bright_white(),
                    percentage.to_string().dimmed()
                ));
            }
        }
    } else {
        output.push_str("Conversion Statistics\n");
        output.push_str(&"=".repeat(60));
        output.push_str("\n\n");

        for (label, value) in summary_rows(stats) {
            output.push_str(&format!("{label}: {value}\n"));
        }

        if !kinds.is_empty() {
            output.push_str("\nFields by Kind\n");
            output.push_str(&"-".repeat(30));
            output.push('\n');

            for (kind, count) in kinds {
                let percentage = percentage(*count, stats.emitted_fields);
                output.push_str(&format!("  {kind}: {count} ({percentage}%)\n"));
            }
        }
    }

    output
}

fn summary_rows(stats: &ConversionStats) -> Vec<(&'static str, usize)> {
    let mut rows = vec![
        ("Inputs", stats.inputs),
        ("Nodes", stats.total_nodes),
        ("Fields", stats.emitted_fields),
        ("Skipped Containers", stats.skipped_containers),
        ("Skipped Empty", stats.skipped_empty),
    ];
    if stats.renamed_ids > 0 {
        rows.push(("Renamed Identifiers", stats.renamed_ids));
    }
    rows
}

fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (count as f64 / total as f64 * 100.0) as u32
    }
}
