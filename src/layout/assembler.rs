use tracing::debug;

use super::field::{GridLayout, LayoutField};
use super::ids::{IdRegistry, derive_id};
use crate::classify::{WidgetKind, classify, is_emitted};
use crate::config::ConvertOptions;
use crate::error::ConvertResult;
use crate::hierarchy::HierarchyNode;
use crate::stats::ConversionStats;

const ICON_BUTTON_DESCRIPTION: &str = "Image button";

/// Lay out every emitted element of `root` in a flat grid, in pre-order.
///
/// Nesting and captured positions are dropped; only document order survives.
pub fn assemble(
    root: &HierarchyNode,
    options: &ConvertOptions,
) -> ConvertResult<(GridLayout, ConversionStats)> {
    let layout_width = options.metrics.max_field_width_dp();
    let footprint = options.metrics.min_footprint_dp();

    let mut grid = GridLayout::new();
    let mut stats = ConversionStats::new();
    let mut ids = IdRegistry::new(options.duplicate_ids);

    for node in root.iter() {
        stats.record_node();

        let kind = classify(node);
        if !is_emitted(kind, node) {
            // Wrappers count with the containers they stand in for.
            stats.record_skipped(if node.is_leaf() { kind } else { WidgetKind::Container });
            continue;
        }

        let index = grid.len();
        let id = ids.claim(derive_id(node.resource_id.as_deref(), index), index)?;
        let (row, column) = grid.next_cell();

        grid.fields.push(LayoutField {
            kind,
            id,
            text: node.text.clone().filter(|_| kind.shows_text()),
            hint: node.hint.clone().filter(|_| kind == WidgetKind::EditableField),
            content_description: content_description(kind, node),
            layout_width_dp: layout_width,
            min_width_dp: footprint,
            min_height_dp: footprint,
            row,
            column,
        });
        stats.record_field(kind);
    }

    stats.renamed_ids = ids.renamed();
    debug!(
        nodes = stats.total_nodes,
        fields = stats.emitted_fields,
        rows = grid.row_count(),
        "Assembled grid layout"
    );

    Ok((grid, stats))
}

fn content_description(kind: WidgetKind, node: &HierarchyNode) -> Option<String> {
    match kind {
        WidgetKind::IconButton => Some(
            node.text
                .clone()
                .or_else(|| node.content_desc.clone())
                .unwrap_or_else(|| ICON_BUTTON_DESCRIPTION.to_string()),
        ),
        WidgetKind::Image => node.content_desc.clone(),
        WidgetKind::EditableField
        | WidgetKind::StaticText
        | WidgetKind::Button
        | WidgetKind::Container => None,
    }
}
