use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::classify::{WidgetKind, classify};
use crate::hierarchy::{Bounds, HierarchyNode};

/// An actionable element of a captured screen, addressable by XPath.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlInfo {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub class_name: String,
    pub xpath: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub bounds: Bounds,
    pub clickable: bool,
    pub kind: WidgetKind,
}

/// Collect the controls a user could act on, sorted top-to-bottom then left-to-right.
pub fn extract_controls(root: &HierarchyNode) -> Vec<ControlInfo> {
    let mut controls = Vec::new();
    let mut skipped = 0usize;

    let mut stack = vec![(root, format!("/{}[1]", root.class_name))];
    while let Some((node, xpath)) = stack.pop() {
        match candidate_bounds(node) {
            Some(bounds) => controls.push(ControlInfo {
                id: String::new(),
                text: node.text.clone(),
                class_name: node.class_name.clone(),
                xpath: xpath.clone(),
                resource_id: node.resource_id.clone(),
                bounds,
                clickable: node.clickable,
                kind: classify(node),
            }),
            None => skipped += 1,
        }

        let child_paths = child_xpaths(node, &xpath);
        stack.extend(node.children.iter().zip(child_paths).rev());
    }

    controls.sort_by_key(|control| (control.bounds.top, control.bounds.left));
    for (index, control) in controls.iter_mut().enumerate() {
        control.id = format!("control_{index}");
    }

    debug!(controls = controls.len(), skipped, "Extracted controls");
    controls
}

/// Bounds of `node` when it qualifies as a control.
fn candidate_bounds(node: &HierarchyNode) -> Option<Bounds> {
    if !node.displayed {
        return None;
    }
    if !(node.clickable || node.text.is_some() || node.resource_id.is_some()) {
        return None;
    }
    // The clickable child is the real target.
    if node.clickable && node.children.iter().any(|child| child.clickable) {
        return None;
    }
    node.bounds.filter(|bounds| !bounds.is_empty())
}

/// `parent/class[n]` for each child, numbering siblings that share a class.
fn child_xpaths(node: &HierarchyNode, parent: &str) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    node.children
        .iter()
        .map(|child| {
            let position = seen.entry(child.class_name.as_str()).or_insert(0);
            *position += 1;
            format!("{parent}/{}[{}]", child.class_name, position)
        })
        .collect()
}
