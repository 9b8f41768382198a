use std::fmt::Write;

use super::field::{GridLayout, LayoutField};
use crate::classify::WidgetKind;

pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='utf-8' standalone='yes' ?>";
pub const ANDROID_NAMESPACE: &str = "http://schemas.android.com/apk/res/android";

const FIELD_INDENT: &str = "    ";
const ATTRIBUTE_INDENT: &str = "        ";

/// Serialize a grid into an Android layout resource.
pub fn write_layout(grid: &GridLayout) -> String {
    let mut out = String::with_capacity(256 + grid.fields.len() * 512);

    out.push_str(XML_DECLARATION);
    out.push('\n');
    out.push_str("<GridLayout");
    let root_attributes = [
        ("xmlns:android", ANDROID_NAMESPACE.to_string()),
        ("android:layout_width", "match_parent".to_string()),
        ("android:layout_height", "match_parent".to_string()),
        ("android:padding", format!("{}dp", grid.padding_dp)),
        ("android:columnCount", grid.column_count.to_string()),
    ];
    for (index, (name, value)) in root_attributes.iter().enumerate() {
        if index == 0 {
            out.push(' ');
        } else {
            out.push('\n');
            out.push_str(FIELD_INDENT);
        }
        push_attribute(&mut out, name, value);
    }
    out.push_str(">\n");

    for field in &grid.fields {
        out.push('\n');
        write_field(&mut out, field);
    }

    if !grid.fields.is_empty() {
        out.push('\n');
    }
    out.push_str("</GridLayout>\n");
    out
}

fn write_field(out: &mut String, field: &LayoutField) {
    out.push_str(FIELD_INDENT);
    out.push('<');
    out.push_str(field.kind.android_tag());

    for (name, value) in field_attributes(field) {
        out.push('\n');
        out.push_str(ATTRIBUTE_INDENT);
        push_attribute(out, name, &value);
    }

    out.push_str(" />\n");
}

/// Attributes of one field, in output order.
pub fn field_attributes(field: &LayoutField) -> Vec<(&'static str, String)> {
    let mut attributes = vec![
        ("android:layout_width", format!("{}dp", field.layout_width_dp)),
        ("android:layout_height", "wrap_content".to_string()),
        ("android:layout_marginBottom", "8dp".to_string()),
        ("android:minHeight", format!("{}dp", field.min_height_dp)),
        ("android:minWidth", format!("{}dp", field.min_width_dp)),
        ("android:id", format!("@+id/{}", field.id)),
        ("android:layout_row", field.row.to_string()),
        ("android:layout_column", field.column.to_string()),
    ];

    if let Some(text) = field.text.as_ref().filter(|_| field.kind.shows_text()) {
        attributes.push(("android:text", text.clone()));
        attributes.push(("android:textColor", "#000000".to_string()));
        attributes.push(("android:textSize", "16sp".to_string()));
    }

    if let Some(hint) = field.hint.as_ref().filter(|_| field.kind == WidgetKind::EditableField) {
        attributes.push(("android:hint", hint.clone()));
    }

    if let Some(description) = &field.content_description {
        attributes.push(("android:contentDescription", description.clone()));
    }

    let background = if field.kind == WidgetKind::EditableField {
        "#F0F0F0"
    } else {
        "#FFFFFF"
    };
    attributes.push(("android:background", background.to_string()));

    if field.kind != WidgetKind::IconButton {
        attributes.push(("android:padding", "12dp".to_string()));
    }

    attributes
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push_str(name);
    out.push_str("=\"");
    escape_attribute(out, value);
    out.push('"');
}

/// Escape a value for use inside a double-quoted attribute.
pub fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' | '\r' | '\t' => {
                let _ = write!(out, "&#{};", u32::from(c));
            }
            c if c.is_control() => {
                let _ = write!(out, "&#x{:X};", u32::from(c));
            }
            c => out.push(c),
        }
    }
}
