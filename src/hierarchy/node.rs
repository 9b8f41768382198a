use nom::{
    IResult, Parser,
    character::complete::{char, i32 as int32, multispace0},
    combinator::all_consuming,
    sequence::{delimited, separated_pair},
};
use serde::{Deserialize, Serialize};

/// Element rectangle in source pixel coordinates, shared by the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Parse the `[left,top][right,bottom]` form used by UiAutomator dumps.
    pub fn parse(value: &str) -> Option<Self> {
        all_consuming(delimited(multispace0, bounds_pair, multispace0))
            .parse(value)
            .ok()
            .map(|(_, bounds)| bounds)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

fn point(input: &str) -> IResult<&str, (i32, i32)> {
    delimited(
        char('['),
        separated_pair(
            delimited(multispace0, int32, multispace0),
            char(','),
            delimited(multispace0, int32, multispace0),
        ),
        char(']'),
    )
    .parse(input)
}

fn bounds_pair(input: &str) -> IResult<&str, Bounds> {
    let (input, (left, top)) = point(input)?;
    let (input, _) = multispace0(input)?;
    let (input, (right, bottom)) = point(input)?;
    Ok((input, Bounds::new(left, top, right, bottom)))
}

/// One captured UI element and its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub tag: String,
    pub class_name: String,
    pub text: Option<String>,
    pub hint: Option<String>,
    pub content_desc: Option<String>,
    pub resource_id: Option<String>,
    pub bounds: Option<Bounds>,
    pub clickable: bool,
    pub enabled: bool,
    pub focusable: bool,
    pub displayed: bool,
    pub password: bool,
    pub scrollable: bool,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// A node with no attributes; `class_name` starts as the tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            class_name: tag.clone(),
            tag,
            text: None,
            hint: None,
            content_desc: None,
            resource_id: None,
            bounds: None,
            clickable: false,
            enabled: true,
            focusable: false,
            displayed: true,
            password: false,
            scrollable: false,
            children: Vec::new(),
        }
    }

    /// Build a node from the tag name and its decoded attributes.
    pub fn from_attributes<'a, I>(tag: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut node = Self::new(tag);
        for (name, value) in attributes {
            node.apply_attribute(name, value);
        }
        node
    }

    fn apply_attribute(&mut self, name: &str, value: String) {
        match name {
            "class" if !value.is_empty() => self.class_name = value,
            "text" => self.text = non_empty(value),
            "hint" => self.hint = non_empty(value),
            "content-desc" => self.content_desc = non_empty(value),
            "resource-id" => self.resource_id = non_empty(value),
            "bounds" => self.bounds = Bounds::parse(&value),
            "clickable" => self.clickable = is_true(&value),
            "enabled" => self.enabled = is_true(&value),
            "focusable" => self.focusable = is_true(&value),
            "displayed" => self.displayed = is_true(&value),
            "password" => self.password = is_true(&value),
            "scrollable" => self.scrollable = is_true(&value),
            _ => {}
        }
    }

    pub fn with_child(mut self, child: HierarchyNode) -> Self {
        self.children.push(child);
        self
    }

    /// Class name without its package, e.g. `EditText` for `android.widget.EditText`.
    pub fn simple_class_name(&self) -> &str {
        self.class_name
            .rsplit(['.', '$'])
            .next()
            .unwrap_or(&self.class_name)
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first, pre-order walk over this node and all descendants.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

pub struct PreOrder<'a> {
    stack: Vec<&'a HierarchyNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a HierarchyNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
