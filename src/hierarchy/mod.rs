pub mod node;
pub mod parser;

pub use node::{Bounds, HierarchyNode, PreOrder};
pub use parser::{parse_hierarchy, parse_hierarchy_bytes, read_hierarchy};
