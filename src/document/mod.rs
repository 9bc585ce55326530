//! Document query adapter.
//!
//! The builder never touches a parser directly. It asks a [`DocumentQuery`]
//! for node sets and property values using the path language in [`path`].
//! - [`XmlDocument`] - The XML implementation
//! - [`ParseContext`] - Caller-owned parser settings that produce documents

pub mod path;
mod xml;

pub use path::{Path, Step};
pub use xml::{ParseContext, XmlDocument};

/// Node-set and property evaluation over a parsed hierarchical document.
pub trait DocumentQuery {
    /// Cheap handle to a node of this document.
    type Node: Copy + std::fmt::Debug;

    /// The top-level element of the document.
    fn root(&self) -> Option<Self::Node>;

    fn node_name(&self, node: Self::Node) -> String;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Element children of `node`, in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Evaluate `expr` against `context` and return the matched elements.
    fn node_set(&self, expr: &str, context: Self::Node) -> Vec<Self::Node>;

    /// Evaluate `expr` against `context` and return the attribute values or
    /// element text of every match.
    fn property(&self, expr: &str, context: Self::Node) -> Vec<String>;

    /// Last value of `expr`, the way a repeated scalar element overrides the earlier ones.
    fn last_property(&self, expr: &str, context: Self::Node) -> Option<String> {
        self.property(expr, context).pop()
    }

    /// The `name` attribute, which keys most entities in the document.
    fn name_attr(&self, node: Self::Node) -> Option<String> {
        self.attribute(node, "name").filter(|n| !n.is_empty())
    }
}
