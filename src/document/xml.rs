//! [`DocumentQuery`] over XML, backed by `roxmltree`.

use super::path::{Path, Step};
use super::DocumentQuery;
use crate::error::{GniError, Result};
use roxmltree::{Document, Node, NodeId, ParsingOptions};

/// Default cap on the number of nodes in one document.
const DEFAULT_NODES_LIMIT: u32 = 16 * 1024 * 1024;

/// Parser settings owned by whoever drives population cycles.
///
/// One context is created up front and used for every cycle, replacing any
/// process-wide parser initialization.
#[derive(Debug, Clone)]
pub struct ParseContext {
    pub allow_dtd: bool,
    pub nodes_limit: u32,
}

impl Default for ParseContext {
    fn default() -> Self {
        ParseContext {
            allow_dtd: false,
            nodes_limit: DEFAULT_NODES_LIMIT,
        }
    }
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the document text from `path`.
    pub fn read_file(&self, path: &str) -> Result<String> {
        log::debug!("reading network document {path}");
        std::fs::read_to_string(path)
            .map_err(|e| GniError::FatalInput(format!("unable to read XML file ({path}): {e}")))
    }

    /// Parse `text` into a queryable document.
    ///
    /// # Returns
    /// * `Ok(XmlDocument)` - The parsed document, borrowing `text`
    /// * `Err(GniError::FatalInput)` - If the text is not well formed
    pub fn parse<'input>(&self, text: &'input str) -> Result<XmlDocument<'input>> {
        let mut opts = ParsingOptions::default();
        opts.allow_dtd = self.allow_dtd;
        opts.nodes_limit = self.nodes_limit;
        let doc = Document::parse_with_options(text, opts)
            .map_err(|e| GniError::FatalInput(format!("unable to parse XML: {e}")))?;
        Ok(XmlDocument { doc })
    }
}

/// A parsed XML document.
pub struct XmlDocument<'input> {
    doc: Document<'input>,
}

impl<'input> XmlDocument<'input> {
    fn node(&self, id: NodeId) -> Option<Node<'_, 'input>> {
        self.doc.get_node(id)
    }

    fn step_children(&self, nodes: Vec<NodeId>, step: &Step) -> Vec<NodeId> {
        nodes
            .into_iter()
            .filter_map(|id| self.node(id))
            .flat_map(|n| n.children())
            .filter(|c| c.is_element())
            .filter(|c| {
                step.matches(c.tag_name().name(), |key| {
                    c.attribute(key).map(|v| v.to_string())
                })
            })
            .map(|c| c.id())
            .collect()
    }

    fn evaluate(&self, path: &Path, context: NodeId) -> Vec<NodeId> {
        let start = if path.absolute {
            self.doc.root().id()
        } else {
            context
        };
        path.steps
            .iter()
            .fold(vec![start], |nodes, step| self.step_children(nodes, step))
    }

    fn parse_path(expr: &str) -> Option<Path> {
        match Path::parse(expr) {
            Ok(path) => Some(path),
            Err(e) => {
                log::error!("bad document path: {e}");
                None
            }
        }
    }
}

/// Concatenated text below `node`, trimmed.
fn node_text(node: Node) -> String {
    node.descendants()
        .filter(|d| d.is_text())
        .filter_map(|d| d.text())
        .collect::<String>()
        .trim()
        .to_string()
}

impl<'input> DocumentQuery for XmlDocument<'input> {
    type Node = NodeId;

    fn root(&self) -> Option<NodeId> {
        Some(self.doc.root_element().id())
    }

    fn node_name(&self, node: NodeId) -> String {
        self.node(node)
            .map(|n| n.tag_name().name().to_string())
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node)?.attribute(name).map(|v| v.to_string())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        match self.node(node) {
            Some(n) => n.children().filter(|c| c.is_element()).map(|c| c.id()).collect(),
            None => Vec::new(),
        }
    }

    fn node_set(&self, expr: &str, context: NodeId) -> Vec<NodeId> {
        match Self::parse_path(expr) {
            Some(path) if path.attribute.is_none() => self.evaluate(&path, context),
            Some(_) => {
                log::error!("node set expression '{expr}' ends in an attribute");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn property(&self, expr: &str, context: NodeId) -> Vec<String> {
        let path = match Self::parse_path(expr) {
            Some(path) => path,
            None => return Vec::new(),
        };
        let nodes = self.evaluate(&path, context).into_iter().filter_map(|id| self.node(id));
        let values: Vec<String> = match &path.attribute {
            Some(attr) => nodes
                .filter_map(|n| n.attribute(attr.as_str()).map(|v| v.to_string()))
                .collect(),
            None => nodes.map(node_text).collect(),
        };
        log::trace!("property '{expr}' -> {values:?}");
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0"?>
<network-data version="42" applied-version="41">
  <configuration>
    <property name="mode"><value>VPCMIDO</value></property>
    <property name="instanceDNSServers">
      <value>10.1.1.254</value>
      <value>10.1.1.253</value>
    </property>
  </configuration>
  <instances>
    <instance name="i-1"><ownerId>123</ownerId></instance>
    <instance name="i-2"><ownerId> 456 </ownerId></instance>
  </instances>
</network-data>"#;

    #[test]
    fn test_parse_and_root() {
        let ctx = ParseContext::new();
        let doc = ctx.parse(DOC).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.node_name(root), "network-data");
        let names: Vec<String> = doc.children(root).into_iter().map(|c| doc.node_name(c)).collect();
        assert_eq!(names, vec!["configuration", "instances"]);
    }

    #[test]
    fn test_absolute_attribute() {
        let doc = ParseContext::new().parse(DOC).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.property("/network-data/@version", root), vec!["42"]);
        assert_eq!(doc.property("/network-data/@applied-version", root), vec!["41"]);
    }

    #[test]
    fn test_property_with_predicate() {
        let doc = ParseContext::new().parse(DOC).unwrap();
        let root = doc.root().unwrap();
        let config = doc.node_set("./configuration", root)[0];
        assert_eq!(
            doc.property("./property[@name='mode']/value", config),
            vec!["VPCMIDO"]
        );
        assert_eq!(
            doc.property("./property[@name='instanceDNSServers']/value", config),
            vec!["10.1.1.254", "10.1.1.253"]
        );
        assert!(doc.property("./property[@name='missing']/value", config).is_empty());
    }

    #[test]
    fn test_node_set_and_text() {
        let doc = ParseContext::new().parse(DOC).unwrap();
        let root = doc.root().unwrap();
        let instances = doc.node_set("./instances/instance", root);
        assert_eq!(instances.len(), 2);
        assert_eq!(doc.name_attr(instances[1]).as_deref(), Some("i-2"));
        assert_eq!(doc.last_property("./ownerId", instances[1]).as_deref(), Some("456"));
    }

    #[test]
    fn test_bad_expression_is_empty() {
        let doc = ParseContext::new().parse(DOC).unwrap();
        let root = doc.root().unwrap();
        assert!(doc.node_set("./instances//instance", root).is_empty());
        assert!(doc.node_set("./instances/@name", root).is_empty());
    }

    #[test]
    fn test_malformed_document_is_fatal() {
        let err = ParseContext::new().parse("<network-data>").err().unwrap();
        assert!(matches!(err, GniError::FatalInput(_)));
    }
}
