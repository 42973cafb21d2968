//! Node abstraction over the host document.
//!
//! The engine never touches a concrete DOM. Hosts implement [`Dom`] for their
//! document (see the `wasm` feature for `web-sys`); [`MemoryDom`] is a
//! headless document for native hosts and tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::{PopperError, PopperResult};

/// Operations the engine needs from a document.
pub trait Dom {
    /// Handle to a node in this document.
    type Node: Clone + PartialEq + fmt::Debug;

    /// The node floating elements are relocated into (the document body).
    fn append_target(&self) -> Option<Self::Node>;

    /// Create a detached element.
    ///
    /// # Errors
    ///
    /// Returns an error if the document refuses to create the element.
    fn create_element(&self, tag: &str) -> PopperResult<Self::Node>;

    /// Names of all attributes on a node, in document order.
    fn attribute_names(&self, node: &Self::Node) -> Vec<String>;

    /// Set an attribute on a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is gone or the name is invalid.
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> PopperResult<()>;

    /// Append `child` as the last child of `parent`, moving it if attached
    /// elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is gone.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> PopperResult<()>;

    /// Detach `child` from `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if `child` is not a child of `parent`.
    fn remove_child(&self, parent: &Self::Node, child: &Self::Node) -> PopperResult<()>;

    /// Parent of a node, if attached.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Set an inline style property.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not carry inline styles.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> PopperResult<()>;

    /// Stop clicks inside `node` from propagating to outside-click handlers.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be installed.
    fn guard_clicks(&self, node: &Self::Node) -> PopperResult<()>;

    /// Remove the listener installed by [`Dom::guard_clicks`].
    fn release_clicks(&self, node: &Self::Node);
}

/// Handle to a node in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    styles: BTreeMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    click_guarded: bool,
}

#[derive(Debug)]
struct Document {
    nodes: Vec<NodeData>,
    body: NodeId,
}

impl Document {
    fn node(&self, id: NodeId) -> PopperResult<&NodeData> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| PopperError::Dom(format!("unknown {id}")))
    }

    fn node_mut(&mut self, id: NodeId) -> PopperResult<&mut NodeData> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| PopperError::Dom(format!("unknown {id}")))
    }

    fn detach(&mut self, child: NodeId) -> PopperResult<()> {
        if let Some(parent) = self.node(child)?.parent {
            self.node_mut(parent)?.children.retain(|&c| c != child);
            self.node_mut(child)?.parent = None;
        }
        Ok(())
    }
}

/// Headless in-memory document.
///
/// Cloning yields another handle to the same document.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    doc: Rc<RefCell<Document>>,
}

impl MemoryDom {
    /// Create a document containing only a `body` element.
    #[must_use]
    pub fn new() -> Self {
        let body = NodeData {
            tag: "body".to_string(),
            ..NodeData::default()
        };
        Self {
            doc: Rc::new(RefCell::new(Document {
                nodes: vec![body],
                body: NodeId(0),
            })),
        }
    }

    /// The document body.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.doc.borrow().body
    }

    /// Create a detached element.
    pub fn create(&self, tag: &str) -> NodeId {
        let mut doc = self.doc.borrow_mut();
        doc.nodes.push(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        });
        NodeId(doc.nodes.len() - 1)
    }

    /// Tag name of a node.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.doc.borrow().node(node).ok().map(|n| n.tag.clone())
    }

    /// Children of a node, in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.doc
            .borrow()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Value of an attribute.
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let doc = self.doc.borrow();
        let data = doc.node(node).ok()?;
        data.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Value of an inline style property.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.doc
            .borrow()
            .node(node)
            .ok()
            .and_then(|n| n.styles.get(property).cloned())
    }

    /// Whether clicks inside a node are currently swallowed.
    #[must_use]
    pub fn is_click_guarded(&self, node: NodeId) -> bool {
        self.doc
            .borrow()
            .node(node)
            .is_ok_and(|n| n.click_guarded)
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn append_target(&self) -> Option<NodeId> {
        Some(self.body())
    }

    fn create_element(&self, tag: &str) -> PopperResult<NodeId> {
        Ok(self.create(tag))
    }

    fn attribute_names(&self, node: &NodeId) -> Vec<String> {
        self.doc
            .borrow()
            .node(*node)
            .map(|n| n.attributes.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> PopperResult<()> {
        let mut doc = self.doc.borrow_mut();
        let data = doc.node_mut(*node)?;
        if let Some(slot) = data.attributes.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value.to_string();
        } else {
            data.attributes.push((name.to_string(), value.to_string()));
        }
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> PopperResult<()> {
        if parent == child {
            return Err(PopperError::Dom(format!("cannot append {child} to itself")));
        }
        let mut doc = self.doc.borrow_mut();
        doc.node(*parent)?;
        doc.detach(*child)?;
        doc.node_mut(*parent)?.children.push(*child);
        doc.node_mut(*child)?.parent = Some(*parent);
        Ok(())
    }

    fn remove_child(&self, parent: &NodeId, child: &NodeId) -> PopperResult<()> {
        let mut doc = self.doc.borrow_mut();
        if doc.node(*child)?.parent != Some(*parent) {
            return Err(PopperError::Dom(format!("{child} is not a child of {parent}")));
        }
        doc.detach(*child)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.doc.borrow().node(*node).ok().and_then(|n| n.parent)
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> PopperResult<()> {
        self.doc
            .borrow_mut()
            .node_mut(*node)?
            .styles
            .insert(property.to_string(), value.to_string());
        Ok(())
    }

    fn guard_clicks(&self, node: &NodeId) -> PopperResult<()> {
        self.doc.borrow_mut().node_mut(*node)?.click_guarded = true;
        Ok(())
    }

    fn release_clicks(&self, node: &NodeId) {
        if let Ok(data) = self.doc.borrow_mut().node_mut(*node) {
            data.click_guarded = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_moves_node() {
        let dom = MemoryDom::new();
        let a = dom.create("div");
        let b = dom.create("div");
        let child = dom.create("span");

        dom.append_child(&a, &child).expect("append to a");
        dom.append_child(&b, &child).expect("move to b");

        assert!(dom.children(a).is_empty());
        assert_eq!(dom.children(b), vec![child]);
        assert_eq!(dom.parent(&child), Some(b));
    }

    #[test]
    fn test_remove_child_requires_parent() {
        let dom = MemoryDom::new();
        let a = dom.create("div");
        let child = dom.create("span");

        assert!(dom.remove_child(&a, &child).is_err());
        dom.append_child(&a, &child).expect("append");
        dom.remove_child(&a, &child).expect("remove");
        assert_eq!(dom.parent(&child), None);
    }

    #[test]
    fn test_attributes_keep_order_and_overwrite() {
        let dom = MemoryDom::new();
        let node = dom.create("div");
        dom.set_attribute(&node, "data-v-1a2b", "").expect("set");
        dom.set_attribute(&node, "class", "popper").expect("set");
        dom.set_attribute(&node, "class", "popper is-dark").expect("overwrite");

        assert_eq!(dom.attribute_names(&node), vec!["data-v-1a2b", "class"]);
        assert_eq!(dom.attribute(node, "class").as_deref(), Some("popper is-dark"));
    }

    #[test]
    fn test_click_guard_toggle() {
        let dom = MemoryDom::new();
        let node = dom.create("div");
        dom.guard_clicks(&node).expect("guard");
        assert!(dom.is_click_guarded(node));
        dom.release_clicks(&node);
        assert!(!dom.is_click_guarded(node));
    }
}
