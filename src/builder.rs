//! Event handler that assembles the node tree.
//!
//! Keeps a stack of in-progress nodes and a side stack of pending keys.
//! Because complex keys are themselves collections, the builder tracks how
//! many mappings are open versus how many of them are waiting for a key,
//! and routes each completed child into the right slot.

use indexmap::IndexMap;

use crate::error::Error;
use crate::event::EventHandler;
use crate::mark::Mark;
use crate::node::{Node, NodeStyle};

/// Assembles parse events into a [`Node`] tree.
#[derive(Default)]
pub struct NodeBuilder {
    stack: Vec<Node>,
    keys: Vec<Node>,
    map_depth: usize,
    complex_key_depth: usize,
    anchors: IndexMap<String, Node>,
    root: Option<Node>,
    docs: Vec<Node>,
    mark: Mark,
}

impl NodeBuilder {
    /// A fresh builder with no document.
    pub fn new() -> Self {
        NodeBuilder::default()
    }

    /// The most recently completed document's root; Null if none was
    /// produced.
    pub fn root(&self) -> Node {
        self.docs.last().cloned().unwrap_or_else(Node::null)
    }

    /// Every completed document so far, draining the builder. Documents
    /// closed before a later parse failure remain available here.
    pub fn take_documents(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.docs)
    }

    fn register(&mut self, anchor: Option<String>, node: &Node) {
        if let Some(name) = anchor {
            self.anchors.insert(name, node.clone());
        }
    }

    /// Route a completed child into its parent, or crown it the root.
    fn close(&mut self) -> Result<(), Error> {
        debug_assert!(!self.stack.is_empty());
        let Some(node) = self.stack.pop() else {
            return Ok(());
        };

        let Some(parent) = self.stack.last().cloned() else {
            self.root = Some(node);
            return Ok(());
        };

        if parent.is_seq() {
            parent.push(node);
            return Ok(());
        }

        // Parent is a mapping: alternate key, value, key, value...
        debug_assert!(parent.is_map());
        let expecting_value = self.keys.len() == self.map_depth - self.complex_key_depth;
        if expecting_value {
            let key = self.keys.pop().unwrap_or_default();
            if parent.contains(&key) {
                return Err(Error::DuplicatedKey { mark: self.mark });
            }
            parent.insert(key, node);
        } else {
            self.keys.push(node);
        }
        Ok(())
    }
}

impl EventHandler for NodeBuilder {
    fn on_document_start(&mut self, mark: Mark) -> Result<(), Error> {
        self.mark = mark;
        self.anchors.clear();
        // Discard residue of a document that aborted mid-build.
        self.stack.clear();
        self.keys.clear();
        self.map_depth = 0;
        self.complex_key_depth = 0;
        self.root = None;
        Ok(())
    }

    fn on_document_end(&mut self) -> Result<(), Error> {
        self.docs.push(self.root.take().unwrap_or_else(Node::null));
        Ok(())
    }

    fn on_map_start(
        &mut self,
        mark: Mark,
        anchor: Option<String>,
        style: NodeStyle,
    ) -> Result<(), Error> {
        self.mark = mark;
        if self.map_depth > self.keys.len() {
            // The enclosing mapping is still waiting for its key, so this
            // collection is part of a complex key.
            self.complex_key_depth += 1;
        }
        self.map_depth += 1;

        let node = Node::map();
        node.set_style(style);
        self.register(anchor, &node);
        self.stack.push(node);
        Ok(())
    }

    fn on_map_end(&mut self) -> Result<(), Error> {
        debug_assert!(self.map_depth > 0);
        if self.complex_key_depth > 0 {
            self.complex_key_depth -= 1;
        }
        self.map_depth -= 1;
        self.close()
    }

    fn on_seq_start(
        &mut self,
        mark: Mark,
        anchor: Option<String>,
        style: NodeStyle,
    ) -> Result<(), Error> {
        self.mark = mark;
        let node = Node::seq();
        node.set_style(style);
        self.register(anchor, &node);
        self.stack.push(node);
        Ok(())
    }

    fn on_seq_end(&mut self) -> Result<(), Error> {
        self.close()
    }

    fn on_scalar(
        &mut self,
        mark: Mark,
        anchor: Option<String>,
        value: String,
    ) -> Result<(), Error> {
        self.mark = mark;
        let node = Node::scalar(value);
        self.register(anchor, &node);
        self.stack.push(node);
        self.close()
    }

    fn on_null(&mut self, mark: Mark, anchor: Option<String>) -> Result<(), Error> {
        self.mark = mark;
        let node = Node::null();
        self.register(anchor, &node);
        self.stack.push(node);
        self.close()
    }

    fn on_alias(&mut self, mark: Mark, name: String) -> Result<(), Error> {
        self.mark = mark;
        let node = match self.anchors.get(&name) {
            // Share the anchored node's data: mutation through either
            // handle is visible through both.
            Some(anchored) => anchored.clone(),
            None => return Err(Error::UnknownAnchor { mark, name }),
        };
        self.stack.push(node);
        self.close()
    }
}
