//! In-memory document model.
//!
//! A [`Node`] is a cheap handle onto shared storage. Cloning a handle
//! aliases the same data, which is how anchors and aliases observe each
//! other: the builder resolves `*name` by handing out another handle onto
//! the anchored node's cell. [`Node::deep_clone`] is the escape hatch that
//! produces an independent tree.
//!
//! Mapping entries keep insertion order; keys are compared by structural
//! value, and lookup is a linear scan (documents keep maps small). Keys
//! are deep-cloned on insert so no outside handle can mutate a key after
//! it entered a map.

use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::convert::Convert;
use crate::error::Error;

/// What a node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Nothing
    Null,
    /// A string scalar
    Scalar,
    /// An ordered sequence
    Seq,
    /// An ordered mapping
    Map,
}

/// Presentation style, preserved from parse to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeStyle {
    /// Indentation-delimited
    #[default]
    Block,
    /// Bracketed inline (`{}` / `[]`)
    Flow,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Null,
    Scalar(String),
    Seq(Vec<Node>),
    Map(Vec<(Node, Node)>),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    style: NodeStyle,
}

/// Handle onto a YAML node.
///
/// `Clone` copies the handle, not the data; every clone observes mutations
/// made through any other. Use [`Node::deep_clone`] for an independent
/// copy.
#[derive(Debug, Clone)]
pub struct Node {
    data: Rc<RefCell<NodeData>>,
}

impl Default for Node {
    fn default() -> Self {
        Node::null()
    }
}

impl Node {
    fn from_data(data: NodeData) -> Self {
        Node {
            data: Rc::new(RefCell::new(data)),
        }
    }

    /// A null node.
    pub fn null() -> Self {
        Node::from_data(NodeData {
            kind: NodeKind::Null,
            style: NodeStyle::Block,
        })
    }

    /// A scalar node holding `value`.
    pub fn scalar(value: impl Into<String>) -> Self {
        Node::from_data(NodeData {
            kind: NodeKind::Scalar(value.into()),
            style: NodeStyle::Block,
        })
    }

    /// An empty mapping.
    pub fn map() -> Self {
        Node::from_data(NodeData {
            kind: NodeKind::Map(Vec::new()),
            style: NodeStyle::Block,
        })
    }

    /// An empty sequence.
    pub fn seq() -> Self {
        Node::from_data(NodeData {
            kind: NodeKind::Seq(Vec::new()),
            style: NodeStyle::Block,
        })
    }

    /// The node's type.
    pub fn node_type(&self) -> NodeType {
        match self.data.borrow().kind {
            NodeKind::Null => NodeType::Null,
            NodeKind::Scalar(_) => NodeType::Scalar,
            NodeKind::Seq(_) => NodeType::Seq,
            NodeKind::Map(_) => NodeType::Map,
        }
    }

    /// Presentation style used by the emitter.
    pub fn style(&self) -> NodeStyle {
        self.data.borrow().style
    }

    /// Change the presentation style of this node (not its children).
    pub fn set_style(&self, style: NodeStyle) {
        self.data.borrow_mut().style = style;
    }

    /// Whether two handles share the same underlying data.
    pub fn shares_data(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.data.borrow().kind, NodeKind::Null)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.data.borrow().kind, NodeKind::Scalar(_))
    }

    pub fn is_seq(&self) -> bool {
        matches!(self.data.borrow().kind, NodeKind::Seq(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self.data.borrow().kind, NodeKind::Map(_))
    }

    pub fn is_collection(&self) -> bool {
        self.is_seq() || self.is_map()
    }

    /// Element count for collections, char count for scalars, 0 for null.
    pub fn size(&self) -> usize {
        match &self.data.borrow().kind {
            NodeKind::Null => 0,
            NodeKind::Scalar(s) => s.chars().count(),
            NodeKind::Seq(items) => items.len(),
            NodeKind::Map(pairs) => pairs.len(),
        }
    }

    /// The scalar value, if this is a scalar.
    pub fn scalar_value(&self) -> Option<String> {
        match &self.data.borrow().kind {
            NodeKind::Scalar(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Sequence element `i`, sharing data with the stored node.
    pub fn at(&self, index: usize) -> Result<Node, Error> {
        match &self.data.borrow().kind {
            NodeKind::Seq(items) => items.get(index).cloned().ok_or(Error::BadDereference),
            _ => Err(Error::BadDereference),
        }
    }

    /// Read-only lookup by structural key equality.
    pub fn get(&self, key: impl Into<Node>) -> Result<Node, Error> {
        let key = key.into();
        match &self.data.borrow().kind {
            NodeKind::Map(pairs) => pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .ok_or(Error::BadDereference),
            _ => Err(Error::BadDereference),
        }
    }

    /// Read-write lookup: a Null node upgrades to a mapping, and a missing
    /// key is inserted with a Null value whose handle is returned.
    pub fn entry(&self, key: impl Into<Node>) -> Result<Node, Error> {
        let key = key.into();
        {
            let mut data = self.data.borrow_mut();
            match &data.kind {
                NodeKind::Null => data.kind = NodeKind::Map(Vec::new()),
                NodeKind::Map(_) => {}
                _ => return Err(Error::BadDereference),
            }
        }

        let found = match &self.data.borrow().kind {
            NodeKind::Map(pairs) => pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        };
        if let Some(value) = found {
            return Ok(value);
        }

        let stored_key = key.deep_clone();
        let value = Node::null();
        if let NodeKind::Map(pairs) = &mut self.data.borrow_mut().kind {
            pairs.push((stored_key, value.clone()));
        }
        Ok(value)
    }

    /// Whether a structurally equal key exists. Never mutates.
    pub fn contains(&self, key: &Node) -> bool {
        match &self.data.borrow().kind {
            NodeKind::Map(pairs) => pairs.iter().any(|(k, _)| k == key),
            _ => false,
        }
    }

    /// Insert a pair; false if the node is neither Null nor Map, or the
    /// key already exists. Assign through [`Node::entry`] to overwrite.
    pub fn insert(&self, key: impl Into<Node>, value: impl Into<Node>) -> bool {
        let key = key.into();
        let value = value.into();
        {
            let mut data = self.data.borrow_mut();
            match &data.kind {
                NodeKind::Null => data.kind = NodeKind::Map(Vec::new()),
                NodeKind::Map(_) => {}
                _ => return false,
            }
        }
        if self.contains(&key) {
            return false;
        }

        let stored_key = key.deep_clone();
        if let NodeKind::Map(pairs) = &mut self.data.borrow_mut().kind {
            pairs.push((stored_key, value));
        }
        true
    }

    /// Append to a sequence; a Null node upgrades to a sequence first.
    pub fn push(&self, value: impl Into<Node>) -> bool {
        let value = value.into();
        let mut data = self.data.borrow_mut();
        match &mut data.kind {
            NodeKind::Null => {
                data.kind = NodeKind::Seq(vec![value]);
                true
            }
            NodeKind::Seq(items) => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Remove a mapping entry; false if absent or not a map.
    pub fn remove(&self, key: &Node) -> bool {
        match &mut self.data.borrow_mut().kind {
            NodeKind::Map(pairs) => {
                let before = pairs.len();
                pairs.retain(|(k, _)| k != key);
                pairs.len() != before
            }
            _ => false,
        }
    }

    /// Handles onto the mapping's keys, in insertion order.
    pub fn keys(&self) -> Vec<Node> {
        match &self.data.borrow().kind {
            NodeKind::Map(pairs) => pairs.iter().map(|(k, _)| k.clone()).collect(),
            _ => Vec::new(),
        }
    }

    /// Visit the mapping's pairs in insertion order.
    pub fn pairs(&self) -> Vec<(Node, Node)> {
        match &self.data.borrow().kind {
            NodeKind::Map(pairs) => pairs.clone(),
            _ => Vec::new(),
        }
    }

    /// Aliasing assignment: every handle sharing this node's data observes
    /// `rhs`'s type, style and contents.
    pub fn assign(&self, rhs: &Node) {
        if Rc::ptr_eq(&self.data, &rhs.data) {
            return;
        }
        let new_data = rhs.data.borrow().clone();
        *self.data.borrow_mut() = new_data;
    }

    /// Encode a value and assign it through this handle.
    pub fn set<T: Convert>(&self, value: T) {
        self.assign(&T::encode(&value));
    }

    /// Decode this node into `T`.
    pub fn to<T: Convert>(&self) -> Result<T, Error> {
        T::decode(self)
    }

    /// Deep, independent copy: shares no data with `self`.
    pub fn deep_clone(&self) -> Node {
        let data = self.data.borrow();
        let kind = match &data.kind {
            NodeKind::Null => NodeKind::Null,
            NodeKind::Scalar(s) => NodeKind::Scalar(s.clone()),
            NodeKind::Seq(items) => NodeKind::Seq(items.iter().map(Node::deep_clone).collect()),
            NodeKind::Map(pairs) => NodeKind::Map(
                pairs
                    .iter()
                    .map(|(k, v)| (k.deep_clone(), v.deep_clone()))
                    .collect(),
            ),
        };
        Node::from_data(NodeData {
            kind,
            style: data.style,
        })
    }

    /// Reset to an empty node of the same type, observed by every handle.
    pub fn clear(&self) {
        let mut data = self.data.borrow_mut();
        data.kind = match data.kind {
            NodeKind::Null => NodeKind::Null,
            NodeKind::Scalar(_) => NodeKind::Scalar(String::new()),
            NodeKind::Seq(_) => NodeKind::Seq(Vec::new()),
            NodeKind::Map(_) => NodeKind::Map(Vec::new()),
        };
    }

    fn raw_hash(&self) -> u64 {
        const SEQ_SEED: u64 = 0x5eed_5eed_0000_0001;
        const MAP_SEED: u64 = 0x5eed_5eed_0000_0002;

        let data = self.data.borrow();
        match &data.kind {
            NodeKind::Null => 0,
            NodeKind::Scalar(s) => {
                let mut hasher = DefaultHasher::new();
                s.hash(&mut hasher);
                hasher.finish()
            }
            NodeKind::Seq(items) => items
                .iter()
                .fold(SEQ_SEED, |acc, item| acc ^ item.raw_hash()),
            NodeKind::Map(pairs) => pairs.iter().fold(MAP_SEED, |acc, (k, v)| {
                acc ^ (k.raw_hash().rotate_left(1) ^ v.raw_hash())
            }),
        }
    }
}

/// Structural equality with a shared-data fast path. Mapping pairs compare
/// without regard to insertion order; sequences compare element-wise.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.data, &other.data) {
            return true;
        }
        let a = self.data.borrow();
        let b = other.data.borrow();
        match (&a.kind, &b.kind) {
            (NodeKind::Null, NodeKind::Null) => true,
            (NodeKind::Scalar(x), NodeKind::Scalar(y)) => x == y,
            (NodeKind::Seq(x), NodeKind::Seq(y)) => x == y,
            (NodeKind::Map(x), NodeKind::Map(y)) => {
                x.len() == y.len()
                    && x.iter()
                        .all(|(k, v)| y.iter().any(|(k2, v2)| k == k2 && v == v2))
            }
            _ => false,
        }
    }
}

impl Eq for Node {}

/// XOR-fold hash over element hashes, consistent with [`PartialEq`].
impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.raw_hash());
    }
}
