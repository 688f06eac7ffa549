//! Scalar conversions between nodes and Rust values.
//!
//! [`Convert`] pairs an `encode` with a `decode`; the crate ships
//! implementations for strings, integers, floats and booleans, and users
//! implement the trait for their own types. [`Node::to`] and [`Node::set`]
//! are the access points.

use crate::error::Error;
use crate::node::Node;

/// Two-way conversion between a Rust value and a [`Node`].
pub trait Convert: Sized {
    /// Build a node representing `value`.
    fn encode(value: &Self) -> Node;

    /// Read `Self` back out of a node.
    fn decode(node: &Node) -> Result<Self, Error>;
}

impl Convert for Node {
    fn encode(value: &Self) -> Node {
        value.clone()
    }

    fn decode(node: &Node) -> Result<Self, Error> {
        Ok(node.clone())
    }
}

impl Convert for String {
    fn encode(value: &Self) -> Node {
        Node::scalar(value.clone())
    }

    fn decode(node: &Node) -> Result<Self, Error> {
        if node.is_null() {
            return Ok("null".into());
        }
        node.scalar_value()
            .ok_or(Error::Conversion { target: "String" })
    }
}

impl Convert for i64 {
    fn encode(value: &Self) -> Node {
        Node::scalar(value.to_string())
    }

    fn decode(node: &Node) -> Result<Self, Error> {
        node.scalar_value()
            .and_then(|s| s.parse().ok())
            .ok_or(Error::Conversion { target: "i64" })
    }
}

impl Convert for f64 {
    fn encode(value: &Self) -> Node {
        Node::scalar(value.to_string())
    }

    fn decode(node: &Node) -> Result<Self, Error> {
        node.scalar_value()
            .and_then(|s| s.parse().ok())
            .ok_or(Error::Conversion { target: "f64" })
    }
}

impl Convert for bool {
    fn encode(value: &Self) -> Node {
        Node::scalar(if *value { "true" } else { "false" })
    }

    fn decode(node: &Node) -> Result<Self, Error> {
        match node.scalar_value().as_deref() {
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            _ => Err(Error::Conversion { target: "bool" }),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::scalar(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::scalar(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Convert::encode(&value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Convert::encode(&i64::from(value))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Convert::encode(&value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Convert::encode(&value)
    }
}

impl From<()> for Node {
    fn from(_: ()) -> Self {
        Node::null()
    }
}
