//! Top-level load and dump entry points.
//!
//! Thin wrappers that wire a [`Parser`] to a [`NodeBuilder`] per call.
//! File variants carry the path in their error; multi-document variants
//! drain the stream with `parse_next_document` and keep the documents
//! completed before a failure.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::builder::NodeBuilder;
use crate::emitter::{emit_to_string, EmitOptions, Emitter};
use crate::error::Error;
use crate::node::Node;
use crate::parser::Parser;

/// Parse the first document from a reader. Empty input yields a Null
/// root.
pub fn load(input: impl Read) -> Result<Node, Error> {
    let mut builder = NodeBuilder::new();
    Parser::new(input, &mut builder)?.parse_next_document()?;
    Ok(builder.root())
}

/// Parse the first document of a string.
pub fn load_str(input: &str) -> Result<Node, Error> {
    load(input.as_bytes())
}

/// Parse the first document of a file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Node, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;
    load(bytes.as_slice())
}

/// Parse every document from a reader, in order.
pub fn load_all(input: impl Read) -> Result<Vec<Node>, Error> {
    let mut builder = NodeBuilder::new();
    let mut parser = Parser::new(input, &mut builder)?;
    while parser.parse_next_document()? {}
    Ok(builder.take_documents())
}

/// Parse every document of a string.
pub fn load_str_all(input: &str) -> Result<Vec<Node>, Error> {
    load_all(input.as_bytes())
}

/// Parse every document of a file.
pub fn load_file_all(path: impl AsRef<Path>) -> Result<Vec<Node>, Error> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;
    load_all(bytes.as_slice())
}

/// Serialize a node to a string.
pub fn dump(node: &Node) -> String {
    emit_to_string(node)
}

/// Serialize a node into any formatter sink.
pub fn dump_to(out: &mut impl std::fmt::Write, node: &Node) -> Result<(), Error> {
    Emitter::new(out).emit(node)
}

/// Serialize a node into a formatter sink with explicit options.
pub fn dump_to_with(
    out: &mut impl std::fmt::Write,
    node: &Node,
    options: EmitOptions,
) -> Result<(), Error> {
    Emitter::with_options(out, options).emit(node)
}

/// Serialize a node to a file.
pub fn dump_file(path: impl AsRef<Path>, node: &Node) -> Result<(), Error> {
    let path = path.as_ref();
    fs::write(path, dump(node)).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })
}
