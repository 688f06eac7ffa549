//! Serializer from a node tree back to YAML text.
//!
//! A straight recursive walk with a running line/column cursor. Prefixes
//! (`- `, `? `, `: `) pad from the current column rather than resetting
//! it, which is what lets a block mapping start on the same line as its
//! `- ` marker. Flow-styled nodes render inline and force their children
//! into flow form too.

use std::fmt::{self, Write};

use crate::error::Error;
use crate::node::{Node, NodeStyle};

/// Emitter settings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmitOptions {
    /// Spaces per nesting level (never tabs).
    pub indent: u32,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions { indent: 2 }
    }
}

/// Streaming YAML writer over any [`fmt::Write`] sink.
pub struct Emitter<'w, W> {
    out: &'w mut W,
    options: EmitOptions,
    line: u32,
    column: u32,
}

impl<'w, W: Write> Emitter<'w, W> {
    /// Emitter with default options.
    pub fn new(out: &'w mut W) -> Self {
        Emitter::with_options(out, EmitOptions::default())
    }

    /// Emitter with explicit options.
    pub fn with_options(out: &'w mut W, options: EmitOptions) -> Self {
        Emitter {
            out,
            options,
            line: 1,
            column: 1,
        }
    }

    /// Serialize one node tree.
    pub fn emit(&mut self, node: &Node) -> Result<(), Error> {
        self.write_node(node, 0)?;
        if self.column > 1 {
            self.write("\n")?;
        }
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), Error> {
        self.out.write_str(text).map_err(|_| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "formatter error",
            ))
        })?;
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        Ok(())
    }

    /// Pad with spaces up to the target indent column, if not already past
    /// it.
    fn fill_to(&mut self, indent: u32) -> Result<(), Error> {
        while self.column < indent + 1 {
            self.write(" ")?;
        }
        Ok(())
    }

    fn break_line(&mut self) -> Result<(), Error> {
        self.write("\n")
    }

    /// Whether a node renders on the current line (scalars, nulls, flow
    /// nodes, and empty collections, which print as `{}`/`[]`).
    fn fits_line(node: &Node) -> bool {
        !node.is_collection() || node.style() == NodeStyle::Flow || node.size() == 0
    }

    fn write_scalar(&mut self, node: &Node) -> Result<(), Error> {
        match node.scalar_value() {
            Some(value) => {
                // Keep strings that would reparse as null quoted.
                if value.is_empty() || value == "~" || value == "null" {
                    self.write("\"")?;
                    self.write(&value)?;
                    self.write("\"")
                } else {
                    self.write(&value)
                }
            }
            None => self.write("null"),
        }
    }

    fn write_node(&mut self, node: &Node, indent: u32) -> Result<(), Error> {
        if node.style() == NodeStyle::Flow {
            self.write_flow_node(node)
        } else {
            self.write_block_node(node, indent)
        }
    }

    fn write_block_node(&mut self, node: &Node, indent: u32) -> Result<(), Error> {
        if node.is_map() {
            self.write_block_map(node, indent)
        } else if node.is_seq() {
            self.write_block_seq(node, indent)
        } else {
            self.write_scalar(node)
        }
    }

    /// Flow context is contagious: children of a flow node render inline
    /// whatever their own style says.
    fn write_flow_node(&mut self, node: &Node) -> Result<(), Error> {
        if node.is_map() {
            self.write("{")?;
            let mut first = true;
            for (key, value) in node.pairs() {
                if !first {
                    self.write(", ")?;
                }
                first = false;
                self.write_flow_node(&key)?;
                self.write(": ")?;
                self.write_flow_node(&value)?;
            }
            self.write("}")
        } else if node.is_seq() {
            self.write("[")?;
            for i in 0..node.size() {
                if i > 0 {
                    self.write(", ")?;
                }
                let item = node.at(i)?;
                self.write_flow_node(&item)?;
            }
            self.write("]")
        } else {
            self.write_scalar(node)
        }
    }

    fn write_block_map(&mut self, node: &Node, indent: u32) -> Result<(), Error> {
        let pairs = node.pairs();
        if pairs.is_empty() {
            // An empty block mapping has no visible form; print flow.
            return self.write("{}");
        }
        for (key, value) in pairs {
            self.write_key(&key, indent)?;
            self.write_value(&value, indent)?;
        }
        Ok(())
    }

    fn write_block_seq(&mut self, node: &Node, indent: u32) -> Result<(), Error> {
        if node.size() == 0 {
            return self.write("[]");
        }
        for i in 0..node.size() {
            let item = node.at(i)?;
            self.fill_to(indent)?;
            self.write("- ")?;
            self.write_node(&item, indent + self.options.indent)?;
            if Self::fits_line(&item) {
                self.break_line()?;
            }
        }
        Ok(())
    }

    fn write_key(&mut self, key: &Node, indent: u32) -> Result<(), Error> {
        self.fill_to(indent)?;
        if key.is_collection() {
            // Collection keys take the explicit form so they reparse as
            // keys.
            self.write("? ")?;
            self.write_node(key, indent + self.options.indent)?;
            if self.column > 1 {
                self.break_line()?;
            }
        } else {
            self.write_scalar(key)?;
        }
        Ok(())
    }

    fn write_value(&mut self, value: &Node, indent: u32) -> Result<(), Error> {
        self.fill_to(indent)?;
        self.write(": ")?;
        // A block collection stays inline only when `: ` lands exactly at
        // its child column.
        if !Self::fits_line(value) && self.column != indent + self.options.indent + 1 {
            self.break_line()?;
        }
        self.write_node(value, indent + self.options.indent)?;
        if Self::fits_line(value) {
            self.break_line()?;
        }
        Ok(())
    }
}

/// Serialize with default options into a string.
pub fn emit_to_string(node: &Node) -> String {
    let mut out = String::new();
    let mut emitter = Emitter::new(&mut out);
    // Writing to a String cannot fail.
    let _ = emitter.emit(node);
    out
}

/// Renders exactly what [`crate::dump`] produces.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&emit_to_string(self))
    }
}
