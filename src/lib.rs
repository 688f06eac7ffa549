//! # yamlet
//!
//! A streaming YAML 1.2 codec: a char-level scanner with full
//! indentation/flow context, an LL(1) recursive-descent parser emitting
//! SAX-style events, a node-tree builder with anchor/alias sharing and
//! arbitrary key types, and an emitter that round-trips documents in
//! block or flow presentation.
//!
//! ## Quick start
//!
//! ```
//! use yamlet::{load_str, dump};
//!
//! let doc = load_str("a: 1\nb: [x, y]\n").unwrap();
//! assert_eq!(doc.get("a").unwrap().to::<i64>().unwrap(), 1);
//! assert_eq!(doc.get("b").unwrap().at(1).unwrap().scalar_value().unwrap(), "y");
//!
//! // Structure survives a round trip.
//! let again = load_str(&dump(&doc)).unwrap();
//! assert_eq!(doc, again);
//! ```
//!
//! Anchors and aliases share data, and mutation through one handle is
//! visible through every other:
//!
//! ```
//! use yamlet::load_str;
//!
//! let doc = load_str("a: &x 1\nb: *x\n").unwrap();
//! doc.get("a").unwrap().set(2i64);
//! assert_eq!(doc.get("b").unwrap().to::<i64>().unwrap(), 2);
//! ```
//!
//! ## Pipeline
//!
//! Input bytes pass through encoding detection ([`encoding`]) into a
//! char stream ([`stream`]), are tokenized ([`scanner`]), parsed
//! ([`parser`]) into events ([`event`]), and assembled into [`Node`]s by
//! the [`builder`]. The [`emitter`] walks a node tree back out to text.
//! Each stage is public, so the SAX layer can be driven without building
//! trees at all.
//!
//! Out of scope: tags (`!`), directives, merge keys and schema
//! validation.

pub mod api;
pub mod builder;
pub mod convert;
pub mod emitter;
pub mod encoding;
pub mod error;
pub mod event;
pub mod mark;
pub mod node;
pub mod parser;
pub mod scanner;
pub mod stream;
pub mod token;

pub use api::{
    dump, dump_file, dump_to, dump_to_with, load, load_all, load_file, load_file_all, load_str,
    load_str_all,
};
pub use builder::NodeBuilder;
pub use convert::Convert;
pub use emitter::{EmitOptions, Emitter};
pub use error::Error;
pub use event::EventHandler;
pub use mark::Mark;
pub use node::{Node, NodeStyle, NodeType};
pub use parser::Parser;
pub use scanner::Scanner;
pub use token::{ScalarStyle, Token, TokenKind};
