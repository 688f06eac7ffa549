//! SAX-style event surface.
//!
//! The parser never allocates a node; it reports document structure to an
//! [`EventHandler`]. [`NodeBuilder`](crate::builder::NodeBuilder) is the
//! built-in handler that materializes the node tree, but any handler can
//! be driven directly for streaming work.

use crate::error::Error;
use crate::mark::Mark;
use crate::node::NodeStyle;

/// Receiver for parse events.
///
/// Events arrive well-balanced: every `map_start` gets exactly one
/// `map_end`, sequences likewise, and document boundaries enclose
/// everything. Missing keys and values surface as `null` events, so a
/// handler may always assume alternating key/value children inside a
/// mapping.
///
/// A handler may abort the document by returning an error; the parser
/// propagates it unchanged.
pub trait EventHandler {
    /// A document begins.
    fn on_document_start(&mut self, mark: Mark) -> Result<(), Error>;

    /// The current document is complete.
    fn on_document_end(&mut self) -> Result<(), Error>;

    /// A mapping begins.
    fn on_map_start(
        &mut self,
        mark: Mark,
        anchor: Option<String>,
        style: NodeStyle,
    ) -> Result<(), Error>;

    /// The innermost open mapping is complete.
    fn on_map_end(&mut self) -> Result<(), Error>;

    /// A sequence begins.
    fn on_seq_start(
        &mut self,
        mark: Mark,
        anchor: Option<String>,
        style: NodeStyle,
    ) -> Result<(), Error>;

    /// The innermost open sequence is complete.
    fn on_seq_end(&mut self) -> Result<(), Error>;

    /// A scalar value.
    fn on_scalar(&mut self, mark: Mark, anchor: Option<String>, value: String)
        -> Result<(), Error>;

    /// An explicit or implied null.
    fn on_null(&mut self, mark: Mark, anchor: Option<String>) -> Result<(), Error>;

    /// A reference to a previously anchored node.
    fn on_alias(&mut self, mark: Mark, name: String) -> Result<(), Error>;
}
