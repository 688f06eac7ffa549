//! LL(1) recursive-descent parser.
//!
//! Consumes the scanner's token stream and emits balanced events to an
//! [`EventHandler`]. The grammar:
//!
//! ```text
//! document          := DocStart? (block_node | e) DocEnd*
//! block_node        := Alias | properties? block_content
//! block_node_or_iseq:= Alias | properties? (block_content | indentless_seq)
//! flow_node         := Alias | properties? flow_content
//! block_content     := block_map | block_seq | flow_collection | Scalar
//! flow_content      := flow_map | flow_seq | Scalar
//! properties        := Anchor
//! ```
//!
//! Missing keys and values emit Null events so handlers always see full
//! (key, value) pairs. A `[a: b]` entry is wrapped in an implicit flow
//! map.

use std::io::Read;

use crate::error::Error;
use crate::event::EventHandler;
use crate::mark::Mark;
use crate::node::NodeStyle;
use crate::scanner::Scanner;
use crate::token::{ScalarStyle, Token, TokenKind};

fn starts_block_content(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Scalar(..)
            | TokenKind::BlockMapStart
            | TokenKind::BlockSeqStart
            | TokenKind::FlowMapStart
            | TokenKind::FlowSeqStart
    )
}

fn starts_flow_content(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Scalar(..) | TokenKind::FlowMapStart | TokenKind::FlowSeqStart
    )
}

fn starts_block_node(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Alias(_) | TokenKind::Anchor(_)) || starts_block_content(kind)
}

fn starts_block_node_or_iseq(kind: &TokenKind) -> bool {
    starts_block_node(kind) || matches!(kind, TokenKind::BlockEntry)
}

fn starts_flow_node(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Alias(_) | TokenKind::Anchor(_)) || starts_flow_content(kind)
}

/// Recursive-descent parser feeding an event handler.
pub struct Parser<'h, R> {
    scanner: Scanner<R>,
    handler: &'h mut dyn EventHandler,
}

impl<'h, R: Read> Parser<'h, R> {
    /// Build a parser over a byte reader.
    pub fn new(input: R, handler: &'h mut dyn EventHandler) -> Result<Self, Error> {
        Ok(Parser {
            scanner: Scanner::new(input)?,
            handler,
        })
    }

    /// Parse one document, or return false at end of stream.
    pub fn parse_next_document(&mut self) -> Result<bool, Error> {
        if self.scanner.peek()?.is_none() {
            return Ok(false);
        }
        self.parse_document()?;
        Ok(true)
    }

    fn mark(&mut self) -> Result<Mark, Error> {
        Ok(match self.scanner.peek()? {
            Some(token) => token.mark,
            None => self.scanner.mark(),
        })
    }

    fn peek_is(&mut self, pred: impl Fn(&TokenKind) -> bool) -> Result<bool, Error> {
        Ok(self.scanner.peek()?.map_or(false, |t| pred(&t.kind)))
    }

    /// Consume the next token; end of input is a parse error here.
    fn bump(&mut self) -> Result<Token, Error> {
        match self.scanner.next_token()? {
            Some(token) => Ok(token),
            None => Err(Error::UnexpectedToken {
                mark: self.scanner.mark(),
                found: "end of input",
                expected: None,
            }),
        }
    }

    fn expect(
        &mut self,
        expected: &'static str,
        pred: impl Fn(&TokenKind) -> bool,
    ) -> Result<Token, Error> {
        match self.scanner.next_token()? {
            Some(token) if pred(&token.kind) => Ok(token),
            Some(token) => Err(Error::UnexpectedToken {
                mark: token.mark,
                found: token.kind.name(),
                expected: Some(expected),
            }),
            None => Err(Error::UnexpectedToken {
                mark: self.scanner.mark(),
                found: "end of input",
                expected: Some(expected),
            }),
        }
    }

    fn unexpected(&mut self) -> Error {
        match self.scanner.peek() {
            Ok(Some(token)) => Error::UnexpectedToken {
                mark: token.mark,
                found: token.kind.name(),
                expected: None,
            },
            Ok(None) => Error::UnexpectedToken {
                mark: self.scanner.mark(),
                found: "end of input",
                expected: None,
            },
            Err(err) => err,
        }
    }

    fn parse_document(&mut self) -> Result<(), Error> {
        // Reject tokens that cannot start a document; without this a stray
        // Value/Key would yield null documents forever.
        let can_start = self.peek_is(|k| {
            matches!(k, TokenKind::DocStart | TokenKind::DocEnd) || starts_block_node(k)
        })?;
        if !can_start {
            return Err(self.unexpected());
        }

        if self.peek_is(|k| matches!(k, TokenKind::DocStart))? {
            self.bump()?;
        }
        let mark = self.mark()?;
        self.handler.on_document_start(mark)?;

        if self.peek_is(starts_block_node)? {
            self.parse_block_node()?;
        } else {
            self.handler.on_null(mark, None)?;
        }

        while self.peek_is(|k| matches!(k, TokenKind::DocEnd))? {
            self.bump()?;
        }
        self.handler.on_document_end()
    }

    /// Scalar events, with plain `~`/`null` resolving to Null.
    fn emit_scalar(
        &mut self,
        mark: Mark,
        anchor: Option<String>,
        value: String,
        style: ScalarStyle,
    ) -> Result<(), Error> {
        if style == ScalarStyle::Plain && (value == "~" || value == "null") {
            self.handler.on_null(mark, anchor)
        } else {
            self.handler.on_scalar(mark, anchor, value)
        }
    }

    fn parse_properties(&mut self) -> Result<Option<String>, Error> {
        if self.peek_is(|k| matches!(k, TokenKind::Anchor(_)))? {
            let token = self.bump()?;
            match token.kind {
                TokenKind::Anchor(name) => return Ok(Some(name)),
                _ => unreachable!("peeked an anchor"),
            }
        }
        Ok(None)
    }

    fn parse_alias(&mut self) -> Result<(), Error> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::Alias(name) => self.handler.on_alias(token.mark, name),
            _ => unreachable!("peeked an alias"),
        }
    }

    fn parse_block_node(&mut self) -> Result<(), Error> {
        if self.peek_is(|k| matches!(k, TokenKind::Alias(_)))? {
            return self.parse_alias();
        }
        let anchor = self.parse_properties()?;
        if self.peek_is(starts_block_content)? {
            self.parse_block_content(anchor)
        } else {
            // An anchor with nothing attached names a null node.
            let mark = self.mark()?;
            self.handler.on_null(mark, anchor)
        }
    }

    fn parse_block_node_or_indentless_seq(&mut self) -> Result<(), Error> {
        if self.peek_is(|k| matches!(k, TokenKind::Alias(_)))? {
            return self.parse_alias();
        }
        let anchor = self.parse_properties()?;
        if self.peek_is(starts_block_content)? {
            self.parse_block_content(anchor)
        } else if self.peek_is(|k| matches!(k, TokenKind::BlockEntry))? {
            self.parse_indentless_seq(anchor)
        } else {
            let mark = self.mark()?;
            self.handler.on_null(mark, anchor)
        }
    }

    fn parse_flow_node(&mut self) -> Result<(), Error> {
        if self.peek_is(|k| matches!(k, TokenKind::Alias(_)))? {
            return self.parse_alias();
        }
        let anchor = self.parse_properties()?;
        if self.peek_is(starts_flow_content)? {
            self.parse_flow_content(anchor)
        } else {
            let mark = self.mark()?;
            self.handler.on_null(mark, anchor)
        }
    }

    /// Consume a scalar token and emit its event.
    fn parse_scalar(&mut self, anchor: Option<String>) -> Result<(), Error> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::Scalar(value, style) => self.emit_scalar(token.mark, anchor, value, style),
            _ => unreachable!("peeked a scalar"),
        }
    }

    fn parse_block_content(&mut self, anchor: Option<String>) -> Result<(), Error> {
        if self.peek_is(|k| matches!(k, TokenKind::BlockMapStart))? {
            self.parse_block_map(anchor)
        } else if self.peek_is(|k| matches!(k, TokenKind::BlockSeqStart))? {
            self.parse_block_seq(anchor)
        } else if self.peek_is(|k| matches!(k, TokenKind::FlowMapStart))? {
            self.parse_flow_map(anchor)
        } else if self.peek_is(|k| matches!(k, TokenKind::FlowSeqStart))? {
            self.parse_flow_seq(anchor)
        } else if self.peek_is(|k| matches!(k, TokenKind::Scalar(..)))? {
            self.parse_scalar(anchor)
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_flow_content(&mut self, anchor: Option<String>) -> Result<(), Error> {
        if self.peek_is(|k| matches!(k, TokenKind::FlowMapStart))? {
            self.parse_flow_map(anchor)
        } else if self.peek_is(|k| matches!(k, TokenKind::FlowSeqStart))? {
            self.parse_flow_seq(anchor)
        } else if self.peek_is(|k| matches!(k, TokenKind::Scalar(..)))? {
            self.parse_scalar(anchor)
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_block_map(&mut self, anchor: Option<String>) -> Result<(), Error> {
        let start = self.expect("BlockMapStart", |k| matches!(k, TokenKind::BlockMapStart))?;
        self.handler.on_map_start(start.mark, anchor, NodeStyle::Block)?;

        while !self.peek_is(|k| matches!(k, TokenKind::BlockMapEnd))? {
            // Key side; an absent key is null.
            let mut missing = true;
            if self.peek_is(|k| matches!(k, TokenKind::Key))? {
                self.bump()?;
                if self.peek_is(starts_block_node_or_iseq)? {
                    self.parse_block_node_or_indentless_seq()?;
                    missing = false;
                }
            }
            if missing {
                let mark = self.mark()?;
                self.handler.on_null(mark, None)?;
            }

            // Value side, also null by default.
            let mut missing = true;
            if self.peek_is(|k| matches!(k, TokenKind::Value))? {
                self.bump()?;
                if self.peek_is(starts_block_node_or_iseq)? {
                    self.parse_block_node_or_indentless_seq()?;
                    missing = false;
                }
            }
            if missing {
                let mark = self.mark()?;
                self.handler.on_null(mark, None)?;
            }

            // Neither side moved: the stream is stuck on a foreign token.
            if !self.peek_is(|k| {
                matches!(k, TokenKind::Key | TokenKind::Value | TokenKind::BlockMapEnd)
            })? {
                return Err(self.unexpected());
            }
        }

        self.expect("BlockMapEnd", |k| matches!(k, TokenKind::BlockMapEnd))?;
        self.handler.on_map_end()
    }

    fn parse_block_seq(&mut self, anchor: Option<String>) -> Result<(), Error> {
        let start = self.expect("BlockSeqStart", |k| matches!(k, TokenKind::BlockSeqStart))?;
        self.handler.on_seq_start(start.mark, anchor, NodeStyle::Block)?;

        while !self.peek_is(|k| matches!(k, TokenKind::BlockSeqEnd))? {
            self.expect("BlockEntry", |k| matches!(k, TokenKind::BlockEntry))?;
            if self.peek_is(starts_block_node)? {
                self.parse_block_node()?;
            } else {
                let mark = self.mark()?;
                self.handler.on_null(mark, None)?;
            }
        }

        self.expect("BlockSeqEnd", |k| matches!(k, TokenKind::BlockSeqEnd))?;
        self.handler.on_seq_end()
    }

    fn parse_indentless_seq(&mut self, anchor: Option<String>) -> Result<(), Error> {
        let mark = self.mark()?;
        self.handler.on_seq_start(mark, anchor, NodeStyle::Block)?;

        loop {
            self.expect("BlockEntry", |k| matches!(k, TokenKind::BlockEntry))?;
            if self.peek_is(starts_block_node)? {
                self.parse_block_node()?;
            } else {
                let mark = self.mark()?;
                self.handler.on_null(mark, None)?;
            }
            if !self.peek_is(|k| matches!(k, TokenKind::BlockEntry))? {
                break;
            }
        }

        self.handler.on_seq_end()
    }

    fn parse_flow_map(&mut self, anchor: Option<String>) -> Result<(), Error> {
        let start = self.expect("FlowMapStart", |k| matches!(k, TokenKind::FlowMapStart))?;
        self.handler.on_map_start(start.mark, anchor, NodeStyle::Flow)?;

        while !self.peek_is(|k| matches!(k, TokenKind::FlowMapEnd))? {
            if self.peek_is(|k| starts_flow_node(k) || matches!(k, TokenKind::Key))? {
                self.parse_flow_map_entry()?;
            } else {
                let mark = self.mark()?;
                self.handler.on_null(mark, None)?;
                self.handler.on_null(mark, None)?;
            }

            if !self.peek_is(|k| matches!(k, TokenKind::FlowMapEnd))? {
                self.expect("FlowEntry", |k| matches!(k, TokenKind::FlowEntry))?;
            }
        }

        self.expect("FlowMapEnd", |k| matches!(k, TokenKind::FlowMapEnd))?;
        self.handler.on_map_end()
    }

    fn parse_flow_seq(&mut self, anchor: Option<String>) -> Result<(), Error> {
        let start = self.expect("FlowSeqStart", |k| matches!(k, TokenKind::FlowSeqStart))?;
        self.handler.on_seq_start(start.mark, anchor, NodeStyle::Flow)?;

        while !self.peek_is(|k| matches!(k, TokenKind::FlowSeqEnd))? {
            if self.peek_is(|k| starts_flow_node(k) || matches!(k, TokenKind::Key))? {
                self.parse_flow_seq_entry()?;
            } else {
                let mark = self.mark()?;
                self.handler.on_null(mark, None)?;
            }

            if !self.peek_is(|k| matches!(k, TokenKind::FlowSeqEnd))? {
                self.expect("FlowEntry", |k| matches!(k, TokenKind::FlowEntry))?;
            }
        }

        self.expect("FlowSeqEnd", |k| matches!(k, TokenKind::FlowSeqEnd))?;
        self.handler.on_seq_end()
    }

    fn parse_flow_map_entry(&mut self) -> Result<(), Error> {
        if self.peek_is(starts_flow_node)? {
            self.parse_flow_node()?;
            let mark = self.mark()?;
            return self.handler.on_null(mark, None);
        }

        self.expect("Key", |k| matches!(k, TokenKind::Key))?;
        if self.peek_is(starts_flow_node)? {
            self.parse_flow_node()?;
        } else {
            let mark = self.mark()?;
            self.handler.on_null(mark, None)?;
        }

        let mut missing = true;
        if self.peek_is(|k| matches!(k, TokenKind::Value))? {
            self.bump()?;
            if self.peek_is(starts_flow_node)? {
                self.parse_flow_node()?;
                missing = false;
            }
        }
        if missing {
            let mark = self.mark()?;
            self.handler.on_null(mark, None)?;
        }
        Ok(())
    }

    fn parse_flow_seq_entry(&mut self) -> Result<(), Error> {
        if self.peek_is(starts_flow_node)? {
            return self.parse_flow_node();
        }

        // `[a: b]` carries an implicit single-pair mapping.
        let key = self.expect("Key", |k| matches!(k, TokenKind::Key))?;
        self.handler.on_map_start(key.mark, None, NodeStyle::Flow)?;

        if self.peek_is(starts_flow_node)? {
            self.parse_flow_node()?;
        } else {
            let mark = self.mark()?;
            self.handler.on_null(mark, None)?;
        }

        let mut missing = true;
        if self.peek_is(|k| matches!(k, TokenKind::Value))? {
            self.bump()?;
            if self.peek_is(starts_flow_node)? {
                self.parse_flow_node()?;
                missing = false;
            }
        }
        if missing {
            let mark = self.mark()?;
            self.handler.on_null(mark, None)?;
        }

        self.handler.on_map_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every event as one line, in the style of the emitter's
    /// golden tests.
    #[derive(Default)]
    struct Recorder {
        output: Vec<String>,
    }

    impl EventHandler for Recorder {
        fn on_document_start(&mut self, _: Mark) -> Result<(), Error> {
            self.output.push("doc-start".into());
            Ok(())
        }

        fn on_document_end(&mut self) -> Result<(), Error> {
            self.output.push("doc-end".into());
            Ok(())
        }

        fn on_map_start(
            &mut self,
            _: Mark,
            anchor: Option<String>,
            style: NodeStyle,
        ) -> Result<(), Error> {
            self.output.push(match (anchor, style) {
                (Some(a), _) => format!("map-start &{}", a),
                (None, NodeStyle::Flow) => "map-start flow".into(),
                (None, NodeStyle::Block) => "map-start".into(),
            });
            Ok(())
        }

        fn on_map_end(&mut self) -> Result<(), Error> {
            self.output.push("map-end".into());
            Ok(())
        }

        fn on_seq_start(
            &mut self,
            _: Mark,
            anchor: Option<String>,
            style: NodeStyle,
        ) -> Result<(), Error> {
            self.output.push(match (anchor, style) {
                (Some(a), _) => format!("seq-start &{}", a),
                (None, NodeStyle::Flow) => "seq-start flow".into(),
                (None, NodeStyle::Block) => "seq-start".into(),
            });
            Ok(())
        }

        fn on_seq_end(&mut self) -> Result<(), Error> {
            self.output.push("seq-end".into());
            Ok(())
        }

        fn on_scalar(
            &mut self,
            _: Mark,
            anchor: Option<String>,
            value: String,
        ) -> Result<(), Error> {
            self.output.push(match anchor {
                Some(a) => format!("scalar &{} {}", a, value),
                None => format!("scalar {}", value),
            });
            Ok(())
        }

        fn on_null(&mut self, _: Mark, anchor: Option<String>) -> Result<(), Error> {
            self.output.push(match anchor {
                Some(a) => format!("null &{}", a),
                None => "null".into(),
            });
            Ok(())
        }

        fn on_alias(&mut self, _: Mark, name: String) -> Result<(), Error> {
            self.output.push(format!("alias {}", name));
            Ok(())
        }
    }

    fn events(text: &str) -> Vec<String> {
        let mut recorder = Recorder::default();
        let mut parser = Parser::new(text.as_bytes(), &mut recorder).unwrap();
        while parser.parse_next_document().unwrap() {}
        recorder.output
    }

    fn parse_err(text: &str) -> Error {
        let mut recorder = Recorder::default();
        let mut parser = Parser::new(text.as_bytes(), &mut recorder).unwrap();
        loop {
            match parser.parse_next_document() {
                Ok(true) => {}
                Ok(false) => panic!("expected a parse error for {:?}", text),
                Err(err) => return err,
            }
        }
    }

    #[test]
    fn test_map_events() {
        assert_eq!(
            events("a: 1\nb: 2\n"),
            [
                "doc-start",
                "map-start",
                "scalar a",
                "scalar 1",
                "scalar b",
                "scalar 2",
                "map-end",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_missing_value_is_null() {
        assert_eq!(
            events("a:\nb: 2\n"),
            [
                "doc-start",
                "map-start",
                "scalar a",
                "null",
                "scalar b",
                "scalar 2",
                "map-end",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_plain_null_scalars() {
        assert_eq!(
            events("a: ~\nb: null\nc: \"~\"\n"),
            [
                "doc-start",
                "map-start",
                "scalar a",
                "null",
                "scalar b",
                "null",
                "scalar c",
                "scalar ~",
                "map-end",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(events("---\n...\n"), ["doc-start", "null", "doc-end"]);
    }

    #[test]
    fn test_multi_document() {
        assert_eq!(
            events("---\na\n---\nb\n"),
            [
                "doc-start",
                "scalar a",
                "doc-end",
                "doc-start",
                "scalar b",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_anchored_scalar_and_alias() {
        assert_eq!(
            events("a: &x 1\nb: *x\n"),
            [
                "doc-start",
                "map-start",
                "scalar a",
                "scalar &x 1",
                "scalar b",
                "alias x",
                "map-end",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_anchor_without_content_is_null() {
        assert_eq!(
            events("a: &x\nb: 2\n"),
            [
                "doc-start",
                "map-start",
                "scalar a",
                "null &x",
                "scalar b",
                "scalar 2",
                "map-end",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_flow_seq_implicit_pair() {
        assert_eq!(
            events("[a: b]"),
            [
                "doc-start",
                "seq-start flow",
                "map-start flow",
                "scalar a",
                "scalar b",
                "map-end",
                "seq-end",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_flow_seq_omitted_entry() {
        assert_eq!(
            events("[1, , 3]"),
            [
                "doc-start",
                "seq-start flow",
                "scalar 1",
                "null",
                "scalar 3",
                "seq-end",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_indentless_seq_events() {
        assert_eq!(
            events("a:\n- 1\n- 2\n"),
            [
                "doc-start",
                "map-start",
                "scalar a",
                "seq-start",
                "scalar 1",
                "scalar 2",
                "seq-end",
                "map-end",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_complex_key_events() {
        assert_eq!(
            events("? [4, 5]\n: {c: 6, d: 7}\n"),
            [
                "doc-start",
                "map-start",
                "seq-start flow",
                "scalar 4",
                "scalar 5",
                "seq-end",
                "map-start flow",
                "scalar c",
                "scalar 6",
                "scalar d",
                "scalar 7",
                "map-end",
                "map-end",
                "doc-end",
            ]
        );
    }

    #[test]
    fn test_unexpected_token_error() {
        let err = parse_err("key: [1, 2]]\n");
        assert!(matches!(err, Error::InvalidFlowEnd { .. }));
    }

    #[test]
    fn test_nested_map_after_value_errors() {
        // `b: 2` is indented under an already-complete value.
        assert!(matches!(
            parse_err("a: 1\n  b: 2\n"),
            Error::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_value_cannot_start_document() {
        assert!(matches!(parse_err(": 1\n"), Error::UnexpectedToken { .. }));
    }

    #[test]
    fn test_doc_end_only_is_empty_document() {
        assert_eq!(events("...\n"), ["doc-start", "null", "doc-end"]);
    }
}
