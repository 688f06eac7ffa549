//! Tokenizer.
//!
//! The scanner is a hand-written dispatch on the next char, with the
//! context YAML needs: an indentation frame stack for block collections, a
//! flow stack for `{}`/`[]`, a minimum-indent bound for the scalar under
//! construction, and a one-token rewrite for retroactive key promotion
//! (`foo` only becomes a key once `: ` shows up after it).
//!
//! Tokens come out of a queue because a single step can emit several:
//! closing an indentation frame produces its end token before the token
//! that triggered the close, and a promoted key produces `Key` followed by
//! the scalar.

use std::collections::VecDeque;
use std::io::Read;

use crate::error::Error;
use crate::mark::Mark;
use crate::stream::CharStream;
use crate::token::{ScalarStyle, Token, TokenKind};

/// Collection kind of an indentation or flow frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Map,
    Seq,
}

/// One open block collection: its kind and the column it opened at.
#[derive(Debug, Clone, Copy)]
struct IndentFrame {
    kind: FrameKind,
    column: u32,
}

fn is_delimiter(ch: Option<char>) -> bool {
    matches!(ch, None | Some(' ') | Some('\t') | Some('\n'))
}

fn is_anchor_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

/// Streaming tokenizer over a char source.
pub struct Scanner<R> {
    input: CharStream<R>,
    queue: VecDeque<Token>,
    indents: Vec<IndentFrame>,
    flows: Vec<FrameKind>,

    /// Where the token currently being scanned started.
    token_mark: Mark,
    /// Column of the current token minus leading tabs, 0-based.
    cur_indent: u32,
    /// Tabs in the leading whitespace of the current line.
    tab_count: u32,
    /// True until the first token of the line is reached.
    leading: bool,

    /// Lower bound for continuation lines of the scalar being scanned.
    min_indent: u32,
    /// Newline replacement for the pending block scalar.
    replace: char,
    /// Chomp flag: append one trailing newline on close.
    append: bool,

    /// Column recorded at the most recent `&`. A frame opened later on the
    /// same line belongs to the anchored node, so it opens at the anchor's
    /// column rather than the inflated mid-line one.
    anchor_indent: u32,
    anchor_line: u32,
    after_anchor: bool,

    /// Set after a quoted scalar; relaxes the value-indicator rule inside
    /// flow collections.
    can_be_json: bool,

    done: bool,
}

impl<R: Read> Scanner<R> {
    /// Create a scanner over a byte reader (encoding is auto-detected).
    pub fn new(input: R) -> Result<Self, Error> {
        Ok(Scanner {
            input: CharStream::new(input)?,
            queue: VecDeque::new(),
            indents: Vec::new(),
            flows: Vec::new(),
            token_mark: Mark::start(),
            cur_indent: 0,
            tab_count: 0,
            leading: true,
            min_indent: 0,
            replace: ' ',
            append: false,
            anchor_indent: 0,
            anchor_line: 0,
            after_anchor: false,
            can_be_json: false,
            done: false,
        })
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Result<Option<&Token>, Error> {
        self.fetch()?;
        Ok(self.queue.front())
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Result<Option<Token>, Error> {
        self.fetch()?;
        Ok(self.queue.pop_front())
    }

    /// Whether the token stream is exhausted.
    pub fn is_done(&mut self) -> Result<bool, Error> {
        Ok(self.peek()?.is_none())
    }

    /// Position of the token currently being produced.
    pub fn mark(&self) -> Mark {
        self.token_mark
    }

    fn fetch(&mut self) -> Result<(), Error> {
        while self.queue.is_empty() && !self.done {
            self.scan()?;
        }
        Ok(())
    }

    fn in_block(&self) -> bool {
        self.flows.is_empty()
    }

    fn emit(&mut self, kind: TokenKind) {
        self.queue.push_back(Token::new(kind, self.token_mark));
    }

    fn emit_at(&mut self, kind: TokenKind, mark: Mark) {
        self.queue.push_back(Token::new(kind, mark));
    }

    /// One dispatch step; pushes at least one token unless the stream
    /// ended.
    fn scan(&mut self) -> Result<(), Error> {
        self.skip_to_token();
        self.update_indent();

        let Some(ch) = self.input.peek() else {
            if let Some(err) = self.input.take_io_error() {
                return Err(err.into());
            }
            if let Some(kind) = self.flows.last() {
                return Err(match kind {
                    FrameKind::Map => Error::MissingMapEnd {
                        mark: self.token_mark,
                    },
                    FrameKind::Seq => Error::MissingSeqEnd {
                        mark: self.token_mark,
                    },
                });
            }
            self.pop_all_indents();
            self.done = true;
            return Ok(());
        };

        if self.in_block() && self.token_mark.column == 1 {
            if self.at_marker('-') {
                return self.scan_doc_marker(TokenKind::DocStart);
            }
            if self.at_marker('.') {
                return self.scan_doc_marker(TokenKind::DocEnd);
            }
        }

        if self.in_block() {
            self.pop_frames_to(self.cur_indent)?;
        }

        match ch {
            '&' => self.scan_anchor(),
            '*' => self.scan_alias(),
            '-' if self.in_block() && self.delimiter_after(1) => self.scan_block_entry(),
            '{' | '[' => self.scan_flow_start(ch),
            '}' | ']' => self.scan_flow_end(ch),
            ',' if !self.in_block() => self.scan_flow_entry(),
            '?' if self.in_block() && self.delimiter_after(1) => self.scan_explicit_key(),
            ':' if self.match_value() => self.scan_value_token(),
            '|' | '>' if self.in_block() => self.scan_block_scalar(ch),
            '\'' | '"' => self.scan_quoted_scalar(ch),
            '%' | '@' | '`' => Err(Error::UnknownToken {
                mark: self.token_mark,
            }),
            _ => self.scan_plain_scalar(),
        }
    }

    /// Skip blanks, newlines and comments up to the next token.
    fn skip_to_token(&mut self) {
        while let Some(ch) = self.input.peek() {
            match ch {
                ' ' => {
                    self.input.get();
                }
                '\t' => {
                    if self.leading {
                        self.tab_count += 1;
                    }
                    self.input.get();
                }
                '\n' => {
                    self.input.get();
                    self.tab_count = 0;
                    self.leading = true;
                }
                '#' => {
                    while matches!(self.input.peek(), Some(c) if c != '\n') {
                        self.input.get();
                    }
                }
                _ => break,
            }
        }
    }

    fn update_indent(&mut self) {
        self.token_mark = self.input.mark();
        self.cur_indent = (self.token_mark.column - 1).saturating_sub(self.tab_count);
        self.leading = false;
    }

    fn delimiter_after(&mut self, i: usize) -> bool {
        self.input.read_to(i + 1);
        is_delimiter(self.input.at(i))
    }

    /// Whether the next token introduces a mapping value at this point.
    fn match_value(&mut self) -> bool {
        if self.input.peek() != Some(':') {
            return false;
        }
        if self.delimiter_after(1) {
            return true;
        }
        if self.in_block() {
            return false;
        }
        if self.can_be_json {
            return true;
        }
        self.input.read_to(2);
        matches!(self.input.at(1), Some(',') | Some(']') | Some('}'))
    }

    /// `---`/`...` at column 1, followed by a delimiter.
    fn at_marker(&mut self, ch: char) -> bool {
        self.input.read_to(4);
        self.input.at(0) == Some(ch)
            && self.input.at(1) == Some(ch)
            && self.input.at(2) == Some(ch)
            && is_delimiter(self.input.at(3))
    }

    fn scan_doc_marker(&mut self, kind: TokenKind) -> Result<(), Error> {
        self.pop_all_indents();
        for _ in 0..3 {
            self.input.get();
        }
        self.min_indent = 0;
        self.can_be_json = false;
        self.emit(kind);
        Ok(())
    }

    /// Open a block frame at the current column unless one is already
    /// there, and bound the scalar that follows.
    fn push_indent(&mut self, kind: FrameKind) {
        let column = if self.after_anchor && self.token_mark.line == self.anchor_line {
            self.anchor_indent
        } else {
            self.cur_indent
        };
        self.after_anchor = false;
        self.min_indent = column + 1;

        let new = self
            .indents
            .last()
            .map_or(true, |top| column > top.column);
        if new {
            self.emit(match kind {
                FrameKind::Map => TokenKind::BlockMapStart,
                FrameKind::Seq => TokenKind::BlockSeqStart,
            });
            self.indents.push(IndentFrame { kind, column });
        }
    }

    /// Close frames opened right of `column`; landing between two frames is
    /// an indentation error.
    fn pop_frames_to(&mut self, column: u32) -> Result<(), Error> {
        let mut popped = false;
        while let Some(top) = self.indents.last() {
            if top.column <= column {
                break;
            }
            let kind = top.kind;
            self.indents.pop();
            popped = true;
            self.emit(match kind {
                FrameKind::Map => TokenKind::BlockMapEnd,
                FrameKind::Seq => TokenKind::BlockSeqEnd,
            });
        }

        if popped {
            let aligned = match self.indents.last() {
                Some(top) => top.column == column,
                None => column == 0,
            };
            if !aligned {
                return Err(Error::InvalidIndent {
                    mark: self.token_mark,
                });
            }
        }
        Ok(())
    }

    fn pop_all_indents(&mut self) {
        while let Some(frame) = self.indents.pop() {
            self.emit(match frame.kind {
                FrameKind::Map => TokenKind::BlockMapEnd,
                FrameKind::Seq => TokenKind::BlockSeqEnd,
            });
        }
    }

    fn scan_block_entry(&mut self) -> Result<(), Error> {
        self.input.get();
        self.push_indent(FrameKind::Seq);
        self.emit(TokenKind::BlockEntry);
        self.can_be_json = false;
        Ok(())
    }

    fn scan_explicit_key(&mut self) -> Result<(), Error> {
        self.input.get();
        self.push_indent(FrameKind::Map);
        self.emit(TokenKind::Key);
        self.can_be_json = false;
        Ok(())
    }

    fn scan_value_token(&mut self) -> Result<(), Error> {
        self.input.get();
        self.min_indent = self.indents.last().map_or(0, |top| top.column + 1);
        self.emit(TokenKind::Value);
        self.can_be_json = false;
        Ok(())
    }

    fn scan_flow_start(&mut self, ch: char) -> Result<(), Error> {
        self.input.get();
        let kind = if ch == '{' {
            self.flows.push(FrameKind::Map);
            TokenKind::FlowMapStart
        } else {
            self.flows.push(FrameKind::Seq);
            TokenKind::FlowSeqStart
        };
        self.after_anchor = false;
        self.can_be_json = false;
        self.emit(kind);
        Ok(())
    }

    fn scan_flow_end(&mut self, ch: char) -> Result<(), Error> {
        let expected = if ch == '}' {
            FrameKind::Map
        } else {
            FrameKind::Seq
        };
        match self.flows.last() {
            Some(&top) if top == expected => {
                self.flows.pop();
            }
            _ => {
                return Err(Error::InvalidFlowEnd {
                    mark: self.token_mark,
                })
            }
        }
        self.input.get();
        self.emit(if ch == '}' {
            TokenKind::FlowMapEnd
        } else {
            TokenKind::FlowSeqEnd
        });
        Ok(())
    }

    fn scan_flow_entry(&mut self) -> Result<(), Error> {
        self.input.get();
        self.can_be_json = false;
        self.emit(TokenKind::FlowEntry);
        Ok(())
    }

    /// Scan the name after `&`/`*`; returns it and enforces the name
    /// charset.
    fn scan_anchor_name(&mut self) -> Result<String, Error> {
        let mut name = String::new();
        while let Some(ch) = self.input.peek() {
            if is_anchor_char(ch) {
                name.push(ch);
                self.input.get();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(Error::EmptyAnchorName {
                mark: self.token_mark,
            });
        }
        match self.input.peek() {
            Some(ch) if !is_delimiter(Some(ch)) && !matches!(ch, ',' | '[' | ']' | '{' | '}' | ':') => {
                Err(Error::BadAnchorChar {
                    mark: self.input.mark(),
                    ch,
                })
            }
            _ => Ok(name),
        }
    }

    fn scan_anchor(&mut self) -> Result<(), Error> {
        self.input.get();
        let name = self.scan_anchor_name()?;
        self.anchor_indent = self.cur_indent;
        self.anchor_line = self.token_mark.line;
        self.after_anchor = true;
        self.can_be_json = false;
        self.emit(TokenKind::Anchor(name));
        Ok(())
    }

    fn scan_alias(&mut self) -> Result<(), Error> {
        self.input.get();
        let name = self.scan_anchor_name()?;
        self.after_anchor = false;
        self.can_be_json = false;

        // An alias can serve as a mapping key: `*x : value`.
        while self.input.peek() == Some(' ') {
            self.input.get();
        }
        if self.match_value() {
            if self.in_block() {
                self.push_indent(FrameKind::Map);
            }
            self.emit(TokenKind::Key);
        }
        self.emit(TokenKind::Alias(name));
        Ok(())
    }

    /// Consume a line break inside a scalar, keeping the per-line state in
    /// step with the skipper.
    fn consume_line_break(&mut self) {
        self.input.get();
        self.tab_count = 0;
        self.leading = true;
    }

    /// Double-quoted escape: `\x` for x in the fixed table.
    fn scan_escape(&mut self) -> Result<char, Error> {
        let mark = self.input.mark();
        self.input.get(); // backslash
        let Some(ch) = self.input.get() else {
            return Err(Error::EofInScalar { mark });
        };
        let escaped = match ch {
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0C',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0B',
            'e' => '\x1B',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            '0' => '\0',
            other => return Err(Error::UnknownEscape { mark, escape: other }),
        };
        Ok(escaped)
    }

    fn scan_quoted_scalar(&mut self, quote: char) -> Result<(), Error> {
        let start_mark = self.token_mark;
        let style = if quote == '\'' {
            ScalarStyle::SingleQuoted
        } else {
            ScalarStyle::DoubleQuoted
        };
        self.input.get();

        let mut value = String::new();
        loop {
            match self.input.peek() {
                None => {
                    return Err(Error::EofInScalar { mark: start_mark });
                }
                Some(ch) if ch == quote => {
                    if quote == '\'' {
                        self.input.read_to(2);
                        if self.input.at(1) == Some('\'') {
                            self.input.get();
                            self.input.get();
                            value.push('\'');
                            continue;
                        }
                    }
                    self.input.get();
                    break;
                }
                Some('\\') if quote == '"' => {
                    let ch = self.scan_escape()?;
                    value.push(ch);
                }
                Some('\n') => {
                    // Fold the break; extra blank lines stay literal.
                    value.push(' ');
                    self.consume_line_break();
                    while self.input.peek() == Some('\n') {
                        value.push('\n');
                        self.consume_line_break();
                    }
                    while self.input.peek() == Some(' ') {
                        self.input.get();
                    }
                }
                Some(ch) => {
                    value.push(ch);
                    self.input.get();
                }
            }
        }

        self.can_be_json = true;

        while self.input.peek() == Some(' ') {
            self.input.get();
        }
        if self.match_value() {
            if self.in_block() {
                self.push_indent(FrameKind::Map);
            }
            self.emit_at(TokenKind::Key, start_mark);
            self.emit_at(TokenKind::Scalar(value, style), start_mark);
        } else {
            self.after_anchor = false;
            self.min_indent = 0;
            self.emit_at(TokenKind::Scalar(value, style), start_mark);
        }
        Ok(())
    }

    /// Literal (`|`) and folded (`>`) scalars.
    fn scan_block_scalar(&mut self, indicator: char) -> Result<(), Error> {
        let start_mark = self.token_mark;
        let style = if indicator == '|' {
            ScalarStyle::Literal
        } else {
            ScalarStyle::Folded
        };
        self.replace = if indicator == '|' { '\n' } else { ' ' };
        self.input.get();

        if self.input.peek() == Some('-') {
            self.append = false;
            self.input.get();
        } else {
            self.append = true;
        }

        // Only blanks and a comment may follow the header.
        while matches!(self.input.peek(), Some(' ') | Some('\t')) {
            self.input.get();
        }
        if self.input.peek() == Some('#') {
            while matches!(self.input.peek(), Some(c) if c != '\n') {
                self.input.get();
            }
        }
        match self.input.peek() {
            Some('\n') => self.consume_line_break(),
            None => {}
            Some(_) => {
                return Err(Error::MissingNewline {
                    mark: self.input.mark(),
                });
            }
        }

        let mut value = String::new();
        let mut block_indent: Option<u32> = None;
        let mut pending_breaks = 0usize;
        let mut has_content = false;

        loop {
            // Line start: measure indentation.
            while self.input.peek() == Some(' ') {
                self.input.get();
            }
            match self.input.peek() {
                None => break,
                Some('\n') => {
                    pending_breaks += 1;
                    self.consume_line_break();
                    continue;
                }
                Some(_) => {}
            }

            let line_indent = self.input.mark().column - 1;
            match block_indent {
                None => {
                    if line_indent < self.min_indent {
                        break;
                    }
                    block_indent = Some(line_indent);
                }
                Some(indent) => {
                    if line_indent < indent {
                        break;
                    }
                }
            }
            if line_indent == 0 && (self.at_marker('-') || self.at_marker('.')) {
                break;
            }

            if has_content {
                value.push(self.replace);
                for _ in 1..pending_breaks {
                    value.push('\n');
                }
            }
            pending_breaks = 0;
            has_content = true;

            while let Some(ch) = self.input.peek() {
                if ch == '\n' {
                    break;
                }
                value.push(ch);
                self.input.get();
            }
            if self.input.peek() == Some('\n') {
                pending_breaks = 1;
                self.consume_line_break();
            }
        }

        let end = value.trim_end_matches([' ', '\t', '\n']).len();
        value.truncate(end);
        if self.append && !value.is_empty() {
            value.push('\n');
        }

        self.replace = ' ';
        self.append = false;
        self.min_indent = 0;
        self.after_anchor = false;
        self.can_be_json = false;
        self.emit_at(TokenKind::Scalar(value, style), start_mark);
        Ok(())
    }

    /// Plain (unquoted) scalars, including retroactive key promotion.
    fn scan_plain_scalar(&mut self) -> Result<(), Error> {
        let start_mark = self.token_mark;
        let in_flow = !self.in_block();
        let mut value = String::new();
        let mut pending_breaks = 0usize;
        let mut first_line = true;
        let mut line_mark = self.token_mark;
        let mut line_indent = self.cur_indent;

        loop {
            // One line of content.
            let mut line = String::new();
            let mut promoted = false;
            let mut ended = false;
            let mut prev_blank = false;
            while let Some(ch) = self.input.peek() {
                match ch {
                    '\n' => break,
                    ':' => {
                        if self.match_value() {
                            promoted = true;
                            break;
                        }
                        line.push(ch);
                        self.input.get();
                        prev_blank = false;
                    }
                    '#' if prev_blank => {
                        ended = true;
                        break;
                    }
                    ',' | ']' | '}' if in_flow => {
                        ended = true;
                        break;
                    }
                    _ => {
                        prev_blank = ch == ' ' || ch == '\t';
                        line.push(ch);
                        self.input.get();
                    }
                }
            }

            if promoted {
                let key = line.trim_end_matches([' ', '\t']).to_string();
                if first_line {
                    if !in_flow {
                        self.push_indent(FrameKind::Map);
                    }
                    self.emit_at(TokenKind::Key, line_mark);
                    self.emit_at(TokenKind::Scalar(key, ScalarStyle::Plain), line_mark);
                } else {
                    // A `: ` on a continuation line: the folded prefix is a
                    // finished scalar and this line starts a key of its own.
                    self.finish_plain(value, start_mark);
                    self.token_mark = line_mark;
                    self.cur_indent = line_indent;
                    if !in_flow {
                        self.push_indent(FrameKind::Map);
                    }
                    self.emit_at(TokenKind::Key, line_mark);
                    self.emit_at(TokenKind::Scalar(key, ScalarStyle::Plain), line_mark);
                }
                self.can_be_json = false;
                return Ok(());
            }

            // Fold this line into the value.
            if !first_line {
                value.push(' ');
                for _ in 1..pending_breaks {
                    value.push('\n');
                }
            }
            value.push_str(&line);
            first_line = false;

            if ended || self.input.peek().is_none() {
                break;
            }

            // At a newline: decide whether the scalar continues.
            pending_breaks = 0;
            loop {
                match self.input.peek() {
                    Some('\n') => {
                        pending_breaks += 1;
                        self.consume_line_break();
                        while self.input.peek() == Some(' ') {
                            self.input.get();
                        }
                    }
                    _ => break,
                }
            }
            match self.input.peek() {
                None => break,
                Some(_) => {
                    line_mark = self.input.mark();
                    line_indent = line_mark.column - 1;
                    if !in_flow {
                        if line_indent < self.min_indent {
                            break;
                        }
                        if line_indent == 0 && (self.at_marker('-') || self.at_marker('.')) {
                            break;
                        }
                    }
                    if self.input.peek() == Some('#') {
                        break;
                    }
                }
            }
        }

        self.finish_plain(value, start_mark);
        Ok(())
    }

    fn finish_plain(&mut self, mut value: String, mark: Mark) {
        let end = value.trim_end_matches([' ', '\t', '\n']).len();
        value.truncate(end);
        self.min_indent = 0;
        self.after_anchor = false;
        self.can_be_json = false;
        self.emit_at(TokenKind::Scalar(value, ScalarStyle::Plain), mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        let mut scanner = Scanner::new(text.as_bytes()).unwrap();
        let mut out = Vec::new();
        while let Some(token) = scanner.next_token().unwrap() {
            out.push(token.to_string());
        }
        out
    }

    fn scan_err(text: &str) -> Error {
        let mut scanner = Scanner::new(text.as_bytes()).unwrap();
        loop {
            match scanner.next_token() {
                Ok(Some(_)) => {}
                Ok(None) => panic!("expected an error scanning {:?}", text),
                Err(err) => return err,
            }
        }
    }

    #[test]
    fn test_simple_map() {
        assert_eq!(
            tokens("a: 1\n"),
            ["BlockMapStart", "Key", "Scalar a", "Value", "Scalar 1", "BlockMapEnd"]
        );
    }

    #[test]
    fn test_nested_map() {
        assert_eq!(
            tokens("a:\n  b: 1\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "BlockMapStart",
                "Key",
                "Scalar b",
                "Value",
                "Scalar 1",
                "BlockMapEnd",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_block_seq() {
        assert_eq!(
            tokens("- 1\n- 2\n"),
            [
                "BlockSeqStart",
                "BlockEntry",
                "Scalar 1",
                "BlockEntry",
                "Scalar 2",
                "BlockSeqEnd",
            ]
        );
    }

    #[test]
    fn test_indentless_seq() {
        // Same-column entries under a key form a sequence with no frame of
        // their own.
        assert_eq!(
            tokens("a:\n- 1\n- 2\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "BlockEntry",
                "Scalar 1",
                "BlockEntry",
                "Scalar 2",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_seq_of_maps() {
        assert_eq!(
            tokens("- a: 1\n  b: 2\n- 3\n"),
            [
                "BlockSeqStart",
                "BlockEntry",
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar 1",
                "Key",
                "Scalar b",
                "Value",
                "Scalar 2",
                "BlockMapEnd",
                "BlockEntry",
                "Scalar 3",
                "BlockSeqEnd",
            ]
        );
    }

    #[test]
    fn test_flow_seq() {
        assert_eq!(
            tokens("[1, 2]"),
            [
                "FlowSeqStart",
                "Scalar 1",
                "FlowEntry",
                "Scalar 2",
                "FlowSeqEnd",
            ]
        );
    }

    #[test]
    fn test_flow_map() {
        assert_eq!(
            tokens("{a: 1, b: 2}"),
            [
                "FlowMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar 1",
                "FlowEntry",
                "Key",
                "Scalar b",
                "Value",
                "Scalar 2",
                "FlowMapEnd",
            ]
        );
    }

    #[test]
    fn test_flow_json_style() {
        // After a quoted scalar the colon needs no space.
        assert_eq!(
            tokens("{\"a\":1}"),
            [
                "FlowMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar 1",
                "FlowMapEnd",
            ]
        );
    }

    #[test]
    fn test_plain_colon_without_space_is_content() {
        assert_eq!(
            tokens("{a:1}"),
            ["FlowMapStart", "Scalar a:1", "FlowMapEnd"]
        );
    }

    #[test]
    fn test_doc_markers() {
        assert_eq!(
            tokens("---\na: 1\n...\n"),
            [
                "DocStart",
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar 1",
                "BlockMapEnd",
                "DocEnd",
            ]
        );
    }

    #[test]
    fn test_doc_marker_closes_frames() {
        assert_eq!(
            tokens("a: 1\n---\nb: 2\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar 1",
                "BlockMapEnd",
                "DocStart",
                "BlockMapStart",
                "Key",
                "Scalar b",
                "Value",
                "Scalar 2",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_anchor_and_alias() {
        assert_eq!(
            tokens("a: &x 1\nb: *x\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Anchor x",
                "Scalar 1",
                "Key",
                "Scalar b",
                "Value",
                "Alias x",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_anchor_opens_map_at_key_column() {
        assert_eq!(
            tokens("&a\n  key: value\n"),
            [
                "Anchor a",
                "BlockMapStart",
                "Key",
                "Scalar key",
                "Value",
                "Scalar value",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_same_line_anchor_keeps_map_column() {
        assert_eq!(
            tokens("&a key: value\nother: 2\n"),
            [
                "Anchor a",
                "BlockMapStart",
                "Key",
                "Scalar key",
                "Value",
                "Scalar value",
                "Key",
                "Scalar other",
                "Value",
                "Scalar 2",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_alias_as_key() {
        assert_eq!(
            tokens("*x : 1\n"),
            ["BlockMapStart", "Key", "Alias x", "Value", "Scalar 1", "BlockMapEnd"]
        );
    }

    #[test]
    fn test_explicit_key() {
        assert_eq!(
            tokens("? [4, 5]\n: {c: 6}\n"),
            [
                "BlockMapStart",
                "Key",
                "FlowSeqStart",
                "Scalar 4",
                "FlowEntry",
                "Scalar 5",
                "FlowSeqEnd",
                "Value",
                "FlowMapStart",
                "Key",
                "Scalar c",
                "Value",
                "Scalar 6",
                "FlowMapEnd",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_literal_scalar() {
        assert_eq!(
            tokens("a: |\n  hello\n  world\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar hello\\nworld\\n",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_literal_chomp() {
        assert_eq!(
            tokens("a: |-\n  hello\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar hello",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_folded_scalar() {
        assert_eq!(
            tokens("a: >\n  hello\n  world\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar hello world\\n",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_folded_blank_line() {
        assert_eq!(
            tokens("a: >\n  one\n\n  two\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar one \\ntwo\\n",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_multiline_plain_scalar() {
        assert_eq!(
            tokens("a: hello\n  world\nb: 2\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar a",
                "Value",
                "Scalar hello world",
                "Key",
                "Scalar b",
                "Value",
                "Scalar 2",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_single_quoted_escape() {
        assert_eq!(tokens("'it''s'"), ["Scalar it's"]);
    }

    #[test]
    fn test_double_quoted_escapes() {
        assert_eq!(tokens(r#""a\tb\nc""#), ["Scalar a\tb\\nc"]);
    }

    #[test]
    fn test_quoted_key() {
        assert_eq!(
            tokens("\"a\": 1\n"),
            ["BlockMapStart", "Key", "Scalar a", "Value", "Scalar 1", "BlockMapEnd"]
        );
    }

    #[test]
    fn test_comment_skipping() {
        assert_eq!(
            tokens("# header\na: 1 # trailing\n"),
            ["BlockMapStart", "Key", "Scalar a", "Value", "Scalar 1", "BlockMapEnd"]
        );
    }

    #[test]
    fn test_hash_inside_scalar() {
        // `#` not preceded by whitespace is content.
        assert_eq!(tokens("a#b"), ["Scalar a#b"]);
    }

    #[test]
    fn test_dash_without_space_is_scalar() {
        assert_eq!(tokens("-foo"), ["Scalar -foo"]);
    }

    #[test]
    fn test_empty_flow_entry() {
        assert_eq!(
            tokens("[1, , 3]"),
            [
                "FlowSeqStart",
                "Scalar 1",
                "FlowEntry",
                "FlowEntry",
                "Scalar 3",
                "FlowSeqEnd",
            ]
        );
    }

    #[test]
    fn test_colon_without_space_stays_in_plain_scalar() {
        assert_eq!(
            tokens("url: http://host:8080/path\n"),
            [
                "BlockMapStart",
                "Key",
                "Scalar url",
                "Value",
                "Scalar http://host:8080/path",
                "BlockMapEnd",
            ]
        );
    }

    #[test]
    fn test_anchor_in_flow() {
        assert_eq!(
            tokens("[&x 1, *x]"),
            [
                "FlowSeqStart",
                "Anchor x",
                "Scalar 1",
                "FlowEntry",
                "Alias x",
                "FlowSeqEnd",
            ]
        );
    }

    #[test]
    fn test_unknown_escape_error() {
        assert!(matches!(
            scan_err(r#""a\qb""#),
            Error::UnknownEscape { escape: 'q', .. }
        ));
    }

    #[test]
    fn test_eof_in_scalar_error() {
        assert!(matches!(scan_err("\"abc"), Error::EofInScalar { .. }));
    }

    #[test]
    fn test_invalid_flow_end_error() {
        assert!(matches!(scan_err("[1}"), Error::InvalidFlowEnd { .. }));
        assert!(matches!(scan_err("]"), Error::InvalidFlowEnd { .. }));
    }

    #[test]
    fn test_missing_flow_end_error() {
        assert!(matches!(scan_err("[1, 2"), Error::MissingSeqEnd { .. }));
        assert!(matches!(scan_err("{a: 1"), Error::MissingMapEnd { .. }));
    }

    #[test]
    fn test_invalid_indent_error() {
        let err = scan_err("a:\n    b: 1\n  c: 2\n");
        assert!(matches!(err, Error::InvalidIndent { .. }));
        assert_eq!(err.mark(), Some(Mark::new(3, 3)));
    }

    #[test]
    fn test_missing_newline_after_indicator() {
        assert!(matches!(scan_err("a: |x\n"), Error::MissingNewline { .. }));
    }

    #[test]
    fn test_empty_anchor_error() {
        assert!(matches!(scan_err("a: & 1\n"), Error::EmptyAnchorName { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokens(""), Vec::<String>::new());
        assert_eq!(tokens("   \n# only a comment\n"), Vec::<String>::new());
    }
}
