//! Character-encoding front-end.
//!
//! YAML streams may arrive as UTF-8, UTF-16LE/BE or UTF-32LE/BE, with or
//! without a byte-order mark. The scanner only ever sees decoded chars:
//! [`Utf8Reader`] inspects at most the first four bytes to classify the
//! stream, then transcodes code units on the fly. Malformed input (lone
//! surrogates, truncated units, bad UTF-8 sequences) decodes to U+FFFD
//! rather than failing the parse.

use std::io::{self, Read};

/// Replacement character for undecodable input.
pub const REPLACEMENT: char = '\u{FFFD}';

/// Detected stream encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf {
    /// UTF-8 (also the fallback for unrecognized prefixes)
    Utf8,
    /// UTF-16 little-endian
    Utf16Le,
    /// UTF-16 big-endian
    Utf16Be,
    /// UTF-32 little-endian
    Utf32Le,
    /// UTF-32 big-endian
    Utf32Be,
}

/// Classify a stream from its first bytes.
///
/// Returns the encoding and the number of BOM bytes to discard. BOM-less
/// UTF-16/32 is recognized by the zero-byte pattern an ASCII-leading
/// document produces in those encodings.
pub fn detect(prefix: &[u8]) -> (Utf, usize) {
    match *prefix {
        [0x00, 0x00, 0xFE, 0xFF, ..] => (Utf::Utf32Be, 4),
        [0xFF, 0xFE, 0x00, 0x00, ..] => (Utf::Utf32Le, 4),
        [0xEF, 0xBB, 0xBF, ..] => (Utf::Utf8, 3),
        [0xFE, 0xFF, ..] => (Utf::Utf16Be, 2),
        [0xFF, 0xFE, ..] => (Utf::Utf16Le, 2),
        [0x00, 0x00, 0x00, b, ..] if b != 0x00 => (Utf::Utf32Be, 0),
        [b, 0x00, 0x00, 0x00, ..] if b != 0x00 => (Utf::Utf32Le, 0),
        [0x00, b, ..] if b != 0x00 => (Utf::Utf16Be, 0),
        [b, 0x00, ..] if b != 0x00 => (Utf::Utf16Le, 0),
        _ => (Utf::Utf8, 0),
    }
}

/// Streaming transcoder from any detected encoding to chars.
pub struct Utf8Reader<R> {
    inner: R,
    encoding: Utf,
    /// Detection prefix bytes not consumed by the BOM, replayed first.
    prefix: Vec<u8>,
    prefix_pos: usize,
    /// One byte of pushback for UTF-8 resynchronization.
    pushback: Option<u8>,
    /// A UTF-16 unit read while resolving a surrogate pair.
    pending_unit: Option<u16>,
    eof: bool,
}

impl<R: Read> Utf8Reader<R> {
    /// Wrap a byte reader, detecting its encoding from the first bytes.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let mut prefix = [0u8; 4];
        let mut len = 0;
        while len < 4 {
            match inner.read(&mut prefix[len..])? {
                0 => break,
                n => len += n,
            }
        }

        let (encoding, bom_len) = detect(&prefix[..len]);
        Ok(Utf8Reader {
            inner,
            encoding,
            prefix: prefix[bom_len..len].to_vec(),
            prefix_pos: 0,
            pushback: None,
            pending_unit: None,
            eof: false,
        })
    }

    /// The encoding detected at construction.
    pub fn encoding(&self) -> Utf {
        self.encoding
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pushback.take() {
            return Ok(Some(b));
        }
        if self.prefix_pos < self.prefix.len() {
            let b = self.prefix[self.prefix_pos];
            self.prefix_pos += 1;
            return Ok(Some(b));
        }
        if self.eof {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(None);
                }
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Decode the next code point, or `None` at end of input.
    pub fn next_char(&mut self) -> io::Result<Option<char>> {
        match self.encoding {
            Utf::Utf8 => self.next_utf8(),
            Utf::Utf16Le | Utf::Utf16Be => self.next_utf16(),
            Utf::Utf32Le | Utf::Utf32Be => self.next_utf32(),
        }
    }

    fn next_utf8(&mut self) -> io::Result<Option<char>> {
        let lead = match self.read_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };

        let (len, mut code) = match lead {
            0x00..=0x7F => return Ok(Some(lead as char)),
            0xC2..=0xDF => (2, (lead & 0x1F) as u32),
            0xE0..=0xEF => (3, (lead & 0x0F) as u32),
            0xF0..=0xF4 => (4, (lead & 0x07) as u32),
            _ => return Ok(Some(REPLACEMENT)),
        };

        for _ in 1..len {
            match self.read_byte()? {
                Some(b) if b & 0xC0 == 0x80 => {
                    code = (code << 6) | (b & 0x3F) as u32;
                }
                Some(b) => {
                    // Resynchronize on the unexpected byte.
                    self.pushback = Some(b);
                    return Ok(Some(REPLACEMENT));
                }
                None => return Ok(Some(REPLACEMENT)),
            }
        }

        let min = match len {
            2 => 0x80,
            3 => 0x800,
            _ => 0x10000,
        };
        if code < min {
            return Ok(Some(REPLACEMENT));
        }

        Ok(Some(char::from_u32(code).unwrap_or(REPLACEMENT)))
    }

    fn read_unit16(&mut self) -> io::Result<Option<u16>> {
        let b0 = match self.read_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let b1 = match self.read_byte()? {
            Some(b) => b,
            // Truncated code unit at EOF.
            None => return Ok(Some(0xFFFD)),
        };

        let unit = match self.encoding {
            Utf::Utf16Le => u16::from_le_bytes([b0, b1]),
            _ => u16::from_be_bytes([b0, b1]),
        };
        Ok(Some(unit))
    }

    fn next_utf16(&mut self) -> io::Result<Option<char>> {
        let unit = match self.pending_unit.take() {
            Some(u) => u,
            None => match self.read_unit16()? {
                Some(u) => u,
                None => return Ok(None),
            },
        };

        match unit {
            0xD800..=0xDBFF => match self.read_unit16()? {
                Some(low @ 0xDC00..=0xDFFF) => {
                    let code = 0x10000
                        + ((u32::from(unit) - 0xD800) << 10)
                        + (u32::from(low) - 0xDC00);
                    Ok(Some(char::from_u32(code).unwrap_or(REPLACEMENT)))
                }
                Some(other) => {
                    // Lone high surrogate; the following unit stands alone.
                    self.pending_unit = Some(other);
                    Ok(Some(REPLACEMENT))
                }
                None => Ok(Some(REPLACEMENT)),
            },
            0xDC00..=0xDFFF => Ok(Some(REPLACEMENT)),
            _ => Ok(Some(char::from_u32(u32::from(unit)).unwrap_or(REPLACEMENT))),
        }
    }

    fn next_utf32(&mut self) -> io::Result<Option<char>> {
        let mut bytes = [0u8; 4];
        for (i, slot) in bytes.iter_mut().enumerate() {
            match self.read_byte()? {
                Some(b) => *slot = b,
                None if i == 0 => return Ok(None),
                None => return Ok(Some(REPLACEMENT)),
            }
        }

        let code = match self.encoding {
            Utf::Utf32Le => u32::from_le_bytes(bytes),
            _ => u32::from_be_bytes(bytes),
        };
        Ok(Some(char::from_u32(code).unwrap_or(REPLACEMENT)))
    }
}
