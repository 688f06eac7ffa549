//! Parse, representation and access errors.
//!
//! Every error raised while text is being consumed carries the [`Mark`]
//! where the offending character or token began, so callers can render
//! `line:column: message` diagnostics.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::mark::Mark;

/// Errors produced by the scanner, parser, builder, node accessors and
/// conversions.
#[derive(Debug)]
pub enum Error {
    /// A character sequence that cannot start any token.
    UnknownToken {
        /// Position of the offending character
        mark: Mark,
    },

    /// The parser met a token outside the first set of the current
    /// production.
    UnexpectedToken {
        /// Position of the token
        mark: Mark,
        /// Token kind name that was found
        found: &'static str,
        /// What the grammar required, if a single kind was required
        expected: Option<&'static str>,
    },

    /// Unknown backslash escape in a double-quoted scalar.
    UnknownEscape {
        /// Position of the backslash
        mark: Mark,
        /// The character following the backslash
        escape: char,
    },

    /// `&` or `*` with no name attached.
    EmptyAnchorName {
        /// Position of the indicator
        mark: Mark,
    },

    /// An anchor or alias name ran into a character that may not follow it.
    BadAnchorChar {
        /// Position of the character
        mark: Mark,
        /// The character found
        ch: char,
    },

    /// End of input inside a quoted scalar.
    EofInScalar {
        /// Position where the scalar started
        mark: Mark,
    },

    /// A flow mapping was still open at a point it must have closed.
    MissingMapEnd {
        /// Current position
        mark: Mark,
    },

    /// A flow sequence was still open at a point it must have closed.
    MissingSeqEnd {
        /// Current position
        mark: Mark,
    },

    /// `|` or `>` not followed by a newline (after the optional chomp).
    MissingNewline {
        /// Position after the indicator
        mark: Mark,
    },

    /// A token column fell between two enclosing indentation frames.
    InvalidIndent {
        /// Position of the token
        mark: Mark,
    },

    /// `}` closing a `[`, `]` closing a `{`, or a closer with no opener.
    InvalidFlowEnd {
        /// Position of the closer
        mark: Mark,
    },

    /// Two structurally equal keys in one mapping.
    DuplicatedKey {
        /// Position of the second key's mapping entry
        mark: Mark,
    },

    /// An alias named an anchor that is not defined at that point.
    UnknownAnchor {
        /// Position of the alias
        mark: Mark,
        /// The name the alias referenced
        name: String,
    },

    /// Read-only access to a missing key/index, or indexing a node of the
    /// wrong kind.
    BadDereference,

    /// A scalar did not conform to the requested type.
    Conversion {
        /// Name of the target type
        target: &'static str,
    },

    /// A file could not be opened or read.
    File {
        /// Path the operation was attempted on
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// An I/O failure on a caller-supplied reader.
    Io(io::Error),
}

impl Error {
    /// The source position attached to this error, if any.
    pub fn mark(&self) -> Option<Mark> {
        match self {
            Error::UnknownToken { mark }
            | Error::UnexpectedToken { mark, .. }
            | Error::UnknownEscape { mark, .. }
            | Error::EmptyAnchorName { mark }
            | Error::BadAnchorChar { mark, .. }
            | Error::EofInScalar { mark }
            | Error::MissingMapEnd { mark }
            | Error::MissingSeqEnd { mark }
            | Error::MissingNewline { mark }
            | Error::InvalidIndent { mark }
            | Error::InvalidFlowEnd { mark }
            | Error::DuplicatedKey { mark }
            | Error::UnknownAnchor { mark, .. } => Some(*mark),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(mark) = self.mark() {
            if !mark.is_none() {
                write!(f, "{}: ", mark)?;
            }
        }

        match self {
            Error::UnknownToken { .. } => write!(f, "unknown token"),
            Error::UnexpectedToken {
                found, expected, ..
            } => match expected {
                Some(expected) => {
                    write!(f, "unexpected token {} (expected {})", found, expected)
                }
                None => write!(f, "unexpected token {}", found),
            },
            Error::UnknownEscape { escape, .. } => {
                write!(f, "unknown escape '\\{}'", escape)
            }
            Error::EmptyAnchorName { .. } => write!(f, "empty anchor or alias name"),
            Error::BadAnchorChar { ch, .. } => {
                write!(f, "illegal character '{}' after anchor or alias", ch)
            }
            Error::EofInScalar { .. } => write!(f, "illegal EOF in scalar"),
            Error::MissingMapEnd { .. } => write!(f, "missing end of map"),
            Error::MissingSeqEnd { .. } => write!(f, "missing end of sequence"),
            Error::MissingNewline { .. } => {
                write!(f, "missing newline after block scalar indicator")
            }
            Error::InvalidIndent { .. } => write!(f, "invalid indentation"),
            Error::InvalidFlowEnd { .. } => write!(f, "invalid flow end"),
            Error::DuplicatedKey { .. } => write!(f, "duplicated map key"),
            Error::UnknownAnchor { name, .. } => {
                write!(f, "unknown anchor '{}'", name)
            }
            Error::BadDereference => write!(f, "bad dereference"),
            Error::Conversion { target } => {
                write!(f, "node is not convertible to {}", target)
            }
            Error::File { path, source } => {
                write!(f, "failed to open \"{}\": {}", path.display(), source)
            }
            Error::Io(err) => write!(f, "i/o error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::File { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
