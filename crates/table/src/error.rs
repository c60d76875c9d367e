//! Load and lookup errors for declarative tables.

use crate::alias::Alias;
use thiserror::Error;

/// Errors that occur while loading a table blob.
///
/// A load failure is terminal for the interpreter that hit it, so the
/// error is `Clone` and can be handed out again on every later call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The blob contained no records.
    #[error("table is empty")]
    Empty,

    /// A record header or payload ran past the end of the blob.
    #[error("truncated record at byte offset {offset}")]
    Truncated { offset: usize },

    /// Entry kind byte is not one of the four known kinds.
    #[error("invalid entry kind {kind:#04x} at byte offset {offset}")]
    InvalidKind { offset: usize, kind: u8 },

    /// Opcode payload byte does not name an instruction.
    #[error("invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    /// Fixed-width payload has the wrong size.
    #[error("alias {alias}: payload is {found} bytes (expected {expected})")]
    BadPayloadLength {
        alias: Alias,
        expected: usize,
        found: usize,
    },

    /// Text payload is not valid UTF-8.
    #[error("alias {alias}: payload is not valid UTF-8")]
    InvalidUtf8 { alias: Alias },

    /// The same alias appears in two records.
    #[error("duplicate alias {0}")]
    DuplicateAlias(Alias),

    /// The table source could not produce any bytes.
    #[error("table source unavailable: {0}")]
    Unavailable(String),
}

/// Lookup of an alias that is not in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown alias {0}")]
pub struct UnknownAlias(pub Alias);
