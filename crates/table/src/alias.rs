//! Build-time-stable entry identifiers.

use std::fmt;

/// Opaque identifier naming one entry in a declarative table.
///
/// Aliases are assigned by the table generator and never created at
/// runtime; the numeric value carries no meaning of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alias(pub u32);

impl Alias {
    /// The raw identifier as stored in the wire format.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for Alias {
    fn from(raw: u32) -> Self {
        Alias(raw)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
