//! Interpreter errors.
//!
//! Only [`ArithmeticError`] is a legitimate runtime condition. Every other
//! variant means the table and the code driving it disagree about the
//! alias set, which is fixed at build time.

use opaque_table::{Alias, EntryKind, LoadError, UnknownAlias};
use thiserror::Error;

/// Runtime failures of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivideByZero,
}

/// The kind of value an operation expected to find behind an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Int,
    Text,
    /// Either an integer or a string: anything that can live in the overlay.
    Value,
    OpCode,
    Callback,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Expected::Int => "INT",
            Expected::Text => "STR",
            Expected::Value => "INT or STR",
            Expected::OpCode => "OP",
            Expected::Callback => "CALLBACK",
        })
    }
}

/// Errors surfaced by interpreter operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpError {
    /// The table could not be loaded. Terminal for the interpreter.
    #[error("table load failed: {0}")]
    Load(#[from] LoadError),

    #[error("unknown alias {0}")]
    UnknownAlias(Alias),

    #[error("no predicate registered for {0}")]
    UnknownPredicate(Alias),

    #[error("predicate {0} registered twice")]
    DuplicateCallback(Alias),

    /// The alias resolved to an entry or staged value of another kind.
    #[error("alias {alias}: expected {expected}, found {found}")]
    TypeMismatch {
        alias: Alias,
        expected: Expected,
        found: EntryKind,
    },

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

impl From<UnknownAlias> for InterpError {
    fn from(err: UnknownAlias) -> Self {
        InterpError::UnknownAlias(err.0)
    }
}
