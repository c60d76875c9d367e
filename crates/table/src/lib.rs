//! Declarative alias tables for the opaque interpreter.
//!
//! A table is produced by an external build step and consumed here as
//! an opaque blob. This crate provides:
//!
//! - [`Alias`]: a build-time-stable entry identifier
//! - [`Entry`]: integer, string, opcode, or callback-reference entry
//! - [`OpKind`]: the five instructions the interpreter executes
//! - [`Table`]: the immutable alias → entry mapping, with `load`/`lookup`
//! - [`TableBuilder`]: in-memory construction for generators and tests
//! - [`disassemble`]: human-readable listing of a table
//! - [`LoadError`] / [`UnknownAlias`]: decode and lookup failures

pub mod alias;
pub mod disassemble;
pub mod entry;
pub mod error;
pub mod opkind;
pub mod table;

pub use alias::Alias;
pub use disassemble::disassemble;
pub use entry::{Entry, EntryKind};
pub use error::{LoadError, UnknownAlias};
pub use opkind::OpKind;
pub use table::{Table, TableBuilder};
