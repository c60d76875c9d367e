//! Opaque interpreter. Executes table-driven instructions against aliases.
//!
//! Instead of compiled-in literals and branches, callers drive logic
//! through three operations on an [`InterpreterState`]:
//! - `copy(dest, src)`: stage the current value of one alias under another
//! - `call(op, aux, dest, src, channel)`: apply an opcode resolved by alias
//! - `if_predicate(alias, ctx)`: invoke a registered native callback
//!
//! Values resolve through a runtime overlay first, then the immutable
//! declarative table, which is loaded lazily and exactly once.
//!
//! # Usage
//!
//! ```
//! use opaque_table::{Alias, OpKind, TableBuilder};
//! use opaque_vm::{AliasedValue, Channel, InterpreterState};
//!
//! let table = TableBuilder::new()
//!     .int(0u32, 0)
//!     .int(1u32, 1)
//!     .int(2u32, 0)
//!     .opcode(3u32, OpKind::Add)
//!     .build()
//!     .unwrap();
//! let state = InterpreterState::with_source(table);
//!
//! let mut counter = AliasedValue::new(&state, Alias(2)).unwrap();
//! counter.copy_from(Alias(0)).unwrap();
//! counter.call(Alias(3), None, Alias(1), Channel::DestOnly).unwrap();
//! assert_eq!(counter.as_int(), 1);
//! ```

pub mod dispatch;
pub mod error;
pub mod predicate;
pub mod selftest;
pub mod source;
pub mod state;
pub mod value;

pub use dispatch::{CallOutcome, Channel};
pub use error::{ArithmeticError, Expected, InterpError};
pub use predicate::{Callback, PredicateDispatcher};
pub use source::TableSource;
pub use state::{InterpreterState, LoadStatus};
pub use value::AliasedValue;
