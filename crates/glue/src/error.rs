//! Errors from the boundary operations.

use opaque_vm::InterpError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlueError {
    #[error(transparent)]
    Interp(#[from] InterpError),

    /// The caller's text sink rejected a write.
    #[error("failed to write to sink")]
    Sink(#[from] std::fmt::Error),
}
