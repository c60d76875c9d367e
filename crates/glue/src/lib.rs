//! License boundary operations over the opaque interpreter.
//!
//! The surrounding license code calls three operations:
//! - [`LicenseGlue::initialize`]: acquire the license, keep the failure message
//! - [`LicenseGlue::dump`]: list licensed features to a text sink
//! - [`LicenseGlue::process`]: validate, then stage a message and the host
//!   identity into a caller-supplied object
//!
//! The licensing library itself is external and reached through the
//! [`Licensing`] trait.

pub mod aliases;
pub mod error;
pub mod glue;
pub mod licensing;

pub use error::GlueError;
pub use glue::LicenseGlue;
pub use licensing::{Feature, FieldSink, Licensing};
