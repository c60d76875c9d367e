//! Where an interpreter gets its table blob from.

use std::borrow::Cow;

use opaque_table::{LoadError, Table};

/// Supplies the raw table blob on first use.
///
/// `fetch` is called at most once per interpreter, under the
/// interpreter's load guard.
pub trait TableSource: Send + Sync {
    fn fetch(&self) -> Result<Cow<'_, [u8]>, LoadError>;
}

impl TableSource for Vec<u8> {
    fn fetch(&self) -> Result<Cow<'_, [u8]>, LoadError> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl TableSource for &'static [u8] {
    fn fetch(&self) -> Result<Cow<'_, [u8]>, LoadError> {
        Ok(Cow::Borrowed(*self))
    }
}

impl TableSource for Table {
    fn fetch(&self) -> Result<Cow<'_, [u8]>, LoadError> {
        Ok(Cow::Owned(self.encode()))
    }
}
