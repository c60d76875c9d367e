//! Interfaces to the collaborators the glue does not own: the licensing
//! library and the host object that receives staged fields.

use std::collections::BTreeMap;

/// A licensed feature as reported by the licensing library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub version: String,
}

impl Feature {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// The external licensing library.
///
/// Errors are the library's own human-readable messages.
pub trait Licensing: Send + Sync {
    /// Acquire and validate the license.
    fn checkout(&self) -> Result<(), String>;

    /// Features granted by the current license.
    fn features(&self) -> Result<Vec<Feature>, String>;

    /// Identity of the machine the license is bound to.
    fn host_id(&self) -> String;
}

/// An object whose named string fields can be set.
pub trait FieldSink {
    /// Returns false if the field does not exist or cannot be written.
    fn set_field(&mut self, name: &str, value: &str) -> bool;
}

impl FieldSink for BTreeMap<String, String> {
    fn set_field(&mut self, name: &str, value: &str) -> bool {
        self.insert(name.to_owned(), value.to_owned());
        true
    }
}
