//! Native callbacks dispatched by alias.
//!
//! A predicate stands in for a conditional branch: the caller invokes it
//! by alias and treats the returned integer as ordinary data. Callbacks
//! receive the interpreter itself and may stage values through it before
//! returning; re-entering the interpreter from a callback is supported.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use opaque_table::Alias;
use tracing::trace;

use crate::error::InterpError;
use crate::state::InterpreterState;

/// A registered native callback.
pub type Callback = Box<dyn Fn(&InterpreterState, &mut dyn Any) -> i32 + Send + Sync>;

/// Alias → callback registry. Filled once at startup.
#[derive(Default)]
pub struct PredicateDispatcher {
    callbacks: HashMap<Alias, Callback>,
}

impl PredicateDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `alias`.
    pub fn register<F>(&mut self, alias: impl Into<Alias>, callback: F) -> Result<(), InterpError>
    where
        F: Fn(&InterpreterState, &mut dyn Any) -> i32 + Send + Sync + 'static,
    {
        let alias = alias.into();
        if self.callbacks.contains_key(&alias) {
            return Err(InterpError::DuplicateCallback(alias));
        }
        self.callbacks.insert(alias, Box::new(callback));
        Ok(())
    }

    /// Invoke the callback registered under `alias` and return its result
    /// unchanged.
    pub fn call(
        &self,
        alias: Alias,
        state: &InterpreterState,
        context: &mut dyn Any,
    ) -> Result<i32, InterpError> {
        let callback = self
            .callbacks
            .get(&alias)
            .ok_or(InterpError::UnknownPredicate(alias))?;
        let result = callback(state, context);
        trace!(%alias, result, "predicate returned");
        Ok(result)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for PredicateDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut aliases: Vec<&Alias> = self.callbacks.keys().collect();
        aliases.sort();
        f.debug_struct("PredicateDispatcher")
            .field("aliases", &aliases)
            .finish()
    }
}
