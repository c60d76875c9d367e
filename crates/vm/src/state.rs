//! Interpreter state: the lazily loaded table plus the runtime overlay.
//!
//! Reads consult the overlay first, then the table. Writes only ever touch
//! the overlay; the table is immutable once loaded.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::OnceCell;
use opaque_table::{Alias, Entry, EntryKind, LoadError, OpKind, Table};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::dispatch::{self, CallOutcome, Channel};
use crate::error::{Expected, InterpError};
use crate::predicate::PredicateDispatcher;
use crate::source::TableSource;

/// Load progress of an interpreter's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Unloaded,
    Loaded,
    /// Terminal. Every later operation returns the stored load error.
    Failed,
}

/// A value staged in the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    Int(i64),
    Text(String),
}

impl Slot {
    fn kind(&self) -> EntryKind {
        match self {
            Slot::Int(_) => EntryKind::IntConstant,
            Slot::Text(_) => EntryKind::StringConstant,
        }
    }

    fn into_int(self, alias: Alias) -> Result<i64, InterpError> {
        match self {
            Slot::Int(v) => Ok(v),
            other => Err(InterpError::TypeMismatch {
                alias,
                expected: Expected::Int,
                found: other.kind(),
            }),
        }
    }

    fn into_text(self, alias: Alias) -> Result<String, InterpError> {
        match self {
            Slot::Text(s) => Ok(s),
            other => Err(InterpError::TypeMismatch {
                alias,
                expected: Expected::Text,
                found: other.kind(),
            }),
        }
    }
}

/// The interpreter: one table, one overlay, one predicate registry.
pub struct InterpreterState {
    source: Box<dyn TableSource>,
    table: OnceCell<Result<Table, LoadError>>,
    overlay: Mutex<HashMap<Alias, Slot>>,
    predicates: PredicateDispatcher,
}

impl InterpreterState {
    /// Create an interpreter. The table is not read until first use.
    pub fn new(source: impl TableSource + 'static, predicates: PredicateDispatcher) -> Self {
        Self {
            source: Box::new(source),
            table: OnceCell::new(),
            overlay: Mutex::new(HashMap::new()),
            predicates,
        }
    }

    /// Create an interpreter with no predicates registered.
    pub fn with_source(source: impl TableSource + 'static) -> Self {
        Self::new(source, PredicateDispatcher::new())
    }

    pub fn status(&self) -> LoadStatus {
        match self.table.get() {
            None => LoadStatus::Unloaded,
            Some(Ok(_)) => LoadStatus::Loaded,
            Some(Err(_)) => LoadStatus::Failed,
        }
    }

    /// Load the table if that has not happened yet.
    ///
    /// The load runs at most once, even with concurrent callers; callers
    /// arriving during the load block until it finishes. A failed load is
    /// never retried.
    pub fn ensure_loaded(&self) -> Result<&Table, InterpError> {
        let loaded = self.table.get_or_init(|| {
            debug!("loading declarative table");
            let result = self
                .source
                .fetch()
                .and_then(|bytes| Table::load(&bytes));
            match &result {
                Ok(table) => debug!(entries = table.len(), "declarative table loaded"),
                Err(e) => warn!(error = %e, "declarative table load failed"),
            }
            result
        });
        loaded.as_ref().map_err(|e| InterpError::Load(e.clone()))
    }

    pub fn predicates(&self) -> &PredicateDispatcher {
        &self.predicates
    }

    /// Resolve an alias to its integer value.
    pub fn get_int(&self, alias: Alias) -> Result<i64, InterpError> {
        let table = self.ensure_loaded()?;
        let overlay = self.overlay.lock();
        resolve(table, &overlay, alias)?.into_int(alias)
    }

    /// Resolve an alias to its string value.
    pub fn get_string(&self, alias: Alias) -> Result<String, InterpError> {
        let table = self.ensure_loaded()?;
        let overlay = self.overlay.lock();
        resolve(table, &overlay, alias)?.into_text(alias)
    }

    /// Stage a string under `alias`, shadowing the table's entry.
    pub fn set_value(&self, alias: Alias, text: impl Into<String>) -> Result<(), InterpError> {
        check_writable(self.ensure_loaded()?, alias)?;
        self.overlay.lock().insert(alias, Slot::Text(text.into()));
        Ok(())
    }

    /// Stage an integer under `alias`, shadowing the table's entry.
    pub fn set_int(&self, alias: Alias, value: i64) -> Result<(), InterpError> {
        check_writable(self.ensure_loaded()?, alias)?;
        self.overlay.lock().insert(alias, Slot::Int(value));
        Ok(())
    }

    /// Set `dest` to the current value of `src`.
    ///
    /// The read of `src` and the write of `dest` happen under one overlay
    /// lock.
    pub fn copy(&self, dest: Alias, src: Alias) -> Result<(), InterpError> {
        let table = self.ensure_loaded()?;
        let mut overlay = self.overlay.lock();
        let value = resolve(table, &overlay, src)?;
        check_writable(table, dest)?;
        trace!(%dest, %src, "copy");
        overlay.insert(dest, value);
        Ok(())
    }

    /// Execute the instruction named by `op`.
    ///
    /// The left operand is `aux` when given, otherwise `dest` itself. The
    /// result is written to `dest`. On error `dest` is left untouched.
    /// Operand reads and the write of `dest` happen under one overlay lock.
    pub fn call(
        &self,
        op: Alias,
        aux: Option<Alias>,
        dest: Alias,
        src: Alias,
        channel: Channel,
    ) -> Result<CallOutcome, InterpError> {
        let table = self.ensure_loaded()?;
        let kind = opcode(table, op)?;
        check_writable(table, dest)?;

        let mut overlay = self.overlay.lock();
        let lhs_alias = aux.unwrap_or(dest);
        let lhs = resolve(table, &overlay, lhs_alias)?.into_int(lhs_alias)?;
        let rhs = resolve(table, &overlay, src)?.into_int(src)?;

        let result = dispatch::execute(kind, lhs, rhs)?;
        trace!(op = kind.mnemonic(), %dest, %src, lhs, rhs, result, "call");
        overlay.insert(dest, Slot::Int(result));
        Ok(CallOutcome::new(result, channel))
    }

    /// Invoke the predicate named by `predicate` with an opaque context.
    ///
    /// The returned integer is plain data; nothing here branches on it.
    pub fn if_predicate(
        &self,
        predicate: Alias,
        context: &mut dyn Any,
    ) -> Result<i32, InterpError> {
        match self.ensure_loaded()?.lookup(predicate)? {
            Entry::CallbackRef(name) => trace!(%predicate, name = name.as_str(), "if"),
            other => {
                return Err(InterpError::TypeMismatch {
                    alias: predicate,
                    expected: Expected::Callback,
                    found: other.kind(),
                })
            }
        }
        self.predicates.call(predicate, self, context)
    }

    /// Number of aliases with a staged value.
    pub fn overlay_len(&self) -> usize {
        self.overlay.lock().len()
    }

    /// Drop every staged value, exposing the table's entries again.
    pub fn clear_overlay(&self) {
        self.overlay.lock().clear();
    }
}

/// Current value of `alias`: the overlay's staged value, else the table's.
fn resolve(
    table: &Table,
    overlay: &HashMap<Alias, Slot>,
    alias: Alias,
) -> Result<Slot, InterpError> {
    if let Some(slot) = overlay.get(&alias) {
        return Ok(slot.clone());
    }
    match table.lookup(alias)? {
        Entry::IntConstant(v) => Ok(Slot::Int(*v)),
        Entry::StringConstant(s) => Ok(Slot::Text(s.clone())),
        other => Err(InterpError::TypeMismatch {
            alias,
            expected: Expected::Value,
            found: other.kind(),
        }),
    }
}

fn opcode(table: &Table, alias: Alias) -> Result<OpKind, InterpError> {
    match table.lookup(alias)? {
        Entry::OpCode(op) => Ok(*op),
        other => Err(InterpError::TypeMismatch {
            alias,
            expected: Expected::OpCode,
            found: other.kind(),
        }),
    }
}

/// Only aliases that name a constant in the table can be staged.
fn check_writable(table: &Table, alias: Alias) -> Result<(), InterpError> {
    match table.lookup(alias)? {
        Entry::IntConstant(_) | Entry::StringConstant(_) => Ok(()),
        other => Err(InterpError::TypeMismatch {
            alias,
            expected: Expected::Value,
            found: other.kind(),
        }),
    }
}

impl fmt::Debug for InterpreterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterpreterState")
            .field("status", &self.status())
            .field("overlay", &self.overlay_len())
            .field("predicates", &self.predicates)
            .finish()
    }
}
