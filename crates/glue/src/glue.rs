//! Boundary operations consumed by the surrounding license code.
//!
//! Each operation reaches its outcome through `copy`, `call` and
//! `if_predicate` on the interpreter. The licensing library is only ever
//! invoked from inside a registered predicate or as a plain data source.

use std::any::Any;
use std::fmt::Write;
use std::sync::Arc;

use opaque_vm::{
    AliasedValue, Channel, InterpError, InterpreterState, PredicateDispatcher, TableSource,
};
use tracing::warn;

use crate::aliases::*;
use crate::error::GlueError;
use crate::licensing::{FieldSink, Licensing};

/// Predicate context: what a callback needs to reach the licensing library.
struct Session {
    licensing: Arc<dyn Licensing>,
}

/// Stage the checkout outcome: the error message (empty on success) goes
/// to `ERROR_MESSAGE`. Returns 1 on success.
fn checkout(state: &InterpreterState, ctx: &mut dyn Any) -> i32 {
    let Some(session) = ctx.downcast_mut::<Session>() else {
        return 0;
    };
    let (verdict, message) = match session.licensing.checkout() {
        Ok(()) => (1, String::new()),
        Err(message) => {
            warn!(error = %message, "license checkout failed");
            (0, message)
        }
    };
    match state.set_value(ERROR_MESSAGE, message) {
        Ok(()) => verdict,
        Err(_) => 0,
    }
}

/// Stage a status message into `MESSAGE` and the host identity into
/// `IDENTITY`. Returns 1 when the license checks out.
fn validate(state: &InterpreterState, ctx: &mut dyn Any) -> i32 {
    let Some(session) = ctx.downcast_mut::<Session>() else {
        return 0;
    };
    let (verdict, staged) = match session.licensing.checkout() {
        Ok(()) => (1, state.copy(MESSAGE, OK_MESSAGE)),
        Err(message) => {
            warn!(error = %message, "license validation failed");
            (0, state.set_value(MESSAGE, message))
        }
    };
    let staged = staged.and_then(|()| state.set_value(IDENTITY, session.licensing.host_id()));
    match staged {
        Ok(()) => verdict,
        Err(_) => 0,
    }
}

/// The license boundary over one interpreter.
pub struct LicenseGlue {
    state: InterpreterState,
    licensing: Arc<dyn Licensing>,
}

impl LicenseGlue {
    /// Build the glue over its own alias table.
    pub fn new(licensing: Arc<dyn Licensing>) -> Result<Self, GlueError> {
        Self::with_source(table(), licensing)
    }

    /// Build the glue over an externally generated table. The table must
    /// define every alias in [`crate::aliases`].
    pub fn with_source(
        source: impl TableSource + 'static,
        licensing: Arc<dyn Licensing>,
    ) -> Result<Self, GlueError> {
        let mut predicates = PredicateDispatcher::new();
        predicates.register(CHECKOUT, checkout)?;
        predicates.register(VALIDATE, validate)?;
        Ok(Self {
            state: InterpreterState::new(source, predicates),
            licensing,
        })
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    fn session(&self) -> Session {
        Session {
            licensing: Arc::clone(&self.licensing),
        }
    }

    /// Acquire the license. The failure message, if any, is kept for
    /// [`last_error`](Self::last_error).
    pub fn initialize(&self) -> Result<bool, GlueError> {
        let mut status = AliasedValue::new(&self.state, STATUS)?;
        status.copy_from(ZERO)?;

        let verdict = self.state.if_predicate(CHECKOUT, &mut self.session())?;
        self.state.set_int(VERDICT, i64::from(verdict))?;
        status.call(LESS_THAN, Some(ZERO), VERDICT, Channel::DestOnly)?;

        Ok(status.as_bool())
    }

    /// The message staged by the last failed operation; empty if none.
    pub fn last_error(&self) -> Result<String, GlueError> {
        Ok(self.state.get_string(ERROR_MESSAGE)?)
    }

    /// Write one `license: <name> - <version>` line per licensed feature,
    /// or a single `error: <message>` line if the features cannot be
    /// listed. Returns true if at least one feature was written.
    pub fn dump(&self, sink: &mut dyn Write) -> Result<bool, GlueError> {
        let mut count = AliasedValue::new(&self.state, COUNT)?;
        count.copy_from(ZERO)?;

        match self.licensing.features() {
            Ok(features) => {
                for feature in features {
                    self.state.set_value(FEATURE_NAME, feature.name)?;
                    self.state.set_value(FEATURE_VERSION, feature.version)?;
                    writeln!(
                        sink,
                        "license: {} - {}",
                        self.state.get_string(FEATURE_NAME)?,
                        self.state.get_string(FEATURE_VERSION)?
                    )?;
                    count.call(ADD, None, ONE, Channel::DestOnly)?;
                }
            }
            Err(message) => {
                warn!(error = %message, "license feature listing failed");
                self.state.set_value(ERROR_MESSAGE, message)?;
                writeln!(sink, "error: {}", self.state.get_string(ERROR_MESSAGE)?)?;
            }
        }

        let mut status = AliasedValue::new(&self.state, DUMP_STATUS)?;
        status.call(LESS_THAN, Some(ZERO), COUNT, Channel::DestOnly)?;
        Ok(status.as_bool())
    }

    /// Validate the license, then write the staged message and host
    /// identity into `host`. Both writes are attempted; returns whether
    /// both succeeded.
    pub fn process(&self, host: &mut dyn FieldSink) -> Result<bool, GlueError> {
        // The verdict only shapes what the predicate staged in MESSAGE.
        self.state.if_predicate(VALIDATE, &mut self.session())?;

        let message = self.stage(host, MESSAGE_FIELD, MESSAGE)?;
        let identity = self.stage(host, IDENTITY_FIELD, IDENTITY)?;
        Ok(message && identity)
    }

    fn stage(
        &self,
        host: &mut dyn FieldSink,
        field: opaque_table::Alias,
        value: opaque_table::Alias,
    ) -> Result<bool, InterpError> {
        let name = self.state.get_string(field)?;
        let text = self.state.get_string(value)?;
        Ok(host.set_field(&name, &text))
    }
}

impl std::fmt::Debug for LicenseGlue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseGlue")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
