//! A cached integer bound to one alias of an interpreter.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use opaque_table::Alias;

use crate::dispatch::{CallOutcome, Channel};
use crate::error::InterpError;
use crate::state::InterpreterState;

/// Snapshot of an alias's integer value.
///
/// The snapshot is taken at construction and refreshed only by
/// [`copy_from`](Self::copy_from) and [`call`](Self::call). Operators work
/// on the snapshot alone and never write back to the interpreter.
#[derive(Clone)]
pub struct AliasedValue<'s> {
    state: &'s InterpreterState,
    alias: Alias,
    cached: i64,
}

impl<'s> AliasedValue<'s> {
    pub fn new(state: &'s InterpreterState, alias: Alias) -> Result<Self, InterpError> {
        let cached = state.get_int(alias)?;
        Ok(Self {
            state,
            alias,
            cached,
        })
    }

    pub fn alias(&self) -> Alias {
        self.alias
    }

    pub fn state(&self) -> &'s InterpreterState {
        self.state
    }

    pub fn as_int(&self) -> i64 {
        self.cached
    }

    /// Non-zero is true.
    pub fn as_bool(&self) -> bool {
        self.cached != 0
    }

    /// `copy(self, src)` on the interpreter, then refresh.
    pub fn copy_from(&mut self, src: Alias) -> Result<(), InterpError> {
        self.state.copy(self.alias, src)?;
        self.cached = self.state.get_int(self.alias)?;
        Ok(())
    }

    /// `call(op, aux, self, src)` on the interpreter, then refresh.
    pub fn call(
        &mut self,
        op: Alias,
        aux: Option<Alias>,
        src: Alias,
        channel: Channel,
    ) -> Result<CallOutcome, InterpError> {
        let outcome = self.state.call(op, aux, self.alias, src, channel)?;
        self.cached = outcome.updated_dest;
        Ok(outcome)
    }
}

impl fmt::Debug for AliasedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AliasedValue")
            .field("alias", &self.alias)
            .field("cached", &self.cached)
            .finish()
    }
}

impl fmt::Display for AliasedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cached)
    }
}

impl Add<i64> for &AliasedValue<'_> {
    type Output = i64;

    fn add(self, rhs: i64) -> i64 {
        self.cached.wrapping_add(rhs)
    }
}

impl Sub<i64> for &AliasedValue<'_> {
    type Output = i64;

    fn sub(self, rhs: i64) -> i64 {
        self.cached.wrapping_sub(rhs)
    }
}

impl Add<&AliasedValue<'_>> for &AliasedValue<'_> {
    type Output = i64;

    fn add(self, rhs: &AliasedValue<'_>) -> i64 {
        self.cached.wrapping_add(rhs.cached)
    }
}

impl Sub<&AliasedValue<'_>> for &AliasedValue<'_> {
    type Output = i64;

    fn sub(self, rhs: &AliasedValue<'_>) -> i64 {
        self.cached.wrapping_sub(rhs.cached)
    }
}

impl AddAssign<i64> for AliasedValue<'_> {
    fn add_assign(&mut self, rhs: i64) {
        self.cached = self.cached.wrapping_add(rhs);
    }
}

impl SubAssign<i64> for AliasedValue<'_> {
    fn sub_assign(&mut self, rhs: i64) {
        self.cached = self.cached.wrapping_sub(rhs);
    }
}

impl AddAssign<&AliasedValue<'_>> for AliasedValue<'_> {
    fn add_assign(&mut self, rhs: &AliasedValue<'_>) {
        self.cached = self.cached.wrapping_add(rhs.cached);
    }
}

impl SubAssign<&AliasedValue<'_>> for AliasedValue<'_> {
    fn sub_assign(&mut self, rhs: &AliasedValue<'_>) {
        self.cached = self.cached.wrapping_sub(rhs.cached);
    }
}

impl PartialEq for AliasedValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cached == other.cached
    }
}

impl Eq for AliasedValue<'_> {}

impl PartialEq<i64> for AliasedValue<'_> {
    fn eq(&self, other: &i64) -> bool {
        self.cached == *other
    }
}

impl PartialOrd for AliasedValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AliasedValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cached.cmp(&other.cached)
    }
}

impl PartialOrd<i64> for AliasedValue<'_> {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        self.cached.partial_cmp(other)
    }
}
