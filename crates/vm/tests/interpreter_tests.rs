//! Integration tests for the opaque interpreter.
//!
//! Organized by component: loading, overlay, instructions, predicates,
//! then the self-test scenario.

use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use opaque_table::{Alias, LoadError, OpKind, Table, TableBuilder};
use opaque_vm::{
    selftest, AliasedValue, ArithmeticError, CallOutcome, Channel, InterpError, InterpreterState,
    LoadStatus, PredicateDispatcher, TableSource,
};
use proptest::prelude::*;

// ============================================================
// Helper functions
// ============================================================

const Z: Alias = Alias(100);
const O: Alias = Alias(101);
const D: Alias = Alias(102);
const S: Alias = Alias(103);
const ID: Alias = Alias(104);
const ADD: Alias = Alias(200);
const SUB: Alias = Alias(201);
const MUL: Alias = Alias(202);
const DIV: Alias = Alias(203);
const LT: Alias = Alias(204);
const STAGE: Alias = Alias(300);
const MISSING: Alias = Alias(301);

fn table() -> Table {
    TableBuilder::new()
        .int(Z, 0)
        .int(O, 1)
        .int(D, 0)
        .int(S, 9)
        .string(ID, "unset")
        .opcode(ADD, OpKind::Add)
        .opcode(SUB, OpKind::Subtract)
        .opcode(MUL, OpKind::Multiply)
        .opcode(DIV, OpKind::Divide)
        .opcode(LT, OpKind::LessThan)
        .callback(STAGE, "stage_identity")
        .callback(MISSING, "never_registered")
        .build()
        .unwrap()
}

fn state() -> InterpreterState {
    InterpreterState::with_source(table())
}

fn call(state: &InterpreterState, op: Alias, dest: Alias, src: Alias) -> CallOutcome {
    state.call(op, None, dest, src, Channel::DestOnly).unwrap()
}

/// Table source that counts how often it is asked for bytes.
struct Counting {
    blob: Vec<u8>,
    fetches: Arc<AtomicUsize>,
}

impl TableSource for Counting {
    fn fetch(&self) -> Result<Cow<'_, [u8]>, LoadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Cow::Borrowed(self.blob.as_slice()))
    }
}

struct Unavailable;

impl TableSource for Unavailable {
    fn fetch(&self) -> Result<Cow<'_, [u8]>, LoadError> {
        Err(LoadError::Unavailable("no blob linked".into()))
    }
}

// ============================================================
// Loading
// ============================================================

#[test]
fn load_happens_once_across_many_calls() {
    let fetches = Arc::new(AtomicUsize::new(0));
    let state = InterpreterState::with_source(Counting {
        blob: table().encode(),
        fetches: Arc::clone(&fetches),
    });

    let first = state.ensure_loaded().unwrap() as *const Table;
    for _ in 0..50 {
        assert!(std::ptr::eq(first, state.ensure_loaded().unwrap()));
    }
    call(&state, ADD, D, O);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn static_blob_source() {
    let blob: &'static [u8] = Box::leak(table().encode().into_boxed_slice());
    let state = InterpreterState::with_source(blob);
    assert_eq!(state.get_int(S), Ok(9));
}

#[test]
fn unavailable_source_fails_every_operation() {
    let state = InterpreterState::with_source(Unavailable);
    let err = InterpError::Load(LoadError::Unavailable("no blob linked".into()));

    assert_eq!(state.get_int(Z), Err(err.clone()));
    assert_eq!(state.get_string(ID), Err(err.clone()));
    assert_eq!(state.set_value(ID, "x"), Err(err.clone()));
    assert_eq!(state.copy(D, Z), Err(err.clone()));
    assert_eq!(
        state.call(ADD, None, D, O, Channel::DestOnly),
        Err(err.clone())
    );
    assert_eq!(state.if_predicate(STAGE, &mut ()), Err(err));
    assert_eq!(state.status(), LoadStatus::Failed);
}

#[test]
fn malformed_blob_fails() {
    let mut blob = table().encode();
    blob.truncate(blob.len() - 1);
    let state = InterpreterState::with_source(blob);
    assert!(matches!(
        state.ensure_loaded(),
        Err(InterpError::Load(LoadError::Truncated { .. }))
    ));
}

// ============================================================
// Overlay
// ============================================================

#[test]
fn set_value_then_get_string() {
    let state = state();
    state.set_value(ID, "x").unwrap();
    assert_eq!(state.get_string(ID), Ok("x".to_string()));
}

#[test]
fn set_int_stages_integer() {
    let state = state();
    state.set_int(D, -42).unwrap();
    assert_eq!(state.get_int(D), Ok(-42));
}

#[test]
fn overlay_does_not_touch_table() {
    let state = state();
    state.set_value(ID, "x").unwrap();
    assert_eq!(
        state.ensure_loaded().unwrap().lookup(ID),
        Ok(&opaque_table::Entry::StringConstant("unset".into()))
    );
}

#[test]
fn copy_twice_is_stable() {
    let state = state();
    state.copy(D, S).unwrap();
    state.copy(D, S).unwrap();
    assert_eq!(state.get_int(D), Ok(9));
}

// ============================================================
// Instructions
// ============================================================

#[test]
fn each_opcode() {
    let state = state();
    state.set_int(D, 20).unwrap();
    assert_eq!(call(&state, ADD, D, S).updated_dest, 29);
    assert_eq!(call(&state, SUB, D, O).updated_dest, 28);
    assert_eq!(call(&state, MUL, D, S).updated_dest, 252);
    assert_eq!(call(&state, DIV, D, S).updated_dest, 28);
    assert_eq!(call(&state, LT, D, S).updated_dest, 0);
    assert_eq!(call(&state, LT, D, S).updated_dest, 1);
}

#[test]
fn divide_by_zero_keeps_dest() {
    let state = state();
    state.set_int(D, 17).unwrap();
    assert_eq!(
        state.call(DIV, None, D, Z, Channel::DestOnly),
        Err(InterpError::Arithmetic(ArithmeticError::DivideByZero))
    );
    assert_eq!(state.get_int(D), Ok(17));
}

#[test]
fn less_than_dual_channel() {
    let state = state();
    let out = state.call(LT, Some(O), D, S, Channel::DestAndAux).unwrap();
    assert_eq!(out.updated_dest, 1);
    assert_eq!(out.aux_output, Some(1));

    let out = state.call(LT, Some(S), D, O, Channel::DestAndAux).unwrap();
    assert_eq!(out.updated_dest, 0);
    assert_eq!(out.aux_output, Some(0));
}

#[test]
fn string_operand_is_type_mismatch() {
    let state = state();
    assert!(matches!(
        state.call(ADD, None, ID, O, Channel::DestOnly),
        Err(InterpError::TypeMismatch { alias: ID, .. })
    ));
}

proptest! {
    /// `copy(D, Z)` then `n` additions of `O` leaves `n` in `D`.
    #[test]
    fn n_additions_yield_n(n in 0usize..200) {
        let state = state();
        state.copy(D, Z).unwrap();
        for _ in 0..n {
            call(&state, ADD, D, O);
        }
        prop_assert_eq!(state.get_int(D), Ok(n as i64));
    }

    /// Instructions agree with native wrapping arithmetic.
    #[test]
    fn instructions_match_native(a in any::<i64>(), b in any::<i64>()) {
        let state = state();
        for (op, expected) in [
            (ADD, a.wrapping_add(b)),
            (SUB, a.wrapping_sub(b)),
            (MUL, a.wrapping_mul(b)),
            (LT, (a < b) as i64),
        ] {
            state.set_int(D, a).unwrap();
            state.set_int(S, b).unwrap();
            prop_assert_eq!(call(&state, op, D, S).updated_dest, expected);
        }
    }
}

// ============================================================
// Predicates
// ============================================================

struct Identity {
    host_id: String,
    calls: u32,
}

fn staging_predicates() -> PredicateDispatcher {
    let mut predicates = PredicateDispatcher::new();
    predicates
        .register(STAGE, |state, ctx| {
            let Some(identity) = ctx.downcast_mut::<Identity>() else {
                return 0;
            };
            identity.calls += 1;
            match state.set_value(ID, identity.host_id.clone()) {
                Ok(()) => 1,
                Err(_) => 0,
            }
        })
        .unwrap();
    predicates
}

#[test]
fn predicate_stages_value() {
    let state = InterpreterState::new(table(), staging_predicates());
    let mut ctx = Identity {
        host_id: "host-7".into(),
        calls: 0,
    };
    assert_eq!(state.if_predicate(STAGE, &mut ctx), Ok(1));
    assert_eq!(ctx.calls, 1);
    assert_eq!(state.get_string(ID).as_deref(), Ok("host-7"));
}

#[test]
fn predicate_result_is_data() {
    let state = InterpreterState::new(table(), staging_predicates());
    let verdict = state.if_predicate(STAGE, &mut ()).unwrap();
    state.set_int(D, i64::from(verdict)).unwrap();
    let flag = state.call(LT, Some(Z), D, D, Channel::DestOnly).unwrap();
    assert_eq!(flag.updated_dest, 0);
}

#[test]
fn unregistered_predicate_leaves_overlay_untouched() {
    let state = InterpreterState::new(table(), staging_predicates());
    state.set_int(D, 5).unwrap();
    assert_eq!(
        state.if_predicate(MISSING, &mut ()),
        Err(InterpError::UnknownPredicate(MISSING))
    );
    assert_eq!(
        state.predicates().call(MISSING, &state, &mut ()),
        Err(InterpError::UnknownPredicate(MISSING))
    );
    assert_eq!(state.overlay_len(), 1);
    assert_eq!(state.get_int(D), Ok(5));
}

#[test]
fn duplicate_callback_is_rejected() {
    let mut predicates = staging_predicates();
    assert_eq!(
        predicates.register(STAGE, |_, _| 0),
        Err(InterpError::DuplicateCallback(STAGE))
    );
}

// ============================================================
// Self-test scenario
// ============================================================

#[test]
fn selftest_reaches_144() {
    let state = InterpreterState::with_source(selftest::table());
    assert_eq!(selftest::run(&state), Ok(144));
    assert_eq!(selftest::EXPECTED, 144);
}

#[test]
fn selftest_from_encoded_blob() {
    let state = InterpreterState::with_source(selftest::table().encode());
    let status = selftest::run(&state).unwrap();
    let cached = AliasedValue::new(&state, selftest::STATUS).unwrap();
    assert_eq!(cached.as_int(), status);
}

#[test]
fn concurrent_calls_do_not_lose_updates() {
    const THREADS: usize = 8;
    const CALLS: usize = 2_000;

    let state = state();
    state.copy(D, Z).unwrap();
    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..CALLS {
                    call(&state, ADD, D, O);
                }
            });
        }
    });
    assert_eq!(state.get_int(D), Ok((THREADS * CALLS) as i64));
}

#[test]
fn concurrent_copies_and_calls_stay_consistent() {
    let state = state();
    state.copy(D, Z).unwrap();
    std::thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..1_000 {
                call(&state, ADD, D, O);
            }
        });
        s.spawn(|| {
            for _ in 0..1_000 {
                state.copy(ID, D).unwrap();
            }
        });
    });
    assert_eq!(state.get_int(D), Ok(1_000));
}
