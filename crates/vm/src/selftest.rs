//! Regression scenario for the interpreter.
//!
//! The result depends on the exact instruction sequence below, not only on
//! its arithmetic value. Do not reorder or fold steps.

use opaque_table::{Alias, OpKind, Table, TableBuilder};

use crate::dispatch::Channel;
use crate::error::InterpError;
use crate::state::InterpreterState;
use crate::value::AliasedValue;

/// The value [`run`] must produce.
pub const EXPECTED: i64 = 144;

pub const ZERO: Alias = Alias(0x0000_0010);
pub const ONE: Alias = Alias(0x0000_0011);
pub const STATUS: Alias = Alias(0x0000_0020);
pub const FACTOR: Alias = Alias(0x0000_0021);
pub const FLAG: Alias = Alias(0x0000_0022);
pub const ADD: Alias = Alias(0x0000_0030);
pub const SUBTRACT: Alias = Alias(0x0000_0031);
pub const MULTIPLY: Alias = Alias(0x0000_0032);
pub const DIVIDE: Alias = Alias(0x0000_0033);
pub const LESS_THAN: Alias = Alias(0x0000_0034);

/// The declarative table the scenario runs against.
pub fn table() -> Table {
    TableBuilder::new()
        .int(ZERO, 0)
        .int(ONE, 1)
        .int(STATUS, -1)
        .int(FACTOR, -1)
        .int(FLAG, -1)
        .opcode(ADD, OpKind::Add)
        .opcode(SUBTRACT, OpKind::Subtract)
        .opcode(MULTIPLY, OpKind::Multiply)
        .opcode(DIVIDE, OpKind::Divide)
        .opcode(LESS_THAN, OpKind::LessThan)
        .build()
        .expect("self-test aliases are distinct")
}

/// Run the scenario against `state` and return the final status.
pub fn run(state: &InterpreterState) -> Result<i64, InterpError> {
    let mut status = AliasedValue::new(state, STATUS)?;
    status.copy_from(ZERO)?;

    for _ in 0..15 {
        status.call(ADD, None, ONE, Channel::DestOnly)?;
    }
    for _ in 0..3 {
        status.call(SUBTRACT, None, ONE, Channel::DestOnly)?;
    }

    let mut factor = AliasedValue::new(state, FACTOR)?;
    factor.copy_from(ZERO)?;
    for _ in 0..3 {
        factor.call(ADD, None, ONE, Channel::DestOnly)?;
    }
    status.call(MULTIPLY, None, FACTOR, Channel::DestOnly)?;

    factor.call(ADD, None, ONE, Channel::DestOnly)?;
    status.call(MULTIPLY, None, FACTOR, Channel::DestOnly)?;
    status.call(MULTIPLY, None, FACTOR, Channel::DestOnly)?;
    status.call(DIVIDE, None, FACTOR, Channel::DestOnly)?;

    let mut flag = AliasedValue::new(state, FLAG)?;
    flag.call(LESS_THAN, Some(ZERO), STATUS, Channel::DestAndAux)?;
    status.call(MULTIPLY, None, FLAG, Channel::DestOnly)?;

    Ok(status.as_int())
}
