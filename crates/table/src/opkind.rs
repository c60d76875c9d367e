//! The fixed instruction set understood by the interpreter.

use crate::error::LoadError;

/// Identifies the arithmetic or comparison applied by an instruction.
///
/// The `#[repr(u8)]` discriminant is the byte stored in an opcode
/// entry's payload.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// `dest = lhs + src`
    Add = 0x01,
    /// `dest = lhs - src`
    Subtract = 0x02,
    /// `dest = lhs * src`
    Multiply = 0x03,
    /// `dest = lhs / src`. A zero divisor is a runtime error.
    Divide = 0x04,
    /// `dest = 1` if `lhs < src`, else `0`.
    LessThan = 0x05,
}

/// All opcodes, in definition order.
pub const ALL_OP_KINDS: [OpKind; 5] = [
    OpKind::Add,
    OpKind::Subtract,
    OpKind::Multiply,
    OpKind::Divide,
    OpKind::LessThan,
];

impl TryFrom<u8> for OpKind {
    type Error = LoadError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(OpKind::Add),
            0x02 => Ok(OpKind::Subtract),
            0x03 => Ok(OpKind::Multiply),
            0x04 => Ok(OpKind::Divide),
            0x05 => Ok(OpKind::LessThan),
            other => Err(LoadError::InvalidOpcode(other)),
        }
    }
}

impl OpKind {
    /// The mnemonic used in disassembly output.
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpKind::Add => "ADD",
            OpKind::Subtract => "SUBTRACT",
            OpKind::Multiply => "MULTIPLY",
            OpKind::Divide => "DIVIDE",
            OpKind::LessThan => "LESS_THAN",
        }
    }
}
