//! Instruction semantics for the fixed opcode set.

use opaque_table::OpKind;

use crate::error::ArithmeticError;

/// Which outputs an instruction reports back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    /// Only the destination alias is updated.
    #[default]
    DestOnly,
    /// The result is also returned in [`CallOutcome::aux_output`].
    DestAndAux,
}

/// Result of one `call`: the new destination value, and the same result
/// again on the auxiliary channel when it was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOutcome {
    pub updated_dest: i64,
    pub aux_output: Option<i64>,
}

impl CallOutcome {
    pub(crate) fn new(result: i64, channel: Channel) -> Self {
        Self {
            updated_dest: result,
            aux_output: match channel {
                Channel::DestOnly => None,
                Channel::DestAndAux => Some(result),
            },
        }
    }
}

/// Apply `op` to `(lhs, rhs)`.
///
/// Arithmetic wraps on overflow, matching native two's-complement
/// behavior. `LessThan` yields 1 or 0.
pub fn execute(op: OpKind, lhs: i64, rhs: i64) -> Result<i64, ArithmeticError> {
    let result = match op {
        OpKind::Add => lhs.wrapping_add(rhs),
        OpKind::Subtract => lhs.wrapping_sub(rhs),
        OpKind::Multiply => lhs.wrapping_mul(rhs),
        OpKind::Divide => {
            if rhs == 0 {
                return Err(ArithmeticError::DivideByZero);
            }
            lhs.wrapping_div(rhs)
        }
        OpKind::LessThan => i64::from(lhs < rhs),
    };
    Ok(result)
}
