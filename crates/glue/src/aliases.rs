//! The glue's alias set and the table that backs it.
//!
//! Alias values are arbitrary; only their distinctness matters.

use opaque_table::{Alias, OpKind, Table, TableBuilder};

pub const ZERO: Alias = Alias(0x3A71_0C05);
pub const ONE: Alias = Alias(0x3A71_0C19);

pub const STATUS: Alias = Alias(0x6E02_41A0);
pub const VERDICT: Alias = Alias(0x6E02_41B3);
pub const COUNT: Alias = Alias(0x6E02_41C7);
pub const DUMP_STATUS: Alias = Alias(0x6E02_41D2);

pub const ERROR_MESSAGE: Alias = Alias(0x1F90_7700);
pub const OK_MESSAGE: Alias = Alias(0x1F90_7711);
pub const MESSAGE: Alias = Alias(0x1F90_7722);
pub const IDENTITY: Alias = Alias(0x1F90_7733);
pub const FEATURE_NAME: Alias = Alias(0x1F90_7744);
pub const FEATURE_VERSION: Alias = Alias(0x1F90_7755);
pub const MESSAGE_FIELD: Alias = Alias(0x1F90_7766);
pub const IDENTITY_FIELD: Alias = Alias(0x1F90_7777);

pub const ADD: Alias = Alias(0x0B5D_E001);
pub const LESS_THAN: Alias = Alias(0x0B5D_E0F4);

pub const CHECKOUT: Alias = Alias(0x7C44_9A10);
pub const VALIDATE: Alias = Alias(0x7C44_9A2B);

/// The table the glue's operations are written against.
pub fn table() -> Table {
    TableBuilder::new()
        .int(ZERO, 0)
        .int(ONE, 1)
        .int(STATUS, 0)
        .int(VERDICT, 0)
        .int(COUNT, 0)
        .int(DUMP_STATUS, 0)
        .string(ERROR_MESSAGE, "")
        .string(OK_MESSAGE, "license ok")
        .string(MESSAGE, "")
        .string(IDENTITY, "")
        .string(FEATURE_NAME, "")
        .string(FEATURE_VERSION, "")
        .string(MESSAGE_FIELD, "message")
        .string(IDENTITY_FIELD, "identity")
        .opcode(ADD, OpKind::Add)
        .opcode(LESS_THAN, OpKind::LessThan)
        .callback(CHECKOUT, "license_checkout")
        .callback(VALIDATE, "license_validate")
        .build()
        .expect("glue aliases are distinct")
}
