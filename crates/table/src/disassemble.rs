//! Disassembler: table → listing text.
//!
//! Output is one entry per line, sorted by alias, no blank lines:
//! ```text
//! @16 INT 0
//! @17 STR "license ok"
//! @48 OP ADD
//! @80 CALLBACK license_checkout
//! ```

use crate::entry::Entry;
use crate::table::Table;

/// Render every entry of `table` as a listing line.
pub fn disassemble(table: &Table) -> String {
    let mut out = String::new();
    for (alias, entry) in table.iter() {
        let line = match entry {
            Entry::IntConstant(v) => format!("{alias} {} {v}", entry.kind()),
            Entry::StringConstant(s) => format!("{alias} {} {s:?}", entry.kind()),
            Entry::OpCode(op) => format!("{alias} {} {}", entry.kind(), op.mnemonic()),
            Entry::CallbackRef(name) => format!("{alias} {} {name}", entry.kind()),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
