//! CLI command implementations.

use std::fs;
use std::path::Path;

use opaque_table::Table;
use opaque_vm::{selftest, InterpreterState};
use tracing::debug;

/// Print every entry of a table blob, followed by its fingerprint.
pub fn disassemble(input: &Path) -> Result<(), i32> {
    let table = read_table(input)?;
    print!("{}", opaque_table::disassemble(&table));
    println!("; fingerprint {}", table.fingerprint());
    Ok(())
}

/// Load a table blob and report its size and fingerprint.
pub fn check(input: &Path) -> Result<(), i32> {
    let table = read_table(input)?;
    println!(
        "OK: {} ({} entries, {})",
        input.display(),
        table.len(),
        table.fingerprint()
    );
    Ok(())
}

/// Run the self-test scenario, optionally writing out its table first.
pub fn selftest(table: Option<&Path>, emit: Option<&Path>) -> Result<(), i32> {
    if let Some(output) = emit {
        let bytes = selftest::table().encode();
        fs::write(output, &bytes).map_err(|e| {
            eprintln!("error: cannot write '{}': {e}", output.display());
            1
        })?;
        eprintln!("wrote self-test table ({} bytes) -> {}", bytes.len(), output.display());
    }

    let state = match table {
        Some(input) => InterpreterState::with_source(read_bytes(input)?),
        None => InterpreterState::with_source(selftest::table()),
    };

    // Load up front so a bad blob reports as an input error, not a runtime one.
    let loaded = state.ensure_loaded().map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    debug!(fingerprint = %loaded.fingerprint(), "self-test table ready");

    match selftest::run(&state) {
        Ok(value) if value == selftest::EXPECTED => {
            println!("selftest: {value}");
            Ok(())
        }
        Ok(value) => {
            eprintln!("selftest mismatch: got {value}, expected {}", selftest::EXPECTED);
            Err(3)
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

fn read_bytes(input: &Path) -> Result<Vec<u8>, i32> {
    fs::read(input).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", input.display());
        1
    })
}

fn read_table(input: &Path) -> Result<Table, i32> {
    let bytes = read_bytes(input)?;
    Table::load(&bytes).map_err(|e| {
        eprintln!("error: {e}");
        1
    })
}
