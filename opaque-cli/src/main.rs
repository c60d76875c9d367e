//! Opaque CLI. Inspect declarative tables and run the interpreter self-test.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, input, or table load error
//! - 3: Interpreter runtime error or self-test mismatch

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "opaque",
    version,
    about = "Inspect declarative tables and run the interpreter self-test"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every entry of a table blob
    Disassemble {
        /// Table blob to read
        table: PathBuf,
    },
    /// Load a table blob and report its size and fingerprint
    Check {
        /// Table blob to read
        table: PathBuf,
    },
    /// Run the regression scenario
    Selftest {
        /// Run against this table blob instead of the built-in one
        #[arg(long)]
        table: Option<PathBuf>,
        /// Write the built-in self-test table blob to this path first
        #[arg(long)]
        emit: Option<PathBuf>,
    },
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_tracing();

    let result = match cli.command {
        Command::Disassemble { table } => commands::disassemble(&table),
        Command::Check { table } => commands::check(&table),
        Command::Selftest { table, emit } => {
            commands::selftest(table.as_deref(), emit.as_deref())
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}
