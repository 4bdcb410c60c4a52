//! Ledger Engine CLI
//!
//! Command-line interface for replaying ledger commands from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --strategy sync --ledger coarse commands.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv > balances.csv
//! RUST_LOG=debug cargo run -- --log-format json commands.csv > balances.csv
//! ```
//!
//! The program reads `create`, `get` and `transfer` commands from the input
//! CSV file, executes them against a fresh in-memory ledger and prints the
//! final account balances to stdout. Logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, output not writable)

use rust_ledger_engine::cli;
use rust_ledger_engine::logging;
use rust_ledger_engine::strategy;
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();

    logging::init(args.log_format);

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), args.ledger, config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        error!(error = %e, "replay failed");
        process::exit(1);
    }
}
