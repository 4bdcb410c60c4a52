//! Synchronous processing strategy
//!
//! This module provides a sequential implementation of the ProcessingStrategy
//! trait. It orchestrates replay by coordinating between the SyncReader (for
//! CSV input) and the CommandEngine (for ledger operations).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Command execution to `CommandEngine`
//! - CSV output to `csv_format::write_accounts_csv` (format handling)
//!
//! Commands are executed one at a time in file order, which makes this
//! strategy the reference output for the async strategy.

use crate::cli::LedgerKind;
use crate::core::{create_ledger, CommandEngine};
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_ledger_engine::cli::LedgerKind;
/// use rust_ledger_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(LedgerKind::Sharded);
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy {
    ledger: LedgerKind,
}

impl SyncProcessingStrategy {
    /// Create a strategy that replays against a fresh ledger of `ledger` kind
    pub fn new(ledger: LedgerKind) -> Self {
        Self { ledger }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Replay commands from input file and write results to output
    ///
    /// 1. Creates a fresh ledger and a CommandEngine over it
    /// 2. Streams commands from the CSV file with a SyncReader
    /// 3. Executes each command; rejected commands are logged by the engine
    /// 4. Writes the final account states with csv_format::write_accounts_csv
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let engine = CommandEngine::new(create_ledger(self.ledger));

        let reader = SyncReader::new(input_path)?;

        let mut executed = 0usize;
        let mut rejected = 0usize;
        for result in reader {
            match result {
                Ok(command) => {
                    executed += 1;
                    if engine.execute(command).is_err() {
                        rejected += 1;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "skipping invalid record");
                }
            }
        }

        info!(executed, rejected, ledger = ?self.ledger, "sync replay finished");

        write_accounts_csv(&engine.accounts(), output)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[rstest]
    fn test_sync_strategy_end_to_end(
        #[values(LedgerKind::Coarse, LedgerKind::Sharded)] ledger: LedgerKind,
    ) {
        let csv_content = "type,account,to,amount\n\
                          create,,,200\n\
                          create,,,300\n\
                          transfer,1,2,200\n\
                          get,1,,\n";
        let file = create_temp_csv(csv_content);

        let strategy = SyncProcessingStrategy::new(ledger);
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, "id,balance\n1,0\n2,500\n");
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let strategy = SyncProcessingStrategy::new(LedgerKind::Sharded);
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_strategy_continues_after_rejections() {
        let csv_content = "type,account,to,amount\n\
                          create,,,200\n\
                          create,,,300\n\
                          transfer,1,2,500\n\
                          transfer,99,2,10\n\
                          transfer,1,2,abc\n\
                          transfer,2,1,100\n";
        let file = create_temp_csv(csv_content);

        let strategy = SyncProcessingStrategy::new(LedgerKind::Coarse);
        let mut output = Vec::new();

        assert!(strategy.process(file.path(), &mut output).is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, "id,balance\n1,300\n2,200\n");
    }

    #[test]
    fn test_sync_strategy_starts_fresh_each_run() {
        let file = create_temp_csv("type,account,to,amount\ncreate,,,5\n");
        let strategy = SyncProcessingStrategy::new(LedgerKind::Sharded);

        let mut first = Vec::new();
        let mut second = Vec::new();
        strategy.process(file.path(), &mut first).unwrap();
        strategy.process(file.path(), &mut second).unwrap();

        assert_eq!(first, second);
        assert_eq!(String::from_utf8(second).unwrap(), "id,balance\n1,5\n");
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
