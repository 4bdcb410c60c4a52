//! Processing strategy module for command replay
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! encompassing both CSV parsing and command execution. This allows different
//! processing implementations (sequential, concurrent batches) to be selected
//! at runtime, independently of the ledger implementation they drive.

use crate::cli::{LedgerKind, StrategyType};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete replay pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Replay commands from input file and write final balances to output
    ///
    /// Every call starts from a fresh, empty ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - The worker runtime cannot be started
    /// - Output cannot be written
    ///
    /// Rejected commands and malformed rows are logged and skipped; they do
    /// not cause this method to return an error.
    ///
    /// # Panics
    ///
    /// Panics on a broken ledger invariant (a credit overflowing `i64`),
    /// before any output is written.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Create a processing strategy
///
/// # Arguments
///
/// * `strategy_type` - Sequential (`Sync`) or concurrent batches (`Async`)
/// * `ledger` - Ledger implementation each run replays against
/// * `config` - Optional batch configuration (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    ledger: LedgerKind,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(ledger)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, ledger))
        }
    }
}
