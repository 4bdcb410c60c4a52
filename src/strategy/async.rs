//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. It replays commands in batches, running
//! account-disjoint groups of each batch concurrently.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (create runs + account-disjoint groups)
//!     └── CommandEngine
//!         └── Arc<dyn Ledger> (coarse or sharded)
//! ```
//!
//! # Ordering
//!
//! - Batches are processed one after another
//! - Within a batch, creates keep file order and groups that touch common
//!   accounts keep file order, so the output matches the sync strategy

use crate::cli::LedgerKind;
use crate::core::{create_ledger, BatchProcessor, CommandEngine};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::ProcessingStrategy;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Number of runtime worker threads executing groups concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values are replaced by the defaults.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    ledger: LedgerKind,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `config` - BatchConfig with batch_size and max_concurrent_batches
    /// * `ledger` - Ledger implementation each run replays against
    pub fn new(config: BatchConfig, ledger: LedgerKind) -> Self {
        Self { config, ledger }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Replay commands from input file and write results to output
    ///
    /// 1. Creates a fresh ledger, CommandEngine and BatchProcessor
    /// 2. Creates a tokio multi-threaded runtime
    /// 3. Reads commands in batches with AsyncReader
    /// 4. Processes each batch to completion before reading the next one
    /// 5. Writes the final account states with csv_format::write_accounts_csv
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let engine = CommandEngine::new(create_ledger(self.ledger));
            let processor = BatchProcessor::new(engine.clone());

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);

            let mut reader = AsyncReader::new(compat_file);

            let mut batches = 0usize;
            let mut executed = 0usize;
            let mut rejected = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;

                if batch.is_empty() {
                    break;
                }

                let results = processor.process_batch(batch).await;
                batches += 1;
                executed += results.len();
                rejected += results.iter().filter(|r| r.result.is_err()).count();
            }

            info!(batches, executed, rejected, ledger = ?self.ledger, "async replay finished");

            write_accounts_csv(&engine.accounts(), output)?;

            Ok(())
        })
    }
}
