//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - The `Ledger` trait shared by every implementation
//! - `id_allocator` - Atomic account id source
//! - `transfer` - Transfer policy (existence order, no-ops, sufficiency)
//! - `coarse_ledger` - Ledger behind a single lock
//! - `sharded` - Per-account-locked ledger and the concurrent batch processor
//! - `engine` - Command execution and logging

pub mod coarse_ledger;
pub mod engine;
pub mod id_allocator;
pub mod sharded;
pub mod traits;
pub mod transfer;

pub use coarse_ledger::CoarseLedger;
pub use engine::CommandEngine;
pub use id_allocator::IdAllocator;
pub use sharded::{BatchProcessor, ShardedLedger};
pub use traits::Ledger;

use crate::cli::LedgerKind;
use std::sync::Arc;

/// Create an empty ledger of the requested kind
pub fn create_ledger(kind: LedgerKind) -> Arc<dyn Ledger> {
    match kind {
        LedgerKind::Coarse => Arc::new(CoarseLedger::new()),
        LedgerKind::Sharded => Arc::new(ShardedLedger::new()),
    }
}
