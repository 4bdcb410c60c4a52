//! Fine-grained concurrent implementations of core components
//!
//! This module provides the per-account-locked ledger and the batch processor
//! that drives it from many tokio tasks at once.
//!
//! # Architecture
//!
//! - **ShardedLedger**: Account storage in a `DashMap`, one lock per account
//! - **BatchProcessor**: Splits a batch into account-disjoint groups and runs
//!   them concurrently
//!
//! # Thread Safety
//!
//! - Operations on different accounts proceed in parallel
//! - Operations on the same account are serialized by that account's lock
//! - Multi-account locks are always taken in ascending id order

pub mod batch_processor;
pub mod ledger;

pub use batch_processor::{BatchProcessor, ProcessingResult, Segment};
pub use ledger::ShardedLedger;
