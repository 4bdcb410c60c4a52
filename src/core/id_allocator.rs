//! Account identifier allocation
//!
//! Issues strictly increasing positive ids from a single atomic counter.
//! The counter is independent of how many accounts are stored, so ids are
//! never reused.

use crate::types::AccountId;
use std::sync::atomic::{AtomicI64, Ordering};

/// Lock-free source of new account ids
///
/// Every call to [`IdAllocator::next`] advances the counter exactly once with
/// a single `fetch_add`, so concurrent callers never observe the same value
/// and no value is skipped.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last_issued: AtomicI64,
}

impl IdAllocator {
    /// Create an allocator whose first id is 1
    pub fn new() -> Self {
        Self {
            last_issued: AtomicI64::new(0),
        }
    }

    /// Issue the next id
    pub fn next(&self) -> AccountId {
        self.last_issued.fetch_add(1, Ordering::Relaxed) + 1
    }
}
