//! Account-related types for the ledger
//!
//! This module defines the Account snapshot handed to callers and the
//! identifier and balance aliases used throughout the crate.

use serde::Serialize;

/// Account identifier
///
/// Assigned once by the identifier allocator; always positive.
pub type AccountId = i64;

/// Balance in integer minor currency units
pub type Balance = i64;

/// Snapshot of an account's state
///
/// The ledger owns the live record. Callers only ever receive copies of this
/// type, so nothing outside the transfer engine can write a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Unique, immutable identifier
    pub id: AccountId,

    /// Current balance in minor units
    pub balance: Balance,
}

impl Account {
    /// Create an account snapshot
    ///
    /// # Arguments
    ///
    /// * `id` - The identifier issued by the allocator
    /// * `balance` - The balance at the time of the snapshot
    pub fn new(id: AccountId, balance: Balance) -> Self {
        Account { id, balance }
    }
}
