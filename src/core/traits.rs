//! Core trait for ledger implementations
//!
//! This module defines the trait abstraction that allows the coarse-grained and
//! the per-account-locked ledgers to be used interchangeably by the command
//! engine, the processing strategies and the tests.

use crate::types::{Account, AccountId, Balance, LedgerError};

/// Trait for an in-memory, thread-safe ledger
///
/// Every method except [`Ledger::reset`] takes `&self` and may be called from
/// any number of threads at once. Each call is a single atomic unit: it is
/// linearizable with respect to every other call touching the same accounts.
pub trait Ledger: Send + Sync + std::fmt::Debug {
    /// Open an account with `balance` and return its snapshot
    ///
    /// Always succeeds; the id comes from the ledger's allocator.
    fn create(&self, balance: Balance) -> Account;

    /// Snapshot of an account's current state
    fn get(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Move `amount` from `from` to `to`
    ///
    /// See [`crate::core::transfer`] for the edge-case policy.
    fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Balance,
    ) -> Result<(), LedgerError>;

    /// Snapshot of every account, sorted by id
    fn accounts(&self) -> Vec<Account>;

    /// Number of accounts in the ledger
    fn len(&self) -> usize;

    /// Drop every account and restart id allocation at 1
    ///
    /// Requires exclusive access, so no other operation can be in flight.
    fn reset(&mut self);

    /// Whether the ledger holds no accounts
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of every balance, widened so it cannot overflow
    fn total_balance(&self) -> i128 {
        self.accounts()
            .iter()
            .map(|account| i128::from(account.balance))
            .sum()
    }
}
