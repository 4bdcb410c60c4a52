//! Transfer policy shared by every ledger implementation
//!
//! Ledgers differ only in how they lock. The decisions about what a transfer
//! means live here, as pure functions over ids and balances:
//!
//! 1. [`resolve_pair`] - both accounts must exist; the source is checked first
//! 2. [`plan`] - self-transfers and non-positive amounts are no-ops
//! 3. [`settle`] - a balance equal to the amount is sufficient
//!
//! Implementations call them in that order while holding whatever locks make
//! the read-check-write sequence exclusive for the two accounts.

use crate::types::{AccountId, Balance, LedgerError};

/// What a transfer does once both accounts are known to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPlan {
    /// Nothing moves; the transfer reports success
    NoOp,

    /// Debit `from` and credit `to` by `amount` (always positive)
    Move {
        from: AccountId,
        to: AccountId,
        amount: Balance,
    },
}

/// Look up both sides of a transfer, failing on the first missing id
///
/// `from` is always looked up before `to`, so a transfer between two unknown
/// accounts reports the source.
pub fn resolve_pair<T, F>(
    from: AccountId,
    to: AccountId,
    mut lookup: F,
) -> Result<(T, T), LedgerError>
where
    F: FnMut(AccountId) -> Option<T>,
{
    let source = lookup(from).ok_or_else(|| LedgerError::account_not_found(from))?;
    let destination = lookup(to).ok_or_else(|| LedgerError::account_not_found(to))?;
    Ok((source, destination))
}

/// Classify a transfer whose accounts exist
pub fn plan(from: AccountId, to: AccountId, amount: Balance) -> TransferPlan {
    if from == to || amount <= 0 {
        TransferPlan::NoOp
    } else {
        TransferPlan::Move { from, to, amount }
    }
}

/// Compute post-transfer balances for a [`TransferPlan::Move`]
///
/// Returns the new `(from, to)` balances, or `InsufficientFunds` if the source
/// holds less than `amount`. Nothing is mutated here; callers write both
/// results back under the same critical section they read them in.
///
/// # Panics
///
/// Panics if crediting the destination would overflow `i64`. That is a broken
/// ledger invariant, not a recoverable condition, and it is detected before
/// either balance is written.
pub fn settle(
    from: AccountId,
    from_balance: Balance,
    to: AccountId,
    to_balance: Balance,
    amount: Balance,
) -> Result<(Balance, Balance), LedgerError> {
    debug_assert!(amount > 0, "settle called with non-positive amount");

    if from_balance < amount {
        return Err(LedgerError::insufficient_funds(from, amount));
    }

    let debited = from_balance - amount;
    let credited = match to_balance.checked_add(amount) {
        Some(balance) => balance,
        None => panic!(
            "balance of account {} overflows when credited with {}",
            to, amount
        ),
    };

    assert!(debited >= 0, "account {} would go negative", from);
    Ok((debited, credited))
}
