//! Error types for the ledger
//!
//! The ledger has exactly two recoverable domain failures. They are ordinary
//! return values, never panics, and callers translate them into their own
//! response codes with [`LedgerError::code`].
//!
//! Malformed input never reaches the ledger: the I/O layer rejects it and
//! reports it separately, so there is no "internal" or "parse" variant here.

use super::account::{AccountId, Balance};
use thiserror::Error;

/// Code reported to clients when an operation succeeds
pub const SUCCESS_CODE: i32 = 0;

/// Code reported to clients for [`LedgerError::AccountNotFound`]
pub const ACCOUNT_NOT_FOUND_CODE: i32 = 1;

/// Code reported to clients for [`LedgerError::InsufficientFunds`]
pub const INSUFFICIENT_FUNDS_CODE: i32 = 2;

/// Domain error returned by ledger operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// No account with this id was ever created
    ///
    /// For transfers this names the first missing id, checking the source
    /// before the destination.
    #[error("Account {id} does not exist")]
    AccountNotFound {
        /// The missing account id
        id: AccountId,
    },

    /// The source balance is smaller than the requested amount
    ///
    /// Both balances are left unchanged.
    #[error("Account {id} has insufficient funds for a transfer of {amount}")]
    InsufficientFunds {
        /// The source account id
        id: AccountId,
        /// Requested transfer amount
        amount: Balance,
    },
}

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(id: AccountId) -> Self {
        LedgerError::AccountNotFound { id }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(id: AccountId, amount: Balance) -> Self {
        LedgerError::InsufficientFunds { id, amount }
    }

    /// Stable numeric code for this error kind
    pub fn code(&self) -> i32 {
        match self {
            LedgerError::AccountNotFound { .. } => ACCOUNT_NOT_FOUND_CODE,
            LedgerError::InsufficientFunds { .. } => INSUFFICIENT_FUNDS_CODE,
        }
    }

    /// The account id the error is about
    pub fn account_id(&self) -> AccountId {
        match *self {
            LedgerError::AccountNotFound { id } => id,
            LedgerError::InsufficientFunds { id, .. } => id,
        }
    }
}
