//! Ledger command types
//!
//! The three ledger operations expressed as data, so that they can be read
//! from an input file, batched, partitioned and replayed.

use super::account::{Account, AccountId, Balance};

/// Operations supported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerCommand {
    /// Open a new account with the given initial balance
    ///
    /// Creation performs no validation: zero and negative balances are accepted.
    Create { balance: Balance },

    /// Read the current state of an account
    Get { id: AccountId },

    /// Move `amount` from one account to another
    ///
    /// Both accounts must exist. Non-positive amounts and self-transfers are
    /// accepted as no-ops once existence has been confirmed.
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Balance,
    },
}

impl LedgerCommand {
    /// Short lowercase name of the operation, as it appears in input files
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::Create { .. } => "create",
            LedgerCommand::Get { .. } => "get",
            LedgerCommand::Transfer { .. } => "transfer",
        }
    }

    /// Account ids read or written by this command
    ///
    /// `Create` touches no existing account. A self-transfer reports its
    /// account once.
    pub fn touched_accounts(&self) -> Vec<AccountId> {
        match *self {
            LedgerCommand::Create { .. } => Vec::new(),
            LedgerCommand::Get { id } => vec![id],
            LedgerCommand::Transfer { from, to, .. } if from == to => vec![from],
            LedgerCommand::Transfer { from, to, .. } => vec![from, to],
        }
    }
}

/// Successful result of executing a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// A new account was opened
    Created(Account),

    /// The requested account was read
    Fetched(Account),

    /// The transfer was applied (or was a no-op)
    Transferred,
}
