//! Command execution engine
//!
//! This module provides the `CommandEngine`, which applies `LedgerCommand`s to
//! a shared ledger and logs the outcome of each one. It holds no state of its
//! own besides the ledger handle, so it is cheap to clone into worker tasks.

use crate::core::traits::Ledger;
use crate::types::error::SUCCESS_CODE;
use crate::types::{Account, CommandOutcome, LedgerCommand, LedgerError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes ledger commands against a shared ledger
#[derive(Debug, Clone)]
pub struct CommandEngine {
    ledger: Arc<dyn Ledger>,
}

impl CommandEngine {
    /// Create an engine over `ledger`
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// Execute a single command
    ///
    /// Domain errors are logged at `warn` and returned; they never abort
    /// processing of later commands.
    pub fn execute(&self, command: LedgerCommand) -> Result<CommandOutcome, LedgerError> {
        let result = match command {
            LedgerCommand::Create { balance } => {
                Ok(CommandOutcome::Created(self.ledger.create(balance)))
            }
            LedgerCommand::Get { id } => self.ledger.get(id).map(CommandOutcome::Fetched),
            LedgerCommand::Transfer { from, to, amount } => self
                .ledger
                .transfer(from, to, amount)
                .map(|()| CommandOutcome::Transferred),
        };

        match &result {
            Ok(outcome) => debug!(
                command = command.name(),
                code = SUCCESS_CODE,
                ?outcome,
                "command applied"
            ),
            Err(error) => warn!(
                command = command.name(),
                code = error.code(),
                account = error.account_id(),
                %error,
                "command rejected"
            ),
        }

        result
    }

    /// Snapshot of every account, sorted by id
    pub fn accounts(&self) -> Vec<Account> {
        self.ledger.accounts()
    }
}
