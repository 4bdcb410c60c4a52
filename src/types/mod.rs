//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account snapshot and identifier/balance aliases
//! - `command`: The ledger operations as data, and their outcomes
//! - `error`: Domain error taxonomy

pub mod account;
pub mod command;
pub mod error;

pub use account::{Account, AccountId, Balance};
pub use command::{CommandOutcome, LedgerCommand};
pub use error::LedgerError;
