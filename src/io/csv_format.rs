//! CSV format handling for ledger commands and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger commands
//! - Account output serialization
//!
//! # Input format
//!
//! ```text
//! type,account,to,amount
//! create,,,200
//! get,1,,
//! transfer,1,2,200
//! ```
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Account, AccountId, Balance, LedgerCommand};
use csv::WriterBuilder;
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, account, to, amount.
/// Which fields are required depends on the command type.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub command_type: String,
    pub account: Option<AccountId>,
    pub to: Option<AccountId>,
    pub amount: Option<Balance>,
}

/// Convert a CsvRecord to a LedgerCommand
///
/// - `create` requires `amount` (the initial balance)
/// - `get` requires `account`
/// - `transfer` requires `account` (source), `to` and `amount`
///
/// Fields a command does not use are ignored.
///
/// # Returns
///
/// * `Ok(LedgerCommand)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, String> {
    let command_type = csv_record.command_type.to_lowercase();

    let missing = |field: &str| format!("{} command requires '{}'", command_type, field);

    match command_type.as_str() {
        "create" => Ok(LedgerCommand::Create {
            balance: csv_record.amount.ok_or_else(|| missing("amount"))?,
        }),
        "get" => Ok(LedgerCommand::Get {
            id: csv_record.account.ok_or_else(|| missing("account"))?,
        }),
        "transfer" => Ok(LedgerCommand::Transfer {
            from: csv_record.account.ok_or_else(|| missing("account"))?,
            to: csv_record.to.ok_or_else(|| missing("to"))?,
            amount: csv_record.amount.ok_or_else(|| missing("amount"))?,
        }),
        _ => Err(format!(
            "Invalid command type: '{}'",
            csv_record.command_type
        )),
    }
}

/// Write account states to CSV format
///
/// Writes accounts in CSV format with columns: id, balance.
/// Accounts are sorted by id for deterministic output. The header is written
/// even when there are no accounts.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);

    writer
        .write_record(["id", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in &sorted_accounts {
        writer
            .serialize(account)
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
