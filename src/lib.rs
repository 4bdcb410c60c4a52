//! Rust Ledger Engine Library
//! # Overview
//!
//! This library provides a concurrent, in-process ledger: it creates accounts,
//! reports balances and moves funds between accounts under concurrent access
//! from any number of threads, keeping balances non-negative and total money
//! conserved at all times.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, LedgerCommand, LedgerError)
//! - [`core`] - Ledger components:
//!   - [`core::id_allocator`] - Atomic, strictly increasing account ids
//!   - [`core::transfer`] - Transfer policy shared by every ledger
//!   - [`core::coarse_ledger`] - Ledger behind a single lock
//!   - [`core::sharded`] - Per-account locks, acquired in ascending id order
//!   - [`core::engine`] - Command execution and logging
//! - [`io`] - CSV command input and balance output
//! - [`strategy`] - Sequential and concurrent replay pipelines
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - tracing subscriber setup
//!
//! # Operations
//!
//! - **create(balance)**: Open an account; never fails
//! - **get(id)**: Snapshot of an account, or `AccountNotFound`
//! - **transfer(from, to, amount)**: Atomic debit and credit, or
//!   `AccountNotFound` / `InsufficientFunds`
//!
//! ```
//! use rust_ledger_engine::{Ledger, LedgerError, ShardedLedger};
//!
//! let ledger = ShardedLedger::new();
//! let a = ledger.create(200);
//! let b = ledger.create(300);
//!
//! ledger.transfer(a.id, b.id, 200).unwrap();
//! assert_eq!(ledger.get(a.id).unwrap().balance, 0);
//! assert_eq!(ledger.get(b.id).unwrap().balance, 500);
//! assert_eq!(ledger.transfer(a.id, b.id, 1), Err(LedgerError::insufficient_funds(a.id, 1)));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{create_ledger, CoarseLedger, CommandEngine, IdAllocator, Ledger, ShardedLedger};
pub use io::write_accounts_csv;
pub use types::{Account, AccountId, Balance, CommandOutcome, LedgerCommand, LedgerError};
