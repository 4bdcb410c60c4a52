//! Ledger serialized behind one lock
//!
//! This module provides the `CoarseLedger`, which keeps every account in a
//! single `HashMap` guarded by a single `Mutex`. Create, get and transfer all
//! run inside that one exclusive section, so linearizability and
//! deadlock-freedom follow directly: there is only one lock to take.
//!
//! It is the simplest correct ledger and the reference the sharded ledger is
//! tested against. Throughput is bounded by the one lock.

use crate::core::id_allocator::IdAllocator;
use crate::core::traits::Ledger;
use crate::core::transfer::{self, TransferPlan};
use crate::types::{Account, AccountId, Balance, LedgerError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Ledger with a single global critical section
#[derive(Debug, Default)]
pub struct CoarseLedger {
    ids: IdAllocator,
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl CoarseLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self {
            ids: IdAllocator::new(),
            accounts: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<AccountId, Account>> {
        // Balances are written only after every check has passed, so a
        // panicking holder never leaves a half-applied transfer behind.
        self.accounts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Ledger for CoarseLedger {
    fn create(&self, balance: Balance) -> Account {
        let mut accounts = self.lock();
        let account = Account::new(self.ids.next(), balance);
        accounts.insert(account.id, account);
        account
    }

    fn get(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.lock()
            .get(&id)
            .copied()
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        let mut accounts = self.lock();
        let (source, destination) =
            transfer::resolve_pair(from, to, |id| accounts.get(&id).copied())?;

        if let TransferPlan::Move { from, to, amount } = transfer::plan(from, to, amount) {
            let (debited, credited) =
                transfer::settle(from, source.balance, to, destination.balance, amount)?;
            accounts.insert(from, Account::new(from, debited));
            accounts.insert(to, Account::new(to, credited));
        }

        Ok(())
    }

    fn accounts(&self) -> Vec<Account> {
        let mut snapshot: Vec<Account> = self.lock().values().copied().collect();
        snapshot.sort_by_key(|account| account.id);
        snapshot
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
