//! In-memory ledger implementation
//!
//! A transactional map guarded by one lock. Suitable for a single-process
//! deployment; a distributed deployment would swap in a store with
//! conditional multi-key commit behind the same [`Ledger`] trait.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::account::{AccountId, TransferBatch};
use crate::error::LedgerError;
use crate::{Ledger, Result};
use common::Amount;

/// In-memory account store
///
/// All balances live in one map behind a `RwLock`; `commit` holds the write
/// lock for the whole validate-then-apply pass, so no caller ever observes
/// a half-applied batch.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: RwLock<HashMap<AccountId, Amount>>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a batch against a balance snapshot, returning the end state
    /// of every touched account
    fn simulate(
        balances: &HashMap<AccountId, Amount>,
        batch: &TransferBatch,
    ) -> Result<HashMap<AccountId, Amount>> {
        let mut touched: HashMap<AccountId, Amount> = HashMap::new();

        for t in batch.transfers() {
            let from_balance = *touched
                .entry(t.from.clone())
                .or_insert_with(|| balances.get(&t.from).copied().unwrap_or(0));
            let new_from = from_balance.checked_sub(t.amount).ok_or_else(|| {
                LedgerError::InsufficientFunds {
                    account: t.from.clone(),
                    required: t.amount,
                    available: from_balance,
                }
            })?;
            touched.insert(t.from.clone(), new_from);

            let to_balance = *touched
                .entry(t.to.clone())
                .or_insert_with(|| balances.get(&t.to).copied().unwrap_or(0));
            let new_to = to_balance
                .checked_add(t.amount)
                .ok_or_else(|| LedgerError::BalanceOverflow {
                    account: t.to.clone(),
                })?;
            touched.insert(t.to.clone(), new_to);
        }

        Ok(touched)
    }
}

impl Ledger for InMemoryLedger {
    fn balance(&self, account: &AccountId) -> Amount {
        self.accounts.read().get(account).copied().unwrap_or(0)
    }

    fn deposit(&self, account: &AccountId, amount: Amount) -> Result<()> {
        let mut accounts = self.accounts.write();
        let balance = accounts.entry(account.clone()).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                account: account.clone(),
            })?;
        debug!(%account, amount, balance = *balance, "Deposit credited");
        Ok(())
    }

    fn commit(&self, batch: TransferBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut accounts = self.accounts.write();
        let end_state = Self::simulate(&accounts, &batch)?;

        // Validation passed for the whole batch; apply the end state.
        for (account, balance) in end_state {
            accounts.insert(account, balance);
        }

        debug!(transfers = batch.len(), "Batch committed");
        Ok(())
    }

    fn total_supply(&self) -> Amount {
        self.accounts.read().values().sum()
    }
}

// ============================================================================
// Tests
// ============================================================================
