//! Ledger error types

use crate::account::AccountId;
use common::Amount;
use thiserror::Error;

/// Errors that can occur when committing to the account store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A debit would take an account below zero
    #[error("Insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: AccountId,
        required: Amount,
        available: Amount,
    },

    /// A credit would overflow an account balance
    #[error("Balance overflow in {account}")]
    BalanceOverflow { account: AccountId },
}
