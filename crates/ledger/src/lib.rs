//! Account Store for OutcomeExchange
//!
//! This crate provides the shared, account-based ledger the settlement
//! engines mutate. It exposes one primitive: an atomic multi-account
//! read-modify-write ([`Ledger::commit`] over a [`TransferBatch`]).
//!
//! CRITICAL PROPERTIES:
//! 1. A commit applies every transfer in the batch or none of them
//! 2. Total supply is conserved by every commit
//! 3. Accounts are addressed deterministically from (namespace, market[, owner])
//! 4. No partial mutation is ever observable by a concurrent caller

pub mod account;
pub mod error;
pub mod memory;

pub use account::{AccountId, Transfer, TransferBatch};
pub use error::LedgerError;
pub use memory::InMemoryLedger;

use common::Amount;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// The account store trait
///
/// Implementations must make [`Ledger::commit`] atomic: every transfer in
/// the batch is validated against the balances that would result from the
/// preceding transfers, and either the whole batch applies or nothing does.
pub trait Ledger: Send + Sync {
    /// Current balance of an account (zero if the account has never been used)
    fn balance(&self, account: &AccountId) -> Amount;

    /// Credit an account from outside the ledger
    ///
    /// This is the external on-ramp (wallet funding). The core itself only
    /// moves value between existing accounts via [`Ledger::commit`].
    fn deposit(&self, account: &AccountId, amount: Amount) -> Result<()>;

    /// Atomically apply a batch of transfers, or none at all
    fn commit(&self, batch: TransferBatch) -> Result<()>;

    /// Sum of all balances (conserved by every commit)
    fn total_supply(&self) -> Amount;
}
