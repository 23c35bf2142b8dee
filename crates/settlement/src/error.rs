//! Settlement error types

use common::Amount;
use thiserror::Error;

/// Errors that can occur during payout computation and settlement checks
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementError {
    /// The claimer holds no shares on the winning outcome
    #[error("Nothing to claim")]
    NothingToClaim,

    /// The winning pool is empty while winning shares exist. This indicates
    /// corrupted pool accounting, never a user error.
    #[error("Winning pool is empty but shares exist")]
    EmptyWinningPool,

    /// A payout exceeded the representable amount range
    #[error("Payout amount overflow")]
    AmountOverflow,

    /// The paying account holds less than the computed payout
    #[error("Insufficient vault balance: required {required}, available {available}")]
    InsufficientVaultBalance {
        required: Amount,
        available: Amount,
    },
}
