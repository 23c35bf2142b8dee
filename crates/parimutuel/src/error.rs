//! Pool engine error types

use common::MarketId;
use thiserror::Error;

/// Errors that can occur in the parimutuel pool engine
///
/// Validation and authorization errors are raised before any mutation;
/// state errors abort the call with no change. There is no partial apply.
#[derive(Error, Debug)]
pub enum PoolError {
    // --- Validation -------------------------------------------------------
    /// A market with this id already exists
    #[error("Market already exists: {0}")]
    DuplicateMarket(MarketId),

    /// Outcome count outside the configured [min, max] range
    #[error("Market must have between {min} and {max} outcomes, got {got}")]
    InvalidOutcomes { got: usize, min: usize, max: usize },

    /// Resolution time is not in the future
    #[error("Resolution time must be in the future")]
    InvalidResolutionTime,

    /// Market id slug exceeds the configured length limit
    #[error("Market id too long: {got} bytes (max {max})")]
    MarketIdTooLong { got: usize, max: usize },

    /// Market question exceeds the configured length limit
    #[error("Question too long: {got} bytes (max {max})")]
    QuestionTooLong { got: usize, max: usize },

    /// Outcome index out of range for this market
    #[error("Invalid outcome index {index} for {outcomes} outcomes")]
    InvalidOutcomeIndex { index: usize, outcomes: usize },

    /// Stake amount must be positive
    #[error("Stake amount must be positive")]
    InvalidAmount,

    // --- Authorization ----------------------------------------------------
    /// The supplied capability token is not this market's authority
    #[error("Unauthorized: caller is not the market authority")]
    Unauthorized,

    // --- State ------------------------------------------------------------
    /// No market with this id
    #[error("Market not found: {0}")]
    MarketNotFound(MarketId),

    /// Trading attempted on a resolved market
    #[error("Market is resolved, no more trading")]
    MarketResolved,

    /// Trading attempted at or after the resolution time
    #[error("Market has expired")]
    MarketExpired,

    /// Resolution attempted twice
    #[error("Market already resolved")]
    AlreadyResolved,

    /// Claim attempted before resolution
    #[error("Market not yet resolved")]
    MarketNotResolved,

    /// The claimer holds no shares on the winning outcome (lost, or
    /// already claimed)
    #[error("No winning shares to claim")]
    NoWinningShares,

    // --- Propagated -------------------------------------------------------
    /// Account store failure (insufficient funds, overflow)
    #[error(transparent)]
    Ledger(#[from] ledger::LedgerError),

    /// Settlement math failure
    #[error(transparent)]
    Settlement(#[from] settlement::SettlementError),
}
