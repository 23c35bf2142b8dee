//! Order-book engine error types

use common::{MarketId, OrderId};
use thiserror::Error;

/// Errors that can occur in the order-book matching engine
///
/// Validation and authorization errors are raised before any mutation;
/// state errors abort the call with no change. There is no partial apply.
#[derive(Error, Debug)]
pub enum ClobError {
    // --- Validation -------------------------------------------------------
    /// A market with this id already exists
    #[error("Market already exists: {0}")]
    DuplicateMarket(MarketId),

    /// Resolution time is not in the future
    #[error("Resolution time must be in the future")]
    InvalidResolutionTime,

    /// Market id slug exceeds the configured length limit
    #[error("Market id too long: {got} bytes (max {max})")]
    MarketIdTooLong { got: usize, max: usize },

    /// Market question exceeds the configured length limit
    #[error("Question too long: {got} bytes (max {max})")]
    QuestionTooLong { got: usize, max: usize },

    /// Price must be in [1, 9999] basis points; 0 and 10000 are degenerate
    #[error("Invalid price: {0} (must be 1..=9999 basis points)")]
    InvalidPrice(u64),

    /// Order size must be positive
    #[error("Order size must be positive")]
    InvalidSize,

    // --- Authorization ----------------------------------------------------
    /// The supplied capability token is not this market's authority
    #[error("Unauthorized: caller is not the market authority")]
    Unauthorized,

    /// Cancel attempted on another owner's order
    #[error("Order {0} is not owned by the caller")]
    NotOrderOwner(OrderId),

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

    /// The target side already holds the maximum number of resting orders
    #[error("Order book side is full ({cap} resting orders)")]
    OrderBookFull { cap: usize },

    /// No resting order with this id (unknown, filled, or cancelled)
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Resolution attempted twice
    #[error("Market already resolved")]
    AlreadyResolved,

    /// Claim attempted before resolution
    #[error("Market not yet resolved")]
    MarketNotResolved,

    /// The claimer holds no shares on the winning side (lost, or already
    /// claimed)
    #[error("No winnings to claim")]
    NoWinnings,

    // --- Propagated -------------------------------------------------------
    /// Account store failure (insufficient funds, overflow)
    #[error(transparent)]
    Ledger(#[from] ledger::LedgerError),

    /// Settlement math failure, including vault insolvency
    #[error(transparent)]
    Settlement(#[from] settlement::SettlementError),
}
