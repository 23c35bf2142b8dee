//! Settlement layer for OutcomeExchange
//!
//! Shared payout computation used by both trading mechanisms: parimutuel
//! pro-rata payouts with the protocol fee, order-book share payouts,
//! collateral pricing, and the vault solvency check.
//!
//! Everything here is a pure function over integers. Multiplications widen
//! to `u128` before dividing; divisions floor. The same inputs always give
//! the same payout, and an overflow surfaces as a typed error.

pub mod error;
pub mod payout;

pub use error::SettlementError;
pub use payout::{
    clob_payout, fill_cost, order_collateral, pool_payout, check_solvency, Payout,
    FEE_DIVISOR, MAX_PRICE, MIN_PRICE, PAYOUT_PER_SHARE,
};

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, SettlementError>;
