//! Result types for order-book operations

use common::{Amount, OrderId};
use serde::{Deserialize, Serialize};

use crate::domain::{Fill, Order};

/// Result of placing an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceResult {
    /// Fills generated against resting orders, in execution order
    pub fills: Vec<Fill>,
    /// Id of the resting remainder, if any size was left after matching
    pub resting: Option<OrderId>,
    /// What the taker paid for the filled size, at maker prices
    pub filled_cost: Amount,
    /// Collateral locked for the resting remainder, at the limit price
    pub locked_collateral: Amount,
}

impl PlaceResult {
    /// Check if any fills were generated
    pub fn has_fills(&self) -> bool {
        !self.fills.is_empty()
    }

    /// Total size filled
    pub fn filled_size(&self) -> Amount {
        self.fills.iter().map(|f| f.size).sum()
    }

    /// Whether the whole order executed immediately
    pub fn fully_filled(&self) -> bool {
        self.resting.is_none()
    }
}

/// Result of cancelling an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResult {
    /// The removed order
    pub order: Order,
    /// Collateral returned to the owner's wallet
    pub refunded: Amount,
}
