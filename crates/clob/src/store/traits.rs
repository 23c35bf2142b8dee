//! Store trait for the order-book engine

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use common::{Amount, MarketId, OrderId, OrderSide, OwnerId, Side};

use crate::domain::{ClobMarket, ClobPosition, Order};
use crate::result::{CancelResult, PlaceResult};
use crate::Result;

/// Async facade over the order-book engine
///
/// Each method is one atomic operation; implementations must not let two
/// calls interleave their state transitions.
#[async_trait]
pub trait ClobStore: Send + Sync {
    /// Create a new market; the caller becomes its resolution authority
    async fn create_market(
        &self,
        authority: OwnerId,
        id: MarketId,
        question: String,
        resolution_time: DateTime<Utc>,
    ) -> Result<()>;

    /// Place a limit order, matching what crosses and resting the remainder
    async fn place_order(
        &self,
        owner: OwnerId,
        market: MarketId,
        order_side: OrderSide,
        side: Side,
        price: Amount,
        size: Amount,
    ) -> Result<PlaceResult>;

    /// Cancel a resting order by id, refunding its escrow
    async fn cancel_order(
        &self,
        owner: OwnerId,
        market: MarketId,
        order_id: OrderId,
    ) -> Result<CancelResult>;

    /// Fix the winning side (authority only, exactly once)
    async fn resolve_market(
        &self,
        authority: OwnerId,
        market: MarketId,
        winning_side: Side,
    ) -> Result<()>;

    /// Claim the payout for winning shares
    async fn claim_winnings(&self, claimer: OwnerId, market: MarketId) -> Result<Amount>;

    /// Fetch a market record
    async fn market(&self, market: MarketId) -> Option<ClobMarket>;

    /// Fetch a resting order
    async fn order(&self, market: MarketId, order_id: OrderId) -> Option<Order>;

    /// Fetch a position record
    async fn position(&self, market: MarketId, owner: OwnerId) -> Option<ClobPosition>;
}
