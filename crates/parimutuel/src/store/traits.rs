//! Store trait for the pool engine

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use common::{Amount, MarketId, OwnerId};
use settlement::Payout;

use crate::market::{Market, Position};
use crate::Result;

/// Async facade over the pool engine
///
/// Each method is one atomic operation; implementations must not let two
/// calls interleave their state transitions.
#[async_trait]
pub trait PoolStore: Send + Sync {
    /// Create a new market; the caller becomes its resolution authority
    async fn create_market(
        &self,
        authority: OwnerId,
        id: MarketId,
        question: String,
        outcomes: Vec<String>,
        resolution_time: DateTime<Utc>,
    ) -> Result<()>;

    /// Stake on an outcome
    async fn buy_shares(
        &self,
        buyer: OwnerId,
        market: MarketId,
        outcome_index: usize,
        amount: Amount,
    ) -> Result<()>;

    /// Fix the winning outcome (authority only, exactly once)
    async fn resolve_market(
        &self,
        authority: OwnerId,
        market: MarketId,
        winning_outcome: usize,
    ) -> Result<()>;

    /// Claim a winning position's payout
    async fn claim_winnings(&self, claimer: OwnerId, market: MarketId) -> Result<Payout>;

    /// Fetch a market record
    async fn market(&self, market: MarketId) -> Option<Market>;

    /// Fetch a position record
    async fn position(&self, market: MarketId, owner: OwnerId) -> Option<Position>;
}
