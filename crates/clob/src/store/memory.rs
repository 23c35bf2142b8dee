//! In-memory store implementation for the order-book engine

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use common::{Amount, MarketId, OrderId, OrderSide, OwnerId, Side};
use config::{BookLimits, MarketLimits};
use ledger::Ledger;

use crate::domain::{ClobMarket, ClobPosition, Order};
use crate::engine::ClobEngine;
use crate::result::{CancelResult, PlaceResult};
use crate::store::traits::ClobStore;
use crate::Result;

/// In-memory order-book store
///
/// Serializes operations through one engine lock per store, which gives the
/// single-call atomicity the engine assumes.
pub struct InMemoryClobStore {
    engine: RwLock<ClobEngine>,
}

impl InMemoryClobStore {
    /// Create a store over an account store with the given limits
    pub fn new(ledger: Arc<dyn Ledger>, market_limits: MarketLimits, book_limits: BookLimits) -> Self {
        Self {
            engine: RwLock::new(ClobEngine::new(ledger, market_limits, book_limits)),
        }
    }
}

#[async_trait]
impl ClobStore for InMemoryClobStore {
    async fn create_market(
        &self,
        authority: OwnerId,
        id: MarketId,
        question: String,
        resolution_time: DateTime<Utc>,
    ) -> Result<()> {
        let mut engine = self.engine.write().await;
        engine.create_market(authority, id, question, resolution_time, Utc::now())
    }

    async fn place_order(
        &self,
        owner: OwnerId,
        market: MarketId,
        order_side: OrderSide,
        side: Side,
        price: Amount,
        size: Amount,
    ) -> Result<PlaceResult> {
        let mut engine = self.engine.write().await;
        engine.place_order(owner, &market, order_side, side, price, size, Utc::now())
    }

    async fn cancel_order(
        &self,
        owner: OwnerId,
        market: MarketId,
        order_id: OrderId,
    ) -> Result<CancelResult> {
        let mut engine = self.engine.write().await;
        engine.cancel_order(owner, &market, order_id)
    }

    async fn resolve_market(
        &self,
        authority: OwnerId,
        market: MarketId,
        winning_side: Side,
    ) -> Result<()> {
        let mut engine = self.engine.write().await;
        engine.resolve_market(authority, &market, winning_side)
    }

    async fn claim_winnings(&self, claimer: OwnerId, market: MarketId) -> Result<Amount> {
        let mut engine = self.engine.write().await;
        engine.claim_winnings(claimer, &market)
    }

    async fn market(&self, market: MarketId) -> Option<ClobMarket> {
        self.engine.read().await.market(&market).cloned()
    }

    async fn order(&self, market: MarketId, order_id: OrderId) -> Option<Order> {
        self.engine
            .read()
            .await
            .book(&market)
            .and_then(|book| book.get(order_id))
            .cloned()
    }

    async fn position(&self, market: MarketId, owner: OwnerId) -> Option<ClobPosition> {
        self.engine.read().await.position(&market, &owner).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
