//! In-memory store implementation for the pool engine

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use common::{Amount, MarketId, OwnerId};
use config::MarketLimits;
use ledger::Ledger;
use settlement::Payout;

use crate::engine::PoolEngine;
use crate::market::{Market, Position};
use crate::store::traits::PoolStore;
use crate::Result;

/// In-memory pool store
///
/// Serializes operations through one engine lock per store, which gives the
/// single-call atomicity the engine assumes.
pub struct InMemoryPoolStore {
    engine: RwLock<PoolEngine>,
}

impl InMemoryPoolStore {
    /// Create a store over an account store with the given limits
    pub fn new(ledger: Arc<dyn Ledger>, limits: MarketLimits) -> Self {
        Self {
            engine: RwLock::new(PoolEngine::new(ledger, limits)),
        }
    }
}

#[async_trait]
impl PoolStore for InMemoryPoolStore {
    async fn create_market(
        &self,
        authority: OwnerId,
        id: MarketId,
        question: String,
        outcomes: Vec<String>,
        resolution_time: DateTime<Utc>,
    ) -> Result<()> {
        let mut engine = self.engine.write().await;
        engine.create_market(authority, id, question, outcomes, resolution_time, Utc::now())
    }

    async fn buy_shares(
        &self,
        buyer: OwnerId,
        market: MarketId,
        outcome_index: usize,
        amount: Amount,
    ) -> Result<()> {
        let mut engine = self.engine.write().await;
        engine.buy_shares(buyer, &market, outcome_index, amount, Utc::now())
    }

    async fn resolve_market(
        &self,
        authority: OwnerId,
        market: MarketId,
        winning_outcome: usize,
    ) -> Result<()> {
        let mut engine = self.engine.write().await;
        engine.resolve_market(authority, &market, winning_outcome)
    }

    async fn claim_winnings(&self, claimer: OwnerId, market: MarketId) -> Result<Payout> {
        let mut engine = self.engine.write().await;
        engine.claim_winnings(claimer, &market)
    }

    async fn market(&self, market: MarketId) -> Option<Market> {
        self.engine.read().await.market(&market).cloned()
    }

    async fn position(&self, market: MarketId, owner: OwnerId) -> Option<Position> {
        self.engine.read().await.position(&market, &owner).cloned()
    }
}

// ============================================================================
// Tests
// ============================================================================
