//! Parimutuel pool engine
//!
//! Every operation is a single atomic state transition over the named
//! market, position and ledger accounts. All validation happens before the
//! ledger commit, and engine state is only touched once the commit has
//! succeeded, so a failing call leaves no trace.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use common::{Amount, MarketId, OwnerId};
use config::MarketLimits;
use ledger::{AccountId, Ledger, TransferBatch};
use settlement::{check_solvency, pool_payout, Payout, SettlementError};

use crate::error::PoolError;
use crate::market::{Market, Position};
use crate::Result;

/// The parimutuel pool engine
///
/// Holds every pool market and position, and moves stakes and payouts
/// through the injected account store. Callers supply `now` so the store
/// facade (or a test) controls the clock.
pub struct PoolEngine {
    ledger: Arc<dyn Ledger>,
    limits: MarketLimits,
    markets: HashMap<MarketId, Market>,
    positions: HashMap<(MarketId, OwnerId), Position>,
}

impl PoolEngine {
    /// Create an engine over an account store with the given limits
    pub fn new(ledger: Arc<dyn Ledger>, limits: MarketLimits) -> Self {
        Self {
            ledger,
            limits,
            markets: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    /// Create a new market with all pools at zero
    ///
    /// The caller becomes the market's resolution authority.
    pub fn create_market(
        &mut self,
        authority: OwnerId,
        id: MarketId,
        question: String,
        outcomes: Vec<String>,
        resolution_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if id.len() > self.limits.max_market_id_len {
            return Err(PoolError::MarketIdTooLong {
                got: id.len(),
                max: self.limits.max_market_id_len,
            });
        }
        if question.len() > self.limits.max_question_len {
            return Err(PoolError::QuestionTooLong {
                got: question.len(),
                max: self.limits.max_question_len,
            });
        }
        if outcomes.len() < self.limits.min_outcomes || outcomes.len() > self.limits.max_outcomes {
            return Err(PoolError::InvalidOutcomes {
                got: outcomes.len(),
                min: self.limits.min_outcomes,
                max: self.limits.max_outcomes,
            });
        }
        if resolution_time <= now {
            return Err(PoolError::InvalidResolutionTime);
        }
        if self.markets.contains_key(&id) {
            return Err(PoolError::DuplicateMarket(id));
        }

        let outcome_count = outcomes.len();
        let market = Market {
            id: id.clone(),
            question,
            outcomes,
            outcome_pools: vec![0; outcome_count],
            total_pool: 0,
            resolution_time,
            resolved: false,
            winning_outcome: None,
            authority,
            created_at: now,
        };

        info!(market = %id, outcomes = outcome_count, "Market created");
        self.markets.insert(id, market);
        Ok(())
    }

    /// Stake `amount` on an outcome
    ///
    /// Transfers the stake from the buyer's wallet into the market account
    /// and credits the buyer's position 1:1.
    pub fn buy_shares(
        &mut self,
        buyer: OwnerId,
        market_id: &MarketId,
        outcome_index: usize,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let market = self
            .markets
            .get_mut(market_id)
            .ok_or_else(|| PoolError::MarketNotFound(market_id.clone()))?;

        if market.resolved {
            return Err(PoolError::MarketResolved);
        }
        if now >= market.resolution_time {
            return Err(PoolError::MarketExpired);
        }
        if outcome_index >= market.outcomes.len() {
            return Err(PoolError::InvalidOutcomeIndex {
                index: outcome_index,
                outcomes: market.outcomes.len(),
            });
        }
        if amount == 0 {
            return Err(PoolError::InvalidAmount);
        }

        // Pre-compute the new pool totals so an overflow aborts before the
        // ledger moves anything.
        let new_outcome_pool = market.outcome_pools[outcome_index]
            .checked_add(amount)
            .ok_or(SettlementError::AmountOverflow)?;
        let new_total = market
            .total_pool
            .checked_add(amount)
            .ok_or(SettlementError::AmountOverflow)?;

        let mut batch = TransferBatch::new();
        batch.transfer(
            AccountId::wallet(buyer),
            AccountId::pool_market(market_id.clone()),
            amount,
        );
        self.ledger.commit(batch)?;

        market.outcome_pools[outcome_index] = new_outcome_pool;
        market.total_pool = new_total;

        let outcome_count = market.outcomes.len();
        let position = self
            .positions
            .entry((market_id.clone(), buyer))
            .or_insert_with(|| Position::new(buyer, market_id.clone(), outcome_count));
        position.shares[outcome_index] += amount;

        debug!(
            market = %market_id,
            buyer = %buyer,
            outcome = outcome_index,
            amount,
            total_pool = new_total,
            "Shares bought"
        );
        Ok(())
    }

    /// Fix the winning outcome
    ///
    /// Authority-only, one-way: a resolved market never mutates again apart
    /// from claims.
    pub fn resolve_market(
        &mut self,
        authority: OwnerId,
        market_id: &MarketId,
        winning_outcome: usize,
    ) -> Result<()> {
        let market = self
            .markets
            .get_mut(market_id)
            .ok_or_else(|| PoolError::MarketNotFound(market_id.clone()))?;

        if market.resolved {
            return Err(PoolError::AlreadyResolved);
        }
        if authority != market.authority {
            return Err(PoolError::Unauthorized);
        }
        if winning_outcome >= market.outcomes.len() {
            return Err(PoolError::InvalidOutcomeIndex {
                index: winning_outcome,
                outcomes: market.outcomes.len(),
            });
        }

        market.resolved = true;
        market.winning_outcome = Some(winning_outcome);

        info!(market = %market_id, winning_outcome, "Market resolved");
        Ok(())
    }

    /// Claim the payout for a winning position
    ///
    /// Pays `floor(winner_shares * total_pool / winning_pool)` minus the 2%
    /// fee, then zeroes the winning entry so a second claim finds nothing.
    /// The fee is never swept; it simply stays in the market account.
    pub fn claim_winnings(&mut self, claimer: OwnerId, market_id: &MarketId) -> Result<Payout> {
        let market = self
            .markets
            .get(market_id)
            .ok_or_else(|| PoolError::MarketNotFound(market_id.clone()))?;

        if !market.resolved {
            return Err(PoolError::MarketNotResolved);
        }
        let winning_outcome = market
            .winning_outcome
            .ok_or(PoolError::MarketNotResolved)?;

        let winner_shares = self
            .positions
            .get(&(market_id.clone(), claimer))
            .map(|p| p.shares[winning_outcome])
            .unwrap_or(0);
        if winner_shares == 0 {
            return Err(PoolError::NoWinningShares);
        }

        let payout = pool_payout(
            winner_shares,
            market.outcome_pools[winning_outcome],
            market.total_pool,
        )?;

        // The market account must be able to honor the claim before any
        // transfer happens.
        let market_account = AccountId::pool_market(market_id.clone());
        check_solvency(self.ledger.balance(&market_account), payout.net)?;

        let mut batch = TransferBatch::new();
        batch.transfer(market_account, AccountId::wallet(claimer), payout.net);
        self.ledger.commit(batch)?;

        // Commit succeeded; retire the winning entry.
        let position = self
            .positions
            .get_mut(&(market_id.clone(), claimer))
            .expect("position checked above");
        position.shares[winning_outcome] = 0;

        info!(
            market = %market_id,
            claimer = %claimer,
            gross = payout.gross,
            fee = payout.fee,
            net = payout.net,
            "Winnings claimed"
        );
        Ok(payout)
    }

    /// Look up a market
    pub fn market(&self, market_id: &MarketId) -> Option<&Market> {
        self.markets.get(market_id)
    }

    /// Look up a position
    pub fn position(&self, market_id: &MarketId, owner: &OwnerId) -> Option<&Position> {
        self.positions.get(&(market_id.clone(), *owner))
    }

    /// Markets currently known to the engine
    pub fn market_ids(&self) -> Vec<MarketId> {
        self.markets.keys().cloned().collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
