//! Parimutuel market and position records

use chrono::{DateTime, Utc};
use common::{Amount, MarketId, OwnerId};
use serde::{Deserialize, Serialize};

/// A parimutuel market
///
/// Created once, mutated by stake purchases (pools only ever grow) and by
/// exactly one resolution. Terminal state after resolution is immutable
/// apart from claims draining the market account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Unique slug
    pub id: MarketId,
    /// The question being bet on
    pub question: String,
    /// Outcome labels (2..=10 entries)
    pub outcomes: Vec<String>,
    /// Accumulated stake per outcome, base units
    pub outcome_pools: Vec<Amount>,
    /// Sum of all outcome pools
    pub total_pool: Amount,
    /// Betting stops at this time; resolution happens after it
    pub resolution_time: DateTime<Utc>,
    /// Whether the winning outcome is fixed
    pub resolved: bool,
    /// Winning outcome index, set exactly once at resolution
    pub winning_outcome: Option<usize>,
    /// Capability allowed to resolve this market
    pub authority: OwnerId,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Market {
    /// Whether the market still accepts stakes at `now`
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        !self.resolved && now < self.resolution_time
    }

    /// Number of outcomes
    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Fund-conservation invariant: the total pool equals the sum of the
    /// outcome pools
    pub fn pools_consistent(&self) -> bool {
        self.total_pool == self.outcome_pools.iter().sum::<Amount>()
    }
}

/// A bettor's stake in one market
///
/// Shares are denominated 1:1 with contributed stake. Created on first
/// stake; the winning entry is zeroed by a successful claim, losing entries
/// are left as-is since they are unpayable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub owner: OwnerId,
    pub market: MarketId,
    /// One entry per outcome
    pub shares: Vec<Amount>,
}

impl Position {
    /// Empty position for a market with `outcomes` entries
    pub fn new(owner: OwnerId, market: MarketId, outcomes: usize) -> Self {
        Self {
            owner,
            market,
            shares: vec![0; outcomes],
        }
    }

    /// Total stake across all outcomes
    pub fn total_shares(&self) -> Amount {
        self.shares.iter().sum()
    }
}

// ============================================================================
// Tests
// ============================================================================
