//! Common types used across OutcomeExchange
//!
//! This module provides the fundamental domain types used throughout
//! the settlement core.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Amounts and balances in base units of the settlement currency.
///
/// All money arithmetic in the core is either checked or widened to `u128`
/// before multiplication. Overflow is a typed error, never a wrap.
pub type Amount = u64;

/// Unique identifier for a market (parimutuel or order-book)
///
/// Markets are addressed by a caller-chosen string slug. Length limits are
/// enforced at market creation, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketId(pub String);

impl MarketId {
    /// Create a MarketId from a string slug
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying slug
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the slug in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the slug is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for MarketId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for MarketId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an account holder (bettor, maker, authority)
///
/// An `OwnerId` doubles as the capability token for privileged calls: the
/// market's `authority` is an `OwnerId`, and `resolve` verifies the token
/// passed into the call against it. Nothing is read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    /// Create a new random OwnerId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an OwnerId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier for a resting order
///
/// Monotonically increasing per book. Cancels and lookups address orders by
/// this id, never by position in a side list, so a concurrent fill or cancel
/// can never alias a different order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    /// Get the raw sequence value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome side of a binary order-book market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The question resolves true
    Yes,
    /// The question resolves false
    No,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }

    /// Returns true if this is the YES side
    pub fn is_yes(&self) -> bool {
        matches!(self, Side::Yes)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Yes => write!(f, "yes"),
            Side::No => write!(f, "no"),
        }
    }
}

/// Direction of an order (buy or sell the YES outcome, after NO-inversion)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy the outcome
    Bid,
    /// Sell the outcome
    Ask,
}

impl OrderSide {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Bid => OrderSide::Ask,
            OrderSide::Ask => OrderSide::Bid,
        }
    }

    /// Returns true if this is a bid
    pub fn is_bid(&self) -> bool {
        matches!(self, OrderSide::Bid)
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Bid => write!(f, "bid"),
            OrderSide::Ask => write!(f, "ask"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
