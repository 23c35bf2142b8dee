//! Domain types for the order-book engine

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::{Amount, MarketId, OrderId, OrderSide, OwnerId, Side};
use serde::{Deserialize, Serialize};
use settlement::order_collateral;

/// An order-book market
///
/// Same create-once / resolve-once lifecycle as a parimutuel market, with a
/// binary YES/NO outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClobMarket {
    /// Unique slug
    pub id: MarketId,
    /// The question being traded
    pub question: String,
    /// Trading stops at this time
    pub resolution_time: DateTime<Utc>,
    /// Whether the winning side is fixed
    pub resolved: bool,
    /// Winning side, set exactly once at resolution
    pub winning_side: Option<Side>,
    /// Total shares matched over the market's lifetime
    pub total_volume_shares: Amount,
    /// Total notional matched, at execution prices
    pub total_volume_notional: Amount,
    /// Capability allowed to resolve this market
    pub authority: OwnerId,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ClobMarket {
    /// Whether the market still accepts orders at `now`
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        !self.resolved && now < self.resolution_time
    }
}

/// A trader's share holdings in one order-book market
///
/// Credited on fills; a successful claim zeroes the winning side and leaves
/// the losing side as-is since it is unpayable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClobPosition {
    pub owner: OwnerId,
    pub market: MarketId,
    pub yes_shares: Amount,
    pub no_shares: Amount,
}

impl ClobPosition {
    /// Empty position
    pub fn new(owner: OwnerId, market: MarketId) -> Self {
        Self {
            owner,
            market,
            yes_shares: 0,
            no_shares: 0,
        }
    }

    /// Shares held on a side
    pub fn shares(&self, side: Side) -> Amount {
        match side {
            Side::Yes => self.yes_shares,
            Side::No => self.no_shares,
        }
    }

    /// Credit shares on a side
    pub fn credit(&mut self, side: Side, quantity: Amount) {
        match side {
            Side::Yes => self.yes_shares += quantity,
            Side::No => self.no_shares += quantity,
        }
    }

    /// Zero a side and return what it held
    pub fn take(&mut self, side: Side) -> Amount {
        match side {
            Side::Yes => std::mem::take(&mut self.yes_shares),
            Side::No => std::mem::take(&mut self.no_shares),
        }
    }
}

/// A resting order, always in the YES frame
///
/// NO intents are inverted before they reach the book, so `side` and
/// `price` here always describe a YES bid or YES ask. The side a bid's
/// owner ends up holding is YES; an ask's owner ends up holding NO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Stable identity, monotonic per book
    pub id: OrderId,
    /// Who placed (and may cancel) the order
    pub owner: OwnerId,
    /// Bid or ask on YES
    pub side: OrderSide,
    /// Limit price in basis points of the payout, 1..=9999
    pub price: Amount,
    /// Remaining unfilled size, in shares
    pub size: Amount,
    /// When the order entered the book
    pub timestamp: DateTime<Utc>,
}

impl Order {
    /// Reduce remaining size after a fill
    pub fn fill(&mut self, quantity: Amount) {
        self.size = self.size.saturating_sub(quantity);
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.size == 0
    }

    /// Collateral currently escrowed for this order
    pub fn collateral(&self) -> Result<Amount, settlement::SettlementError> {
        order_collateral(self.side, self.price, self.size)
    }

    /// The outcome side this order's owner is accumulating
    pub fn position_side(&self) -> Side {
        match self.side {
            OrderSide::Bid => Side::Yes,
            OrderSide::Ask => Side::No,
        }
    }
}

/// A matched execution between a taker and one resting order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    /// The resting order that provided liquidity
    pub maker_order_id: OrderId,
    /// Resting order's owner
    pub maker: OwnerId,
    /// Incoming order's owner
    pub taker: OwnerId,
    /// Execution price (ALWAYS the maker's price), basis points
    pub price: Amount,
    /// Shares traded
    pub size: Amount,
    /// Which book side the taker hit, in the YES frame
    pub taker_side: OrderSide,
    /// When the fill executed
    pub timestamp: DateTime<Utc>,
}

/// Order book for a single market
///
/// CRITICAL PROPERTIES:
/// 1. Orders live in a slab keyed by stable id; the side lists hold ids only
/// 2. `bids` sorted by price descending, `asks` ascending; ties break by
///    insertion order (smaller id first), giving price-time priority
/// 3. Only YES orders are ever stored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    /// All resting orders by id
    orders: HashMap<OrderId, Order>,
    /// Bid ids, best (highest price, earliest) first
    bids: Vec<OrderId>,
    /// Ask ids, best (lowest price, earliest) first
    asks: Vec<OrderId>,
    /// Monotonic id source
    next_order_id: u64,
}

impl OrderBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next order id
    pub fn next_id(&mut self) -> OrderId {
        self.next_order_id += 1;
        OrderId(self.next_order_id)
    }

    /// Insert a resting order, preserving price-then-time order
    pub fn insert(&mut self, order: Order) {
        let list = match order.side {
            OrderSide::Bid => &mut self.bids,
            OrderSide::Ask => &mut self.asks,
        };
        // Strict comparison keeps equal-priced earlier orders ahead of the
        // newcomer, which is exactly time priority.
        let position = list
            .iter()
            .position(|id| {
                let resting = &self.orders[id];
                match order.side {
                    OrderSide::Bid => resting.price < order.price,
                    OrderSide::Ask => resting.price > order.price,
                }
            })
            .unwrap_or(list.len());
        list.insert(position, order.id);
        self.orders.insert(order.id, order);
    }

    /// Best resting order on a side, if any
    pub fn best(&self, side: OrderSide) -> Option<&Order> {
        self.side_ids(side).first().map(|id| &self.orders[id])
    }

    /// Look up an order by id
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Remove an order by id from the slab and its side list
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let order = self.orders.remove(&id)?;
        let list = match order.side {
            OrderSide::Bid => &mut self.bids,
            OrderSide::Ask => &mut self.asks,
        };
        list.retain(|entry| *entry != id);
        Some(order)
    }

    /// Reduce an order's size, removing it once fully filled
    pub fn reduce(&mut self, id: OrderId, quantity: Amount) {
        let filled = if let Some(order) = self.orders.get_mut(&id) {
            order.fill(quantity);
            order.is_filled()
        } else {
            return;
        };
        if filled {
            self.remove(id);
        }
    }

    /// Resting order ids on a side, best first
    pub fn side_ids(&self, side: OrderSide) -> &[OrderId] {
        match side {
            OrderSide::Bid => &self.bids,
            OrderSide::Ask => &self.asks,
        }
    }

    /// Resting orders on a side, best first
    pub fn side_orders(&self, side: OrderSide) -> impl Iterator<Item = &Order> {
        self.side_ids(side).iter().map(|id| &self.orders[id])
    }

    /// Number of resting orders on a side
    pub fn side_len(&self, side: OrderSide) -> usize {
        self.side_ids(side).len()
    }

    /// Check if the book is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Sum of collateral escrowed for every resting order
    pub fn resting_collateral(&self) -> Amount {
        self.orders
            .values()
            .map(|o| o.collateral().unwrap_or(0))
            .sum()
    }
}

// ============================================================================
// Tests
// ============================================================================
