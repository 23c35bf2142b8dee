//! Order-book matching engine
//!
//! Matching runs in two phases inside one state transition: a read-only
//! pass plans every fill and the resting remainder, then a single ledger
//! commit moves the taker's money, and only after the commit succeeds are
//! the book, positions and volume counters mutated. A failure anywhere
//! aborts the call with no state change.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use common::{Amount, MarketId, OrderId, OrderSide, OwnerId, Side};
use config::{BookLimits, MarketLimits};
use ledger::{AccountId, Ledger, TransferBatch};
use settlement::{
    check_solvency, clob_payout, fill_cost, order_collateral, SettlementError, MAX_PRICE,
    MIN_PRICE, PAYOUT_PER_SHARE,
};

use crate::domain::{ClobMarket, ClobPosition, Fill, Order, OrderBook};
use crate::error::ClobError;
use crate::result::{CancelResult, PlaceResult};
use crate::Result;

/// A fill decided during the planning pass, applied only after the ledger
/// commit succeeds
struct PlannedFill {
    maker_order_id: OrderId,
    maker: OwnerId,
    maker_position_side: Side,
    price: Amount,
    size: Amount,
}

/// The order-book matching engine
///
/// Holds every order-book market, its book and positions, and moves
/// collateral through the injected account store. Callers supply `now` so
/// the store facade (or a test) controls the clock.
pub struct ClobEngine {
    ledger: Arc<dyn Ledger>,
    market_limits: MarketLimits,
    book_limits: BookLimits,
    markets: HashMap<MarketId, ClobMarket>,
    books: HashMap<MarketId, OrderBook>,
    positions: HashMap<(MarketId, OwnerId), ClobPosition>,
}

impl ClobEngine {
    /// Create an engine over an account store with the given limits
    pub fn new(ledger: Arc<dyn Ledger>, market_limits: MarketLimits, book_limits: BookLimits) -> Self {
        Self {
            ledger,
            market_limits,
            book_limits,
            markets: HashMap::new(),
            books: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    /// Create a new market with an empty book and an empty vault
    ///
    /// The caller becomes the market's resolution authority.
    pub fn create_market(
        &mut self,
        authority: OwnerId,
        id: MarketId,
        question: String,
        resolution_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if id.len() > self.market_limits.max_market_id_len {
            return Err(ClobError::MarketIdTooLong {
                got: id.len(),
                max: self.market_limits.max_market_id_len,
            });
        }
        if question.len() > self.market_limits.max_question_len {
            return Err(ClobError::QuestionTooLong {
                got: question.len(),
                max: self.market_limits.max_question_len,
            });
        }
        if resolution_time <= now {
            return Err(ClobError::InvalidResolutionTime);
        }
        if self.markets.contains_key(&id) {
            return Err(ClobError::DuplicateMarket(id));
        }

        let market = ClobMarket {
            id: id.clone(),
            question,
            resolution_time,
            resolved: false,
            winning_side: None,
            total_volume_shares: 0,
            total_volume_notional: 0,
            authority,
            created_at: now,
        };

        info!(market = %id, "Clob market created");
        self.books.insert(id.clone(), OrderBook::new());
        self.markets.insert(id, market);
        Ok(())
    }

    /// Place a limit order
    ///
    /// The order is expressed as `(order_side, side, price)` from the
    /// caller's point of view; a NO intent is inverted into the YES frame
    /// (`bid NO @ p` becomes `ask YES @ 10000 - p`) before it touches the
    /// book. Matching executes at each maker's price, credits both the
    /// taker's and the maker's positions, and charges the taker at the
    /// execution price, so crossing at a better price than the limit costs
    /// less, not the same. Any remainder rests at the limit price.
    #[allow(clippy::too_many_arguments)]
    pub fn place_order(
        &mut self,
        owner: OwnerId,
        market_id: &MarketId,
        order_side: OrderSide,
        side: Side,
        price: Amount,
        size: Amount,
        now: DateTime<Utc>,
    ) -> Result<PlaceResult> {
        let market = self
            .markets
            .get_mut(market_id)
            .ok_or_else(|| ClobError::MarketNotFound(market_id.clone()))?;

        if market.resolved {
            return Err(ClobError::MarketResolved);
        }
        if now >= market.resolution_time {
            return Err(ClobError::MarketExpired);
        }
        if !(MIN_PRICE..=MAX_PRICE).contains(&price) {
            return Err(ClobError::InvalidPrice(price));
        }
        if size == 0 {
            return Err(ClobError::InvalidSize);
        }

        // NO-inversion: the book only ever stores YES orders.
        let (book_side, book_price) = match side {
            Side::Yes => (order_side, price),
            Side::No => (order_side.opposite(), PAYOUT_PER_SHARE - price),
        };

        let book = self.books.get_mut(market_id).expect("book exists for market");

        // Phase 1: plan fills against the opposite side, best first.
        let mut planned: Vec<PlannedFill> = Vec::new();
        let mut remaining = size;
        let mut filled_cost: Amount = 0;
        for resting in book.side_orders(book_side.opposite()) {
            if remaining == 0 {
                break;
            }
            let crosses = match book_side {
                OrderSide::Bid => resting.price <= book_price,
                OrderSide::Ask => resting.price >= book_price,
            };
            if !crosses {
                break;
            }
            let quantity = remaining.min(resting.size);
            filled_cost = filled_cost
                .checked_add(fill_cost(book_side, resting.price, quantity)?)
                .ok_or(SettlementError::AmountOverflow)?;
            planned.push(PlannedFill {
                maker_order_id: resting.id,
                maker: resting.owner,
                maker_position_side: resting.position_side(),
                price: resting.price,
                size: quantity,
            });
            remaining -= quantity;
        }

        // Phase 2: validate the remainder before anything moves.
        let mut locked_collateral: Amount = 0;
        if remaining > 0 {
            let cap = self.book_limits.max_resting_per_side;
            if book.side_len(book_side) >= cap {
                return Err(ClobError::OrderBookFull { cap });
            }
            locked_collateral = order_collateral(book_side, book_price, remaining)?;
        }

        // Phase 3: one atomic commit for fill payments plus the resting lock.
        let vault = AccountId::clob_vault(market_id.clone());
        let mut batch = TransferBatch::new();
        batch.transfer(AccountId::wallet(owner), vault.clone(), filled_cost);
        batch.transfer(AccountId::wallet(owner), vault, locked_collateral);
        self.ledger.commit(batch)?;

        // Phase 4: apply. Nothing below can fail.
        let taker_position_side = match book_side {
            OrderSide::Bid => Side::Yes,
            OrderSide::Ask => Side::No,
        };
        let mut fills = Vec::with_capacity(planned.len());
        for fill in planned {
            book.reduce(fill.maker_order_id, fill.size);

            self.positions
                .entry((market_id.clone(), fill.maker))
                .or_insert_with(|| ClobPosition::new(fill.maker, market_id.clone()))
                .credit(fill.maker_position_side, fill.size);
            self.positions
                .entry((market_id.clone(), owner))
                .or_insert_with(|| ClobPosition::new(owner, market_id.clone()))
                .credit(taker_position_side, fill.size);

            // Counters are informational and the apply phase cannot fail;
            // saturate rather than panic.
            market.total_volume_shares = market.total_volume_shares.saturating_add(fill.size);
            market.total_volume_notional = market
                .total_volume_notional
                .saturating_add(fill.price.saturating_mul(fill.size));

            debug!(
                market = %market_id,
                maker_order = %fill.maker_order_id,
                price = fill.price,
                size = fill.size,
                "Fill executed"
            );
            fills.push(Fill {
                maker_order_id: fill.maker_order_id,
                maker: fill.maker,
                taker: owner,
                price: fill.price,
                size: fill.size,
                taker_side: book_side,
                timestamp: now,
            });
        }

        let resting = if remaining > 0 {
            let id = book.next_id();
            book.insert(Order {
                id,
                owner,
                side: book_side,
                price: book_price,
                size: remaining,
                timestamp: now,
            });
            debug!(
                market = %market_id,
                order = %id,
                side = %book_side,
                price = book_price,
                size = remaining,
                "Order resting"
            );
            Some(id)
        } else {
            None
        };

        Ok(PlaceResult {
            fills,
            resting,
            filled_cost,
            locked_collateral,
        })
    }

    /// Cancel a resting order by stable id, refunding its escrow exactly
    ///
    /// Allowed after resolution too: a resting order can never fill again,
    /// and cancelling is the only way its collateral leaves the vault.
    pub fn cancel_order(
        &mut self,
        owner: OwnerId,
        market_id: &MarketId,
        order_id: OrderId,
    ) -> Result<CancelResult> {
        if !self.markets.contains_key(market_id) {
            return Err(ClobError::MarketNotFound(market_id.clone()));
        }
        let book = self.books.get_mut(market_id).expect("book exists for market");

        let order = book.get(order_id).ok_or(ClobError::OrderNotFound(order_id))?;
        if order.owner != owner {
            return Err(ClobError::NotOrderOwner(order_id));
        }
        let refunded = order.collateral()?;

        let mut batch = TransferBatch::new();
        batch.transfer(
            AccountId::clob_vault(market_id.clone()),
            AccountId::wallet(owner),
            refunded,
        );
        self.ledger.commit(batch)?;

        let order = book.remove(order_id).expect("order checked above");
        info!(market = %market_id, order = %order_id, refunded, "Order cancelled");
        Ok(CancelResult { order, refunded })
    }

    /// Fix the winning side
    ///
    /// Authority-only, one-way: a resolved market never trades again.
    pub fn resolve_market(
        &mut self,
        authority: OwnerId,
        market_id: &MarketId,
        winning_side: Side,
    ) -> Result<()> {
        let market = self
            .markets
            .get_mut(market_id)
            .ok_or_else(|| ClobError::MarketNotFound(market_id.clone()))?;

        if market.resolved {
            return Err(ClobError::AlreadyResolved);
        }
        if authority != market.authority {
            return Err(ClobError::Unauthorized);
        }

        market.resolved = true;
        market.winning_side = Some(winning_side);

        info!(market = %market_id, winning_side = %winning_side, "Clob market resolved");
        Ok(())
    }

    /// Claim the payout for winning shares
    ///
    /// Pays `shares * 10000`, asserting vault solvency before the transfer;
    /// the winning side is zeroed so a second claim finds nothing.
    pub fn claim_winnings(&mut self, claimer: OwnerId, market_id: &MarketId) -> Result<Amount> {
        let market = self
            .markets
            .get(market_id)
            .ok_or_else(|| ClobError::MarketNotFound(market_id.clone()))?;

        if !market.resolved {
            return Err(ClobError::MarketNotResolved);
        }
        let winning_side = market.winning_side.ok_or(ClobError::MarketNotResolved)?;

        let shares = self
            .positions
            .get(&(market_id.clone(), claimer))
            .map(|p| p.shares(winning_side))
            .unwrap_or(0);
        if shares == 0 {
            return Err(ClobError::NoWinnings);
        }

        let payout = clob_payout(shares)?;

        let vault = AccountId::clob_vault(market_id.clone());
        check_solvency(self.ledger.balance(&vault), payout)?;

        let mut batch = TransferBatch::new();
        batch.transfer(vault, AccountId::wallet(claimer), payout);
        self.ledger.commit(batch)?;

        let position = self
            .positions
            .get_mut(&(market_id.clone(), claimer))
            .expect("position checked above");
        position.take(winning_side);

        info!(
            market = %market_id,
            claimer = %claimer,
            shares,
            payout,
            "Clob winnings claimed"
        );
        Ok(payout)
    }

    /// Look up a market
    pub fn market(&self, market_id: &MarketId) -> Option<&ClobMarket> {
        self.markets.get(market_id)
    }

    /// Look up a market's book
    pub fn book(&self, market_id: &MarketId) -> Option<&OrderBook> {
        self.books.get(market_id)
    }

    /// Look up a position
    pub fn position(&self, market_id: &MarketId, owner: &OwnerId) -> Option<&ClobPosition> {
        self.positions.get(&(market_id.clone(), *owner))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;
    use ledger::InMemoryLedger;

    struct Fixture {
        engine: ClobEngine,
        ledger: Arc<InMemoryLedger>,
        authority: OwnerId,
        market: MarketId,
        now: DateTime<Utc>,
    }

    fn fixture() -> Fixture {
        fixture_with_cap(BookLimits::default())
    }

    fn fixture_with_cap(book_limits: BookLimits) -> Fixture {
        let ledger = Arc::new(InMemoryLedger::new());
        let mut engine = ClobEngine::new(ledger.clone(), MarketLimits::default(), book_limits);
        let authority = OwnerId::new();
        let market = MarketId::from("btc-100k");
        let now = Utc::now();
        engine
            .create_market(
                authority,
                market.clone(),
                "BTC above 100k at year end?".to_string(),
                now + Duration::hours(24),
                now,
            )
            .unwrap();
        Fixture {
            engine,
            ledger,
            authority,
            market,
            now,
        }
    }

    impl Fixture {
        fn trader(&self, funds: Amount) -> OwnerId {
            let owner = OwnerId::new();
            self.ledger.deposit(&AccountId::wallet(owner), funds).unwrap();
            owner
        }

        fn vault_balance(&self) -> Amount {
            self.ledger.balance(&AccountId::clob_vault(self.market.clone()))
        }

        fn wallet_balance(&self, owner: OwnerId) -> Amount {
            self.ledger.balance(&AccountId::wallet(owner))
        }

        fn place(
            &mut self,
            owner: OwnerId,
            order_side: OrderSide,
            side: Side,
            price: Amount,
            size: Amount,
        ) -> Result<PlaceResult> {
            let market = self.market.clone();
            let now = self.now;
            self.engine
                .place_order(owner, &market, order_side, side, price, size, now)
        }
    }

    #[test]
    fn test_boundary_prices() {
        let mut f = fixture();
        let trader = f.trader(10_000_000);

        assert_matches!(
            f.place(trader, OrderSide::Bid, Side::Yes, 0, 1),
            Err(ClobError::InvalidPrice(0))
        );
        assert_matches!(
            f.place(trader, OrderSide::Bid, Side::Yes, 10_000, 1),
            Err(ClobError::InvalidPrice(10_000))
        );
        assert!(f.place(trader, OrderSide::Bid, Side::Yes, 1, 1).is_ok());
        assert!(f.place(trader, OrderSide::Bid, Side::Yes, 9_999, 1).is_ok());
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut f = fixture();
        let trader = f.trader(1_000);
        assert_matches!(
            f.place(trader, OrderSide::Bid, Side::Yes, 5_000, 0),
            Err(ClobError::InvalidSize)
        );
    }

    #[test]
    fn test_resting_bid_locks_collateral() {
        let mut f = fixture();
        let trader = f.trader(1_000_000);

        let result = f.place(trader, OrderSide::Bid, Side::Yes, 4_000, 10).unwrap();
        assert!(result.fills.is_empty());
        assert!(result.resting.is_some());
        assert_eq!(result.locked_collateral, 40_000);
        assert_eq!(f.wallet_balance(trader), 960_000);
        assert_eq!(f.vault_balance(), 40_000);
    }

    #[test]
    fn test_resting_ask_locks_inverse_collateral() {
        let mut f = fixture();
        let trader = f.trader(1_000_000);

        let result = f.place(trader, OrderSide::Ask, Side::Yes, 4_000, 10).unwrap();
        assert_eq!(result.locked_collateral, 60_000);
        assert_eq!(f.vault_balance(), 60_000);
    }

    #[test]
    fn test_no_inversion_equivalence() {
        // A BID for NO at 4000 and an ASK for YES at 6000 must be
        // indistinguishable in the stored book.
        let mut f = fixture();
        let a = f.trader(1_000_000);
        let b = f.trader(1_000_000);

        f.place(a, OrderSide::Bid, Side::No, 4_000, 10).unwrap();
        f.place(b, OrderSide::Ask, Side::Yes, 6_000, 10).unwrap();

        let book = f.engine.book(&f.market).unwrap();
        assert_eq!(book.side_len(OrderSide::Bid), 0);
        let asks: Vec<_> = book.side_orders(OrderSide::Ask).collect();
        assert_eq!(asks.len(), 2);
        assert_eq!((asks[0].side, asks[0].price, asks[0].size), (OrderSide::Ask, 6_000, 10));
        assert_eq!((asks[1].side, asks[1].price, asks[1].size), (OrderSide::Ask, 6_000, 10));

        // Both lock the same collateral: 4000 per share.
        assert_eq!(f.vault_balance(), 2 * 40_000);
    }

    #[test]
    fn test_maker_price_execution_and_both_sides_credited() {
        // Maker rests ASK 100 @ 5000; taker BIDs 100 @ 6000. The fill
        // executes at 5000, the taker pays 5000 per share (their limit
        // price improvement is never charged), and BOTH positions are
        // credited.
        let mut f = fixture();
        let maker = f.trader(1_000_000);
        let taker = f.trader(1_000_000);

        f.place(maker, OrderSide::Ask, Side::Yes, 5_000, 100).unwrap();
        let result = f.place(taker, OrderSide::Bid, Side::Yes, 6_000, 100).unwrap();

        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].price, 5_000);
        assert_eq!(result.fills[0].size, 100);
        assert!(result.fully_filled());
        assert_eq!(result.filled_cost, 500_000);

        // Taker paid at the execution price, not the limit.
        assert_eq!(f.wallet_balance(taker), 1_000_000 - 500_000);

        // Taker got YES, maker got NO.
        assert_eq!(f.engine.position(&f.market, &taker).unwrap().yes_shares, 100);
        assert_eq!(f.engine.position(&f.market, &maker).unwrap().no_shares, 100);

        // The ask is fully removed and the vault holds one full payout per
        // share: maker escrowed 5000/share, taker paid 5000/share.
        let book = f.engine.book(&f.market).unwrap();
        assert!(book.is_empty());
        assert_eq!(f.vault_balance(), 100 * PAYOUT_PER_SHARE);
    }

    #[test]
    fn test_price_time_priority() {
        // Asks inserted at 4000, 6000, 5000: a large taker bid fills 4000
        // then 5000, never 6000 first.
        let mut f = fixture();
        let m1 = f.trader(1_000_000);
        let m2 = f.trader(1_000_000);
        let m3 = f.trader(1_000_000);
        let taker = f.trader(10_000_000);

        f.place(m1, OrderSide::Ask, Side::Yes, 4_000, 10).unwrap();
        f.place(m2, OrderSide::Ask, Side::Yes, 6_000, 10).unwrap();
        f.place(m3, OrderSide::Ask, Side::Yes, 5_000, 10).unwrap();

        let result = f.place(taker, OrderSide::Bid, Side::Yes, 5_500, 20).unwrap();
        assert_eq!(result.fills.len(), 2);
        assert_eq!(result.fills[0].price, 4_000);
        assert_eq!(result.fills[1].price, 5_000);
        assert!(result.fully_filled());

        // The 6000 ask is untouched.
        let book = f.engine.book(&f.market).unwrap();
        assert_eq!(book.best(OrderSide::Ask).unwrap().price, 6_000);
    }

    #[test]
    fn test_time_priority_within_price_level() {
        let mut f = fixture();
        let first = f.trader(1_000_000);
        let second = f.trader(1_000_000);
        let taker = f.trader(1_000_000);

        f.place(first, OrderSide::Ask, Side::Yes, 5_000, 10).unwrap();
        f.place(second, OrderSide::Ask, Side::Yes, 5_000, 10).unwrap();

        let result = f.place(taker, OrderSide::Bid, Side::Yes, 5_000, 10).unwrap();
        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].maker, first);
        assert_eq!(f.engine.position(&f.market, &first).unwrap().no_shares, 10);
        assert_eq!(f.engine.position(&f.market, &second).unwrap().no_shares, 0);
    }

    #[test]
    fn test_partial_fill_rests_remainder_at_limit_price() {
        let mut f = fixture();
        let maker = f.trader(1_000_000);
        let taker = f.trader(1_000_000);

        f.place(maker, OrderSide::Ask, Side::Yes, 4_000, 30).unwrap();
        let result = f.place(taker, OrderSide::Bid, Side::Yes, 4_500, 100).unwrap();

        assert_eq!(result.filled_size(), 30);
        assert_eq!(result.filled_cost, 30 * 4_000);
        // Remainder rests at the taker's limit, locking limit-price collateral.
        assert_eq!(result.locked_collateral, 70 * 4_500);
        let resting = result.resting.unwrap();
        let order = f.engine.book(&f.market).unwrap().get(resting).unwrap();
        assert_eq!((order.side, order.price, order.size), (OrderSide::Bid, 4_500, 70));

        assert_eq!(
            f.wallet_balance(taker),
            1_000_000 - 30 * 4_000 - 70 * 4_500
        );
    }

    #[test]
    fn test_no_side_taker_crosses_yes_ask() {
        // An ASK for NO at 6000 inverts to a BID for YES at 4000, which
        // crosses a resting YES ask at 3500.
        let mut f = fixture();
        let maker = f.trader(1_000_000);
        let taker = f.trader(1_000_000);

        f.place(maker, OrderSide::Ask, Side::Yes, 3_500, 10).unwrap();
        let result = f.place(taker, OrderSide::Ask, Side::No, 6_000, 10).unwrap();

        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].price, 3_500);
        // The taker ends up long YES (selling NO is buying YES).
        assert_eq!(f.engine.position(&f.market, &taker).unwrap().yes_shares, 10);
        assert_eq!(f.engine.position(&f.market, &maker).unwrap().no_shares, 10);
    }

    #[test]
    fn test_order_book_full_per_side() {
        let mut f = fixture_with_cap(BookLimits { max_resting_per_side: 2 });
        let trader = f.trader(10_000_000);

        f.place(trader, OrderSide::Bid, Side::Yes, 1_000, 1).unwrap();
        f.place(trader, OrderSide::Bid, Side::Yes, 1_100, 1).unwrap();
        assert_matches!(
            f.place(trader, OrderSide::Bid, Side::Yes, 1_200, 1),
            Err(ClobError::OrderBookFull { cap: 2 })
        );

        // The ask side has its own cap.
        f.place(trader, OrderSide::Ask, Side::Yes, 9_000, 1).unwrap();
        f.place(trader, OrderSide::Ask, Side::Yes, 9_100, 1).unwrap();
        assert_matches!(
            f.place(trader, OrderSide::Ask, Side::Yes, 9_200, 1),
            Err(ClobError::OrderBookFull { cap: 2 })
        );
    }

    #[test]
    fn test_insufficient_funds_leaves_no_state() {
        let mut f = fixture();
        let trader = f.trader(100);

        let err = f.place(trader, OrderSide::Bid, Side::Yes, 5_000, 10);
        assert_matches!(err, Err(ClobError::Ledger(_)));

        assert!(f.engine.book(&f.market).unwrap().is_empty());
        assert_eq!(f.wallet_balance(trader), 100);
        assert_eq!(f.vault_balance(), 0);
    }

    #[test]
    fn test_cancel_refunds_exact_collateral() {
        let mut f = fixture();
        let trader = f.trader(1_000_000);

        let result = f.place(trader, OrderSide::Bid, Side::Yes, 4_000, 10).unwrap();
        let order_id = result.resting.unwrap();

        let cancel = f.engine.cancel_order(trader, &f.market.clone(), order_id).unwrap();
        assert_eq!(cancel.refunded, 40_000);
        assert_eq!(f.wallet_balance(trader), 1_000_000);
        assert_eq!(f.vault_balance(), 0);
        assert!(f.engine.book(&f.market).unwrap().is_empty());
    }

    #[test]
    fn test_cancel_requires_ownership_and_live_id() {
        let mut f = fixture();
        let trader = f.trader(1_000_000);
        let stranger = f.trader(0);

        let result = f.place(trader, OrderSide::Bid, Side::Yes, 4_000, 10).unwrap();
        let order_id = result.resting.unwrap();

        assert_matches!(
            f.engine.cancel_order(stranger, &f.market.clone(), order_id),
            Err(ClobError::NotOrderOwner(_))
        );
        assert_matches!(
            f.engine.cancel_order(trader, &f.market.clone(), OrderId(999)),
            Err(ClobError::OrderNotFound(OrderId(999)))
        );

        // A cancelled id stays dead.
        f.engine.cancel_order(trader, &f.market.clone(), order_id).unwrap();
        assert_matches!(
            f.engine.cancel_order(trader, &f.market.clone(), order_id),
            Err(ClobError::OrderNotFound(_))
        );
    }

    #[test]
    fn test_stable_ids_survive_book_mutation() {
        // Cancelling an earlier order must not redirect a later handle.
        let mut f = fixture();
        let trader = f.trader(1_000_000);

        let a = f.place(trader, OrderSide::Bid, Side::Yes, 4_000, 1).unwrap().resting.unwrap();
        let b = f.place(trader, OrderSide::Bid, Side::Yes, 4_000, 2).unwrap().resting.unwrap();

        f.engine.cancel_order(trader, &f.market.clone(), a).unwrap();
        let cancel = f.engine.cancel_order(trader, &f.market.clone(), b).unwrap();
        assert_eq!(cancel.order.size, 2);
    }

    #[test]
    fn test_no_orders_after_resolution() {
        let mut f = fixture();
        let trader = f.trader(1_000_000);
        f.engine.resolve_market(f.authority, &f.market.clone(), Side::Yes).unwrap();

        assert_matches!(
            f.place(trader, OrderSide::Bid, Side::Yes, 5_000, 1),
            Err(ClobError::MarketResolved)
        );
        assert_eq!(f.wallet_balance(trader), 1_000_000);
    }

    #[test]
    fn test_no_orders_after_expiry() {
        let mut f = fixture();
        let trader = f.trader(1_000_000);
        f.now += Duration::hours(25);

        assert_matches!(
            f.place(trader, OrderSide::Bid, Side::Yes, 5_000, 1),
            Err(ClobError::MarketExpired)
        );
    }

    #[test]
    fn test_resolution_is_authority_gated_and_one_way() {
        let mut f = fixture();
        assert_matches!(
            f.engine.resolve_market(OwnerId::new(), &f.market.clone(), Side::Yes),
            Err(ClobError::Unauthorized)
        );
        f.engine.resolve_market(f.authority, &f.market.clone(), Side::No).unwrap();
        assert_matches!(
            f.engine.resolve_market(f.authority, &f.market.clone(), Side::Yes),
            Err(ClobError::AlreadyResolved)
        );
        assert_eq!(f.engine.market(&f.market).unwrap().winning_side, Some(Side::No));
    }

    #[test]
    fn test_claim_pays_full_payout_per_share() {
        let mut f = fixture();
        let maker = f.trader(1_000_000);
        let taker = f.trader(1_000_000);

        f.place(maker, OrderSide::Ask, Side::Yes, 5_000, 100).unwrap();
        f.place(taker, OrderSide::Bid, Side::Yes, 5_000, 100).unwrap();
        f.engine.resolve_market(f.authority, &f.market.clone(), Side::Yes).unwrap();

        let payout = f.engine.claim_winnings(taker, &f.market.clone()).unwrap();
        assert_eq!(payout, 100 * PAYOUT_PER_SHARE);
        assert_eq!(f.wallet_balance(taker), 1_000_000 - 500_000 + 1_000_000);
        assert_eq!(f.vault_balance(), 0);

        // The maker's NO shares lost; nothing to claim.
        assert_matches!(
            f.engine.claim_winnings(maker, &f.market.clone()),
            Err(ClobError::NoWinnings)
        );
    }

    #[test]
    fn test_double_claim_fails_and_changes_nothing() {
        let mut f = fixture();
        let maker = f.trader(1_000_000);
        let taker = f.trader(1_000_000);

        f.place(maker, OrderSide::Ask, Side::Yes, 5_000, 10).unwrap();
        f.place(taker, OrderSide::Bid, Side::Yes, 5_000, 10).unwrap();
        f.engine.resolve_market(f.authority, &f.market.clone(), Side::Yes).unwrap();
        f.engine.claim_winnings(taker, &f.market.clone()).unwrap();

        let balance = f.wallet_balance(taker);
        assert_matches!(
            f.engine.claim_winnings(taker, &f.market.clone()),
            Err(ClobError::NoWinnings)
        );
        assert_eq!(f.wallet_balance(taker), balance);
    }

    #[test]
    fn test_claim_before_resolution_fails() {
        let mut f = fixture();
        let taker = f.trader(1_000_000);
        f.place(taker, OrderSide::Bid, Side::Yes, 5_000, 10).unwrap();

        assert_matches!(
            f.engine.claim_winnings(taker, &f.market.clone()),
            Err(ClobError::MarketNotResolved)
        );
    }

    #[test]
    fn test_claim_asserts_vault_solvency() {
        let mut f = fixture();
        let maker = f.trader(1_000_000);
        let taker = f.trader(1_000_000);

        f.place(maker, OrderSide::Ask, Side::Yes, 5_000, 10).unwrap();
        f.place(taker, OrderSide::Bid, Side::Yes, 5_000, 10).unwrap();
        f.engine.resolve_market(f.authority, &f.market.clone(), Side::Yes).unwrap();

        // Drain the vault out from under the engine to simulate external
        // corruption of the market account.
        let mut batch = TransferBatch::new();
        batch.transfer(
            AccountId::clob_vault(f.market.clone()),
            AccountId::wallet(OwnerId::new()),
            f.vault_balance(),
        );
        f.ledger.commit(batch).unwrap();

        let err = f.engine.claim_winnings(taker, &f.market.clone());
        assert_matches!(
            err,
            Err(ClobError::Settlement(
                SettlementError::InsufficientVaultBalance { required: 100_000, available: 0 }
            ))
        );
        // The position is untouched and claimable once the vault is refunded.
        assert_eq!(f.engine.position(&f.market, &taker).unwrap().yes_shares, 10);
    }

    #[test]
    fn test_vault_covers_resting_collateral_and_matched_pairs() {
        let mut f = fixture();
        let a = f.trader(10_000_000);
        let b = f.trader(10_000_000);
        let supply = f.ledger.total_supply();

        f.place(a, OrderSide::Ask, Side::Yes, 4_000, 50).unwrap();
        f.place(b, OrderSide::Bid, Side::Yes, 4_500, 30).unwrap(); // fills 30, 20 ask rests
        f.place(b, OrderSide::Bid, Side::No, 7_000, 10).unwrap(); // rests as YES ask @ 3000
        f.place(a, OrderSide::Bid, Side::Yes, 2_000, 5).unwrap(); // rests

        let book = f.engine.book(&f.market).unwrap();
        let matched_pairs = 30;
        assert!(f.vault_balance() >= book.resting_collateral() + matched_pairs * PAYOUT_PER_SHARE);

        // No operation creates or destroys funds.
        assert_eq!(f.ledger.total_supply(), supply);
    }

    #[test]
    fn test_cancel_allowed_after_resolution() {
        let mut f = fixture();
        let trader = f.trader(1_000_000);
        let order_id = f
            .place(trader, OrderSide::Bid, Side::Yes, 4_000, 10)
            .unwrap()
            .resting
            .unwrap();

        f.engine.resolve_market(f.authority, &f.market.clone(), Side::No).unwrap();
        let cancel = f.engine.cancel_order(trader, &f.market.clone(), order_id).unwrap();
        assert_eq!(cancel.refunded, 40_000);
        assert_eq!(f.wallet_balance(trader), 1_000_000);
    }

    #[test]
    fn test_volume_counters_track_fills() {
        let mut f = fixture();
        let maker = f.trader(1_000_000);
        let taker = f.trader(1_000_000);

        f.place(maker, OrderSide::Ask, Side::Yes, 4_000, 25).unwrap();
        f.place(taker, OrderSide::Bid, Side::Yes, 4_000, 25).unwrap();

        let market = f.engine.market(&f.market).unwrap();
        assert_eq!(market.total_volume_shares, 25);
        assert_eq!(market.total_volume_notional, 25 * 4_000);
    }

    #[test]
    fn test_create_market_validations() {
        let mut f = fixture();
        assert_matches!(
            f.engine.create_market(
                f.authority,
                f.market.clone(),
                "duplicate".to_string(),
                f.now + Duration::hours(1),
                f.now,
            ),
            Err(ClobError::DuplicateMarket(_))
        );
        assert_matches!(
            f.engine.create_market(
                f.authority,
                MarketId::from("past"),
                "q".to_string(),
                f.now - Duration::hours(1),
                f.now,
            ),
            Err(ClobError::InvalidResolutionTime)
        );
        assert_matches!(
            f.engine.create_market(
                f.authority,
                MarketId::new("x".repeat(40)),
                "q".to_string(),
                f.now + Duration::hours(1),
                f.now,
            ),
            Err(ClobError::MarketIdTooLong { got: 40, max: 32 })
        );
    }
}
