//! Order Book Matching Engine for OutcomeExchange
//!
//! Binary YES/NO markets settled against a price-time priority limit order
//! book. Prices are basis points of a 10000-unit payout per share: a bid
//! escrows `price` per share, an ask escrows `10000 - price`, and every
//! matched pair leaves exactly one full payout in the market vault for
//! whichever side wins.
//!
//! CRITICAL PROPERTIES:
//! 1. Deterministic price-time priority, execution at the maker's price
//! 2. The book stores YES orders only; NO intents are inverted on the way in
//!    (a bid for NO at `p` is an ask for YES at `10000 - p`)
//! 3. Orders have stable ids; cancels address the slab, never a list index
//! 4. Both sides of a fill are credited: the taker and the maker each
//!    receive their outcome shares in the same transition
//! 5. The vault always covers resting collateral plus unclaimed winnings,
//!    and every claim asserts solvency before transferring

pub mod domain;
pub mod engine;
pub mod error;
pub mod result;
pub mod store;

pub use domain::{ClobMarket, ClobPosition, Fill, Order, OrderBook};
pub use engine::ClobEngine;
pub use error::ClobError;
pub use result::{CancelResult, PlaceResult};
pub use store::{ClobStore, InMemoryClobStore};

/// Result type for order-book operations
pub type Result<T> = std::result::Result<T, ClobError>;
