//! Parimutuel Pool Engine for OutcomeExchange
//!
//! Discrete-outcome markets settled against a shared stake pool: every
//! stake joins its outcome's pool, and after resolution the whole pool
//! (minus the 2% protocol fee) is split among winning stakes pro rata.
//!
//! CRITICAL PROPERTIES:
//! 1. `total_pool == Σ outcome_pools` after every operation
//! 2. Resolution is a one-way transition, performed exactly once
//! 3. A position's winning entry pays out at most once
//! 4. Every operation is all-or-nothing: a failed validation or ledger
//!    commit leaves no state change behind

pub mod engine;
pub mod error;
pub mod market;
pub mod store;

pub use engine::PoolEngine;
pub use error::PoolError;
pub use market::{Market, Position};
pub use store::{InMemoryPoolStore, PoolStore};

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;
