//! Common types for OutcomeExchange
//!
//! This crate provides the shared identifiers and units used across
//! all OutcomeExchange crates.
//!
//! # Modules
//!
//! - [`types`] - Shared domain types (MarketId, OwnerId, OrderId, Side, etc.)

pub mod types;

pub use types::*;
