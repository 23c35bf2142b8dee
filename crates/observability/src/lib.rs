//! Observability infrastructure for OutcomeExchange
//!
//! This crate provides structured logging via tracing.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("settlement-core", LogFormat::Pretty)?;
//! tracing::info!("Core started");
//! ```

pub mod logging;

pub use logging::{init_from_config, init_logging, LogFormat};
