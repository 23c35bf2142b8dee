//! Configuration for the OutcomeExchange settlement core
//!
//! Loads a YAML file into [`CoreConfig`], substituting `${VAR}` environment
//! placeholders, applying defaults for anything omitted, and validating the
//! result. The defaults reproduce the protocol constants (2-10 outcomes,
//! 50 resting orders per book side), so an empty file is a valid config.

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub market: MarketLimits,
    #[serde(default)]
    pub book: BookLimits,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Limits applied at market creation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarketLimits {
    /// Fewest outcomes a parimutuel market may have
    #[serde(default = "default_min_outcomes")]
    pub min_outcomes: usize,
    /// Most outcomes a parimutuel market may have
    #[serde(default = "default_max_outcomes")]
    pub max_outcomes: usize,
    /// Longest accepted market id slug, in bytes
    #[serde(default = "default_max_market_id_len")]
    pub max_market_id_len: usize,
    /// Longest accepted market question, in bytes
    #[serde(default = "default_max_question_len")]
    pub max_question_len: usize,
}

impl Default for MarketLimits {
    fn default() -> Self {
        Self {
            min_outcomes: default_min_outcomes(),
            max_outcomes: default_max_outcomes(),
            max_market_id_len: default_max_market_id_len(),
            max_question_len: default_max_question_len(),
        }
    }
}

/// Limits applied to order books
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookLimits {
    /// Most resting orders a single book side may hold. The cap is per
    /// side, so a market holds at most twice this many resting orders.
    #[serde(default = "default_max_resting_per_side")]
    pub max_resting_per_side: usize,
}

impl Default for BookLimits {
    fn default() -> Self {
        Self {
            max_resting_per_side: default_max_resting_per_side(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Output format: pretty, json or compact
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Default filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
