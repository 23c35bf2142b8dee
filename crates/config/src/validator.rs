//! Configuration validation

use crate::CoreConfig;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("min_outcomes must be at least 2, got {0}")]
    MinOutcomesTooSmall(usize),

    #[error("max_outcomes must not exceed 10, got {0}")]
    MaxOutcomesTooLarge(usize),

    #[error("max_outcomes ({max}) must not be below min_outcomes ({min})")]
    OutcomeRangeInverted { min: usize, max: usize },

    #[error("max_market_id_len must be a positive integer")]
    InvalidMarketIdLen,

    #[error("max_question_len must be a positive integer")]
    InvalidQuestionLen,

    #[error("max_resting_per_side must be a positive integer")]
    InvalidBookCap,

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),
}

/// Validate a loaded configuration
pub fn validate_config(config: &CoreConfig) -> Result<(), ValidationError> {
    let market = &config.market;
    if market.min_outcomes < 2 {
        return Err(ValidationError::MinOutcomesTooSmall(market.min_outcomes));
    }
    if market.max_outcomes > 10 {
        return Err(ValidationError::MaxOutcomesTooLarge(market.max_outcomes));
    }
    if market.max_outcomes < market.min_outcomes {
        return Err(ValidationError::OutcomeRangeInverted {
            min: market.min_outcomes,
            max: market.max_outcomes,
        });
    }
    if market.max_market_id_len == 0 {
        return Err(ValidationError::InvalidMarketIdLen);
    }
    if market.max_question_len == 0 {
        return Err(ValidationError::InvalidQuestionLen);
    }

    if config.book.max_resting_per_side == 0 {
        return Err(ValidationError::InvalidBookCap);
    }

    match config.logging.format.as_str() {
        "pretty" | "json" | "compact" => {}
        other => return Err(ValidationError::InvalidLogFormat(other.to_string())),
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
