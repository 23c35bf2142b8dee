//! Payout and collateral arithmetic
//!
//! CRITICAL PROPERTIES:
//! 1. Deterministic: pure integer math, floor division only
//! 2. Overflow-safe: products widen to `u128`, results checked back to `u64`
//! 3. Fee is exactly 2% of the gross payout, floored

use common::{Amount, OrderSide};
use serde::{Deserialize, Serialize};

use crate::error::SettlementError;
use crate::Result;

/// Protocol fee divisor: `gross / 50` is exactly 2%
pub const FEE_DIVISOR: Amount = 50;

/// Full payout per winning order-book share, in base units.
/// Prices are basis points of this value.
pub const PAYOUT_PER_SHARE: Amount = 10_000;

/// Lowest accepted order price (1 basis point)
pub const MIN_PRICE: Amount = 1;

/// Highest accepted order price (9999 basis points)
pub const MAX_PRICE: Amount = PAYOUT_PER_SHARE - 1;

/// A computed parimutuel payout, before transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Pro-rata share of the total pool
    pub gross: Amount,
    /// Protocol fee withheld (stays in the market account)
    pub fee: Amount,
    /// Amount actually paid to the claimer
    pub net: Amount,
}

/// Compute a parimutuel claim
///
/// `gross = floor(winner_shares * total_pool / winning_pool)`, then the 2%
/// fee is floored off. The fee is never swept anywhere; callers leave it in
/// the market account.
pub fn pool_payout(
    winner_shares: Amount,
    winning_pool: Amount,
    total_pool: Amount,
) -> Result<Payout> {
    if winner_shares == 0 {
        return Err(SettlementError::NothingToClaim);
    }
    if winning_pool == 0 {
        return Err(SettlementError::EmptyWinningPool);
    }

    let gross = (winner_shares as u128)
        .checked_mul(total_pool as u128)
        .ok_or(SettlementError::AmountOverflow)?
        / winning_pool as u128;
    let gross = Amount::try_from(gross).map_err(|_| SettlementError::AmountOverflow)?;

    let fee = gross / FEE_DIVISOR;
    Ok(Payout {
        gross,
        fee,
        net: gross - fee,
    })
}

/// Compute an order-book claim: each winning share pays out in full
pub fn clob_payout(winning_shares: Amount) -> Result<Amount> {
    if winning_shares == 0 {
        return Err(SettlementError::NothingToClaim);
    }
    winning_shares
        .checked_mul(PAYOUT_PER_SHARE)
        .ok_or(SettlementError::AmountOverflow)
}

/// Collateral locked by a resting order
///
/// A bid pays `price` per share if it wins the fill; an ask underwrites the
/// other side, `PAYOUT_PER_SHARE - price` per share. A matched pair together
/// escrows exactly one full payout per share.
pub fn order_collateral(side: OrderSide, price: Amount, size: Amount) -> Result<Amount> {
    let per_share = match side {
        OrderSide::Bid => price,
        OrderSide::Ask => PAYOUT_PER_SHARE - price,
    };
    per_share
        .checked_mul(size)
        .ok_or(SettlementError::AmountOverflow)
}

/// What a taker pays for a fill, at the maker's (execution) price
///
/// Charging at the execution price rather than the taker's limit means a
/// price-improved taker never over-pays, so there is nothing to refund.
pub fn fill_cost(taker_side: OrderSide, maker_price: Amount, quantity: Amount) -> Result<Amount> {
    order_collateral(taker_side, maker_price, quantity)
}

/// Assert that a paying account can honor a claim before any transfer
pub fn check_solvency(available: Amount, required: Amount) -> Result<()> {
    if available < required {
        return Err(SettlementError::InsufficientVaultBalance {
            required,
            available,
        });
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
