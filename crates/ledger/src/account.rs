//! Account addressing and transfer batches

use common::{Amount, MarketId, OwnerId};
use serde::{Deserialize, Serialize};

/// Deterministic account address
///
/// Every account the core touches is derived from a fixed namespace plus the
/// market id (and owner, for wallets). There is no other way to name an
/// account, so two operations on the same market always load the same keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountId {
    /// A bettor's wallet
    Wallet { owner: OwnerId },
    /// The pool account of a parimutuel market (stakes plus unclaimed fee)
    PoolMarket { market: MarketId },
    /// The escrow vault of an order-book market
    ClobVault { market: MarketId },
}

impl AccountId {
    /// Wallet account for an owner
    pub fn wallet(owner: OwnerId) -> Self {
        Self::Wallet { owner }
    }

    /// Pool account for a parimutuel market
    pub fn pool_market(market: MarketId) -> Self {
        Self::PoolMarket { market }
    }

    /// Escrow vault for an order-book market
    pub fn clob_vault(market: MarketId) -> Self {
        Self::ClobVault { market }
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountId::Wallet { owner } => write!(f, "wallet/{owner}"),
            AccountId::PoolMarket { market } => write!(f, "pool/{market}"),
            AccountId::ClobVault { market } => write!(f, "vault/{market}"),
        }
    }
}

/// A single balance movement inside a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
}

/// An ordered list of transfers applied atomically
///
/// Later transfers see the balances produced by earlier ones, so a batch may
/// move funds through an account that starts empty. Zero-amount transfers
/// are dropped at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBatch {
    transfers: Vec<Transfer>,
}

impl TransferBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transfer to the batch (zero amounts are skipped)
    pub fn transfer(&mut self, from: AccountId, to: AccountId, amount: Amount) -> &mut Self {
        if amount > 0 {
            self.transfers.push(Transfer { from, to, amount });
        }
        self
    }

    /// The transfers in application order
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Whether the batch contains any transfers
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Number of transfers in the batch
    pub fn len(&self) -> usize {
        self.transfers.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
