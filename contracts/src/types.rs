//! Common types used across the synthetic-asset engine.

use odra::casper_types::U256;
use odra::prelude::*;

/// Per-account vault record.
///
/// An all-zero record is the storage representation of "no vault"; queries map
/// it back to `None`.
#[odra::odra_type]
pub struct Vault {
    /// Locked collateral (motes)
    pub collateral: U256,
    /// Synthetic tokens minted against the collateral (8-decimal base units)
    pub minted: U256,
    /// Oracle price snapshot at the last vault write (informational only;
    /// the live price governs ratio checks)
    pub price_at_lock: U256,
}

impl Vault {
    /// Storage convention for a deleted/absent vault.
    pub fn empty() -> Self {
        Self {
            collateral: U256::zero(),
            minted: U256::zero(),
            price_at_lock: U256::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.collateral.is_zero() && self.minted.is_zero()
    }
}

/// Oracle price data returned by queries
#[odra::odra_type]
pub struct PriceInfo {
    /// Price value (2-decimal fixed point, 100 = 1.00)
    pub value: U256,
    /// Block time at which the price was last set
    pub updated_at: u64,
    /// Whether the price is within the expiry window right now
    pub is_fresh: bool,
}

/// Aggregate engine state for off-chain inspection
#[odra::odra_type]
pub struct ProtocolStatus {
    /// Current oracle price
    pub oracle_price: U256,
    /// Total synthetic supply
    pub total_supply: U256,
    /// Sum of collateral across all live vaults
    pub total_locked: U256,
    /// Whether price-dependent operations would pass the staleness check
    pub price_is_fresh: bool,
}
