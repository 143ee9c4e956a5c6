//! Overflow-checked arithmetic and the collateral formulas.
//!
//! Every mutation of balances, supply or collateral goes through the guarded
//! operations here; raw operator arithmetic on protocol amounts is not
//! permitted outside this module. The collateral and ratio formulas truncate
//! at each division step in a fixed order, and that order is load-bearing:
//! reordering the multiply/divide steps changes rounding at the boundaries.

use odra::casper_types::U256;

use crate::errors::SynthError;

/// Minimum mint: 1.00 synthetic token at 8-decimal fixed point
pub const MINIMUM_MINT: u64 = 100_000_000;

/// Required over-collateralization at mint time, in percent
pub const COLLATERAL_RATIO_PERCENT: u64 = 150;

/// Ratio below which a vault can be liquidated
pub const LIQUIDATION_THRESHOLD: u64 = 120;

/// Oracle staleness window, in host block-time units
pub const PRICE_EXPIRY_WINDOW: u64 = 900;

/// Sanity ceiling for oracle prices; `update_price` rejects values at or above it
pub const MAXIMUM_PRICE: u64 = 1_000_000_000_000;

/// Price fixed-point denominator (price 100 = 1.00 units of collateral)
pub const PRICE_DENOMINATOR: u64 = 100;

/// Percentage scaling used by the ratio formula
pub const RATIO_SCALE: u64 = 100;

/// Guarded addition
pub fn checked_add(a: U256, b: U256) -> Result<U256, SynthError> {
    a.checked_add(b).ok_or(SynthError::ArithmeticOverflow)
}

/// Guarded subtraction; fails when `a < b`
pub fn checked_sub(a: U256, b: U256) -> Result<U256, SynthError> {
    a.checked_sub(b).ok_or(SynthError::ArithmeticUnderflow)
}

/// Guarded multiplication
pub fn checked_mul(a: U256, b: U256) -> Result<U256, SynthError> {
    a.checked_mul(b).ok_or(SynthError::ArithmeticOverflow)
}

/// Collateral required to mint `amount` synthetic tokens at `price`.
///
/// `amount * (price / 100)`, then `* 150 / 100` — each division truncates
/// before the next step.
pub fn required_collateral(amount: U256, price: U256) -> Result<U256, SynthError> {
    let unit_price = price / U256::from(PRICE_DENOMINATOR);
    let base_collateral = checked_mul(amount, unit_price)?;
    let scaled = checked_mul(base_collateral, U256::from(COLLATERAL_RATIO_PERCENT))?;
    Ok(scaled / U256::from(RATIO_SCALE))
}

/// Collateral ratio of a vault as a percentage-like integer.
///
/// `(collateral * 100 * 100) / (minted * price)`, truncating once at the end.
pub fn collateral_ratio(
    collateral: U256,
    minted: U256,
    price: U256,
) -> Result<U256, SynthError> {
    let numerator = checked_mul(
        checked_mul(collateral, U256::from(RATIO_SCALE))?,
        U256::from(RATIO_SCALE),
    )?;
    let denominator = checked_mul(minted, price)?;
    if denominator.is_zero() {
        // minted > 0 is checked upstream and price 0 is never stored, but the
        // division must not be reachable with a zero denominator.
        return Err(SynthError::VaultNotFound);
    }
    Ok(numerator / denominator)
}

/// Collateral released when burning `amount` out of `minted`.
///
/// `(collateral * amount) / minted`, truncating.
pub fn proportional_release(
    collateral: U256,
    amount: U256,
    minted: U256,
) -> Result<U256, SynthError> {
    if minted.is_zero() {
        return Err(SynthError::VaultNotFound);
    }
    let scaled = checked_mul(collateral, amount)?;
    Ok(scaled / minted)
}
