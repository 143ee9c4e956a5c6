//! CSPR-Synth Contracts
//!
//! Casper-native collateralized synthetic-asset issuance engine.
//!
//! ## Architecture
//!
//! - **SynthEngine**: single contract holding the oracle singleton, the token
//!   ledger and the vault store; every entry point is one atomic deploy
//! - **Math**: overflow-checked arithmetic and the collateral/ratio formulas
//!   shared by mint, burn and liquidation
//!
//! ## Collateral flow
//!
//! Users lock native CSPR (attached to payable entry points) to mint the
//! synthetic token against the oracle price. Burning releases collateral
//! proportionally; vaults whose collateral ratio falls below the liquidation
//! threshold can be closed by any third party, who receives the collateral.

#![cfg_attr(target_arch = "wasm32", no_std)]

#[cfg(target_arch = "wasm32")]
extern crate alloc;

// Re-export odra for downstream usage
pub use odra;

// Core module declarations
pub mod errors;
pub mod math;
pub mod types;

// Contract modules
pub mod engine;
