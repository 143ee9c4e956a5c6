//! Synthetic-asset issuance engine.
//!
//! Single contract holding the oracle singleton, the synthetic token ledger
//! and the per-account vault store. Users lock native CSPR (attached to the
//! payable entry points) to mint the synthetic token against the oracle
//! price, burn to reclaim collateral proportionally, and any third party may
//! liquidate a vault whose collateral ratio falls below the threshold.
//!
//! The contract itself is the collateral escrow: attached value lands on its
//! purse, payouts leave via `transfer_tokens`. Casper executes each entry
//! point as one serialized deploy, so every revert rolls back all writes.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use odra::casper_types::bytesrepr::ToBytes;
use odra::casper_types::{Key, U256, U512};
use odra::prelude::*;

use crate::errors::SynthError;
use crate::math;
use crate::math::{
    LIQUIDATION_THRESHOLD, MAXIMUM_PRICE, MINIMUM_MINT, PRICE_EXPIRY_WINDOW,
};
use crate::types::{PriceInfo, ProtocolStatus, Vault};

/// Synthetic token metadata (CEP-18 mirror)
const TOKEN_NAME: &str = "SYNTH";
const TOKEN_SYMBOL: &str = "SYNTH";
const TOKEN_DECIMALS: u8 = 8;

const CEP18_NAME_KEY: &str = "name";
const CEP18_SYMBOL_KEY: &str = "symbol";
const CEP18_DECIMALS_KEY: &str = "decimals";
const CEP18_TOTAL_SUPPLY_KEY: &str = "total_supply";
const CEP18_BALANCES_DICT: &str = "balances";

/// Synthetic-asset engine contract
#[odra::module]
pub struct SynthEngine {
    /// Administrator, fixed at deployment to the deploying identity
    admin: Var<Address>,
    /// Oracle price (2-decimal fixed point, 100 = 1.00)
    oracle_price: Var<U256>,
    /// Block time at which the oracle price was last set
    price_updated_at: Var<u64>,
    /// Synthetic token balances
    balances: Mapping<Address, U256>,
    /// Total synthetic supply
    total_supply: Var<U256>,
    /// Per-account vaults (all-zero record = no vault)
    vaults: Mapping<Address, Vault>,
    /// Sum of collateral across all live vault records
    total_locked: Var<U256>,
}

#[odra::module]
impl SynthEngine {
    /// Initialize the engine.
    ///
    /// The deploying caller becomes the administrator. `initial_price` is
    /// validated like any price update and starts the staleness clock.
    pub fn init(&mut self, initial_price: U256) {
        let deployer = self.env().caller();
        self.admin.set(deployer);

        if initial_price.is_zero() || initial_price >= U256::from(MAXIMUM_PRICE) {
            self.env().revert(SynthError::InvalidPrice);
        }
        self.oracle_price.set(initial_price);
        self.price_updated_at.set(self.env().get_block_time());

        self.total_supply.set(U256::zero());
        self.total_locked.set(U256::zero());

        self.env().init_dictionary(CEP18_BALANCES_DICT);
        self.env().set_named_value(CEP18_NAME_KEY, String::from(TOKEN_NAME));
        self.env().set_named_value(CEP18_SYMBOL_KEY, String::from(TOKEN_SYMBOL));
        self.env().set_named_value(CEP18_DECIMALS_KEY, TOKEN_DECIMALS);
        self.env().set_named_value(CEP18_TOTAL_SUPPLY_KEY, U256::zero());
    }

    // ========== Oracle ==========

    /// Update the oracle price (administrator only)
    pub fn update_price(&mut self, new_price: U256) {
        let caller = self.env().caller();
        if Some(caller) != self.admin.get() {
            self.env().revert(SynthError::Unauthorized);
        }
        if new_price.is_zero() || new_price >= U256::from(MAXIMUM_PRICE) {
            self.env().revert(SynthError::InvalidPrice);
        }

        self.oracle_price.set(new_price);
        self.price_updated_at.set(self.env().get_block_time());
    }

    /// Get the current oracle price
    pub fn oracle_price(&self) -> U256 {
        self.oracle_price.get().unwrap_or(U256::zero())
    }

    /// Get the block time of the last price update
    pub fn price_updated_at(&self) -> u64 {
        self.price_updated_at.get().unwrap_or(0)
    }

    /// Whether the price is within the expiry window
    pub fn is_price_fresh(&self) -> bool {
        self.price_is_fresh()
    }

    /// Get the full oracle state in one call
    pub fn price_info(&self) -> PriceInfo {
        PriceInfo {
            value: self.oracle_price(),
            updated_at: self.price_updated_at(),
            is_fresh: self.price_is_fresh(),
        }
    }

    // ========== Token Ledger ==========

    /// Get token name
    pub fn name(&self) -> String {
        String::from(TOKEN_NAME)
    }

    /// Get token symbol
    pub fn symbol(&self) -> String {
        String::from(TOKEN_SYMBOL)
    }

    /// Get decimals
    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    /// Get balance of an account
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).unwrap_or(U256::zero())
    }

    /// Get total synthetic supply
    pub fn total_supply(&self) -> U256 {
        self.total_supply.get().unwrap_or(U256::zero())
    }

    /// Transfer synthetic tokens to a recipient.
    ///
    /// A sender without any ledger entry (an account that never held tokens)
    /// is rejected outright, before the balance compare, so the no-entry case
    /// stays distinguishable from an emptied balance.
    pub fn transfer(&mut self, recipient: Address, amount: U256) {
        let sender = self.env().caller();

        if amount.is_zero() {
            self.env().revert(SynthError::ZeroAmount);
        }
        if sender == recipient {
            self.env().revert(SynthError::InvalidRecipient);
        }

        let sender_balance = match self.balances.get(&sender) {
            Some(balance) => balance,
            None => self.env().revert(SynthError::Unauthorized),
        };
        if sender_balance < amount {
            self.env().revert(SynthError::InsufficientBalance);
        }

        let new_sender_balance = self.checked(math::checked_sub(sender_balance, amount));
        let recipient_balance = self.balance_of(recipient);
        let new_recipient_balance = self.checked(math::checked_add(recipient_balance, amount));

        self.balances.set(&sender, new_sender_balance);
        self.set_balance_cep18(sender, new_sender_balance);
        self.balances.set(&recipient, new_recipient_balance);
        self.set_balance_cep18(recipient, new_recipient_balance);
    }

    // ========== Vault Operations ==========

    /// Mint synthetic tokens against attached CSPR collateral.
    ///
    /// The attached value must cover `amount * (price/100) * 150%`; any
    /// excess is refunded in the same deploy. A prior vault record is
    /// replaced, not added to.
    #[odra(payable)]
    pub fn mint(&mut self, mint_amount: U256) {
        let caller = self.env().caller();

        if mint_amount.is_zero() {
            self.env().revert(SynthError::ZeroAmount);
        }
        if mint_amount < U256::from(MINIMUM_MINT) {
            self.env().revert(SynthError::InvalidTokenAmount);
        }
        self.require_fresh_price();

        let price = self.oracle_price();
        let required = self.checked(math::required_collateral(mint_amount, price));

        let attached = u512_to_u256(self.env().attached_value());
        if attached < required {
            self.env().revert(SynthError::InsufficientCollateralDeposit);
        }
        let excess = self.checked(math::checked_sub(attached, required));
        if !excess.is_zero() {
            self.env().transfer_tokens(&caller, &u256_to_u512(excess));
        }

        // Replacement semantics: the previous record's bookkeeping is
        // discarded, so its collateral leaves the tracked aggregate.
        let previous = self.vaults.get(&caller).unwrap_or_else(Vault::empty);
        let locked = self.checked(math::checked_sub(self.total_locked(), previous.collateral));
        let locked = self.checked(math::checked_add(locked, required));
        self.total_locked.set(locked);

        self.vaults.set(
            &caller,
            Vault {
                collateral: required,
                minted: amount,
                price_at_lock: price,
            },
        );

        let new_balance = self.checked(math::checked_add(self.balance_of(caller), amount));
        self.balances.set(&caller, new_balance);
        self.set_balance_cep18(caller, new_balance);

        let new_supply = self.checked(math::checked_add(self.total_supply(), amount));
        self.total_supply.set(new_supply);
        self.set_total_supply_cep18(new_supply);
    }

    /// Burn synthetic tokens and reclaim a proportional share of collateral.
    ///
    /// The collateral refund is paid out before any state is committed; if
    /// the payout cannot be made the whole deploy reverts.
    pub fn burn(&mut self, amount: U256) {
        let caller = self.env().caller();

        let vault = match self.vaults.get(&caller) {
            Some(v) if !v.is_empty() => v,
            _ => self.env().revert(SynthError::VaultNotFound),
        };
        if amount.is_zero() {
            self.env().revert(SynthError::ZeroAmount);
        }
        self.require_fresh_price();

        let balance = self.balance_of(caller);
        if balance < amount {
            self.env().revert(SynthError::InsufficientBalance);
        }
        if vault.minted < amount {
            self.env().revert(SynthError::Unauthorized);
        }

        let release =
            self.checked(math::proportional_release(vault.collateral, amount, vault.minted));

        // Refund-then-commit: pay out before touching vault/ledger state.
        if !release.is_zero() {
            self.env().transfer_tokens(&caller, &u256_to_u512(release));
        }

        let new_collateral = self.checked(math::checked_sub(vault.collateral, release));
        let new_minted = self.checked(math::checked_sub(vault.minted, amount));
        self.vaults.set(
            &caller,
            Vault {
                collateral: new_collateral,
                minted: new_minted,
                price_at_lock: self.oracle_price(),
            },
        );

        let new_balance = self.checked(math::checked_sub(balance, amount));
        self.balances.set(&caller, new_balance);
        self.set_balance_cep18(caller, new_balance);

        let new_supply = self.checked(math::checked_sub(self.total_supply(), amount));
        self.total_supply.set(new_supply);
        self.set_total_supply_cep18(new_supply);

        let new_locked = self.checked(math::checked_sub(self.total_locked(), release));
        self.total_locked.set(new_locked);
    }

    /// Add attached CSPR to the caller's vault collateral.
    ///
    /// Creates a zero vault for first-time depositors; `minted` is never
    /// touched here.
    #[odra(payable)]
    pub fn deposit_collateral(&mut self) {
        let caller = self.env().caller();

        let amount = u512_to_u256(self.env().attached_value());
        if amount.is_zero() {
            self.env().revert(SynthError::ZeroAmount);
        }

        let vault = self.vaults.get(&caller).unwrap_or_else(Vault::empty);
        let new_collateral = self.checked(math::checked_add(vault.collateral, amount));
        self.vaults.set(
            &caller,
            Vault {
                collateral: new_collateral,
                minted: vault.minted,
                price_at_lock: self.oracle_price(),
            },
        );

        let new_locked = self.checked(math::checked_add(self.total_locked(), amount));
        self.total_locked.set(new_locked);
    }

    /// Liquidate an undercollateralized vault.
    ///
    /// Any caller may close a vault whose live collateral ratio is below the
    /// threshold. The entire collateral goes to the liquidator, the vault is
    /// deleted, the owner's ledger balance is force-set to zero and the
    /// vault's minted amount leaves the total supply.
    pub fn liquidate(&mut self, vault_owner: Address) {
        let liquidator = self.env().caller();

        let vault = match self.vaults.get(&vault_owner) {
            Some(v) if !v.is_empty() => v,
            _ => self.env().revert(SynthError::VaultNotFound),
        };
        self.require_fresh_price();

        let price = self.oracle_price();
        let ratio = match math::collateral_ratio(vault.collateral, vault.minted, price) {
            Ok(ratio) => ratio,
            Err(_) => self.env().revert(SynthError::Unauthorized),
        };
        if ratio >= U256::from(LIQUIDATION_THRESHOLD) {
            self.env().revert(SynthError::Unauthorized);
        }

        if !vault.collateral.is_zero() {
            self.env()
                .transfer_tokens(&liquidator, &u256_to_u512(vault.collateral));
        }

        self.vaults.set(&vault_owner, Vault::empty());

        // Penalty: the owner's whole balance is burned from the ledger, while
        // the supply drops only by the vault's minted amount.
        self.balances.set(&vault_owner, U256::zero());
        self.set_balance_cep18(vault_owner, U256::zero());

        let new_supply = self.checked(math::checked_sub(self.total_supply(), vault.minted));
        self.total_supply.set(new_supply);
        self.set_total_supply_cep18(new_supply);

        let new_locked = self.checked(math::checked_sub(self.total_locked(), vault.collateral));
        self.total_locked.set(new_locked);
    }

    // ========== Queries ==========

    /// Get an account's vault, or `None` if it has never been created or was
    /// liquidated
    pub fn vault_of(&self, account: Address) -> Option<Vault> {
        let vault = self.vaults.get(&account)?;
        if vault.is_empty() {
            return None;
        }
        Some(vault)
    }

    /// Current collateral ratio of an account's vault against the live price
    pub fn collateral_ratio_of(&self, account: Address) -> U256 {
        let vault = match self.vault_of(account) {
            Some(v) => v,
            None => self.env().revert(SynthError::VaultNotFound),
        };
        if vault.minted.is_zero() {
            self.env().revert(SynthError::VaultNotFound);
        }
        self.checked(math::collateral_ratio(
            vault.collateral,
            vault.minted,
            self.oracle_price(),
        ))
    }

    /// Sum of collateral across all live vault records
    pub fn total_locked(&self) -> U256 {
        self.total_locked.get().unwrap_or(U256::zero())
    }

    /// Get the administrator address
    pub fn get_admin(&self) -> Option<Address> {
        self.admin.get()
    }

    /// Get aggregate engine state
    pub fn get_status(&self) -> ProtocolStatus {
        ProtocolStatus {
            oracle_price: self.oracle_price(),
            total_supply: self.total_supply(),
            total_locked: self.total_locked(),
            price_is_fresh: self.price_is_fresh(),
        }
    }

    // ========== Internal helpers ==========

    fn price_is_fresh(&self) -> bool {
        let updated_at = self.price_updated_at.get().unwrap_or(0);
        let now = self.env().get_block_time();
        now.saturating_sub(updated_at) <= PRICE_EXPIRY_WINDOW
    }

    fn require_fresh_price(&self) {
        if !self.price_is_fresh() {
            self.env().revert(SynthError::OraclePriceExpired);
        }
    }

    fn checked(&self, result: Result<U256, SynthError>) -> U256 {
        match result {
            Ok(value) => value,
            Err(error) => self.env().revert(error),
        }
    }

    fn set_balance_cep18(&self, account: Address, amount: U256) {
        let key = Self::cep18_balance_key(account);
        self.env()
            .set_dictionary_value(CEP18_BALANCES_DICT, key.as_bytes(), amount);
    }

    fn set_total_supply_cep18(&self, amount: U256) {
        self.env().set_named_value(CEP18_TOTAL_SUPPLY_KEY, amount);
    }

    fn cep18_balance_key(account: Address) -> String {
        let key = Key::from(account);
        let bytes = key.to_bytes().unwrap_or_default();
        BASE64_STANDARD.encode(bytes)
    }
}

// ===== Helper Functions =====

/// Convert U512 to U256 (lower 256 bits; attached CSPR values fit)
fn u512_to_u256(value: U512) -> U256 {
    let mut bytes = [0u8; 64];
    value.to_little_endian(&mut bytes);
    U256::from_little_endian(&bytes[..32])
}

/// Convert U256 to U512
fn u256_to_u512(value: U256) -> U512 {
    let mut bytes = [0u8; 32];
    value.to_little_endian(&mut bytes);
    U512::from_little_endian(&bytes)
}
