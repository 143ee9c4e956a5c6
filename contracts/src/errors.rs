//! Protocol error definitions.

use odra::prelude::*;

/// Synthetic-asset engine errors
#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SynthError {
    // Validation errors (1xx)
    ZeroAmount = 100,
    InvalidTokenAmount = 101,
    InvalidRecipient = 102,
    InvalidPrice = 103,

    // Authorization errors (2xx)
    Unauthorized = 200,

    // Oracle errors (3xx)
    OraclePriceExpired = 300,

    // Funds errors (4xx)
    InsufficientBalance = 400,
    InsufficientCollateralDeposit = 401,

    // Vault errors (5xx)
    VaultNotFound = 500,

    // Arithmetic errors (6xx)
    ArithmeticOverflow = 600,
    ArithmeticUnderflow = 601,
}

impl SynthError {
    pub const fn message(&self) -> &'static str {
        match self {
            // Validation
            SynthError::ZeroAmount => "Amount must be greater than zero",
            SynthError::InvalidTokenAmount => "Amount below minimum mint",
            SynthError::InvalidRecipient => "Recipient must differ from sender",
            SynthError::InvalidPrice => "Price out of bounds",

            // Authorization
            SynthError::Unauthorized => "Unauthorized: caller may not perform this operation",

            // Oracle
            SynthError::OraclePriceExpired => "Oracle price expired",

            // Funds
            SynthError::InsufficientBalance => "Insufficient token balance",
            SynthError::InsufficientCollateralDeposit => "Insufficient collateral deposit",

            // Vault
            SynthError::VaultNotFound => "Vault not found",

            // Arithmetic
            SynthError::ArithmeticOverflow => "Arithmetic overflow",
            SynthError::ArithmeticUnderflow => "Arithmetic underflow",
        }
    }
}

impl core::fmt::Display for SynthError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<SynthError> for OdraError {
    fn from(error: SynthError) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            OdraError::user(error as u16)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            OdraError::user(error as u16, error.message())
        }
    }
}
