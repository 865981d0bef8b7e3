// ERC20 Token - Error Codes
// This module defines all errors raised by the allowance, transfer and permit paths.
//
// Error Code Ranges:
// - 0x0100-0x01FF: Argument errors (rejected before any state read)
// - 0x0200-0x02FF: Authorization errors (rejected before any mutation)
// - 0x0300-0x03FF: Deadline errors (rejected before signature recovery)
// - 0x0400-0x04FF: State errors (fatal)

use crate::crypto::{Address, CryptoError};
use primitive_types::U256;
use thiserror::Error;

// ===== Argument Errors (0x0100 - 0x01FF) =====

pub const ERC20_ERROR_ZERO_ADDRESS: u64 = 0x0100;
pub const ERC20_ERROR_INVALID_DENOM: u64 = 0x0101;
pub const ERC20_ERROR_INVALID_COINS: u64 = 0x0102;
pub const ERC20_ERROR_ALLOWANCE_OVERFLOW: u64 = 0x0103;
pub const ERC20_ERROR_ALLOWANCE_UNDERFLOW: u64 = 0x0104;
pub const ERC20_ERROR_INVALID_KEY_MATERIAL: u64 = 0x0105;

// ===== Authorization Errors (0x0200 - 0x02FF) =====

pub const ERC20_ERROR_GRANT_NOT_FOUND: u64 = 0x0200;
pub const ERC20_ERROR_GRANT_EXPIRED: u64 = 0x0201;
pub const ERC20_ERROR_INSUFFICIENT_ALLOWANCE: u64 = 0x0202;
pub const ERC20_ERROR_RECIPIENT_NOT_ALLOWED: u64 = 0x0203;
pub const ERC20_ERROR_INVALID_SIGNATURE: u64 = 0x0204;
pub const ERC20_ERROR_SIGNER_MISMATCH: u64 = 0x0205;

// ===== Deadline Errors (0x0300 - 0x03FF) =====

pub const ERC20_ERROR_PERMIT_EXPIRED: u64 = 0x0300;

// ===== State Errors (0x0400 - 0x04FF) =====

pub const ERC20_ERROR_NONCE_NOT_INITIALIZED: u64 = 0x0400;
pub const ERC20_ERROR_UNSUPPORTED_AUTHORIZATION: u64 = 0x0401;
pub const ERC20_ERROR_AMOUNT_OVERFLOW: u64 = 0x0402;
pub const ERC20_ERROR_NONCE_OVERFLOW: u64 = 0x0403;
pub const ERC20_ERROR_INSUFFICIENT_BALANCE: u64 = 0x0404;
pub const ERC20_ERROR_STORAGE: u64 = 0x0405;

/// ERC20 operation result type
pub type Erc20Result<T> = Result<T, Erc20Error>;

/// Coarse error taxonomy, used by callers to report failures uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Argument,
    Authorization,
    Deadline,
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Erc20Error {
    // ========================================
    // Argument errors
    // ========================================
    #[error("Zero address is not allowed as {0}")]
    ZeroAddress(&'static str),

    #[error("Invalid denomination: {0}")]
    InvalidDenom(String),

    #[error("Invalid coins: {0}")]
    InvalidCoins(String),

    #[error("Allowance overflow")]
    AllowanceOverflow,

    #[error("Decreased allowance below zero")]
    AllowanceUnderflow,

    #[error("Key material is {len} bytes, maximum is 32")]
    InvalidKeyMaterial { len: usize },

    // ========================================
    // Authorization errors
    // ========================================
    #[error("No authorization found for grantee {grantee} and granter {granter}")]
    GrantNotFound { grantee: Address, granter: Address },

    #[error("Authorization expired at {expiration}")]
    GrantExpired { expiration: u64 },

    #[error("Requested amount is more than spend limit")]
    InsufficientAllowance,

    #[error("Recipient {0} is not in the allowed list of the grant")]
    RecipientNotAllowed(Address),

    #[error("Invalid signature: {0}")]
    InvalidSignature(#[from] CryptoError),

    #[error("Invalid signer: expected {expected}, recovered {recovered}")]
    SignerMismatch {
        expected: Address,
        recovered: Address,
    },

    // ========================================
    // Deadline errors
    // ========================================
    #[error("Permit expired: deadline {deadline} is before block time {block_time}")]
    PermitExpired { deadline: U256, block_time: u64 },

    // ========================================
    // State errors
    // ========================================
    #[error("Permit nonce not initialized for {0}")]
    NonceNotInitialized(Address),

    #[error("Unsupported authorization type: {0}")]
    UnsupportedAuthorization(String),

    #[error("Amount exceeds the journal range")]
    AmountOverflow,

    #[error("Permit nonce overflow")]
    NonceOverflow,

    #[error("Insufficient balance for {account}: has {balance}, needs {amount}")]
    InsufficientBalance {
        account: Address,
        balance: U256,
        amount: U256,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Erc20Error {
    /// Numeric error code
    pub fn code(&self) -> u64 {
        match self {
            Self::ZeroAddress(_) => ERC20_ERROR_ZERO_ADDRESS,
            Self::InvalidDenom(_) => ERC20_ERROR_INVALID_DENOM,
            Self::InvalidCoins(_) => ERC20_ERROR_INVALID_COINS,
            Self::AllowanceOverflow => ERC20_ERROR_ALLOWANCE_OVERFLOW,
            Self::AllowanceUnderflow => ERC20_ERROR_ALLOWANCE_UNDERFLOW,
            Self::InvalidKeyMaterial { .. } => ERC20_ERROR_INVALID_KEY_MATERIAL,

            Self::GrantNotFound { .. } => ERC20_ERROR_GRANT_NOT_FOUND,
            Self::GrantExpired { .. } => ERC20_ERROR_GRANT_EXPIRED,
            Self::InsufficientAllowance => ERC20_ERROR_INSUFFICIENT_ALLOWANCE,
            Self::RecipientNotAllowed(_) => ERC20_ERROR_RECIPIENT_NOT_ALLOWED,
            Self::InvalidSignature(_) => ERC20_ERROR_INVALID_SIGNATURE,
            Self::SignerMismatch { .. } => ERC20_ERROR_SIGNER_MISMATCH,

            Self::PermitExpired { .. } => ERC20_ERROR_PERMIT_EXPIRED,

            Self::NonceNotInitialized(_) => ERC20_ERROR_NONCE_NOT_INITIALIZED,
            Self::UnsupportedAuthorization(_) => ERC20_ERROR_UNSUPPORTED_AUTHORIZATION,
            Self::AmountOverflow => ERC20_ERROR_AMOUNT_OVERFLOW,
            Self::NonceOverflow => ERC20_ERROR_NONCE_OVERFLOW,
            Self::InsufficientBalance { .. } => ERC20_ERROR_INSUFFICIENT_BALANCE,
            Self::Storage(_) => ERC20_ERROR_STORAGE,
        }
    }

    /// Category derived from the code range
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            0x0100..=0x01FF => ErrorCategory::Argument,
            0x0200..=0x02FF => ErrorCategory::Authorization,
            0x0300..=0x03FF => ErrorCategory::Deadline,
            _ => ErrorCategory::State,
        }
    }
}
