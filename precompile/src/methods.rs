use erc20_common::crypto::{Address, Hash};
use erc20_common::token::SignedPermit;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

// ===== Method Names =====

pub const NAME_METHOD: &str = "name";
pub const SYMBOL_METHOD: &str = "symbol";
pub const DECIMALS_METHOD: &str = "decimals";
pub const TOTAL_SUPPLY_METHOD: &str = "totalSupply";
pub const BALANCE_OF_METHOD: &str = "balanceOf";
pub const ALLOWANCE_METHOD: &str = "allowance";
pub const NONCES_METHOD: &str = "nonces";
pub const DOMAIN_SEPARATOR_METHOD: &str = "DOMAIN_SEPARATOR";
pub const PERMIT_TYPEHASH_METHOD: &str = "PERMIT_TYPEHASH";
pub const APPROVE_METHOD: &str = "approve";
pub const TRANSFER_METHOD: &str = "transfer";
pub const TRANSFER_FROM_METHOD: &str = "transferFrom";
pub const INCREASE_ALLOWANCE_METHOD: &str = "increaseAllowance";
pub const DECREASE_ALLOWANCE_METHOD: &str = "decreaseAllowance";
pub const PERMIT_METHOD: &str = "permit";

/// Decoded call with typed arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Erc20Call {
    // Queries
    Name,
    Symbol,
    Decimals,
    TotalSupply,
    BalanceOf { account: Address },
    Allowance { owner: Address, spender: Address },
    Nonces { owner: Address },
    DomainSeparator,
    PermitTypehash,

    // Transactions
    Approve { spender: Address, amount: U256 },
    Transfer { to: Address, amount: U256 },
    TransferFrom { from: Address, to: Address, amount: U256 },
    IncreaseAllowance { spender: Address, amount: U256 },
    DecreaseAllowance { spender: Address, amount: U256 },
    Permit(SignedPermit),
}

impl Erc20Call {
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::Name => NAME_METHOD,
            Self::Symbol => SYMBOL_METHOD,
            Self::Decimals => DECIMALS_METHOD,
            Self::TotalSupply => TOTAL_SUPPLY_METHOD,
            Self::BalanceOf { .. } => BALANCE_OF_METHOD,
            Self::Allowance { .. } => ALLOWANCE_METHOD,
            Self::Nonces { .. } => NONCES_METHOD,
            Self::DomainSeparator => DOMAIN_SEPARATOR_METHOD,
            Self::PermitTypehash => PERMIT_TYPEHASH_METHOD,
            Self::Approve { .. } => APPROVE_METHOD,
            Self::Transfer { .. } => TRANSFER_METHOD,
            Self::TransferFrom { .. } => TRANSFER_FROM_METHOD,
            Self::IncreaseAllowance { .. } => INCREASE_ALLOWANCE_METHOD,
            Self::DecreaseAllowance { .. } => DECREASE_ALLOWANCE_METHOD,
            Self::Permit(_) => PERMIT_METHOD,
        }
    }

    /// Whether the call may write state and emit events
    pub fn is_transaction(&self) -> bool {
        matches!(
            self,
            Self::Approve { .. }
                | Self::Transfer { .. }
                | Self::TransferFrom { .. }
                | Self::IncreaseAllowance { .. }
                | Self::DecreaseAllowance { .. }
                | Self::Permit(_)
        )
    }
}

/// Typed return value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Erc20Output {
    Bool(bool),
    Uint8(u8),
    Uint256(U256),
    String(String),
    Bytes32(Hash),
}
