use std::path::Path;

use anyhow::Context;
use erc20_common::config::{
    DEFAULT_GRANT_EXPIRATION, DEFAULT_PERMIT_VERSION, MAX_TOKEN_DECIMALS, MAX_TOKEN_NAME_LENGTH,
    MAX_TOKEN_SYMBOL_LENGTH,
};
use erc20_common::crypto::Address;
use erc20_common::token::operations::TokenParams;
use erc20_common::token::{validate_denom, PermitDomain};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{PrecompileError, PrecompileResult};

fn default_version() -> String {
    DEFAULT_PERMIT_VERSION.to_string()
}

fn default_grant_expiration() -> u64 {
    DEFAULT_GRANT_EXPIRATION
}

/// Token contract configuration
///
/// ```json
/// {
///   "name": "Test Token",
///   "symbol": "TEST",
///   "decimals": 18,
///   "denom": "atest",
///   "chain_id": 9001,
///   "contract_address": "0x0000000000000000000000000000000000000802"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecompileConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Ledger denomination backing the token
    pub denom: String,
    /// Permit domain version
    #[serde(default = "default_version")]
    pub version: String,
    pub chain_id: u64,
    /// Address the contract is deployed at, also the permit verifying contract
    pub contract_address: Address,
    /// Expiration of grants created by approve / permit
    #[serde(default = "default_grant_expiration")]
    pub grant_expiration: u64,
}

impl PrecompileConfig {
    pub fn from_json_str(json: &str) -> PrecompileResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read token config {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to load token config {}", path.display()))
    }

    pub fn validate(&self) -> PrecompileResult<()> {
        if self.name.is_empty() || self.name.len() > MAX_TOKEN_NAME_LENGTH {
            return Err(PrecompileError::invalid_config(format!(
                "name must be 1..={} bytes",
                MAX_TOKEN_NAME_LENGTH
            )));
        }

        if self.symbol.is_empty() || self.symbol.len() > MAX_TOKEN_SYMBOL_LENGTH {
            return Err(PrecompileError::invalid_config(format!(
                "symbol must be 1..={} bytes",
                MAX_TOKEN_SYMBOL_LENGTH
            )));
        }

        if self.decimals > MAX_TOKEN_DECIMALS {
            return Err(PrecompileError::invalid_config(format!(
                "decimals {} exceeds {}",
                self.decimals, MAX_TOKEN_DECIMALS
            )));
        }

        if self.version.is_empty() {
            return Err(PrecompileError::invalid_config("version is empty"));
        }

        validate_denom(&self.denom)?;

        if self.contract_address.is_zero() {
            return Err(PrecompileError::invalid_config("contract address is zero"));
        }

        Ok(())
    }

    pub fn permit_domain(&self) -> PermitDomain {
        PermitDomain::new(
            self.name.as_str(),
            self.version.as_str(),
            U256::from(self.chain_id),
            self.contract_address,
        )
    }

    pub fn token_params(&self) -> TokenParams {
        TokenParams::new(self.denom.as_str(), self.grant_expiration)
    }
}
