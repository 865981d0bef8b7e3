use super::constants::{DENOM_PATTERN, SEND_AUTHORIZATION_TYPE_URL, SEND_MSG_TYPE_URL};
use super::error::{Erc20Error, Erc20Result};
use crate::crypto::Address;
use lazy_static::lazy_static;
use primitive_types::U256;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

lazy_static! {
    static ref DENOM_REGEX: Option<Regex> = Regex::new(DENOM_PATTERN).ok();
}

/// Validate a ledger denomination
pub fn validate_denom(denom: &str) -> Erc20Result<()> {
    match DENOM_REGEX.as_ref() {
        Some(regex) if regex.is_match(denom) => Ok(()),
        _ => Err(Erc20Error::InvalidDenom(denom.to_string())),
    }
}

// ========================================
// Coin / Coins
// ========================================

/// Amount of a single ledger asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: U256,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: U256) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn validate(&self) -> Erc20Result<()> {
        validate_denom(&self.denom)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Multi-asset amount set, unique by denomination and sorted by it
///
/// Every constructor and arithmetic helper returns a sorted set with zero
/// entries removed; `validate` checks the same shape for values that came
/// from elsewhere (deserialization, foreign grants).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    pub fn empty() -> Self {
        Coins(Vec::new())
    }

    /// Build a validated set from arbitrary entries
    ///
    /// Zero entries are dropped and the rest sorted; duplicate denominations
    /// are rejected rather than merged.
    pub fn new(coins: Vec<Coin>) -> Erc20Result<Self> {
        let mut coins = Coins(coins);
        coins.sanitize();
        coins.validate()?;
        Ok(coins)
    }

    /// Single-asset set; empty when `amount` is zero
    pub fn from_coin(coin: Coin) -> Erc20Result<Self> {
        Self::new(vec![coin])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    /// Amount held for `denom`, zero when absent
    pub fn amount_of(&self, denom: &str) -> U256 {
        self.0
            .iter()
            .find(|coin| coin.denom == denom)
            .map(|coin| coin.amount)
            .unwrap_or_default()
    }

    /// True when at least one entry carries a positive amount
    pub fn has_positive(&self) -> bool {
        self.0.iter().any(|coin| !coin.is_zero())
    }

    /// Restore canonical ordering by denomination
    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.denom.cmp(&b.denom));
    }

    /// Drop zero entries and sort
    pub fn sanitize(&mut self) {
        self.0.retain(|coin| !coin.is_zero());
        self.sort();
    }

    /// Check the canonical shape: valid denominations, positive amounts,
    /// strictly increasing order (which also rules out duplicates)
    pub fn validate(&self) -> Erc20Result<()> {
        for coin in &self.0 {
            coin.validate()?;
            if coin.is_zero() {
                return Err(Erc20Error::InvalidCoins(format!(
                    "coin {} amount is not positive",
                    coin.denom
                )));
            }
        }

        for pair in self.0.windows(2) {
            if pair[0].denom == pair[1].denom {
                return Err(Erc20Error::InvalidCoins(format!(
                    "duplicate denomination {}",
                    pair[0].denom
                )));
            }
            if pair[0].denom > pair[1].denom {
                return Err(Erc20Error::InvalidCoins(format!(
                    "denomination {} is not sorted",
                    pair[1].denom
                )));
            }
        }

        Ok(())
    }

    /// Add `amount` of `denom`, returning the new set
    pub fn add_amount(&self, denom: &str, amount: U256) -> Erc20Result<Self> {
        let mut coins = self.0.clone();
        match coins.iter_mut().find(|coin| coin.denom == denom) {
            Some(coin) => {
                coin.amount = coin
                    .amount
                    .checked_add(amount)
                    .ok_or_else(|| Erc20Error::InvalidCoins(format!("{denom} amount overflow")))?;
            }
            None => coins.push(Coin::new(denom, amount)),
        }

        let mut coins = Coins(coins);
        coins.sanitize();
        Ok(coins)
    }

    /// Subtract `amount` of `denom`, returning the new set
    ///
    /// Fails when the set holds less than `amount` of `denom`.
    pub fn sub_amount(&self, denom: &str, amount: U256) -> Erc20Result<Self> {
        let mut coins = self.0.clone();
        match coins.iter_mut().find(|coin| coin.denom == denom) {
            Some(coin) => {
                coin.amount = coin.amount.checked_sub(amount).ok_or_else(|| {
                    Erc20Error::InvalidCoins(format!("negative {denom} amount"))
                })?;
            }
            None if amount.is_zero() => {}
            None => {
                return Err(Erc20Error::InvalidCoins(format!(
                    "negative {denom} amount"
                )))
            }
        }

        let mut coins = Coins(coins);
        coins.sanitize();
        Ok(coins)
    }

    /// Subtract every entry of `other`
    pub fn sub_coins(&self, other: &Coins) -> Erc20Result<Self> {
        other
            .iter()
            .try_fold(self.clone(), |acc, coin| acc.sub_amount(&coin.denom, coin.amount))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|coin| coin.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

// ========================================
// Messages
// ========================================

/// Ledger value movement dispatched under a send grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from: Address,
    pub to: Address,
    pub amount: Coins,
}

impl MsgSend {
    pub fn new(from: Address, to: Address, amount: Coins) -> Self {
        Self { from, to, amount }
    }

    pub fn type_url(&self) -> &'static str {
        SEND_MSG_TYPE_URL
    }
}

// ========================================
// Authorizations
// ========================================

/// Outcome of offering a message to an authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptResponse {
    /// The grant is exhausted and must be removed
    pub delete: bool,
    /// Replacement authorization when the grant survives
    pub updated: Option<SendAuthorization>,
}

/// Spend-limit authorization: the grantee may send up to `spend_limit`
/// out of the granter's balance, optionally only to `allow_list`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendAuthorization {
    pub spend_limit: Coins,
    #[serde(default)]
    pub allow_list: Vec<Address>,
}

impl SendAuthorization {
    pub fn new(spend_limit: Coins) -> Self {
        Self {
            spend_limit,
            allow_list: Vec::new(),
        }
    }

    pub fn msg_type_url(&self) -> &'static str {
        SEND_MSG_TYPE_URL
    }

    /// Structural checks before the authorization is persisted
    pub fn validate_basic(&self) -> Erc20Result<()> {
        self.spend_limit.validate()?;
        if !self.spend_limit.has_positive() {
            return Err(Erc20Error::InvalidCoins(
                "spend limit must be positive".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.allow_list.len());
        for address in &self.allow_list {
            if !seen.insert(address) {
                return Err(Erc20Error::InvalidCoins(format!(
                    "duplicate allowed address {address}"
                )));
            }
        }

        Ok(())
    }

    /// Consume `msg.amount` from the spend limit
    pub fn accept(&self, msg: &MsgSend) -> Erc20Result<AcceptResponse> {
        let limit_left = self
            .spend_limit
            .sub_coins(&msg.amount)
            .map_err(|_| Erc20Error::InsufficientAllowance)?;

        if !self.allow_list.is_empty() && !self.allow_list.contains(&msg.to) {
            return Err(Erc20Error::RecipientNotAllowed(msg.to));
        }

        if limit_left.is_empty() {
            return Ok(AcceptResponse {
                delete: true,
                updated: None,
            });
        }

        Ok(AcceptResponse {
            delete: false,
            updated: Some(SendAuthorization {
                spend_limit: limit_left,
                allow_list: self.allow_list.clone(),
            }),
        })
    }
}

/// Authorization kinds that may be found in the shared store
///
/// Only `Send` can back an allowance; `Other` describes a grant written by
/// some other module so it can be reported and rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Send(SendAuthorization),
    Other {
        type_url: String,
        msg_type_url: String,
    },
}

impl Authorization {
    pub fn type_url(&self) -> &str {
        match self {
            Self::Send(_) => SEND_AUTHORIZATION_TYPE_URL,
            Self::Other { type_url, .. } => type_url,
        }
    }

    /// Message type the grant is stored under
    pub fn msg_type_url(&self) -> &str {
        match self {
            Self::Send(auth) => auth.msg_type_url(),
            Self::Other { msg_type_url, .. } => msg_type_url,
        }
    }

    /// Borrow the spend-limit authorization, rejecting any other kind
    pub fn as_send(&self) -> Erc20Result<&SendAuthorization> {
        match self {
            Self::Send(auth) => Ok(auth),
            Self::Other { type_url, .. } => {
                Err(Erc20Error::UnsupportedAuthorization(type_url.clone()))
            }
        }
    }

    pub fn into_send(self) -> Erc20Result<SendAuthorization> {
        match self {
            Self::Send(auth) => Ok(auth),
            Self::Other { type_url, .. } => Err(Erc20Error::UnsupportedAuthorization(type_url)),
        }
    }
}

/// Stored delegation grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub authorization: Authorization,
    /// Absolute expiration in seconds, `None` never expires
    pub expiration: Option<u64>,
}

impl Grant {
    pub fn new(authorization: Authorization, expiration: Option<u64>) -> Self {
        Self {
            authorization,
            expiration,
        }
    }

    /// A grant stays usable up to and including its expiration second
    pub fn is_expired(&self, block_time: u64) -> bool {
        matches!(self.expiration, Some(expiration) if expiration < block_time)
    }
}
