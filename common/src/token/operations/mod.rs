// Token Operations Module
// This module contains the core business logic for the ledger-backed token.
//
// The operations are designed to be runtime-agnostic:
// - The ledger, the authorization store and the nonce store are abstracted via traits
// - Runtime values (caller, block time) are passed as parameters
// - Balance deltas and events are collected in an execution scope owned by the caller

mod allowance;
mod permit;
mod query;
mod transfer;
mod validation;

pub use allowance::*;
pub use permit::*;
pub use query::*;
pub use transfer::*;
pub use validation::*;

use crate::crypto::{Address, Hash};
use crate::token::{
    Authorization, BalanceJournal, Coins, Erc20Event, Erc20Result, Grant, MsgSend,
};
use primitive_types::U256;

// ========================================
// Collaborator Traits (for dependency injection)
// ========================================

/// External account-balance ledger
pub trait BankProvider {
    fn get_balance(&self, account: &Address, denom: &str) -> Erc20Result<U256>;
    fn get_supply(&self, denom: &str) -> Erc20Result<U256>;
    fn send_coins(&mut self, from: &Address, to: &Address, amount: &Coins) -> Erc20Result<()>;
    // Privileged path, never reached from the token surface
    fn mint_coins(&mut self, recipient: &Address, amount: &Coins) -> Erc20Result<()>;
}

/// External generic-authorization store
///
/// Grants are keyed by (grantee, granter, message type URL).
pub trait AuthzProvider {
    /// Stored grant, expired or not
    fn get_grant(
        &self,
        grantee: &Address,
        granter: &Address,
        msg_type_url: &str,
    ) -> Erc20Result<Option<Grant>>;

    fn save_grant(
        &mut self,
        grantee: &Address,
        granter: &Address,
        authorization: Authorization,
        expiration: Option<u64>,
    ) -> Erc20Result<()>;

    fn delete_grant(
        &mut self,
        grantee: &Address,
        granter: &Address,
        msg_type_url: &str,
    ) -> Erc20Result<()>;

    /// Execute messages on behalf of their signer using the grantee's grants
    ///
    /// Implementations enforce expiration, consume the spend limit and
    /// perform the ledger movement.
    fn dispatch_actions(
        &mut self,
        grantee: &Address,
        msgs: Vec<MsgSend>,
        block_time: u64,
    ) -> Erc20Result<()>;
}

/// Raw 32-byte slots holding per-owner counters
pub trait NonceProvider {
    fn get_value(&self, key: &Hash) -> Erc20Result<Option<[u8; 32]>>;
    fn set_value(&mut self, key: &Hash, value: [u8; 32]) -> Erc20Result<()>;
}

/// Everything a token contract needs from its host
pub trait TokenStorage: BankProvider + AuthzProvider + NonceProvider {}

impl<T: BankProvider + AuthzProvider + NonceProvider + ?Sized> TokenStorage for T {}

// ========================================
// Runtime Context
// ========================================

/// Runtime context providing caller and block information
#[derive(Debug, Clone, Copy)]
pub struct RuntimeContext {
    /// Authenticated sender of the call
    pub caller: Address,
    /// Current block time, seconds since the unix epoch
    pub block_time: u64,
}

impl RuntimeContext {
    /// Create a new runtime context
    pub fn new(caller: Address, block_time: u64) -> Self {
        Self { caller, block_time }
    }
}

/// Token being operated on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParams {
    /// Ledger denomination backing the token
    pub denom: String,
    /// Expiration given to newly created grants
    pub grant_expiration: u64,
}

impl TokenParams {
    pub fn new(denom: impl Into<String>, grant_expiration: u64) -> Self {
        Self {
            denom: denom.into(),
            grant_expiration,
        }
    }
}

// ========================================
// Execution Scope
// ========================================

/// Side effects collected during one call
///
/// The host discards the scope when the call fails, and reconciles the
/// journal and publishes the events when it succeeds.
#[derive(Debug, Default, Clone)]
pub struct ExecutionScope {
    pub journal: BalanceJournal,
    pub events: Vec<Erc20Event>,
}

impl ExecutionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Erc20Event) {
        self.events.push(event);
    }
}
