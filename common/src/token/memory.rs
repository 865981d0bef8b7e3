use std::collections::HashMap;

use log::trace;
use primitive_types::U256;

use crate::crypto::{Address, Hash};
use crate::token::operations::{AuthzProvider, BankProvider, NonceProvider};
use crate::token::{
    Authorization, Coin, Coins, Erc20Error, Erc20Result, Grant, MsgSend, SEND_MSG_TYPE_URL,
};

type GrantKey = (Address, Address, String);

/// In-memory ledger, authorization store and nonce store
///
/// Stands in for the host's collaborators in tests and local simulation.
/// `dispatch_actions` follows the authorization store semantics: expired
/// grants are rejected, spend limits are consumed and exhausted grants
/// are removed.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    balances: HashMap<(Address, String), U256>,
    supply: HashMap<String, U256>,
    grants: HashMap<GrantKey, Grant>,
    values: HashMap<Hash, [u8; 32]>,
    grant_writes: usize,
    ledger_writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` of `denom` straight into `account`
    pub fn fund(&mut self, account: &Address, denom: &str, amount: U256) -> Erc20Result<()> {
        let coins = Coins::from_coin(Coin::new(denom, amount))?;
        self.mint_coins(account, &coins)
    }

    pub fn balance(&self, account: &Address, denom: &str) -> U256 {
        self.balances
            .get(&(*account, denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Send grant stored for (grantee, granter), expired or not
    pub fn grant(&self, grantee: &Address, granter: &Address) -> Option<&Grant> {
        self.grants
            .get(&(*grantee, *granter, SEND_MSG_TYPE_URL.to_string()))
    }

    pub fn grant_count(&self) -> usize {
        self.grants.len()
    }

    /// Number of grant saves and deletes performed so far
    pub fn grant_writes(&self) -> usize {
        self.grant_writes
    }

    /// Number of ledger sends and mints performed so far
    pub fn ledger_writes(&self) -> usize {
        self.ledger_writes
    }

    fn dispatch_one(&mut self, grantee: &Address, msg: &MsgSend, block_time: u64) -> Erc20Result<()> {
        // The signer acting for itself needs no grant
        if msg.from == *grantee {
            return self.send_coins(&msg.from, &msg.to, &msg.amount);
        }

        let grant = self
            .get_grant(grantee, &msg.from, msg.type_url())?
            .ok_or(Erc20Error::GrantNotFound {
                grantee: *grantee,
                granter: msg.from,
            })?;

        if let Some(expiration) = grant.expiration {
            if grant.is_expired(block_time) {
                return Err(Erc20Error::GrantExpired { expiration });
            }
        }

        let response = grant.authorization.as_send()?.accept(msg)?;
        self.send_coins(&msg.from, &msg.to, &msg.amount)?;

        match response.updated {
            Some(updated) if !response.delete => self.save_grant(
                grantee,
                &msg.from,
                Authorization::Send(updated),
                grant.expiration,
            ),
            _ => self.delete_grant(grantee, &msg.from, msg.type_url()),
        }
    }
}

impl BankProvider for MemoryStore {
    fn get_balance(&self, account: &Address, denom: &str) -> Erc20Result<U256> {
        Ok(self.balance(account, denom))
    }

    fn get_supply(&self, denom: &str) -> Erc20Result<U256> {
        Ok(self.supply.get(denom).copied().unwrap_or_default())
    }

    fn send_coins(&mut self, from: &Address, to: &Address, amount: &Coins) -> Erc20Result<()> {
        // Check every coin first so a failure moves nothing
        for coin in amount.iter() {
            let balance = self.balance(from, &coin.denom);
            if balance < coin.amount {
                return Err(Erc20Error::InsufficientBalance {
                    account: *from,
                    balance,
                    amount: coin.amount,
                });
            }
            if from != to {
                self.balance(to, &coin.denom)
                    .checked_add(coin.amount)
                    .ok_or(Erc20Error::AmountOverflow)?;
            }
        }

        if from == to {
            return Ok(());
        }

        for coin in amount.iter() {
            let debited = self.balance(from, &coin.denom) - coin.amount;
            let credited = self.balance(to, &coin.denom) + coin.amount;
            self.balances.insert((*from, coin.denom.clone()), debited);
            self.balances.insert((*to, coin.denom.clone()), credited);
        }

        self.ledger_writes += 1;
        if log::log_enabled!(log::Level::Trace) {
            trace!("ledger send {} -> {}: {}", from, to, amount);
        }
        Ok(())
    }

    fn mint_coins(&mut self, recipient: &Address, amount: &Coins) -> Erc20Result<()> {
        for coin in amount.iter() {
            self.get_supply(&coin.denom)?
                .checked_add(coin.amount)
                .ok_or(Erc20Error::AmountOverflow)?;
            self.balance(recipient, &coin.denom)
                .checked_add(coin.amount)
                .ok_or(Erc20Error::AmountOverflow)?;
        }

        for coin in amount.iter() {
            let supply = self.supply.entry(coin.denom.clone()).or_default();
            *supply += coin.amount;
            let balance = self
                .balances
                .entry((*recipient, coin.denom.clone()))
                .or_default();
            *balance += coin.amount;
        }

        self.ledger_writes += 1;
        Ok(())
    }
}

impl AuthzProvider for MemoryStore {
    fn get_grant(
        &self,
        grantee: &Address,
        granter: &Address,
        msg_type_url: &str,
    ) -> Erc20Result<Option<Grant>> {
        Ok(self
            .grants
            .get(&(*grantee, *granter, msg_type_url.to_string()))
            .cloned())
    }

    fn save_grant(
        &mut self,
        grantee: &Address,
        granter: &Address,
        authorization: Authorization,
        expiration: Option<u64>,
    ) -> Erc20Result<()> {
        let key = (
            *grantee,
            *granter,
            authorization.msg_type_url().to_string(),
        );
        self.grants.insert(key, Grant::new(authorization, expiration));
        self.grant_writes += 1;
        Ok(())
    }

    fn delete_grant(
        &mut self,
        grantee: &Address,
        granter: &Address,
        msg_type_url: &str,
    ) -> Erc20Result<()> {
        let key = (*grantee, *granter, msg_type_url.to_string());
        if self.grants.remove(&key).is_none() {
            return Err(Erc20Error::GrantNotFound {
                grantee: *grantee,
                granter: *granter,
            });
        }
        self.grant_writes += 1;
        Ok(())
    }

    fn dispatch_actions(
        &mut self,
        grantee: &Address,
        msgs: Vec<MsgSend>,
        block_time: u64,
    ) -> Erc20Result<()> {
        // Work on a copy so a failing message leaves no partial effect
        let mut staged = self.clone();
        for msg in &msgs {
            staged.dispatch_one(grantee, msg, block_time)?;
        }
        *self = staged;
        Ok(())
    }
}

impl NonceProvider for MemoryStore {
    fn get_value(&self, key: &Hash) -> Erc20Result<Option<[u8; 32]>> {
        Ok(self.values.get(key).copied())
    }

    fn set_value(&mut self, key: &Hash, value: [u8; 32]) -> Erc20Result<()> {
        self.values.insert(*key, value);
        Ok(())
    }
}
