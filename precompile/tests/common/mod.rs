//! Shared fixtures for the token integration tests

#![allow(dead_code)]

use erc20_common::crypto::{address_from_secret, Address, RecoverableSignature};
use erc20_common::token::memory::MemoryStore;
use erc20_common::token::operations::RuntimeContext;
use erc20_common::token::{PermitMessage, SignedPermit};
use erc20_precompile::{Erc20Precompile, PrecompileConfig};
use primitive_types::U256;

pub const DENOM: &str = "atest";
pub const NOW: u64 = 1_700_000_000;
pub const INITIAL_BALANCE: u64 = 1_000_000;

pub const TEST_CONFIG: &str = r#"{
    "name": "Test Token",
    "symbol": "TEST",
    "decimals": 18,
    "denom": "atest",
    "chain_id": 9001,
    "contract_address": "0x0000000000000000000000000000000000000802"
}"#;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Account with a secp256k1 key
#[derive(Clone)]
pub struct Account {
    pub secret: [u8; 32],
    pub address: Address,
}

impl Account {
    pub fn from_secret(secret: [u8; 32]) -> Self {
        let address = address_from_secret(&secret).unwrap();
        Self { secret, address }
    }
}

/// Generate a random account
pub fn random_account() -> Account {
    loop {
        let secret: [u8; 32] = rand::random();
        if let Ok(address) = address_from_secret(&secret) {
            return Account { secret, address };
        }
    }
}

pub fn test_config() -> PrecompileConfig {
    PrecompileConfig::from_json_str(TEST_CONFIG).unwrap()
}

/// Token deployed over an in-memory host, with three accounts
///
/// `alice` starts with `INITIAL_BALANCE` and an initialized permit nonce.
pub struct TestContext {
    pub token: Erc20Precompile<MemoryStore>,
    pub alice: Account,
    pub bob: Account,
    pub carol: Account,
}

impl TestContext {
    pub fn new() -> Self {
        init_logger();

        let alice = random_account();
        let bob = random_account();
        let carol = random_account();

        let mut store = MemoryStore::new();
        store
            .fund(&alice.address, DENOM, U256::from(INITIAL_BALANCE))
            .unwrap();

        let mut token = Erc20Precompile::new(test_config(), store).unwrap();
        token.initialize_nonce(&alice.address).unwrap();

        Self {
            token,
            alice,
            bob,
            carol,
        }
    }

    pub fn ctx(&self, caller: &Account) -> RuntimeContext {
        RuntimeContext::new(caller.address, NOW)
    }

    pub fn balance(&self, account: &Account) -> U256 {
        self.token.balance_of(&account.address).unwrap()
    }

    pub fn allowance(&self, owner: &Account, spender: &Account) -> U256 {
        self.token
            .allowance(&self.ctx(owner), &owner.address, &spender.address)
            .unwrap()
    }

    pub fn nonce(&self, owner: &Account) -> U256 {
        self.token.nonces(&owner.address).unwrap()
    }

    /// Sign a permit for `owner` against this token's domain
    pub fn sign_permit(
        &self,
        signer: &Account,
        owner: &Account,
        spender: &Account,
        value: U256,
        nonce: U256,
        deadline: u64,
    ) -> SignedPermit {
        let message = PermitMessage {
            owner: owner.address,
            spender: spender.address,
            value,
            nonce,
            deadline: U256::from(deadline),
        };
        let digest = message.digest(&self.token.domain_separator());
        let signature = RecoverableSignature::sign(&signer.secret, &digest).unwrap();

        SignedPermit {
            owner: message.owner,
            spender: message.spender,
            value: message.value,
            deadline: message.deadline,
            signature,
        }
    }
}
