//! EIP-712 typed-data hashing for permits
//!
//! digest = keccak256(0x1901 ‖ domainSeparator ‖ structHash)
//!
//! Every field is packed as a 32-byte word: strings by their hash,
//! addresses left-padded, integers big-endian.

use super::constants::{EIP712_DOMAIN_TYPE, EIP712_PREFIX, PERMIT_TYPE};
use crate::crypto::{keccak256, keccak256_concat, Address, Hash, RecoverableSignature};
use lazy_static::lazy_static;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

lazy_static! {
    pub static ref EIP712_DOMAIN_TYPEHASH: Hash = keccak256(EIP712_DOMAIN_TYPE.as_bytes());
    pub static ref PERMIT_TYPEHASH: Hash = keccak256(PERMIT_TYPE.as_bytes());
}

/// Domain separator inputs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitDomain {
    /// Token name
    pub name: String,
    /// Version string
    pub version: String,
    /// Chain ID
    pub chain_id: U256,
    /// Address of the token contract
    pub verifying_contract: Address,
}

impl PermitDomain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: U256,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    /// keccak256(typeHash ‖ keccak(name) ‖ keccak(version) ‖ chainId ‖ verifyingContract)
    pub fn separator(&self) -> Hash {
        keccak256_concat(&[
            EIP712_DOMAIN_TYPEHASH.as_bytes(),
            keccak256(self.name.as_bytes()).as_bytes(),
            keccak256(self.version.as_bytes()).as_bytes(),
            &self.chain_id.to_big_endian(),
            &self.verifying_contract.to_word(),
        ])
    }
}

/// Permit message for approval
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitMessage {
    /// Owner address
    pub owner: Address,
    /// Spender address
    pub spender: Address,
    /// Approved amount
    pub value: U256,
    /// Owner's current permit nonce
    pub nonce: U256,
    /// Deadline, seconds since the unix epoch
    pub deadline: U256,
}

impl PermitMessage {
    pub fn struct_hash(&self) -> Hash {
        keccak256_concat(&[
            PERMIT_TYPEHASH.as_bytes(),
            &self.owner.to_word(),
            &self.spender.to_word(),
            &self.value.to_big_endian(),
            &self.nonce.to_big_endian(),
            &self.deadline.to_big_endian(),
        ])
    }

    /// Digest the owner signs, bound to `domain_separator`
    pub fn digest(&self, domain_separator: &Hash) -> Hash {
        typed_data_digest(domain_separator, &self.struct_hash())
    }
}

/// keccak256(0x1901 ‖ domainSeparator ‖ structHash)
pub fn typed_data_digest(domain_separator: &Hash, struct_hash: &Hash) -> Hash {
    keccak256_concat(&[
        &EIP712_PREFIX,
        domain_separator.as_bytes(),
        struct_hash.as_bytes(),
    ])
}

/// Signed permit request, never persisted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPermit {
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
    pub deadline: U256,
    pub signature: RecoverableSignature,
}
