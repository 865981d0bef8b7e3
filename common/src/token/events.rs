use super::constants::{APPROVAL_EVENT_SIGNATURE, TRANSFER_EVENT_SIGNATURE};
use crate::crypto::{keccak256, Address, Hash};
use lazy_static::lazy_static;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

lazy_static! {
    pub static ref TRANSFER_EVENT_TOPIC: Hash = keccak256(TRANSFER_EVENT_SIGNATURE.as_bytes());
    pub static ref APPROVAL_EVENT_TOPIC: Hash = keccak256(APPROVAL_EVENT_SIGNATURE.as_bytes());
}

/// Events emitted by token write operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Erc20Event {
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },
    Approval {
        owner: Address,
        spender: Address,
        value: U256,
    },
}

impl Erc20Event {
    pub fn signature(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => TRANSFER_EVENT_SIGNATURE,
            Self::Approval { .. } => APPROVAL_EVENT_SIGNATURE,
        }
    }

    pub fn topic(&self) -> Hash {
        match self {
            Self::Transfer { .. } => *TRANSFER_EVENT_TOPIC,
            Self::Approval { .. } => *APPROVAL_EVENT_TOPIC,
        }
    }

    pub fn value(&self) -> U256 {
        match self {
            Self::Transfer { value, .. } | Self::Approval { value, .. } => *value,
        }
    }

    /// Encode as a log: both addresses indexed, value as a single data word
    pub fn to_log(&self, contract: Address) -> Log {
        let (first, second) = match self {
            Self::Transfer { from, to, .. } => (from, to),
            Self::Approval { owner, spender, .. } => (owner, spender),
        };

        Log {
            address: contract,
            topics: vec![
                self.topic(),
                Hash::new(first.to_word()),
                Hash::new(second.to_word()),
            ],
            data: self.value().to_big_endian().to_vec(),
        }
    }
}

/// Log entry handed to the host's event mechanism
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<Hash>,
    pub data: Vec<u8>,
}
