//! Token Constants
//!
//! Message type URLs, event signatures, typed-data type strings and
//! storage key material shared by the allowance, transfer and permit paths.

// ===== Authorization Store =====

/// Message type a send grant authorizes; grants are keyed by
/// (grantee, granter, message type)
pub const SEND_MSG_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";

/// Type URL of the spend-limit authorization
pub const SEND_AUTHORIZATION_TYPE_URL: &str = "/cosmos.bank.v1beta1.SendAuthorization";

/// Denomination format accepted in a spend-limit
pub const DENOM_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9/:._-]{2,127}$";

// ===== Events =====

pub const TRANSFER_EVENT_SIGNATURE: &str = "Transfer(address,address,uint256)";
pub const APPROVAL_EVENT_SIGNATURE: &str = "Approval(address,address,uint256)";

// ===== EIP-712 =====

/// Typed-data envelope prefix
pub const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];

pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const PERMIT_TYPE: &str =
    "Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

// ===== Permit Nonce Storage =====

/// Key material mixed with the owner address to derive the nonce slot
pub const PERMIT_NONCE_KEY_MATERIAL: &[u8] = b"permit_nonce";

/// Key material is right-padded into a single 32-byte word
pub const MAX_KEY_MATERIAL_LENGTH: usize = 32;

const _: () = assert!(PERMIT_NONCE_KEY_MATERIAL.len() <= MAX_KEY_MATERIAL_LENGTH);
