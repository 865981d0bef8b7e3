use super::{Address, CryptoError, Hash, HASH_SIZE};
use libsecp256k1::{Message, PublicKey, RecoveryId, SecretKey, Signature};
use serde::{Deserialize, Serialize};

/// secp256k1 group order n, big-endian
pub const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// floor(n / 2), the largest accepted s value
pub const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Offset added to the raw recovery id to obtain `v`
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// Recoverable secp256k1 signature in (v, r, s) form
///
/// `v` is 27 or 28; `r` and `s` are 32-byte big-endian scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoverableSignature {
    pub v: u8,
    pub r: [u8; HASH_SIZE],
    pub s: [u8; HASH_SIZE],
}

impl RecoverableSignature {
    pub fn new(v: u8, r: [u8; HASH_SIZE], s: [u8; HASH_SIZE]) -> Self {
        Self { v, r, s }
    }

    /// Reject malleable or malformed signatures
    ///
    /// - `v` must be one of the two canonical values
    /// - `0 < r < n`
    /// - `0 < s <= n / 2` (low-S)
    pub fn validate(&self) -> Result<(), CryptoError> {
        self.recovery_id()?;

        let zero = [0u8; HASH_SIZE];
        if self.r == zero || self.r >= SECP256K1_ORDER {
            return Err(CryptoError::NonCanonicalSignature);
        }
        if self.s == zero || self.s > SECP256K1_HALF_ORDER {
            return Err(CryptoError::NonCanonicalSignature);
        }

        Ok(())
    }

    /// Raw recovery id (0 or 1)
    pub fn recovery_id(&self) -> Result<u8, CryptoError> {
        match self.v {
            27 | 28 => Ok(self.v - RECOVERY_ID_OFFSET),
            v => Err(CryptoError::InvalidRecoveryId(v)),
        }
    }

    /// Recover the address that produced this signature over `digest`
    pub fn recover(&self, digest: &Hash) -> Result<Address, CryptoError> {
        self.validate()?;

        let recovery_id =
            RecoveryId::parse(self.recovery_id()?).map_err(|_| CryptoError::InvalidSignature)?;

        let mut compact = [0u8; 64];
        compact[..32].copy_from_slice(&self.r);
        compact[32..].copy_from_slice(&self.s);
        let signature =
            Signature::parse_standard(&compact).map_err(|_| CryptoError::InvalidSignature)?;

        let message = Message::parse(digest.as_bytes());
        let public_key = libsecp256k1::recover(&message, &signature, &recovery_id)
            .map_err(|_| CryptoError::RecoveryFailed)?;

        Ok(Address::from_public_key(&public_key.serialize()))
    }

    /// Sign `digest` with a raw secret key, producing a canonical (low-S) signature
    pub fn sign(secret: &[u8; HASH_SIZE], digest: &Hash) -> Result<Self, CryptoError> {
        let secret_key = SecretKey::parse(secret).map_err(|_| CryptoError::InvalidSecretKey)?;
        let message = Message::parse(digest.as_bytes());
        let (signature, recovery_id) = libsecp256k1::sign(&message, &secret_key);

        let recovery_id = recovery_id.serialize();
        if recovery_id > 1 {
            return Err(CryptoError::InvalidSignature);
        }

        let compact = signature.serialize();
        let mut r = [0u8; HASH_SIZE];
        let mut s = [0u8; HASH_SIZE];
        r.copy_from_slice(&compact[..32]);
        s.copy_from_slice(&compact[32..]);

        Ok(Self {
            v: recovery_id + RECOVERY_ID_OFFSET,
            r,
            s,
        })
    }
}

/// Address controlled by a raw secp256k1 secret key
pub fn address_from_secret(secret: &[u8; HASH_SIZE]) -> Result<Address, CryptoError> {
    let secret_key = SecretKey::parse(secret).map_err(|_| CryptoError::InvalidSecretKey)?;
    let public_key = PublicKey::from_secret_key(&secret_key);
    Ok(Address::from_public_key(&public_key.serialize()))
}
