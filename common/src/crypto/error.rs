use thiserror::Error;

/// Errors that can occur during cryptographic operations
///
/// Covers hex parsing of the fixed-size primitives and the secp256k1
/// signature checks used by permits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid hexadecimal string format
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Hash has invalid length
    #[error("Invalid hash length: {len} bytes, expected: {expected} bytes")]
    InvalidHashLength { len: usize, expected: usize },

    /// Address has invalid length
    #[error("Invalid address length: {len} bytes, expected: {expected} bytes")]
    InvalidAddressLength { len: usize, expected: usize },

    /// Recovery id outside of the two canonical values
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    /// r or s outside of the accepted scalar range
    #[error("Non-canonical signature")]
    NonCanonicalSignature,

    /// Signature bytes could not be parsed
    #[error("Invalid signature")]
    InvalidSignature,

    /// Public key recovery failed for the given digest
    #[error("Public key recovery failed")]
    RecoveryFailed,

    /// Secret key is zero or not below the curve order
    #[error("Invalid secret key")]
    InvalidSecretKey,
}
