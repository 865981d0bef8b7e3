// Token Permit Operations
// Gas-less approvals: the owner signs an EIP-712 digest off-chain and anyone
// may submit it. A verified permit is applied exactly like `approve`.

use log::{debug, warn};
use primitive_types::U256;

use crate::crypto::{keccak256_concat, Address, Hash};
use crate::token::{
    Erc20Error, Erc20Event, Erc20Result, PermitMessage, SignedPermit, MAX_KEY_MATERIAL_LENGTH,
    PERMIT_NONCE_KEY_MATERIAL,
};

use super::allowance::set_allowance;
use super::validation::{validate_owner, validate_spender};
use super::{AuthzProvider, ExecutionScope, NonceProvider, RuntimeContext, TokenParams};

// ========================================
// Nonce Storage
// ========================================

/// Derive the storage slot for an owner-scoped value
///
/// key = keccak256(leftpad32(owner) ‖ rightpad32(material))
pub fn derive_owner_key(material: &[u8], owner: &Address) -> Erc20Result<Hash> {
    if material.len() > MAX_KEY_MATERIAL_LENGTH {
        return Err(Erc20Error::InvalidKeyMaterial {
            len: material.len(),
        });
    }

    let mut padded = [0u8; MAX_KEY_MATERIAL_LENGTH];
    padded[..material.len()].copy_from_slice(material);
    Ok(keccak256_concat(&[&owner.to_word(), &padded]))
}

/// Storage slot of `owner`'s permit nonce
pub fn build_permit_nonce_key(owner: &Address) -> Erc20Result<Hash> {
    derive_owner_key(PERMIT_NONCE_KEY_MATERIAL, owner)
}

/// Current permit nonce of `owner`
///
/// An owner whose counter was never initialized has no nonce; this is
/// reported as an error rather than read as zero.
pub fn get_permit_nonce<S: NonceProvider + ?Sized>(storage: &S, owner: &Address) -> Erc20Result<U256> {
    let key = build_permit_nonce_key(owner)?;
    let value = storage
        .get_value(&key)?
        .ok_or(Erc20Error::NonceNotInitialized(*owner))?;
    Ok(U256::from_big_endian(&value))
}

/// Create `owner`'s nonce counter at zero
///
/// Returns false when the counter already exists; its value is left as is.
pub fn initialize_permit_nonce<S: NonceProvider + ?Sized>(
    storage: &mut S,
    owner: &Address,
) -> Erc20Result<bool> {
    validate_owner(owner)?;

    let key = build_permit_nonce_key(owner)?;
    if storage.get_value(&key)?.is_some() {
        return Ok(false);
    }

    storage.set_value(&key, [0u8; 32])?;
    debug!("initialized permit nonce for {}", owner);
    Ok(true)
}

// ========================================
// Permit Operation
// ========================================

/// Apply a signed approval
///
/// # Parameters
/// - `storage`: Authorization store and nonce store
/// - `ctx`: Runtime context (block time bounds the deadline; the caller is irrelevant)
/// - `scope`: Receives the Approval event
/// - `params`: Token denomination and grant expiration
/// - `domain_separator`: EIP-712 domain of this token
/// - `request`: Owner, spender, value, deadline and signature
///
/// # Returns
/// - `Ok(())`: Allowance set, nonce advanced, event emitted
/// - `Err(Erc20Error)`: Nothing written; the same nonce remains usable
pub fn permit<S: AuthzProvider + NonceProvider + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    scope: &mut ExecutionScope,
    params: &TokenParams,
    domain_separator: &Hash,
    request: &SignedPermit,
) -> Erc20Result<()> {
    let owner = request.owner;
    let spender = request.spender;

    // Step 1: Input validation
    validate_owner(&owner)?;
    validate_spender(&spender)?;

    // Step 2: Deadline (inclusive), before any signature work
    if request.deadline < U256::from(ctx.block_time) {
        return Err(Erc20Error::PermitExpired {
            deadline: request.deadline,
            block_time: ctx.block_time,
        });
    }

    // Step 3: Signature shape
    request.signature.validate()?;

    // Step 4: Current nonce
    let key = build_permit_nonce_key(&owner)?;
    let nonce = storage
        .get_value(&key)?
        .map(|value| U256::from_big_endian(&value))
        .ok_or(Erc20Error::NonceNotInitialized(owner))?;

    // Step 5: Digest and signer
    let message = PermitMessage {
        owner,
        spender,
        value: request.value,
        nonce,
        deadline: request.deadline,
    };
    let digest = message.digest(domain_separator);
    let recovered = request.signature.recover(&digest)?;
    if recovered != owner {
        warn!(
            "rejected permit for {}: signature recovers to {}",
            owner, recovered
        );
        return Err(Erc20Error::SignerMismatch {
            expected: owner,
            recovered,
        });
    }

    // Step 6: Compute the next nonce before any write
    let next_nonce = nonce
        .checked_add(U256::one())
        .ok_or(Erc20Error::NonceOverflow)?;

    // Step 7: Apply allowance (self-permit has no stored state)
    if owner != spender {
        set_allowance(storage, ctx, params, &owner, &spender, request.value)?;
    }

    // Step 8: Advance nonce
    storage.set_value(&key, next_nonce.to_big_endian())?;

    // Step 9: Emit event
    scope.emit(Erc20Event::Approval {
        owner,
        spender,
        value: request.value,
    });

    debug!(
        "permit applied owner={} spender={} value={} nonce={}",
        owner, spender, request.value, nonce
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{address_from_secret, CryptoError, RecoverableSignature};
    use crate::token::memory::MemoryStore;
    use crate::token::operations::allowance;
    use crate::token::PermitDomain;
    use std::str::FromStr;

    const DENOM: &str = "atoken";
    const NOW: u64 = 1_000;
    const OWNER_KEY: [u8; 32] = [0x46; 32];

    fn owner() -> Address {
        address_from_secret(&OWNER_KEY).unwrap()
    }

    fn spender() -> Address {
        Address::new([0x0B; 20])
    }

    fn params() -> TokenParams {
        TokenParams::new(DENOM, 50_000)
    }

    fn separator() -> Hash {
        PermitDomain::new("Test Token", "1", U256::from(9001u64), Address::new([0x08; 20]))
            .separator()
    }

    fn ctx() -> RuntimeContext {
        RuntimeContext::new(Address::new([0xEE; 20]), NOW)
    }

    fn signed(key: &[u8; 32], value: u64, nonce: u64, deadline: u64) -> SignedPermit {
        let message = PermitMessage {
            owner: owner(),
            spender: spender(),
            value: U256::from(value),
            nonce: U256::from(nonce),
            deadline: U256::from(deadline),
        };
        let signature = RecoverableSignature::sign(key, &message.digest(&separator())).unwrap();
        SignedPermit {
            owner: message.owner,
            spender: message.spender,
            value: message.value,
            deadline: message.deadline,
            signature,
        }
    }

    fn initialized_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        initialize_permit_nonce(&mut store, &owner()).unwrap();
        store
    }

    #[test]
    fn test_nonce_key_vector() {
        let owner = Address::from_str("0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f").unwrap();
        assert_eq!(
            build_permit_nonce_key(&owner).unwrap().to_hex(),
            "21d1a10ad602d2a6df5aaf58100e0a130e8a8d35d139cf8e8ff5a65c63802582"
        );
    }

    #[test]
    fn test_key_material_too_long() {
        assert_eq!(
            derive_owner_key(&[1u8; 33], &owner()),
            Err(Erc20Error::InvalidKeyMaterial { len: 33 })
        );
        assert!(derive_owner_key(&[1u8; 32], &owner()).is_ok());
    }

    #[test]
    fn test_uninitialized_nonce() {
        let store = MemoryStore::new();
        assert_eq!(
            get_permit_nonce(&store, &owner()),
            Err(Erc20Error::NonceNotInitialized(owner()))
        );
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut store = MemoryStore::new();
        assert!(initialize_permit_nonce(&mut store, &owner()).unwrap());
        assert_eq!(get_permit_nonce(&store, &owner()).unwrap(), U256::zero());

        let key = build_permit_nonce_key(&owner()).unwrap();
        store.set_value(&key, U256::from(3u64).to_big_endian()).unwrap();
        assert!(!initialize_permit_nonce(&mut store, &owner()).unwrap());
        assert_eq!(get_permit_nonce(&store, &owner()).unwrap(), U256::from(3u64));
    }

    #[test]
    fn test_permit_round_trip() {
        let mut store = initialized_store();
        let mut scope = ExecutionScope::new();
        let request = signed(&OWNER_KEY, 500, 0, NOW + 60);

        permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &request).unwrap();

        assert_eq!(
            allowance(&store, &ctx(), &params(), &owner(), &spender()).unwrap(),
            U256::from(500u64)
        );
        assert_eq!(get_permit_nonce(&store, &owner()).unwrap(), U256::one());
        assert_eq!(
            scope.events,
            vec![Erc20Event::Approval {
                owner: owner(),
                spender: spender(),
                value: U256::from(500u64)
            }]
        );

        // Same signature again: digest now uses nonce 1, recovery yields someone else
        let replay = permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &request);
        assert!(matches!(replay, Err(Erc20Error::SignerMismatch { .. })));
        assert_eq!(get_permit_nonce(&store, &owner()).unwrap(), U256::one());
        assert_eq!(scope.events.len(), 1);
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let mut store = initialized_store();
        let mut scope = ExecutionScope::new();
        let request = signed(&OWNER_KEY, 1, 0, NOW);

        permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &request).unwrap();
        assert_eq!(get_permit_nonce(&store, &owner()).unwrap(), U256::one());
    }

    #[test]
    fn test_expired_permit() {
        let mut store = initialized_store();
        let mut scope = ExecutionScope::new();
        let mut request = signed(&OWNER_KEY, 1, 0, NOW - 1);
        // Deadline is checked before the signature is looked at
        request.signature.v = 0;

        let result = permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &request);
        assert_eq!(
            result,
            Err(Erc20Error::PermitExpired {
                deadline: U256::from(NOW - 1),
                block_time: NOW
            })
        );
        assert_eq!(get_permit_nonce(&store, &owner()).unwrap(), U256::zero());
        assert!(scope.events.is_empty());
    }

    #[test]
    fn test_wrong_signer() {
        let mut store = initialized_store();
        let mut scope = ExecutionScope::new();
        let request = signed(&[0x47; 32], 500, 0, NOW + 60);

        let result = permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &request);
        assert_eq!(
            result,
            Err(Erc20Error::SignerMismatch {
                expected: owner(),
                recovered: address_from_secret(&[0x47; 32]).unwrap()
            })
        );
        assert_eq!(get_permit_nonce(&store, &owner()).unwrap(), U256::zero());
        assert_eq!(
            allowance(&store, &ctx(), &params(), &owner(), &spender()).unwrap(),
            U256::zero()
        );
        assert_eq!(store.grant_writes(), 0);
    }

    #[test]
    fn test_non_canonical_signature() {
        let mut store = initialized_store();
        let mut scope = ExecutionScope::new();
        let mut request = signed(&OWNER_KEY, 500, 0, NOW + 60);
        request.signature.v = 1;

        let result = permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &request);
        assert_eq!(
            result,
            Err(Erc20Error::InvalidSignature(CryptoError::InvalidRecoveryId(1)))
        );
    }

    #[test]
    fn test_permit_requires_initialized_nonce() {
        let mut store = MemoryStore::new();
        let mut scope = ExecutionScope::new();
        let request = signed(&OWNER_KEY, 500, 0, NOW + 60);

        let result = permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &request);
        assert_eq!(result, Err(Erc20Error::NonceNotInitialized(owner())));
        assert_eq!(store.grant_writes(), 0);
    }

    #[test]
    fn test_permit_zero_revokes() {
        let mut store = initialized_store();
        let mut scope = ExecutionScope::new();

        permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &signed(&OWNER_KEY, 9, 0, NOW + 60))
            .unwrap();
        permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &signed(&OWNER_KEY, 0, 1, NOW + 60))
            .unwrap();

        assert!(store.grant(&spender(), &owner()).is_none());
        assert_eq!(get_permit_nonce(&store, &owner()).unwrap(), U256::from(2u64));
    }

    #[test]
    fn test_nonce_overflow_leaves_allowance() {
        let mut store = MemoryStore::new();
        let key = build_permit_nonce_key(&owner()).unwrap();
        store.set_value(&key, U256::max_value().to_big_endian()).unwrap();

        let message = PermitMessage {
            owner: owner(),
            spender: spender(),
            value: U256::from(5u64),
            nonce: U256::max_value(),
            deadline: U256::from(NOW),
        };
        let request = SignedPermit {
            owner: owner(),
            spender: spender(),
            value: message.value,
            deadline: message.deadline,
            signature: RecoverableSignature::sign(&OWNER_KEY, &message.digest(&separator()))
                .unwrap(),
        };

        let mut scope = ExecutionScope::new();
        let result = permit(&mut store, &ctx(), &mut scope, &params(), &separator(), &request);
        assert_eq!(result, Err(Erc20Error::NonceOverflow));
        assert_eq!(store.grant_writes(), 0);
    }
}
