//! Permit Integration Tests
//!
//! Signed approvals through the token contract:
//! - Reference signature against the published domain
//! - Nonce lifecycle and replay protection
//! - Deadline handling
//! - Signer and domain mismatches

#![allow(clippy::disallowed_methods)]

mod common;

use common::*;
use erc20_common::crypto::{Address, RecoverableSignature};
use erc20_common::token::memory::MemoryStore;
use erc20_common::token::operations::RuntimeContext;
use erc20_common::token::{Erc20Error, Erc20Event, ErrorCategory, PermitMessage, SignedPermit};
use erc20_precompile::{Erc20Call, Erc20Output, Erc20Precompile, PrecompileConfig};
use primitive_types::U256;

const REFERENCE_OWNER_KEY: [u8; 32] = [0x46; 32];
const REFERENCE_SPENDER: &str = "0x00000000000000000000000000000000000000b0";
const REFERENCE_R: &str = "bb50e2d89a4ed70663d080659fe0ad4b9bc3e06c17a227433966cb59ceee020d";
const REFERENCE_S: &str = "6a28317d7dfa6b069fef02eb07986bbc2545eced1310354854914126358d3753";

fn word(value: &str) -> [u8; 32] {
    let bytes = hex::decode(value).unwrap();
    let mut word = [0u8; 32];
    word.copy_from_slice(&bytes);
    word
}

#[test]
fn test_reference_permit() {
    init_logger();

    let owner = Account::from_secret(REFERENCE_OWNER_KEY);
    assert_eq!(
        owner.address.to_string(),
        "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
    );
    let spender: Address = REFERENCE_SPENDER.parse().unwrap();

    let mut token = Erc20Precompile::new(test_config(), MemoryStore::new()).unwrap();
    assert_eq!(
        token.domain_separator().to_hex(),
        "18f4be2e88258abddcb1388fe0647dbf080426df6502383164abac72e03d54eb"
    );
    token.initialize_nonce(&owner.address).unwrap();

    let request = SignedPermit {
        owner: owner.address,
        spender,
        value: U256::from(1000u64),
        deadline: U256::from(1_700_000_000u64),
        signature: RecoverableSignature::new(27, word(REFERENCE_R), word(REFERENCE_S)),
    };

    // Anyone may submit the signed message
    let relayer = RuntimeContext::new(Address::new([0x77; 20]), 1_700_000_000);
    let outcome = token.run(&relayer, Erc20Call::Permit(request)).unwrap();

    assert_eq!(outcome.output, Erc20Output::Bool(true));
    assert_eq!(
        outcome.events,
        vec![Erc20Event::Approval {
            owner: owner.address,
            spender,
            value: U256::from(1000u64)
        }]
    );
    assert_eq!(
        token.allowance(&relayer, &owner.address, &spender).unwrap(),
        U256::from(1000u64)
    );
    assert_eq!(token.nonces(&owner.address).unwrap(), U256::one());
}

#[test]
fn test_permit_round_trip_and_replay() {
    let mut ctx = TestContext::new();
    let deadline = NOW + 3600;
    let request = ctx.sign_permit(
        &ctx.alice,
        &ctx.alice,
        &ctx.bob,
        U256::from(321u64),
        U256::zero(),
        deadline,
    );

    let relayer_ctx = ctx.ctx(&ctx.carol);
    ctx.token.permit(&relayer_ctx, &request).unwrap();
    assert_eq!(ctx.allowance(&ctx.alice, &ctx.bob), U256::from(321u64));
    assert_eq!(ctx.nonce(&ctx.alice), U256::one());

    // The nonce moved on, so the same signature no longer verifies
    let err = ctx.token.permit(&relayer_ctx, &request).unwrap_err();
    assert!(matches!(
        err.as_token_error(),
        Some(Erc20Error::SignerMismatch { .. })
    ));
    assert_eq!(ctx.nonce(&ctx.alice), U256::one());

    // A fresh signature over the next nonce works
    let request = ctx.sign_permit(
        &ctx.alice,
        &ctx.alice,
        &ctx.bob,
        U256::from(5u64),
        U256::one(),
        deadline,
    );
    ctx.token.permit(&relayer_ctx, &request).unwrap();
    assert_eq!(ctx.allowance(&ctx.alice, &ctx.bob), U256::from(5u64));
    assert_eq!(ctx.nonce(&ctx.alice), U256::from(2u64));
}

#[test]
fn test_permit_deadline_is_inclusive() {
    let mut ctx = TestContext::new();
    let request = ctx.sign_permit(
        &ctx.alice,
        &ctx.alice,
        &ctx.bob,
        U256::from(10u64),
        U256::zero(),
        NOW,
    );

    let at_deadline = ctx.ctx(&ctx.bob);
    ctx.token.permit(&at_deadline, &request).unwrap();
    assert_eq!(ctx.allowance(&ctx.alice, &ctx.bob), U256::from(10u64));
}

#[test]
fn test_expired_permit_fails() {
    let mut ctx = TestContext::new();
    let request = ctx.sign_permit(
        &ctx.alice,
        &ctx.alice,
        &ctx.bob,
        U256::from(10u64),
        U256::zero(),
        NOW - 1,
    );

    let call_ctx = ctx.ctx(&ctx.bob);
    let err = ctx.token.permit(&call_ctx, &request).unwrap_err();
    assert_eq!(err.category(), Some(ErrorCategory::Deadline));
    assert_eq!(ctx.allowance(&ctx.alice, &ctx.bob), U256::zero());
    assert_eq!(ctx.nonce(&ctx.alice), U256::zero());
}

#[test]
fn test_permit_signed_by_another_key_fails() {
    let mut ctx = TestContext::new();
    let request = ctx.sign_permit(
        &ctx.carol,
        &ctx.alice,
        &ctx.bob,
        U256::from(10u64),
        U256::zero(),
        NOW + 60,
    );

    let call_ctx = ctx.ctx(&ctx.bob);
    let err = ctx.token.permit(&call_ctx, &request).unwrap_err();
    assert_eq!(err.category(), Some(ErrorCategory::Authorization));
    assert_eq!(
        err.as_token_error(),
        Some(&Erc20Error::SignerMismatch {
            expected: ctx.alice.address,
            recovered: ctx.carol.address,
        })
    );
    assert_eq!(ctx.allowance(&ctx.alice, &ctx.bob), U256::zero());
    assert_eq!(ctx.nonce(&ctx.alice), U256::zero());
}

#[test]
fn test_permit_with_tampered_value_fails() {
    let mut ctx = TestContext::new();
    let mut request = ctx.sign_permit(
        &ctx.alice,
        &ctx.alice,
        &ctx.bob,
        U256::from(10u64),
        U256::zero(),
        NOW + 60,
    );
    request.value = U256::from(10_000u64);

    let call_ctx = ctx.ctx(&ctx.bob);
    let err = ctx.token.permit(&call_ctx, &request).unwrap_err();
    assert_eq!(err.category(), Some(ErrorCategory::Authorization));
    assert_eq!(ctx.allowance(&ctx.alice, &ctx.bob), U256::zero());
}

#[test]
fn test_permit_for_another_domain_fails() {
    let mut ctx = TestContext::new();

    let mut other_config: PrecompileConfig = test_config();
    other_config.chain_id = 1;
    let other = Erc20Precompile::new(other_config, MemoryStore::new()).unwrap();

    let message = PermitMessage {
        owner: ctx.alice.address,
        spender: ctx.bob.address,
        value: U256::from(10u64),
        nonce: U256::zero(),
        deadline: U256::from(NOW + 60),
    };
    let digest = message.digest(&other.domain_separator());
    let signature = RecoverableSignature::sign(&ctx.alice.secret, &digest).unwrap();
    let request = SignedPermit {
        owner: message.owner,
        spender: message.spender,
        value: message.value,
        deadline: message.deadline,
        signature,
    };

    let call_ctx = ctx.ctx(&ctx.bob);
    let err = ctx.token.permit(&call_ctx, &request).unwrap_err();
    assert!(matches!(
        err.as_token_error(),
        Some(Erc20Error::SignerMismatch { .. })
    ));
}

#[test]
fn test_permit_requires_initialized_nonce() {
    let mut ctx = TestContext::new();

    // No counter was ever created for bob
    let err = ctx.token.nonces(&ctx.bob.address).unwrap_err();
    assert_eq!(
        err.as_token_error(),
        Some(&Erc20Error::NonceNotInitialized(ctx.bob.address))
    );

    let request = ctx.sign_permit(
        &ctx.bob,
        &ctx.bob,
        &ctx.carol,
        U256::from(10u64),
        U256::zero(),
        NOW + 60,
    );
    let call_ctx = ctx.ctx(&ctx.carol);
    let err = ctx.token.permit(&call_ctx, &request).unwrap_err();
    assert_eq!(err.category(), Some(ErrorCategory::State));

    assert!(ctx.token.initialize_nonce(&ctx.bob.address).unwrap());
    assert!(!ctx.token.initialize_nonce(&ctx.bob.address).unwrap());
    assert_eq!(ctx.nonce(&ctx.bob), U256::zero());

    let call_ctx = ctx.ctx(&ctx.carol);
    ctx.token.permit(&call_ctx, &request).unwrap();
    assert_eq!(ctx.allowance(&ctx.bob, &ctx.carol), U256::from(10u64));
}

#[test]
fn test_permit_zero_value_revokes() {
    let mut ctx = TestContext::new();
    let owner_ctx = ctx.ctx(&ctx.alice);
    let bob = ctx.bob.address;
    ctx.token.approve(&owner_ctx, &bob, U256::from(99u64)).unwrap();

    let request = ctx.sign_permit(
        &ctx.alice,
        &ctx.alice,
        &ctx.bob,
        U256::zero(),
        U256::zero(),
        NOW + 60,
    );
    ctx.token.permit(&owner_ctx, &request).unwrap();

    assert_eq!(ctx.allowance(&ctx.alice, &ctx.bob), U256::zero());
    assert_eq!(ctx.token.storage().grant_count(), 0);
    assert_eq!(ctx.nonce(&ctx.alice), U256::one());
}

#[test]
fn test_self_permit_advances_nonce_only() {
    let mut ctx = TestContext::new();
    let request = ctx.sign_permit(
        &ctx.alice,
        &ctx.alice,
        &ctx.alice,
        U256::from(10u64),
        U256::zero(),
        NOW + 60,
    );

    let call_ctx = ctx.ctx(&ctx.alice);
    let outcome = ctx.token.permit(&call_ctx, &request).unwrap();

    assert_eq!(outcome.events.len(), 1);
    assert_eq!(ctx.token.storage().grant_count(), 0);
    assert_eq!(ctx.allowance(&ctx.alice, &ctx.alice), U256::max_value());
    assert_eq!(ctx.nonce(&ctx.alice), U256::one());
}

#[test]
fn test_nonces_query_through_run() {
    let mut ctx = TestContext::new();
    let query_ctx = ctx.ctx(&ctx.bob);
    let owner = ctx.alice.address;

    let outcome = ctx
        .token
        .run(&query_ctx, Erc20Call::Nonces { owner })
        .unwrap();
    assert_eq!(outcome.output, Erc20Output::Uint256(U256::zero()));
    assert!(outcome.events.is_empty());
}
