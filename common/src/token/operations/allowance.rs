// Token Allowance Operations
// Allowances are spend-limit grants in the shared authorization store,
// with the owner as granter and the spender as grantee.

use log::{debug, trace};
use primitive_types::U256;

use crate::crypto::Address;
use crate::token::{
    Authorization, Coin, Coins, Erc20Error, Erc20Event, Erc20Result, Grant, SendAuthorization,
    SEND_MSG_TYPE_URL,
};

use super::validation::validate_spender;
use super::{AuthzProvider, ExecutionScope, RuntimeContext, TokenParams};

/// What `set_allowance` did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowanceUpdate {
    /// Nothing written
    Unchanged,
    /// New grant saved
    Created,
    /// Existing grant saved with a new spend limit
    Updated,
    /// Existing grant removed
    Deleted,
}

// ========================================
// Grant Lookup
// ========================================

/// Send grant as stored, before any expiration filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSendGrant {
    pub authorization: SendAuthorization,
    pub expiration: Option<u64>,
    /// `expiration` is strictly before the block time
    pub expired: bool,
}

/// Fetch the stored send grant for (spender, owner), expired or not
///
/// The authorization kind is checked first: a grant of any other kind is
/// an error even when it has expired, so it is never mistaken for an
/// absent grant and overwritten.
pub fn load_send_grant<S: AuthzProvider + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    owner: &Address,
    spender: &Address,
) -> Erc20Result<Option<StoredSendGrant>> {
    let grant = match storage.get_grant(spender, owner, SEND_MSG_TYPE_URL)? {
        Some(grant) => grant,
        None => return Ok(None),
    };

    let expired = grant.is_expired(ctx.block_time);
    let Grant {
        authorization,
        expiration,
    } = grant;

    Ok(Some(StoredSendGrant {
        authorization: authorization.into_send()?,
        expiration,
        expired,
    }))
}

/// Fetch the live send grant for (spender, owner)
///
/// Expired send grants are treated as absent.
pub fn get_send_grant<S: AuthzProvider + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    owner: &Address,
    spender: &Address,
) -> Erc20Result<Option<(SendAuthorization, Option<u64>)>> {
    Ok(load_send_grant(storage, ctx, owner, spender)?
        .filter(|grant| !grant.expired)
        .map(|grant| (grant.authorization, grant.expiration)))
}

/// Live send grant `spender` needs to move `owner`'s funds
///
/// Fails with `GrantNotFound` when nothing is stored and with
/// `GrantExpired` when the stored grant has lapsed.
pub fn require_send_grant<S: AuthzProvider + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    owner: &Address,
    spender: &Address,
) -> Erc20Result<SendAuthorization> {
    let grant = load_send_grant(storage, ctx, owner, spender)?.ok_or(
        Erc20Error::GrantNotFound {
            grantee: *spender,
            granter: *owner,
        },
    )?;

    match grant.expiration {
        Some(expiration) if grant.expired => Err(Erc20Error::GrantExpired { expiration }),
        _ => Ok(grant.authorization),
    }
}

// ========================================
// Allowance Query
// ========================================

/// Amount `spender` may still move out of `owner`'s balance
///
/// An account always has an unlimited allowance over itself.
pub fn allowance<S: AuthzProvider + ?Sized>(
    storage: &S,
    ctx: &RuntimeContext,
    params: &TokenParams,
    owner: &Address,
    spender: &Address,
) -> Erc20Result<U256> {
    if owner == spender {
        return Ok(U256::max_value());
    }

    let amount = get_send_grant(storage, ctx, owner, spender)?
        .map(|(auth, _)| auth.spend_limit.amount_of(&params.denom))
        .unwrap_or_default();

    if log::log_enabled!(log::Level::Trace) {
        trace!(
            "allowance owner={} spender={} denom={} amount={}",
            owner,
            spender,
            params.denom,
            amount
        );
    }

    Ok(amount)
}

// ========================================
// Allowance Engine
// ========================================

/// Save a fresh grant holding only `target` of `params.denom`
fn create_grant<S: AuthzProvider + ?Sized>(
    storage: &mut S,
    params: &TokenParams,
    owner: &Address,
    spender: &Address,
    target: U256,
) -> Erc20Result<AllowanceUpdate> {
    let spend_limit = Coins::from_coin(Coin::new(params.denom.as_str(), target))?;
    let auth = SendAuthorization::new(spend_limit);
    auth.validate_basic()?;

    storage.save_grant(
        spender,
        owner,
        Authorization::Send(auth),
        Some(params.grant_expiration),
    )?;
    debug!(
        "created grant owner={} spender={} amount={}{}",
        owner, spender, target, params.denom
    );
    Ok(AllowanceUpdate::Created)
}

/// Bring the spender's allowance for `params.denom` to exactly `target`
///
/// Decision table over the current grant:
/// - absent, target 0: nothing to do
/// - absent, target > 0: create a grant with the configured expiration
/// - expired, target 0: delete the grant
/// - expired, target > 0: replace it with a fresh grant
/// - present: add or subtract the difference, keep the expiration
/// - present, nothing positive left: delete the grant
///
/// The new spend limit is validated before anything is written.
pub fn set_allowance<S: AuthzProvider + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    params: &TokenParams,
    owner: &Address,
    spender: &Address,
    target: U256,
) -> Erc20Result<AllowanceUpdate> {
    let current = match load_send_grant(storage, ctx, owner, spender)? {
        None if target.is_zero() => return Ok(AllowanceUpdate::Unchanged),
        None => return create_grant(storage, params, owner, spender, target),
        Some(grant) if grant.expired => {
            // A lapsed grant is cleared or replaced, never topped up
            if target.is_zero() {
                storage.delete_grant(spender, owner, SEND_MSG_TYPE_URL)?;
                debug!("deleted expired grant owner={} spender={}", owner, spender);
                return Ok(AllowanceUpdate::Deleted);
            }
            return create_grant(storage, params, owner, spender, target);
        }
        Some(grant) => grant,
    };
    let StoredSendGrant {
        authorization: auth,
        expiration,
        ..
    } = current;

    let held = auth.spend_limit.amount_of(&params.denom);
    let mut spend_limit = if target > held {
        auth.spend_limit.add_amount(&params.denom, target - held)?
    } else if target < held {
        auth.spend_limit.sub_amount(&params.denom, held - target)?
    } else {
        return Ok(AllowanceUpdate::Unchanged);
    };
    spend_limit.sort();

    if !spend_limit.has_positive() {
        storage.delete_grant(spender, owner, SEND_MSG_TYPE_URL)?;
        debug!("deleted grant owner={} spender={}", owner, spender);
        return Ok(AllowanceUpdate::Deleted);
    }

    let updated = SendAuthorization {
        spend_limit,
        allow_list: auth.allow_list,
    };
    updated.validate_basic()?;

    storage.save_grant(spender, owner, Authorization::Send(updated), expiration)?;
    debug!(
        "updated grant owner={} spender={} amount={}{}",
        owner, spender, target, params.denom
    );
    Ok(AllowanceUpdate::Updated)
}

// ========================================
// Approve Operations
// ========================================

/// Set the caller's allowance for `spender` to `amount`
///
/// # Parameters
/// - `storage`: Authorization store
/// - `ctx`: Runtime context (caller is the owner)
/// - `scope`: Receives the Approval event
/// - `params`: Token denomination and grant expiration
/// - `spender`: Grantee
/// - `amount`: New allowance
///
/// # Returns
/// - `Ok(())`: Success
/// - `Err(Erc20Error)`: Nothing written, no event
pub fn approve<S: AuthzProvider + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    scope: &mut ExecutionScope,
    params: &TokenParams,
    spender: &Address,
    amount: U256,
) -> Erc20Result<()> {
    // Step 1: Input validation
    validate_spender(spender)?;

    // Step 2: Apply allowance (self-approval has no stored state)
    let owner = ctx.caller;
    if owner != *spender {
        set_allowance(storage, ctx, params, &owner, spender, amount)?;
    }

    // Step 3: Emit event
    scope.emit(Erc20Event::Approval {
        owner,
        spender: *spender,
        value: amount,
    });

    Ok(())
}

/// Raise the caller's allowance for `spender` by `added`
pub fn increase_allowance<S: AuthzProvider + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    scope: &mut ExecutionScope,
    params: &TokenParams,
    spender: &Address,
    added: U256,
) -> Erc20Result<()> {
    validate_spender(spender)?;

    let owner = ctx.caller;
    if owner == *spender {
        scope.emit(Erc20Event::Approval {
            owner,
            spender: *spender,
            value: U256::max_value(),
        });
        return Ok(());
    }

    let current = allowance(storage, ctx, params, &owner, spender)?;
    let target = current
        .checked_add(added)
        .ok_or(Erc20Error::AllowanceOverflow)?;

    set_allowance(storage, ctx, params, &owner, spender, target)?;
    scope.emit(Erc20Event::Approval {
        owner,
        spender: *spender,
        value: target,
    });

    Ok(())
}

/// Lower the caller's allowance for `spender` by `subtracted`
pub fn decrease_allowance<S: AuthzProvider + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    scope: &mut ExecutionScope,
    params: &TokenParams,
    spender: &Address,
    subtracted: U256,
) -> Erc20Result<()> {
    validate_spender(spender)?;

    let owner = ctx.caller;
    if owner == *spender {
        scope.emit(Erc20Event::Approval {
            owner,
            spender: *spender,
            value: U256::max_value(),
        });
        return Ok(());
    }

    let current = allowance(storage, ctx, params, &owner, spender)?;
    let target = current
        .checked_sub(subtracted)
        .ok_or(Erc20Error::AllowanceUnderflow)?;

    set_allowance(storage, ctx, params, &owner, spender, target)?;
    scope.emit(Erc20Event::Approval {
        owner,
        spender: *spender,
        value: target,
    });

    Ok(())
}
