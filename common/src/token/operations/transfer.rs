// Token Transfer Operations
// Value movement is delegated to the ledger, either directly (owner moves
// own funds) or through the authorization store (spender consumes a grant).

use log::debug;
use primitive_types::U256;

use crate::crypto::Address;
use crate::token::{
    to_journal_amount, Coin, Coins, Erc20Event, Erc20Result, MsgSend,
};

use super::allowance::require_send_grant;
use super::validation::{validate_recipient, validate_sender};
use super::{AuthzProvider, BankProvider, ExecutionScope, RuntimeContext, TokenParams};

// ========================================
// Transfer Executor
// ========================================

/// Move `amount` from `from` to `to` on behalf of the caller
///
/// # Parameters
/// - `storage`: Ledger and authorization store
/// - `ctx`: Runtime context (caller, block time)
/// - `scope`: Receives the journal deltas and the Transfer event
/// - `params`: Token denomination
/// - `from`: Account debited
/// - `to`: Account credited
/// - `amount`: Value moved
///
/// # Returns
/// - `Ok(())`: Ledger moved, journal updated, event emitted
/// - `Err(Erc20Error)`: Nothing moved, nothing journaled, no event
pub fn move_value<S: BankProvider + AuthzProvider + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    scope: &mut ExecutionScope,
    params: &TokenParams,
    from: &Address,
    to: &Address,
    amount: U256,
) -> Erc20Result<()> {
    // Step 1: Input validation
    validate_sender(from)?;
    validate_recipient(to)?;

    // Step 2: Zero-value transfers only emit the event
    if amount.is_zero() {
        scope.emit(Erc20Event::Transfer {
            from: *from,
            to: *to,
            value: amount,
        });
        return Ok(());
    }

    // Step 3: Make sure the journal can take the delta before touching the ledger
    let journal_amount = to_journal_amount(amount)?;
    let mut journal = scope.journal.clone();
    journal.record_transfer(*from, *to, journal_amount)?;

    let coins = Coins::from_coin(Coin::new(params.denom.as_str(), amount))?;

    // Step 4: Move value
    if ctx.caller == *from {
        // 4.1 Owner moving own funds
        storage.send_coins(from, to, &coins)?;
        debug!("transfer {} -> {}: {}{}", from, to, amount, params.denom);
    } else {
        // 4.2 Spender consuming a live grant; the store decrements the
        // spend limit while dispatching
        require_send_grant(storage, ctx, from, &ctx.caller)?;

        let msg = MsgSend::new(*from, *to, coins);
        storage.dispatch_actions(&ctx.caller, vec![msg], ctx.block_time)?;
        debug!(
            "delegated transfer by {}: {} -> {}: {}{}",
            ctx.caller, from, to, amount, params.denom
        );
    }

    // Step 5: Journal and event
    scope.journal = journal;
    scope.emit(Erc20Event::Transfer {
        from: *from,
        to: *to,
        value: amount,
    });

    Ok(())
}

/// Transfer from the caller's own balance
pub fn transfer<S: BankProvider + AuthzProvider + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    scope: &mut ExecutionScope,
    params: &TokenParams,
    to: &Address,
    amount: U256,
) -> Erc20Result<()> {
    let from = ctx.caller;
    move_value(storage, ctx, scope, params, &from, to, amount)
}

/// Transfer from `from`'s balance, consuming the caller's allowance
/// unless the caller is `from`
pub fn transfer_from<S: BankProvider + AuthzProvider + ?Sized>(
    storage: &mut S,
    ctx: &RuntimeContext,
    scope: &mut ExecutionScope,
    params: &TokenParams,
    from: &Address,
    to: &Address,
    amount: U256,
) -> Erc20Result<()> {
    move_value(storage, ctx, scope, params, from, to, amount)
}
