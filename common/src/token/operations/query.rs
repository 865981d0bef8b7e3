// Token Query Operations
// Read-only views over the ledger; none of these write state.

use log::trace;
use primitive_types::U256;

use crate::crypto::Address;
use crate::token::Erc20Result;

use super::{BankProvider, TokenParams};

/// Ledger balance of `account` in the token's denomination
pub fn balance_of<S: BankProvider + ?Sized>(
    storage: &S,
    params: &TokenParams,
    account: &Address,
) -> Erc20Result<U256> {
    let balance = storage.get_balance(account, &params.denom)?;
    if log::log_enabled!(log::Level::Trace) {
        trace!("balance of {} is {}{}", account, balance, params.denom);
    }
    Ok(balance)
}

/// Ledger supply of the token's denomination
pub fn total_supply<S: BankProvider + ?Sized>(storage: &S, params: &TokenParams) -> Erc20Result<U256> {
    storage.get_supply(&params.denom)
}
