// Token Input Validation
// Argument checks run before any state is read.

use crate::crypto::Address;
use crate::token::{Erc20Error, Erc20Result};

/// Reject the zero address for `role`
pub fn validate_address(address: &Address, role: &'static str) -> Erc20Result<()> {
    if address.is_zero() {
        return Err(Erc20Error::ZeroAddress(role));
    }
    Ok(())
}

pub fn validate_owner(owner: &Address) -> Erc20Result<()> {
    validate_address(owner, "owner")
}

pub fn validate_spender(spender: &Address) -> Erc20Result<()> {
    validate_address(spender, "spender")
}

pub fn validate_sender(from: &Address) -> Erc20Result<()> {
    validate_address(from, "sender")
}

pub fn validate_recipient(to: &Address) -> Erc20Result<()> {
    validate_address(to, "recipient")
}
