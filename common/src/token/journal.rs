use super::error::{Erc20Error, Erc20Result};
use crate::crypto::Address;
use indexmap::IndexMap;
use primitive_types::U256;
use std::cmp::Ordering;

/// Convert a ledger amount into the journal's native width
///
/// Amounts above `u128::MAX` cannot be journaled and abort the call.
pub fn to_journal_amount(amount: U256) -> Erc20Result<u128> {
    if amount > U256::from(u128::MAX) {
        return Err(Erc20Error::AmountOverflow);
    }
    Ok(amount.as_u128())
}

/// Accumulated movement for one account within the execution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceDelta {
    pub added: u128,
    pub removed: u128,
}

/// Net direction of a `BalanceDelta`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceChange {
    Increase(u128),
    Decrease(u128),
    None,
}

impl BalanceDelta {
    pub fn net(&self) -> BalanceChange {
        match self.added.cmp(&self.removed) {
            Ordering::Greater => BalanceChange::Increase(self.added - self.removed),
            Ordering::Less => BalanceChange::Decrease(self.removed - self.added),
            Ordering::Equal => BalanceChange::None,
        }
    }
}

/// Execution-scoped record of pending balance deltas
///
/// The host reconciles it against the ledger once the call completes;
/// accounts are kept in first-touched order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BalanceJournal {
    /// Pending deltas (account → delta)
    pub changes: IndexMap<Address, BalanceDelta>,
}

impl BalanceJournal {
    /// Create a new empty journal
    pub fn new() -> Self {
        Self {
            changes: IndexMap::new(),
        }
    }

    /// Check if the journal is empty
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of touched accounts
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, account: &Address) -> Option<&BalanceDelta> {
        self.changes.get(account)
    }

    /// Net change recorded for `account`
    pub fn net_change(&self, account: &Address) -> BalanceChange {
        self.get(account)
            .map(BalanceDelta::net)
            .unwrap_or(BalanceChange::None)
    }

    pub fn add_balance(&mut self, account: Address, amount: u128) -> Erc20Result<()> {
        let added = self
            .get(&account)
            .map_or(0, |delta| delta.added)
            .checked_add(amount)
            .ok_or(Erc20Error::AmountOverflow)?;
        self.changes.entry(account).or_default().added = added;
        Ok(())
    }

    pub fn sub_balance(&mut self, account: Address, amount: u128) -> Erc20Result<()> {
        let removed = self
            .get(&account)
            .map_or(0, |delta| delta.removed)
            .checked_add(amount)
            .ok_or(Erc20Error::AmountOverflow)?;
        self.changes.entry(account).or_default().removed = removed;
        Ok(())
    }

    /// Debit `from` and credit `to`
    ///
    /// Both sides are computed before either is written, so a failure
    /// leaves the journal untouched.
    pub fn record_transfer(&mut self, from: Address, to: Address, amount: u128) -> Erc20Result<()> {
        let removed = self
            .get(&from)
            .map_or(0, |delta| delta.removed)
            .checked_add(amount)
            .ok_or(Erc20Error::AmountOverflow)?;
        let added = self
            .get(&to)
            .map_or(0, |delta| delta.added)
            .checked_add(amount)
            .ok_or(Erc20Error::AmountOverflow)?;

        self.changes.entry(from).or_default().removed = removed;
        self.changes.entry(to).or_default().added = added;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &BalanceDelta)> {
        self.changes.iter()
    }

    /// Clear all pending deltas
    pub fn clear(&mut self) {
        self.changes.clear();
    }

    /// Fold another journal into this one
    pub fn merge(&mut self, other: BalanceJournal) -> Erc20Result<()> {
        for (account, delta) in other.changes {
            self.add_balance(account, delta.added)?;
            self.sub_balance(account, delta.removed)?;
        }
        Ok(())
    }
}
