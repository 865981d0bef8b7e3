//! Ledger-backed ERC20 Token
//!
//! Token semantics over external collaborators:
//! - Balances live in an external ledger
//! - Allowances are spend-limit grants in a shared authorization store
//! - Permits are EIP-712 signed approvals with per-owner replay counters
//! - Balance deltas are journaled per execution and events use the ERC20 schema

pub mod constants;
pub mod eip712;
pub mod error;
pub mod events;
pub mod journal;
pub mod memory;
pub mod operations;
pub mod types;

pub use constants::*;
pub use eip712::*;
pub use error::*;
pub use events::*;
pub use journal::*;
pub use types::*;
