//! ERC20 token contract surface
//!
//! Wraps the ledger-backed token operations behind an ERC20 method set:
//! - Configuration loading and validation
//! - Typed call routing (`Erc20Call` → `Erc20Output`)
//! - Event logs in the standard Transfer / Approval layout

#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod methods;
pub mod precompile;

pub use config::PrecompileConfig;
pub use error::{PrecompileError, PrecompileResult};
pub use methods::{Erc20Call, Erc20Output};
pub use precompile::{CallOutcome, Erc20Precompile};
