use erc20_common::crypto::{Address, Hash};
use erc20_common::token::operations::{
    self, ExecutionScope, RuntimeContext, TokenParams, TokenStorage,
};
use erc20_common::token::{BalanceJournal, Erc20Event, Log, SignedPermit, PERMIT_TYPEHASH};
use log::{debug, trace};
use primitive_types::U256;

use crate::config::PrecompileConfig;
use crate::error::PrecompileResult;
use crate::methods::{Erc20Call, Erc20Output};

/// Result of a successful call
///
/// Queries leave `journal`, `events` and `logs` empty; every transaction
/// carries exactly one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    pub output: Erc20Output,
    pub journal: BalanceJournal,
    pub events: Vec<Erc20Event>,
    pub logs: Vec<Log>,
}

impl CallOutcome {
    fn query(output: Erc20Output) -> Self {
        Self {
            output,
            journal: BalanceJournal::new(),
            events: Vec::new(),
            logs: Vec::new(),
        }
    }
}

/// ERC20 token contract over host-provided collaborators
///
/// The domain separator is derived once from the configuration and never
/// changes for the lifetime of the contract.
pub struct Erc20Precompile<S: TokenStorage> {
    storage: S,
    config: PrecompileConfig,
    params: TokenParams,
    domain_separator: Hash,
}

impl<S: TokenStorage> Erc20Precompile<S> {
    pub fn new(config: PrecompileConfig, storage: S) -> PrecompileResult<Self> {
        config.validate()?;

        let params = config.token_params();
        let domain_separator = config.permit_domain().separator();
        debug!(
            "erc20 {} ({}) at {} backed by {}",
            config.name, config.symbol, config.contract_address, config.denom
        );

        Ok(Self {
            storage,
            config,
            params,
            domain_separator,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn config(&self) -> &PrecompileConfig {
        &self.config
    }

    pub fn address(&self) -> Address {
        self.config.contract_address
    }

    // ===== Metadata =====

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.config.decimals
    }

    pub fn domain_separator(&self) -> Hash {
        self.domain_separator
    }

    pub fn permit_typehash(&self) -> Hash {
        *PERMIT_TYPEHASH
    }

    // ===== Queries =====

    pub fn total_supply(&self) -> PrecompileResult<U256> {
        Ok(operations::total_supply(&self.storage, &self.params)?)
    }

    pub fn balance_of(&self, account: &Address) -> PrecompileResult<U256> {
        Ok(operations::balance_of(&self.storage, &self.params, account)?)
    }

    pub fn allowance(
        &self,
        ctx: &RuntimeContext,
        owner: &Address,
        spender: &Address,
    ) -> PrecompileResult<U256> {
        Ok(operations::allowance(
            &self.storage,
            ctx,
            &self.params,
            owner,
            spender,
        )?)
    }

    /// Permit nonce of `owner`; fails when the counter was never initialized
    pub fn nonces(&self, owner: &Address) -> PrecompileResult<U256> {
        Ok(operations::get_permit_nonce(&self.storage, owner)?)
    }

    /// Create the permit counter of `owner` at zero, if missing
    ///
    /// Host hook for account setup; not reachable through `run`.
    pub fn initialize_nonce(&mut self, owner: &Address) -> PrecompileResult<bool> {
        Ok(operations::initialize_permit_nonce(&mut self.storage, owner)?)
    }

    // ===== Transactions =====

    pub fn approve(
        &mut self,
        ctx: &RuntimeContext,
        spender: &Address,
        amount: U256,
    ) -> PrecompileResult<CallOutcome> {
        let mut scope = ExecutionScope::new();
        operations::approve(&mut self.storage, ctx, &mut scope, &self.params, spender, amount)?;
        Ok(self.finish(scope))
    }

    pub fn increase_allowance(
        &mut self,
        ctx: &RuntimeContext,
        spender: &Address,
        amount: U256,
    ) -> PrecompileResult<CallOutcome> {
        let mut scope = ExecutionScope::new();
        operations::increase_allowance(
            &mut self.storage,
            ctx,
            &mut scope,
            &self.params,
            spender,
            amount,
        )?;
        Ok(self.finish(scope))
    }

    pub fn decrease_allowance(
        &mut self,
        ctx: &RuntimeContext,
        spender: &Address,
        amount: U256,
    ) -> PrecompileResult<CallOutcome> {
        let mut scope = ExecutionScope::new();
        operations::decrease_allowance(
            &mut self.storage,
            ctx,
            &mut scope,
            &self.params,
            spender,
            amount,
        )?;
        Ok(self.finish(scope))
    }

    pub fn transfer(
        &mut self,
        ctx: &RuntimeContext,
        to: &Address,
        amount: U256,
    ) -> PrecompileResult<CallOutcome> {
        let mut scope = ExecutionScope::new();
        operations::transfer(&mut self.storage, ctx, &mut scope, &self.params, to, amount)?;
        Ok(self.finish(scope))
    }

    pub fn transfer_from(
        &mut self,
        ctx: &RuntimeContext,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> PrecompileResult<CallOutcome> {
        let mut scope = ExecutionScope::new();
        operations::transfer_from(
            &mut self.storage,
            ctx,
            &mut scope,
            &self.params,
            from,
            to,
            amount,
        )?;
        Ok(self.finish(scope))
    }

    pub fn permit(
        &mut self,
        ctx: &RuntimeContext,
        request: &SignedPermit,
    ) -> PrecompileResult<CallOutcome> {
        let mut scope = ExecutionScope::new();
        operations::permit(
            &mut self.storage,
            ctx,
            &mut scope,
            &self.params,
            &self.domain_separator,
            request,
        )?;
        Ok(self.finish(scope))
    }

    // ===== Dispatch =====

    /// Route a decoded call to its handler
    pub fn run(&mut self, ctx: &RuntimeContext, call: Erc20Call) -> PrecompileResult<CallOutcome> {
        if log::log_enabled!(log::Level::Trace) {
            trace!(
                "erc20 {} call {} from {}",
                self.config.symbol,
                call.method_name(),
                ctx.caller
            );
        }

        let outcome = match call {
            Erc20Call::Name => CallOutcome::query(Erc20Output::String(self.config.name.clone())),
            Erc20Call::Symbol => {
                CallOutcome::query(Erc20Output::String(self.config.symbol.clone()))
            }
            Erc20Call::Decimals => CallOutcome::query(Erc20Output::Uint8(self.decimals())),
            Erc20Call::TotalSupply => CallOutcome::query(Erc20Output::Uint256(self.total_supply()?)),
            Erc20Call::BalanceOf { account } => {
                CallOutcome::query(Erc20Output::Uint256(self.balance_of(&account)?))
            }
            Erc20Call::Allowance { owner, spender } => CallOutcome::query(Erc20Output::Uint256(
                self.allowance(ctx, &owner, &spender)?,
            )),
            Erc20Call::Nonces { owner } => {
                CallOutcome::query(Erc20Output::Uint256(self.nonces(&owner)?))
            }
            Erc20Call::DomainSeparator => {
                CallOutcome::query(Erc20Output::Bytes32(self.domain_separator))
            }
            Erc20Call::PermitTypehash => {
                CallOutcome::query(Erc20Output::Bytes32(self.permit_typehash()))
            }
            Erc20Call::Approve { spender, amount } => self.approve(ctx, &spender, amount)?,
            Erc20Call::Transfer { to, amount } => self.transfer(ctx, &to, amount)?,
            Erc20Call::TransferFrom { from, to, amount } => {
                self.transfer_from(ctx, &from, &to, amount)?
            }
            Erc20Call::IncreaseAllowance { spender, amount } => {
                self.increase_allowance(ctx, &spender, amount)?
            }
            Erc20Call::DecreaseAllowance { spender, amount } => {
                self.decrease_allowance(ctx, &spender, amount)?
            }
            Erc20Call::Permit(request) => self.permit(ctx, &request)?,
        };

        Ok(outcome)
    }

    fn finish(&self, scope: ExecutionScope) -> CallOutcome {
        let contract = self.address();
        let logs = scope
            .events
            .iter()
            .map(|event| event.to_log(contract))
            .collect();

        CallOutcome {
            output: Erc20Output::Bool(true),
            journal: scope.journal,
            events: scope.events,
            logs,
        }
    }
}
