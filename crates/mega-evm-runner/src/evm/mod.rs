//! The `revm`-backed virtual machine.
//!
//! Internal calls are not transactions, so [`RevmVm`] drives the mainnet EVM through the
//! system-call path of the handler: there is no validation, no intrinsic gas, no nonce bump and
//! no fee payment. The first call frame gets exactly the gas the caller asked for, and value is
//! transferred by the frame itself, failing with
//! [`HaltReason::OutOfFunds`](revm::context::result::HaltReason) when the caller is short.
//!
//! From Spurious Dragon on, accounts that a call loaded as missing and left empty are not
//! committed, so a zero-value call to an unused address leaves the state view unchanged.

mod error;
mod handler;

pub use error::*;
pub use handler::*;

use alloy_primitives::{Address, Bytes, U256};
use revm::{
    context::{
        result::{EVMError, ExecutionResult},
        ContextSetters, ContextTr, TxEnv,
    },
    handler::{EthFrame, EvmTr, Handler, MainnetContext, MainnetHandler},
    interpreter::interpreter::EthInterpreter,
    primitives::hardfork::SpecId,
    state::EvmState,
    Context, Database, DatabaseCommit, ExecuteEvm, MainBuilder, MainnetEvm,
};

use crate::{
    AncestorHashDb, CallOutput, ChainContext, EvmContextBuilder, ExecutionContext, GasMetering,
    VirtualMachine, VmFactory,
};

/// The `revm` context of a [`RevmVm`].
pub type RevmContext<'a, DB, C> = MainnetContext<AncestorHashDb<'a, DB, C>>;

/// A mainnet EVM bound to one [`ExecutionContext`] and one state view.
pub struct RevmVm<'a, DB: Database, C: ChainContext> {
    evm: MainnetEvm<RevmContext<'a, DB, C>>,
    context: ExecutionContext<'a>,
    metering: GasMetering,
}

impl<DB: Database, C: ChainContext> core::fmt::Debug for RevmVm<'_, DB, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RevmVm")
            .field("context", &self.context)
            .field("metering", &self.metering)
            .finish_non_exhaustive()
    }
}

impl<'a, DB: Database, C: ChainContext> RevmVm<'a, DB, C> {
    /// Creates an EVM for `context` operating on `db`.
    pub fn new(context: ExecutionContext<'a>, db: AncestorHashDb<'a, DB, C>) -> Self {
        let ctx: RevmContext<'a, DB, C> = Context::new(db, context.chain.spec);
        let evm = ctx.with_cfg(context.cfg_env()).with_block(context.block_env()).build_mainnet();
        Self { evm, context, metering: GasMetering::Metered }
    }

    /// Returns the execution context this EVM is bound to.
    pub const fn context(&self) -> &ExecutionContext<'a> {
        &self.context
    }

    /// Returns the gas metering mode of this EVM.
    pub const fn gas_metering(&self) -> GasMetering {
        self.metering
    }

    /// The gas the first frame of a call requesting `gas` gets.
    fn gas_budget(&self, gas: u64) -> u64 {
        if self.metering.is_unmetered() {
            gas.max(self.context.vm.unmetered_gas_limit)
        } else {
            gas
        }
    }

    fn set_call(
        &mut self,
        caller: Address,
        recipient: Address,
        input: Bytes,
        gas: u64,
        value: U256,
    ) {
        let tx = self.context.tx_env(recipient, input, self.gas_budget(gas), value);
        self.evm.ctx().set_tx(TxEnv { caller, ..tx });
    }

    /// Converts the result of a call that was given `gas`.
    fn outcome(
        &self,
        gas: u64,
        result: ExecutionResult,
    ) -> Result<CallOutput, CallError<DB::Error>> {
        match result {
            ExecutionResult::Success { output, gas_used, .. } => {
                // unmetered calls leave the requested gas untouched
                let gas_left =
                    if self.metering.is_unmetered() { gas } else { gas.saturating_sub(gas_used) };
                Ok(CallOutput { output: output.into_data(), gas_left })
            }
            ExecutionResult::Revert { output, gas_used } => {
                Err(CallError::Reverted { output, gas_used })
            }
            ExecutionResult::Halt { reason, gas_used } => {
                Err(CallError::Halted { reason, gas_used })
            }
        }
    }
}

impl<DB, C> VirtualMachine for RevmVm<'_, DB, C>
where
    DB: Database + DatabaseCommit,
    C: ChainContext,
{
    type Error = CallError<DB::Error>;

    fn stop_gas_metering(&mut self) {
        self.metering = GasMetering::Unmetered;
    }

    fn call(
        &mut self,
        caller: Address,
        recipient: Address,
        input: Bytes,
        gas: u64,
        value: U256,
    ) -> Result<CallOutput, Self::Error> {
        self.set_call(caller, recipient, input, gas, value);
        let result = MainnetHandler::<_, EVMError<DB::Error>, EthFrame<EthInterpreter>>::default()
            .run_system_call(&mut self.evm);
        let mut state = self.evm.finalize();
        let result = result?;
        if self.context.chain.spec.is_enabled_in(SpecId::SPURIOUS_DRAGON) {
            prune_empty_new_accounts(&mut state);
        }
        self.evm.ctx().db_mut().commit(state);
        self.outcome(gas, result)
    }

    fn static_call(
        &mut self,
        caller: Address,
        recipient: Address,
        input: Bytes,
        gas: u64,
    ) -> Result<CallOutput, Self::Error> {
        self.set_call(caller, recipient, input, gas, U256::ZERO);
        let result =
            StaticCallHandler::<_, EVMError<DB::Error>, EthFrame<EthInterpreter>>::default()
                .run_system_call(&mut self.evm);
        // never committed
        let _ = self.evm.finalize();
        self.outcome(gas, result?)
    }
}

/// Drops accounts the call only touched: they did not exist before it and are still empty
/// (EIP-161), so a zero-value call to an unused address leaves the state view as it was.
fn prune_empty_new_accounts(state: &mut EvmState) {
    state.retain(|_, account| !(account.is_loaded_as_not_existing() && account.is_empty()));
}

impl<C, DB> VmFactory<DB> for EvmContextBuilder<C>
where
    C: ChainContext,
    DB: Database + DatabaseCommit,
{
    type Error = CallError<DB::Error>;
    type Vm<'a>
        = RevmVm<'a, DB, C>
    where
        Self: 'a,
        DB: 'a;

    fn new_vm<'a>(&'a self, caller: Address, state: &'a mut DB) -> Self::Vm<'a> {
        let db = AncestorHashDb::new(state, self.chain(), self.header());
        RevmVm::new(self.context(caller), db)
    }
}
