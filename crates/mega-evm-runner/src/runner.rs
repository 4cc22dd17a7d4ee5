//! The runner protocol code uses to call contracts.

use alloy_consensus::Header;
use alloy_primitives::{Address, Bytes, U256};
use revm::{Database, DatabaseCommit};
use tracing::{debug, trace};

use crate::{
    constants::SYSTEM_CALLER, ChainContext, EvmContextBuilder, GasMetering, VirtualMachine,
    VmFactory,
};

/// Executes and queries contract code on behalf of the protocol.
///
/// The runner owns one state view for its whole lifetime. Every operation builds a fresh virtual
/// machine through the [`VmFactory`], bound to an execution context for the operation's caller,
/// and drops it when the operation returns. State written by [`EvmRunner::execute`] and
/// [`EvmRunner::execute_from`] stays in the state view and is visible to later calls; nothing
/// written during [`EvmRunner::query`] survives it.
///
/// The [`GasMetering`] mode is the only other state that outlives a call. It is changed only by
/// [`EvmRunner::stop_gas_metering`] and [`EvmRunner::start_gas_metering`] and applies to all
/// three call operations alike.
///
/// All operations take `&mut self`. Sharing a runner between threads therefore requires the
/// caller to serialize access, e.g. by giving each execution thread its own runner.
#[derive(Debug)]
pub struct EvmRunner<DB, F> {
    factory: F,
    state: DB,
    metering: GasMetering,
}

impl<DB, C> EvmRunner<DB, EvmContextBuilder<C>>
where
    DB: Database + DatabaseCommit,
    C: ChainContext,
{
    /// Creates a runner that executes on top of `header` against `state`.
    pub fn new(chain: C, header: Header, state: DB) -> Self {
        Self::with_factory(EvmContextBuilder::new(chain, header), state)
    }

    /// Creates a runner that executes on top of the chain's current header, against the state
    /// the chain resolves for it.
    pub fn for_current_block(chain: C) -> Result<Self, C::Error>
    where
        C: ChainContext<State = DB>,
    {
        let header = chain.current_header();
        let state = chain.state_at(&header)?;
        Ok(Self::new(chain, header, state))
    }
}

impl<DB, F: VmFactory<DB>> EvmRunner<DB, F> {
    /// Creates a runner that builds its virtual machines with `factory`.
    pub const fn with_factory(factory: F, state: DB) -> Self {
        Self { factory, state, metering: GasMetering::Metered }
    }

    /// Calls `recipient` as [`SYSTEM_CALLER`], transferring `value`.
    ///
    /// Returns the callee's return data. On failure the virtual machine's error is returned as
    /// is; for a revert it carries the revert data.
    pub fn execute(
        &mut self,
        recipient: Address,
        input: Bytes,
        gas: u64,
        value: U256,
    ) -> Result<Bytes, F::Error> {
        self.execute_from(SYSTEM_CALLER, recipient, input, gas, value)
    }

    /// Calls `recipient` as `sender`, transferring `value`.
    ///
    /// Behaves exactly like [`EvmRunner::execute`] except for the caller identity, which lets
    /// protocol code act on behalf of a specific account for the duration of the call.
    pub fn execute_from(
        &mut self,
        sender: Address,
        recipient: Address,
        input: Bytes,
        gas: u64,
        value: U256,
    ) -> Result<Bytes, F::Error> {
        trace!(
            target: "mega_evm_runner",
            %sender, %recipient, gas, %value, metering = %self.metering,
            "execute"
        );
        let mut vm = self.new_vm(sender);
        let result = vm.call(sender, recipient, input, gas, value);
        trace!(target: "mega_evm_runner", %recipient, success = result.is_ok(), "execute finished");
        result.map(|outcome| outcome.output)
    }

    /// Calls `recipient` as [`SYSTEM_CALLER`] without value and without keeping any state
    /// change.
    ///
    /// The call runs static, so code that tries to write state fails, and whatever the call
    /// touched is discarded. `gas` bounds the work done; it is not charged to anyone.
    pub fn query(&mut self, recipient: Address, input: Bytes, gas: u64) -> Result<Bytes, F::Error> {
        trace!(target: "mega_evm_runner", %recipient, gas, metering = %self.metering, "query");
        let mut vm = self.new_vm(SYSTEM_CALLER);
        let result = vm.static_call(SYSTEM_CALLER, recipient, input, gas);
        trace!(target: "mega_evm_runner", %recipient, success = result.is_ok(), "query finished");
        result.map(|outcome| outcome.output)
    }

    /// Stops gas metering for every following call until [`EvmRunner::start_gas_metering`].
    pub fn stop_gas_metering(&mut self) {
        debug!(target: "mega_evm_runner", "gas metering stopped");
        self.metering = GasMetering::Unmetered;
    }

    /// Resumes gas metering for every following call.
    pub fn start_gas_metering(&mut self) {
        debug!(target: "mega_evm_runner", "gas metering started");
        self.metering = GasMetering::Metered;
    }

    /// Returns the current gas metering mode.
    pub const fn gas_metering(&self) -> GasMetering {
        self.metering
    }

    /// Returns the state view the runner operates on.
    pub const fn state(&self) -> &DB {
        &self.state
    }

    /// Returns the state view the runner operates on, for reads and writes outside of calls.
    pub fn state_mut(&mut self) -> &mut DB {
        &mut self.state
    }

    /// Consumes the runner and returns its state view.
    pub fn into_state(self) -> DB {
        self.state
    }

    /// Returns the virtual machine factory.
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Builds the virtual machine for one operation made by `caller`.
    fn new_vm(&mut self, caller: Address) -> F::Vm<'_> {
        let mut vm = self.factory.new_vm(caller, &mut self.state);
        if self.metering.is_unmetered() {
            vm.stop_gas_metering();
        }
        vm
    }
}
