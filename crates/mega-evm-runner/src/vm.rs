//! The virtual machine capability used by the runner.
//!
//! [`EvmRunner`](crate::EvmRunner) never constructs a virtual machine itself. It asks a
//! [`VmFactory`] for a fresh [`VirtualMachine`] bound to the caller of each operation, which
//! keeps the construction explicit and lets tests substitute a fake factory.

use alloy_primitives::{Address, Bytes, U256};

/// The successful outcome of a call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallOutput {
    /// The data returned by the callee.
    pub output: Bytes,
    /// The gas left over from the gas given to the call.
    pub gas_left: u64,
}

/// A virtual machine instance bound to one execution context and one state view.
pub trait VirtualMachine {
    /// The error reported when a call fails. It is passed to the runner's caller unchanged.
    type Error;

    /// Stops accounting gas consumption for the calls made through this instance.
    fn stop_gas_metering(&mut self);

    /// Calls `recipient` as `caller`, transferring `value`. State changes made by a successful
    /// call are applied to the state view.
    fn call(
        &mut self,
        caller: Address,
        recipient: Address,
        input: Bytes,
        gas: u64,
        value: U256,
    ) -> Result<CallOutput, Self::Error>;

    /// Calls `recipient` as `caller` without allowing state changes. Nothing the call does is
    /// applied to the state view.
    fn static_call(
        &mut self,
        caller: Address,
        recipient: Address,
        input: Bytes,
        gas: u64,
    ) -> Result<CallOutput, Self::Error>;
}

/// Creates a [`VirtualMachine`] for each call a runner makes.
pub trait VmFactory<DB> {
    /// The error reported by the virtual machines of this factory.
    type Error;

    /// The virtual machine type, borrowing the factory and the state view for one call.
    type Vm<'a>: VirtualMachine<Error = Self::Error>
    where
        Self: 'a,
        DB: 'a;

    /// Creates a virtual machine whose execution context uses `caller` as the message sender,
    /// operating on `state`.
    fn new_vm<'a>(&'a self, caller: Address, state: &'a mut DB) -> Self::Vm<'a>;
}
