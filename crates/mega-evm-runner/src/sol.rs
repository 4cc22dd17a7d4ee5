//! ABI-typed calls.
//!
//! Most internal calls target system contracts with a known Solidity interface. These helpers
//! take a [`SolCall`] value, encode it, run it through the matching runner operation and decode
//! the return data.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;

use crate::{constants::SYSTEM_CALLER, EvmRunner, VmFactory};

/// The error of an ABI-typed call.
#[derive(Debug, thiserror::Error)]
pub enum SolCallError<E> {
    /// The call itself failed.
    #[error("call failed: {0}")]
    Call(E),
    /// The call succeeded but its return data does not decode as the function's return type.
    #[error("failed to decode return data: {0}")]
    Decode(#[source] alloy_sol_types::Error),
}

impl<DB, F: VmFactory<DB>> EvmRunner<DB, F> {
    /// Calls `recipient` as [`SYSTEM_CALLER`] with the ABI-encoded `call`, see
    /// [`EvmRunner::execute`].
    pub fn execute_sol<T: SolCall>(
        &mut self,
        recipient: Address,
        call: &T,
        gas: u64,
        value: U256,
    ) -> Result<T::Return, SolCallError<F::Error>> {
        self.execute_sol_from(SYSTEM_CALLER, recipient, call, gas, value)
    }

    /// Calls `recipient` as `sender` with the ABI-encoded `call`, see
    /// [`EvmRunner::execute_from`].
    pub fn execute_sol_from<T: SolCall>(
        &mut self,
        sender: Address,
        recipient: Address,
        call: &T,
        gas: u64,
        value: U256,
    ) -> Result<T::Return, SolCallError<F::Error>> {
        let output = self
            .execute_from(sender, recipient, call.abi_encode().into(), gas, value)
            .map_err(SolCallError::Call)?;
        T::abi_decode_returns(&output).map_err(SolCallError::Decode)
    }

    /// Queries `recipient` with the ABI-encoded `call`, see [`EvmRunner::query`].
    pub fn query_sol<T: SolCall>(
        &mut self,
        recipient: Address,
        call: &T,
        gas: u64,
    ) -> Result<T::Return, SolCallError<F::Error>> {
        let output =
            self.query(recipient, call.abi_encode().into(), gas).map_err(SolCallError::Call)?;
        T::abi_decode_returns(&output).map_err(SolCallError::Decode)
    }
}
