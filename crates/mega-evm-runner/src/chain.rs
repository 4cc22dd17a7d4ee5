use alloy_consensus::Header;
use alloy_primitives::{BlockNumber, B256};
use auto_impl::auto_impl;

use crate::{ChainConfig, VmConfig};

/// Read-only access to the chain an [`EvmRunner`](crate::EvmRunner) executes on.
///
/// The runner only needs the chain rules, the VM options, a way to resolve the state of a block
/// and a way to walk back through ancestor headers (for the `BLOCKHASH` opcode). Everything else
/// about the node stays behind this trait.
#[auto_impl(&, Arc, Box)]
pub trait ChainContext {
    /// The state view resolved by [`ChainContext::state_at`].
    type State;
    /// The error returned when a state view cannot be resolved.
    type Error;

    /// Returns the static chain rules.
    fn chain_config(&self) -> &ChainConfig;

    /// Returns the virtual machine options.
    fn vm_config(&self) -> &VmConfig;

    /// Returns the latest known header.
    fn current_header(&self) -> Header;

    /// Returns the header with the given hash and number, if it is known.
    fn header(&self, hash: B256, number: BlockNumber) -> Option<Header>;

    /// Resolves the state view at the given header.
    fn state_at(&self, header: &Header) -> Result<Self::State, Self::Error>;
}
