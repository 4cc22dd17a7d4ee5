use alloy_consensus::Header;
use alloy_primitives::{Address, BlockNumber, B256};

use crate::{test_utils::MemoryDatabase, ChainConfig, ChainContext, VmConfig};

/// Gas limit of the blocks produced by [`MemoryChain::with_blocks`].
pub const MEMORY_CHAIN_GAS_LIMIT: u64 = 30_000_000;

/// Base fee of the blocks produced by [`MemoryChain::with_blocks`].
pub const MEMORY_CHAIN_BASE_FEE: u64 = 1_000_000_000;

/// Coinbase of the blocks produced by [`MemoryChain::with_blocks`].
pub const MEMORY_CHAIN_COINBASE: Address = Address::repeat_byte(0xc0);

/// The error returned when [`MemoryChain`] is asked for the state of a block it does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown block {number} ({hash})")]
pub struct UnknownBlock {
    /// The requested block number.
    pub number: BlockNumber,
    /// The requested block hash.
    pub hash: B256,
}

/// An in-memory [`ChainContext`] holding a linear chain of headers and one state view for its
/// head.
#[derive(Debug, Clone, Default)]
pub struct MemoryChain {
    chain_config: ChainConfig,
    vm_config: VmConfig,
    /// `headers[i]` is block `i`.
    headers: Vec<Header>,
    state: MemoryDatabase,
}

impl MemoryChain {
    /// Creates a chain of `count` linked blocks, numbered from zero, 12 seconds apart.
    pub fn with_blocks(count: u64) -> Self {
        let mut chain = Self::default();
        for _ in 0..count {
            chain.push_block();
        }
        chain
    }

    /// Appends a block on top of the current head and returns its hash.
    pub fn push_block(&mut self) -> B256 {
        let (number, parent_hash) = match self.headers.last() {
            Some(parent) => (parent.number + 1, parent.hash_slow()),
            None => (0, B256::ZERO),
        };
        let header = Header {
            number,
            parent_hash,
            timestamp: 1_700_000_000 + number * 12,
            beneficiary: MEMORY_CHAIN_COINBASE,
            gas_limit: MEMORY_CHAIN_GAS_LIMIT,
            base_fee_per_gas: Some(MEMORY_CHAIN_BASE_FEE),
            ..Default::default()
        };
        let hash = header.hash_slow();
        self.headers.push(header);
        hash
    }

    /// Replaces the chain configuration.
    pub fn with_chain_config(mut self, chain_config: ChainConfig) -> Self {
        self.chain_config = chain_config;
        self
    }

    /// Replaces the VM configuration.
    pub fn with_vm_config(mut self, vm_config: VmConfig) -> Self {
        self.vm_config = vm_config;
        self
    }

    /// Replaces the state view served for every known block.
    pub fn with_state(mut self, state: MemoryDatabase) -> Self {
        self.state = state;
        self
    }

    /// Returns the hash of block `number`, if the chain holds it.
    pub fn block_hash(&self, number: BlockNumber) -> Option<B256> {
        self.headers.get(number as usize).map(Header::hash_slow)
    }
}

impl ChainContext for MemoryChain {
    type State = MemoryDatabase;
    type Error = UnknownBlock;

    fn chain_config(&self) -> &ChainConfig {
        &self.chain_config
    }

    fn vm_config(&self) -> &VmConfig {
        &self.vm_config
    }

    fn current_header(&self) -> Header {
        self.headers.last().cloned().unwrap_or_default()
    }

    fn header(&self, hash: B256, number: BlockNumber) -> Option<Header> {
        self.headers.get(number as usize).filter(|header| header.hash_slow() == hash).cloned()
    }

    fn state_at(&self, header: &Header) -> Result<Self::State, Self::Error> {
        let hash = header.hash_slow();
        self.header(hash, header.number)
            .map(|_| self.state.clone())
            .ok_or(UnknownBlock { number: header.number, hash })
    }
}
