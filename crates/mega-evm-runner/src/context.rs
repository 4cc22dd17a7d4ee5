//! Per-call execution context.
//!
//! An [`ExecutionContext`] is rebuilt for every virtual machine instantiation because the caller
//! differs between `execute`, `execute_from` and `query`. It takes the block parameters from the
//! target header verbatim and prices nothing: internal calls are not fee-paying transactions.

use alloy_consensus::Header;
use alloy_primitives::{Address, Bytes, TxKind, U256};
use revm::{
    context::{BlockEnv, CfgEnv, TxEnv},
    context_interface::block::BlobExcessGasAndPrice,
    primitives::{
        eip4844::{BLOB_BASE_FEE_UPDATE_FRACTION_CANCUN, BLOB_BASE_FEE_UPDATE_FRACTION_PRAGUE},
        hardfork::SpecId,
    },
};

use crate::{ChainConfig, ChainContext, VmConfig};

/// The environment a single internal call runs in.
#[derive(Clone, Copy, Debug)]
pub struct ExecutionContext<'a> {
    /// The message sender and transaction origin of the call.
    pub caller: Address,
    /// The header whose recorded chain state the call executes against.
    pub header: &'a Header,
    /// The static chain rules.
    pub chain: &'a ChainConfig,
    /// The virtual machine options.
    pub vm: &'a VmConfig,
}

impl<'a> ExecutionContext<'a> {
    /// Builds the block environment from the header. Headers without a base fee (pre-London)
    /// map to a zero base fee.
    pub fn block_env(&self) -> BlockEnv {
        let header = self.header;
        let blob_excess_gas_and_price = header.excess_blob_gas.map(|excess_blob_gas| {
            let update_fraction = if self.chain.spec.is_enabled_in(SpecId::PRAGUE) {
                BLOB_BASE_FEE_UPDATE_FRACTION_PRAGUE
            } else {
                BLOB_BASE_FEE_UPDATE_FRACTION_CANCUN
            };
            BlobExcessGasAndPrice::new(excess_blob_gas, update_fraction)
        });
        BlockEnv {
            number: U256::from(header.number),
            beneficiary: header.beneficiary,
            timestamp: U256::from(header.timestamp),
            gas_limit: header.gas_limit,
            basefee: header.base_fee_per_gas.unwrap_or_default(),
            difficulty: header.difficulty,
            prevrandao: Some(header.mix_hash),
            blob_excess_gas_and_price,
            ..Default::default()
        }
    }

    /// Builds the configuration environment from the chain rules and VM options.
    pub fn cfg_env(&self) -> CfgEnv {
        let mut cfg = CfgEnv::new_with_spec(self.chain.spec);
        cfg.chain_id = self.chain.chain_id;
        cfg.limit_contract_code_size = self.vm.limit_contract_code_size;
        cfg
    }

    /// Builds the message of a call to `recipient`. The gas price is zero and the caller of the
    /// context is both the sender and the origin.
    pub fn tx_env(&self, recipient: Address, input: Bytes, gas: u64, value: U256) -> TxEnv {
        TxEnv {
            caller: self.caller,
            kind: TxKind::Call(recipient),
            data: input,
            value,
            gas_limit: gas,
            gas_price: 0,
            gas_priority_fee: None,
            chain_id: Some(self.chain.chain_id),
            ..Default::default()
        }
    }
}

/// Builds execution contexts for one target header.
///
/// This is the [`VmFactory`](crate::VmFactory) the [`EvmRunner`](crate::EvmRunner) uses by
/// default: it owns the chain context and the header, and hands out a fresh
/// [`RevmVm`](crate::RevmVm) for every call.
#[derive(Debug, Clone)]
pub struct EvmContextBuilder<C> {
    chain: C,
    header: Header,
}

impl<C: ChainContext> EvmContextBuilder<C> {
    /// Creates a builder for calls executed on top of `header`.
    pub fn new(chain: C, header: Header) -> Self {
        Self { chain, header }
    }

    /// Builds the execution context for a call made by `caller`.
    pub fn context(&self, caller: Address) -> ExecutionContext<'_> {
        ExecutionContext {
            caller,
            header: &self.header,
            chain: self.chain.chain_config(),
            vm: self.chain.vm_config(),
        }
    }

    /// Returns the chain context.
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Returns the target header.
    pub fn header(&self) -> &Header {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256, bytes};

    use super::*;
    use crate::test_utils::MemoryChain;

    fn header() -> Header {
        Header {
            number: 42,
            timestamp: 1_700_000_000,
            beneficiary: address!("00000000000000000000000000000000000c0ffe"),
            gas_limit: 30_000_000,
            base_fee_per_gas: Some(7),
            mix_hash: b256!("0101010101010101010101010101010101010101010101010101010101010101"),
            ..Default::default()
        }
    }

    #[test]
    fn test_block_env_copies_header_fields() {
        let builder = EvmContextBuilder::new(MemoryChain::default(), header());
        let block = builder.context(Address::ZERO).block_env();

        assert_eq!(block.number, U256::from(42));
        assert_eq!(block.timestamp, U256::from(1_700_000_000u64));
        assert_eq!(block.beneficiary, address!("00000000000000000000000000000000000c0ffe"));
        assert_eq!(block.gas_limit, 30_000_000);
        assert_eq!(block.basefee, 7);
        assert_eq!(block.prevrandao, Some(builder.header().mix_hash));
        assert!(block.blob_excess_gas_and_price.is_none());
    }

    #[test]
    fn test_block_env_without_base_fee() {
        let header = Header { base_fee_per_gas: None, ..header() };
        let builder = EvmContextBuilder::new(MemoryChain::default(), header);
        assert_eq!(builder.context(Address::ZERO).block_env().basefee, 0);
    }

    #[test]
    fn test_block_env_blob_gas() {
        let header = Header { excess_blob_gas: Some(0), ..header() };
        let builder = EvmContextBuilder::new(MemoryChain::default(), header);
        let blob = builder.context(Address::ZERO).block_env().blob_excess_gas_and_price.unwrap();
        assert_eq!(blob.excess_blob_gas, 0);
        assert_eq!(blob.blob_gasprice, 1);
    }

    #[test]
    fn test_tx_env_is_unpriced_and_uses_caller() {
        let caller = address!("0000000000000000000000000000000000100000");
        let recipient = address!("0000000000000000000000000000000000100001");
        let builder = EvmContextBuilder::new(MemoryChain::default(), header());
        let context = builder.context(caller);
        let tx = context.tx_env(recipient, bytes!("c0ffee"), 50_000, U256::from(9));

        assert_eq!(tx.caller, caller);
        assert_eq!(tx.kind, TxKind::Call(recipient));
        assert_eq!(tx.data, bytes!("c0ffee"));
        assert_eq!(tx.gas_limit, 50_000);
        assert_eq!(tx.value, U256::from(9));
        assert_eq!(tx.gas_price, 0);
        assert_eq!(tx.chain_id, Some(context.chain.chain_id));
    }

    #[test]
    fn test_cfg_env_follows_chain_config() {
        let chain =
            MemoryChain::default().with_chain_config(ChainConfig::new(6342, SpecId::CANCUN));
        let builder = EvmContextBuilder::new(chain, header());
        let cfg = builder.context(Address::ZERO).cfg_env();
        assert_eq!(cfg.chain_id, 6342);
        assert_eq!(cfg.spec, SpecId::CANCUN);
    }
}
