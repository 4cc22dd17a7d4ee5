use revm::primitives::hardfork::SpecId;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_UNMETERED_GAS_LIMIT;

/// Static chain rules used to configure every internal call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// The chain id exposed through the `CHAINID` opcode.
    pub chain_id: u64,
    /// The hardfork whose rules the EVM follows.
    pub spec: SpecId,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self { chain_id: 1, spec: SpecId::PRAGUE }
    }
}

impl ChainConfig {
    /// Creates a new [`ChainConfig`].
    pub const fn new(chain_id: u64, spec: SpecId) -> Self {
        Self { chain_id, spec }
    }
}

/// Virtual machine options applied to every internal call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VmConfig {
    /// Overrides the EIP-170 contract code size limit. `None` keeps the hardfork default.
    pub limit_contract_code_size: Option<usize>,
    /// The gas budget of a call while gas metering is stopped. A call still gets its requested
    /// gas if that is larger. The budget is also the worst-case running time of an unmetered
    /// call, see [`DEFAULT_UNMETERED_GAS_LIMIT`].
    pub unmetered_gas_limit: u64,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self { limit_contract_code_size: None, unmetered_gas_limit: DEFAULT_UNMETERED_GAS_LIMIT }
    }
}
