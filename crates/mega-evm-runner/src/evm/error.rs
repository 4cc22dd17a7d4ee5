use alloy_primitives::Bytes;
use revm::context::result::{EVMError, HaltReason};

/// The error of a call made through [`RevmVm`](crate::RevmVm).
///
/// The variants mirror what the EVM reports. Nothing is translated: a revert keeps its return
/// data, a halt keeps its reason, and database failures surface as [`CallError::Evm`].
#[derive(Debug, thiserror::Error)]
pub enum CallError<DBError> {
    /// The callee reverted. The output may carry an ABI-encoded reason.
    #[error("execution reverted")]
    Reverted {
        /// The revert data.
        output: Bytes,
        /// The gas used before reverting.
        gas_used: u64,
    },
    /// Execution halted, e.g. out of gas, an invalid opcode or a write inside a static call.
    #[error("execution halted: {reason:?}")]
    Halted {
        /// The halt reason.
        reason: HaltReason,
        /// The gas used before halting.
        gas_used: u64,
    },
    /// The EVM failed outside of contract execution, typically reading the state view.
    #[error(transparent)]
    Evm(#[from] EVMError<DBError>),
}

impl<DBError> CallError<DBError> {
    /// Returns the revert data if the call reverted.
    pub const fn output(&self) -> Option<&Bytes> {
        match self {
            Self::Reverted { output, .. } => Some(output),
            _ => None,
        }
    }

    /// Returns the gas used by the failed call, if it got to execute.
    pub const fn gas_used(&self) -> Option<u64> {
        match self {
            Self::Reverted { gas_used, .. } | Self::Halted { gas_used, .. } => Some(*gas_used),
            Self::Evm(_) => None,
        }
    }

    /// Returns `true` if the call ran out of gas.
    pub const fn is_out_of_gas(&self) -> bool {
        matches!(self, Self::Halted { reason: HaltReason::OutOfGas(_), .. })
    }
}
