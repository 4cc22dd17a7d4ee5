use serde::{Deserialize, Serialize};

/// Whether an [`EvmRunner`](crate::EvmRunner) meters the gas of the calls it makes.
///
/// The mode is owned by the runner, changed only by
/// [`EvmRunner::stop_gas_metering`](crate::EvmRunner::stop_gas_metering) and
/// [`EvmRunner::start_gas_metering`](crate::EvmRunner::start_gas_metering), and read when a call
/// is made. Call outcomes never change it.
#[derive(
    Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
pub enum GasMetering {
    /// Calls are bounded by the gas they are given and fail when they exhaust it.
    #[default]
    Metered,
    /// Gas consumption is not accounted as a spendable resource: calls run with the larger of
    /// their requested gas and [`VmConfig::unmetered_gas_limit`](crate::VmConfig).
    Unmetered,
}

impl GasMetering {
    /// Returns `true` if gas metering is stopped.
    pub const fn is_unmetered(self) -> bool {
        matches!(self, Self::Unmetered)
    }
}
