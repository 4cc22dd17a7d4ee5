//! Constants for the internal-call runner.

use alloy_primitives::Address;

/// The caller identity of protocol-initiated calls made through
/// [`EvmRunner::execute`](crate::EvmRunner::execute) and
/// [`EvmRunner::query`](crate::EvmRunner::query).
///
/// This is the zero address, which no externally owned account can sign for, so contracts can
/// tell an internal call apart from a user call by checking `msg.sender`.
pub const SYSTEM_CALLER: Address = Address::ZERO;

/// The gas budget given to a call while gas metering is stopped, unless the requested gas is
/// larger. Metering is suspended as far as the caller is concerned, but execution still needs an
/// upper bound so a looping contract cannot run forever.
///
/// Burning the whole budget takes seconds of wall-clock time (about five for a tight loop in a
/// release build), so callers with latency requirements should configure a smaller
/// [`VmConfig::unmetered_gas_limit`](crate::VmConfig::unmetered_gas_limit).
pub const DEFAULT_UNMETERED_GAS_LIMIT: u64 = 10_000_000_000;
