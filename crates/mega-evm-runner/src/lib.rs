//! Internal-call runner for the `MegaETH` EVM.
//!
//! Protocol code (system contracts, consensus hooks, precompiles) uses [`EvmRunner`] to call
//! contract code against the current state without building a user transaction. Every call gets
//! a fresh EVM bound to an [`ExecutionContext`] derived from the target block header, so the
//! caller only supplies the recipient, calldata, gas and value.
//!
//! # Example
//!
//! ```rust
//! use alloy_consensus::Header;
//! use alloy_primitives::{address, Bytes, U256};
//! use mega_evm_runner::{test_utils::{MemoryChain, MemoryDatabase}, EvmRunner, SYSTEM_CALLER};
//!
//! let db = MemoryDatabase::default().account_balance(SYSTEM_CALLER, U256::from(10));
//! let mut runner = EvmRunner::new(MemoryChain::default(), Header::default(), db);
//!
//! let recipient = address!("0000000000000000000000000000000000100000");
//! let output = runner.execute(recipient, Bytes::new(), 0, U256::from(3)).unwrap();
//! assert!(output.is_empty());
//! assert_eq!(runner.state_mut().balance(recipient), U256::from(3));
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;
pub use constants::SYSTEM_CALLER;

mod chain;
pub use chain::*;

mod config;
pub use config::*;

mod context;
pub use context::*;

mod evm;
pub use evm::*;

mod gas;
pub use gas::*;

mod runner;
pub use runner::*;

mod sol;
pub use sol::*;

mod state;
pub use state::*;

mod vm;
pub use vm::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use alloy_sol_types;
pub use revm;
