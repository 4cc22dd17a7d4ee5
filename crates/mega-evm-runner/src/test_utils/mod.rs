//! Test utilities for the internal-call runner.

mod bytes;
mod chain;
mod database;
mod opcode_gen;

pub use bytes::*;
pub use chain::*;
pub use database::*;
pub use opcode_gen::*;
