//! Tests for the ABI-typed call helpers.

use alloy_primitives::{address, bytes, Address, U256};
use alloy_sol_types::sol;
use mega_evm_runner::{
    revm::bytecode::opcode::CALLER,
    test_utils::{BytecodeBuilder, MemoryChain, MemoryDatabase},
    CallError, ChainContext, EvmContextBuilder, EvmRunner, SolCallError, SYSTEM_CALLER,
};

sol! {
    function answer() external view returns (uint256);
    function whoami() external payable returns (address);
}

const SENDER: Address = address!("0000000000000000000000000000000000100000");
const ORACLE: Address = address!("0000000000000000000000000000000000100001");
const ECHO: Address = address!("0000000000000000000000000000000000100002");
const REVERTER: Address = address!("0000000000000000000000000000000000100003");
const NOBODY: Address = address!("0000000000000000000000000000000000100004");

fn runner() -> EvmRunner<MemoryDatabase, EvmContextBuilder<MemoryChain>> {
    // every contract ignores its calldata
    let db = MemoryDatabase::default()
        .account_code(ORACLE, BytecodeBuilder::default().push_number(42).return_top().build())
        .account_code(ECHO, BytecodeBuilder::default().append(CALLER).return_top().build())
        .account_code(
            REVERTER,
            BytecodeBuilder::default().revert_with_data(bytes!("c0ffee")).build(),
        )
        .account_balance(SENDER, U256::from(10));
    let chain = MemoryChain::with_blocks(1);
    let header = chain.current_header();
    EvmRunner::new(chain, header, db)
}

#[test]
fn test_query_sol_decodes_return() {
    let mut runner = runner();
    assert_eq!(runner.query_sol(ORACLE, &answerCall {}, 50_000).unwrap(), U256::from(42));
}

#[test]
fn test_execute_sol_from_uses_sender() {
    let mut runner = runner();
    let caller = runner.execute_sol(ECHO, &whoamiCall {}, 50_000, U256::ZERO).unwrap();
    assert_eq!(caller, SYSTEM_CALLER);

    let caller =
        runner.execute_sol_from(SENDER, ECHO, &whoamiCall {}, 50_000, U256::from(3)).unwrap();
    assert_eq!(caller, SENDER);
    assert_eq!(runner.state_mut().balance(ECHO), U256::from(3));
}

#[test]
fn test_call_failure_is_passed_through() {
    let mut runner = runner();
    let err = runner.execute_sol(REVERTER, &answerCall {}, 50_000, U256::ZERO).unwrap_err();
    match err {
        SolCallError::Call(err @ CallError::Reverted { .. }) => {
            assert_eq!(err.output(), Some(&bytes!("c0ffee")));
        }
        other => panic!("expected a revert, got {other:?}"),
    }
}

#[test]
fn test_undecodable_return_is_decode_error() {
    let mut runner = runner();
    let err = runner.query_sol(NOBODY, &answerCall {}, 50_000).unwrap_err();
    assert!(matches!(err, SolCallError::Decode(_)));
}
