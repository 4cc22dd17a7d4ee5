//! Tests for the block and message context visible to contract code.

use alloy_consensus::Header;
use alloy_primitives::{address, b256, Address, Bytes, B256, U256};
use mega_evm_runner::{
    revm::{
        bytecode::opcode::{
            BASEFEE, BLOCKHASH, CALLDATALOAD, CALLER, CHAINID, COINBASE, GASPRICE, NUMBER, ORIGIN,
            TIMESTAMP,
        },
        primitives::hardfork::SpecId,
    },
    test_utils::{
        BytecodeBuilder, MemoryChain, MemoryDatabase, MEMORY_CHAIN_BASE_FEE, MEMORY_CHAIN_COINBASE,
    },
    ChainConfig, ChainContext, EvmContextBuilder, EvmRunner, SYSTEM_CALLER,
};

const SENDER: Address = address!("0000000000000000000000000000000000100000");
const ENV_CONTRACT: Address = address!("0000000000000000000000000000000000100001");
const HASH_CONTRACT: Address = address!("0000000000000000000000000000000000100002");

type Runner = EvmRunner<MemoryDatabase, EvmContextBuilder<MemoryChain>>;

/// The environment as seen by [`env_contract`].
#[derive(Debug)]
struct Environment {
    number: U256,
    timestamp: U256,
    coinbase: Address,
    caller: Address,
    origin: Address,
    gas_price: U256,
    base_fee: U256,
    chain_id: U256,
}

impl Environment {
    fn decode(output: &[u8]) -> Self {
        assert_eq!(output.len(), 8 * 32);
        let word = |i: usize| U256::from_be_slice(&output[i * 32..(i + 1) * 32]);
        let address = |i: usize| Address::from_slice(&output[i * 32 + 12..(i + 1) * 32]);
        Self {
            number: word(0),
            timestamp: word(1),
            coinbase: address(2),
            caller: address(3),
            origin: address(4),
            gas_price: word(5),
            base_fee: word(6),
            chain_id: word(7),
        }
    }
}

/// Returns the eight environment words decoded by [`Environment::decode`].
fn env_contract() -> Bytes {
    [NUMBER, TIMESTAMP, COINBASE, CALLER, ORIGIN, GASPRICE, BASEFEE, CHAINID]
        .into_iter()
        .zip((0..).step_by(32))
        .fold(BytecodeBuilder::default(), |builder, (opcode, offset)| {
            builder.append(opcode).mstore_top(offset)
        })
        .return_memory(0, 8 * 32)
        .build()
}

/// Returns `BLOCKHASH` of the block number passed as the first calldata word.
fn hash_contract() -> Bytes {
    BytecodeBuilder::default()
        .push_number(0)
        .append(CALLDATALOAD)
        .append(BLOCKHASH)
        .return_top()
        .build()
}

fn chain(blocks: u64) -> MemoryChain {
    let state = MemoryDatabase::default()
        .account_code(ENV_CONTRACT, env_contract())
        .account_code(HASH_CONTRACT, hash_contract());
    MemoryChain::with_blocks(blocks)
        .with_chain_config(ChainConfig::new(6342, SpecId::PRAGUE))
        .with_state(state)
}

#[test]
fn test_block_fields_come_from_header() {
    let chain = chain(4);
    let head = chain.current_header();
    let mut runner = EvmRunner::for_current_block(chain).unwrap();

    let output = runner.execute(ENV_CONTRACT, Bytes::new(), 100_000, U256::ZERO).unwrap();
    let env = Environment::decode(&output);
    assert_eq!(env.number, U256::from(3));
    assert_eq!(env.timestamp, U256::from(head.timestamp));
    assert_eq!(env.coinbase, MEMORY_CHAIN_COINBASE);
    assert_eq!(env.base_fee, U256::from(MEMORY_CHAIN_BASE_FEE));
    assert_eq!(env.gas_price, U256::ZERO);
    assert_eq!(env.chain_id, U256::from(6342));
}

#[test]
fn test_caller_is_both_sender_and_origin() {
    let mut runner = EvmRunner::for_current_block(chain(1)).unwrap();

    let output = runner.execute(ENV_CONTRACT, Bytes::new(), 100_000, U256::ZERO).unwrap();
    let env = Environment::decode(&output);
    assert_eq!((env.caller, env.origin), (SYSTEM_CALLER, SYSTEM_CALLER));

    let env = Environment::decode(
        &runner.execute_from(SENDER, ENV_CONTRACT, Bytes::new(), 100_000, U256::ZERO).unwrap(),
    );
    assert_eq!((env.caller, env.origin), (SENDER, SENDER));

    let env = Environment::decode(&runner.query(ENV_CONTRACT, Bytes::new(), 100_000).unwrap());
    assert_eq!((env.caller, env.origin), (SYSTEM_CALLER, SYSTEM_CALLER));
}

fn block_hash_at(runner: &mut Runner, number: u64) -> B256 {
    let input = Bytes::from(U256::from(number).to_be_bytes::<32>().to_vec());
    B256::from_slice(&runner.query(HASH_CONTRACT, input, 100_000).unwrap())
}

#[test]
fn test_blockhash_resolves_ancestors() {
    let chain = chain(6);
    let hashes: Vec<_> = (0..6).map(|number| chain.block_hash(number).unwrap()).collect();
    let mut runner = EvmRunner::for_current_block(chain).unwrap();

    // the head is block 5; every earlier block is an ancestor
    for number in 0..5 {
        assert_eq!(block_hash_at(&mut runner, number), hashes[number as usize]);
    }
    assert_eq!(block_hash_at(&mut runner, 5), B256::ZERO);
    assert_eq!(block_hash_at(&mut runner, 100), B256::ZERO);
}

#[test]
fn test_blockhash_of_unknown_ancestor_is_zero() {
    let chain = chain(3);
    let stranger = MemoryChain::default();
    let header = Header {
        number: 10,
        parent_hash: b256!("1111111111111111111111111111111111111111111111111111111111111111"),
        ..Default::default()
    };
    let state = chain.state_at(&chain.current_header()).unwrap();
    let mut runner = EvmRunner::new(stranger, header, state);

    // the parent hash comes straight from the header, further ancestors are unknown
    assert_eq!(
        block_hash_at(&mut runner, 9),
        b256!("1111111111111111111111111111111111111111111111111111111111111111")
    );
    assert_eq!(block_hash_at(&mut runner, 8), B256::ZERO);
}
