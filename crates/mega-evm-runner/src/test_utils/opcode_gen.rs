//! Bytecode assembly for the contracts the runner tests deploy.

use alloy_primitives::{Address, Bytes, U256};
use revm::bytecode::opcode::{MSTORE, PUSH0, RETURN, REVERT, SLOAD, SSTORE, STOP};

use crate::test_utils::right_pad_bytes;

/// A builder for assembling EVM bytecode.
#[derive(Debug, Default)]
pub struct BytecodeBuilder {
    code: Vec<u8>,
}

impl BytecodeBuilder {
    /// Build the bytecode.
    pub fn build(self) -> Bytes {
        self.code.into()
    }

    /// Get the length of the bytecode.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Check if the bytecode is empty.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Append a single opcode or byte.
    pub fn append(mut self, opcode: u8) -> Self {
        self.code.push(opcode);
        self
    }

    /// Append a series of opcodes or bytes.
    pub fn append_many(mut self, items: impl IntoIterator<Item = u8>) -> Self {
        self.code.extend(items);
        self
    }

    /// Append the smallest PUSH opcode that fits `bytes`. Empty input becomes `PUSH0`.
    pub fn push_bytes(mut self, bytes: impl AsRef<[u8]>) -> Self {
        let bytes = bytes.as_ref();
        assert!(bytes.len() <= 32, "push operand longer than a word");
        self.code.push(PUSH0 + bytes.len() as u8);
        self.code.extend_from_slice(bytes);
        self
    }

    /// Append a PUSH of a `u64`.
    pub fn push_number(self, number: u64) -> Self {
        self.push_bytes(number.to_be_bytes())
    }

    /// Append a PUSH of an address.
    pub fn push_address(self, address: Address) -> Self {
        self.push_bytes(address)
    }

    /// Append a PUSH of a full word.
    pub fn push_u256(self, value: U256) -> Self {
        self.push_bytes(value.to_be_bytes::<32>())
    }

    /// Store the word on top of the stack at memory `offset`.
    pub fn mstore_top(self, offset: u64) -> Self {
        self.push_number(offset).append(MSTORE)
    }

    /// Store `bytes`, right-padded to whole words, at memory `offset`.
    pub fn mstore(self, offset: u64, bytes: impl AsRef<[u8]>) -> Self {
        right_pad_bytes(bytes, 32)
            .chunks(32)
            .zip((offset..).step_by(32))
            .fold(self, |this, (chunk, offset)| this.push_bytes(chunk).mstore_top(offset))
    }

    /// Write `value` to storage `slot`.
    pub fn sstore(self, slot: u64, value: U256) -> Self {
        self.push_u256(value).push_number(slot).append(SSTORE)
    }

    /// Push the value of storage `slot`.
    pub fn sload(self, slot: u64) -> Self {
        self.push_number(slot).append(SLOAD)
    }

    /// Halt successfully with no output.
    pub fn stop(self) -> Self {
        self.append(STOP)
    }

    /// Return `len` bytes of memory starting at `offset`.
    pub fn return_memory(self, offset: u64, len: u64) -> Self {
        self.push_number(len).push_number(offset).append(RETURN)
    }

    /// Return the word on top of the stack.
    pub fn return_top(self) -> Self {
        self.mstore_top(0).return_memory(0, 32)
    }

    /// Return the given data.
    pub fn return_with_data(self, data: impl AsRef<[u8]>) -> Self {
        let len = data.as_ref().len() as u64;
        self.mstore(0, data).return_memory(0, len)
    }

    /// Revert with the given data.
    pub fn revert_with_data(self, data: impl AsRef<[u8]>) -> Self {
        let len = data.as_ref().len() as u64;
        self.mstore(0, data).push_number(len).push_number(0).append(REVERT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revm::bytecode::opcode::{PUSH1, PUSH8};

    #[test]
    fn test_push_number_uses_eight_byte_operand() {
        let code = BytecodeBuilder::default().push_number(1).build();
        assert_eq!(code.len(), 9);
        assert_eq!(code[0], PUSH8);
        assert_eq!(code[8], 1);
    }

    #[test]
    fn test_push_bytes_picks_width() {
        let code = BytecodeBuilder::default().push_bytes([0xaa]).push_bytes([]).build();
        assert_eq!(code.as_ref(), &[PUSH1, 0xaa, PUSH0]);
    }

    #[test]
    fn test_mstore_pads_to_words() {
        let one_word = BytecodeBuilder::default().mstore(0, [1u8; 32]);
        let two_words = BytecodeBuilder::default().mstore(0, [1u8; 33]);
        assert!(two_words.len() > one_word.len());
    }
}
