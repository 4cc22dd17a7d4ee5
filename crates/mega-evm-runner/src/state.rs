use alloy_consensus::Header;
use alloy_primitives::{Address, B256};
use delegate::delegate;
use revm::{
    primitives::{HashMap, StorageKey, StorageValue},
    state::{Account, AccountInfo, Bytecode},
    Database, DatabaseCommit,
};

use crate::ChainContext;

/// A state view that resolves ancestor block hashes through a [`ChainContext`].
///
/// Account, code and storage reads and commits go to the wrapped state view. `BLOCKHASH` lookups
/// walk the parent-hash chain back from the target header, asking the chain context for each
/// ancestor and caching every hash it has seen. Ancestors the chain context does not know resolve
/// to the zero hash.
#[derive(Debug)]
pub struct AncestorHashDb<'a, DB, C> {
    db: &'a mut DB,
    chain: &'a C,
    header: &'a Header,
    /// Parent hashes walked so far: `hashes[i]` is the hash of block `header.number - i - 1`.
    hashes: Vec<B256>,
}

impl<'a, DB, C: ChainContext> AncestorHashDb<'a, DB, C> {
    /// Wraps `db` for calls executed on top of `header`.
    pub fn new(db: &'a mut DB, chain: &'a C, header: &'a Header) -> Self {
        Self { db, chain, header, hashes: Vec::new() }
    }

    /// Returns the hash of ancestor block `number`, or the zero hash if it is unknown.
    fn ancestor_hash(&mut self, number: u64) -> B256 {
        let Some(distance) =
            self.header.number.checked_sub(number).and_then(|distance| distance.checked_sub(1))
        else {
            return B256::ZERO;
        };
        if self.hashes.is_empty() {
            self.hashes.push(self.header.parent_hash);
        }
        if let Some(hash) = self.hashes.get(distance as usize) {
            return *hash;
        }

        let mut last_hash = self.hashes[self.hashes.len() - 1];
        let mut last_number = self.header.number - self.hashes.len() as u64;
        while let Some(header) = self.chain.header(last_hash, last_number) {
            let Some(parent_number) = header.number.checked_sub(1) else { break };
            self.hashes.push(header.parent_hash);
            last_hash = header.parent_hash;
            last_number = parent_number;
            if last_number == number {
                return last_hash;
            }
        }
        B256::ZERO
    }
}

impl<DB: Database, C: ChainContext> Database for AncestorHashDb<'_, DB, C> {
    type Error = DB::Error;

    delegate! {
        to self.db {
            fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;
            fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error>;
            fn storage(&mut self, address: Address, index: StorageKey) -> Result<StorageValue, Self::Error>;
        }
    }

    fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error> {
        Ok(self.ancestor_hash(number))
    }
}

impl<DB: DatabaseCommit, C> DatabaseCommit for AncestorHashDb<'_, DB, C> {
    fn commit(&mut self, changes: HashMap<Address, Account>) {
        self.db.commit(changes);
    }
}
