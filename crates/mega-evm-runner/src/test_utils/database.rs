use core::convert::Infallible;

use alloy_primitives::{Address, Bytes, B256, U256};
use delegate::delegate;
use revm::{
    database::{AccountState, CacheDB, DbAccount, EmptyDB},
    primitives::{HashMap, StorageKey, StorageValue},
    state::{Account, AccountInfo, Bytecode},
    Database,
};

/// An in-memory state view for testing purposes.
#[derive(Debug, Default, Clone, derive_more::Deref, derive_more::DerefMut)]
pub struct MemoryDatabase {
    #[deref]
    #[deref_mut]
    db: CacheDB<EmptyDB>,
}

impl MemoryDatabase {
    /// Loads `address` into the cache as an existing account and returns it for editing.
    fn account_mut(&mut self, address: Address) -> &mut DbAccount {
        let account = self.db.load_account(address).unwrap();
        account.account_state = AccountState::None;
        account
    }

    /// Installs `code` as the legacy bytecode of `address`.
    pub fn set_account_code(&mut self, address: Address, code: Bytes) {
        let bytecode = Bytecode::new_legacy(code);
        let info = &mut self.account_mut(address).info;
        info.code_hash = bytecode.hash_slow();
        info.code = Some(bytecode);
    }

    /// Builder form of [`MemoryDatabase::set_account_code`].
    pub fn account_code(mut self, address: Address, code: Bytes) -> Self {
        self.set_account_code(address, code);
        self
    }

    /// Sets the balance of `address`.
    pub fn set_account_balance(&mut self, address: Address, balance: U256) {
        self.account_mut(address).info.balance = balance;
    }

    /// Builder form of [`MemoryDatabase::set_account_balance`].
    pub fn account_balance(mut self, address: Address, balance: U256) -> Self {
        self.set_account_balance(address, balance);
        self
    }

    /// Writes `value` to storage slot `key` of `address`.
    pub fn set_account_storage(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        self.account_mut(address).storage.insert(key, value);
    }

    /// Builder form of [`MemoryDatabase::set_account_storage`].
    pub fn account_storage(
        mut self,
        address: Address,
        key: StorageKey,
        value: StorageValue,
    ) -> Self {
        self.set_account_storage(address, key, value);
        self
    }

    /// Returns the balance of an account, zero if it does not exist.
    pub fn balance(&mut self, address: Address) -> U256 {
        self.db.basic(address).unwrap().map(|info| info.balance).unwrap_or_default()
    }

    /// Returns the nonce of an account, zero if it does not exist.
    pub fn nonce(&mut self, address: Address) -> u64 {
        self.db.basic(address).unwrap().map(|info| info.nonce).unwrap_or_default()
    }

    /// Returns the value of a storage slot.
    pub fn storage_at(&mut self, address: Address, key: StorageKey) -> StorageValue {
        self.db.storage(address, key).unwrap()
    }

    /// Returns the number of accounts that exist, ignoring cached lookups of missing ones.
    pub fn existing_accounts(&self) -> usize {
        self.db.cache.accounts.values().filter(|account| account.info().is_some()).count()
    }
}

impl Database for MemoryDatabase {
    type Error = Infallible;

    delegate! {
        to self.db {
            fn basic(&mut self, address: Address) -> Result<Option<AccountInfo>, Self::Error>;
            fn code_by_hash(&mut self, code_hash: B256) -> Result<Bytecode, Self::Error>;
            fn storage(&mut self, address: Address, index: StorageKey) -> Result<StorageValue, Self::Error>;
            fn block_hash(&mut self, number: u64) -> Result<B256, Self::Error>;
        }
    }
}

impl revm::DatabaseCommit for MemoryDatabase {
    delegate! {
        to self.db {
            fn commit(&mut self, changes: HashMap<Address, Account>);
        }
    }
}
