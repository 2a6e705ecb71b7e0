//! Ledger persisted in a [`KvStore`], one JSON balance per account.

use crate::ledger::{accrue, deduct, Ledger, Result};
use nameservice_storage::KvStore;
use nameservice_types::{Address, Coins};

/// Key prefix for account balances.
pub const BALANCE_PREFIX: &[u8] = b"balances/";
const SUPPLY_KEY: &[u8] = b"ledger/supply";

#[derive(Debug, Clone)]
pub struct KvLedger<K> {
    kv: K,
}

impl<K: KvStore> KvLedger<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    fn balance_key(account: &Address) -> Vec<u8> {
        let mut key = BALANCE_PREFIX.to_vec();
        key.extend_from_slice(account.to_string().as_bytes());
        key
    }

    fn read(&self, key: &[u8]) -> Result<Coins> {
        match self.kv.get(key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)
                .map_err(nameservice_storage::StorageError::from)?),
            None => Ok(Coins::empty()),
        }
    }

    fn write(&self, key: &[u8], coins: &Coins) -> Result<()> {
        if coins.is_zero() {
            self.kv.delete(key)?;
        } else {
            let bytes =
                serde_json::to_vec(coins).map_err(nameservice_storage::StorageError::from)?;
            self.kv.set(key, &bytes)?;
        }
        Ok(())
    }
}

impl<K: KvStore + Send + Sync> Ledger for KvLedger<K> {
    fn balance(&self, account: &Address) -> Result<Coins> {
        self.read(&Self::balance_key(account))
    }

    fn credit(&mut self, account: &Address, amount: &Coins) -> Result<()> {
        let key = Self::balance_key(account);
        let balance = accrue(account, &self.read(&key)?, amount)?;
        let supply = accrue(account, &self.read(SUPPLY_KEY)?, amount)?;
        self.write(&key, &balance)?;
        self.write(SUPPLY_KEY, &supply)?;
        tracing::debug!(%account, %amount, "ledger credit");
        Ok(())
    }

    fn debit(&mut self, account: &Address, amount: &Coins) -> Result<()> {
        let key = Self::balance_key(account);
        let balance = deduct(account, &self.read(&key)?, amount)?;
        let supply = self
            .read(SUPPLY_KEY)?
            .checked_sub(amount)
            .unwrap_or_default();
        self.write(&key, &balance)?;
        self.write(SUPPLY_KEY, &supply)?;
        tracing::debug!(%account, %amount, "ledger debit");
        Ok(())
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<()> {
        let from_key = Self::balance_key(from);
        let from_balance = deduct(from, &self.read(&from_key)?, amount)?;
        if from == to {
            return Ok(());
        }
        let to_key = Self::balance_key(to);
        let to_balance = accrue(to, &self.read(&to_key)?, amount)?;
        self.write(&from_key, &from_balance)?;
        self.write(&to_key, &to_balance)?;
        tracing::debug!(%from, %to, %amount, "ledger transfer");
        Ok(())
    }

    fn total_supply(&self) -> Result<Coins> {
        self.read(SUPPLY_KEY)
    }
}
