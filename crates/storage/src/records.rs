//! Typed name → record view over a [`KvStore`].
//!
//! Only owned records are ever written. An un-owned name is represented by
//! the absence of its key, and reads of an absent key synthesize the default
//! record on the fly without touching storage.

use crate::kv::KvStore;
use crate::{Result, StorageError};
use nameservice_types::{Coins, NameState, Record};

/// Key prefix under which every record lives.
pub const NAME_PREFIX: &[u8] = b"names/";

/// One serialized [`Record`] per name.
#[derive(Debug, Clone)]
pub struct RecordStore<K> {
    kv: K,
    min_price: Coins,
}

impl<K: KvStore> RecordStore<K> {
    pub fn new(kv: K, min_price: Coins) -> Self {
        Self { kv, min_price }
    }

    /// Price of a name nobody has bought yet.
    pub fn min_price(&self) -> &Coins {
        &self.min_price
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    fn key(name: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(NAME_PREFIX.len() + name.len());
        key.extend_from_slice(NAME_PREFIX);
        key.extend_from_slice(name.as_bytes());
        key
    }

    fn decode(key: &[u8], bytes: &[u8]) -> Result<Record> {
        let record: Record = serde_json::from_slice(bytes)?;
        if !record.has_owner() {
            return Err(StorageError::Corrupted {
                key: String::from_utf8_lossy(key).into_owned(),
            });
        }
        Ok(record)
    }

    /// Ownership state of `name`.
    pub fn state(&self, name: &str) -> Result<NameState> {
        let key = Self::key(name);
        match self.kv.get(&key)? {
            Some(bytes) => Ok(NameState::Owned(Self::decode(&key, &bytes)?)),
            None => Ok(NameState::Unowned),
        }
    }

    /// Record for `name`, or the synthesized default if none is stored.
    pub fn get(&self, name: &str) -> Result<Record> {
        Ok(self.state(name)?.into_record(&self.min_price))
    }

    /// Persist a record. Records without an owner are refused.
    pub fn put(&self, name: &str, record: &Record) -> Result<()> {
        if !record.has_owner() {
            tracing::warn!(name, "refusing to persist un-owned record");
            return Err(StorageError::InvalidRecord {
                name: name.to_string(),
            });
        }
        let bytes = serde_json::to_vec(record)?;
        self.kv.set(&Self::key(name), &bytes)
    }

    /// Remove the stored record, if any.
    pub fn delete(&self, name: &str) -> Result<()> {
        self.kv.delete(&Self::key(name))
    }

    /// Whether a record is physically stored for `name`.
    pub fn exists(&self, name: &str) -> Result<bool> {
        self.kv.has(&Self::key(name))
    }

    /// Every stored `(name, record)` pair in key order. Each call starts a
    /// fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = Result<(String, Record)>> + '_ {
        self.kv.iter_prefix(NAME_PREFIX).map(|entry| -> Result<(String, Record)> {
            let (key, bytes) = entry?;
            let name = std::str::from_utf8(&key[NAME_PREFIX.len()..])
                .map_err(|_| StorageError::Corrupted {
                    key: String::from_utf8_lossy(&key).into_owned(),
                })?
                .to_string();
            let record = Self::decode(&key, &bytes)?;
            Ok((name, record))
        })
    }

    /// Every stored name in key order.
    pub fn names(&self) -> impl Iterator<Item = Result<String>> + '_ {
        self.iter().map(|entry| entry.map(|(name, _)| name))
    }
}
