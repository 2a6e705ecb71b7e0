//! Persistence for the nameservice registry.
//!
//! [`KvStore`] is the narrow view of an ordered key-value engine the registry
//! needs. [`SledKvStore`] backs it with a sled tree for real deployments and
//! [`MemoryKvStore`] with a `BTreeMap` for tests and ephemeral runs.
//! [`RecordStore`] layers the typed, one-record-per-name view on top.

pub mod kv;
pub mod records;

pub use kv::{KvIter, KvPair, KvStore, MemoryKvStore, SledKvStore};
pub use records::{RecordStore, NAME_PREFIX};

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Refusing to store un-owned record for name {name:?}")]
    InvalidRecord { name: String },
    #[error("Corrupted entry under key {key}")]
    Corrupted { key: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;
