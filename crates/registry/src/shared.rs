//! Thread-safe handle over a single registry.

use crate::errors::Result;
use crate::msgs::Request;
use crate::query::{self, Query, QueryResponse};
use crate::registry::NameRegistry;
use nameservice_ledger::Ledger;
use nameservice_storage::KvStore;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable single-writer handle. Every request and query runs under the
/// same lock, so transitions are serialized.
#[derive(Debug)]
pub struct SharedRegistry<K, L> {
    inner: Arc<Mutex<NameRegistry<K, L>>>,
}

impl<K, L> Clone for SharedRegistry<K, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: KvStore, L: Ledger> SharedRegistry<K, L> {
    pub fn new(registry: NameRegistry<K, L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    pub fn dispatch(&self, request: &Request) -> Result<()> {
        self.inner.lock().dispatch(request)
    }

    pub fn query(&self, q: &Query) -> Result<QueryResponse> {
        let registry = self.inner.lock();
        query::query(&*registry, q)
    }

    /// Run `f` with exclusive access to the registry.
    pub fn with<R>(&self, f: impl FnOnce(&mut NameRegistry<K, L>) -> R) -> R {
        let mut registry = self.inner.lock();
        f(&mut *registry)
    }
}
