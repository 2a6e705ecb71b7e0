//! Request dispatch.

use crate::errors::Result;
use crate::msgs::Request;
use crate::registry::NameRegistry;
use nameservice_ledger::Ledger;
use nameservice_storage::KvStore;
use tracing::{debug, info_span};

/// Validate `request` and apply it to `registry`.
///
/// Stateless validation runs first; a request that fails it never reaches
/// storage or the ledger.
pub fn handle<K: KvStore, L: Ledger>(
    registry: &mut NameRegistry<K, L>,
    request: &Request,
) -> Result<()> {
    let span = info_span!(
        "request",
        route = request.route(),
        kind = request.kind(),
        name = request.name(),
        signer = %request.signer()
    );
    let _enter = span.enter();

    let result = request.validate_basic().and_then(|()| match request {
        Request::SetName(req) => registry.set_value(&req.name, &req.value, &req.owner),
        Request::BuyName(req) => registry.buy(&req.name, &req.bid, &req.buyer),
        Request::DeleteName(req) => registry.release(&req.name, &req.owner),
    });

    if let Err(err) = &result {
        debug!(code = err.code(), codespace = err.codespace(), error = %err, "request rejected");
    }
    result
}

impl<K: KvStore, L: Ledger> NameRegistry<K, L> {
    /// Shorthand for [`handle`].
    pub fn dispatch(&mut self, request: &Request) -> Result<()> {
        handle(self, request)
    }
}
