//! Nameservice Registry
//!
//! A marketplace of human-readable names. Anyone may bid for a name; a bid
//! that beats the current price takes ownership. Owners point their names at
//! arbitrary string values and may release them back to the un-owned state.
//!
//! Storage is any [`nameservice_storage::KvStore`] and funds move through an
//! injected [`nameservice_ledger::Ledger`].

pub mod config;
pub mod errors;
pub mod handler;
pub mod msgs;
pub mod query;
pub mod registry;
pub mod shared;

pub use config::RegistryConfig;
pub use errors::{RegistryError, Result, CODESPACE};
pub use handler::handle;
pub use msgs::{BuyRequest, ReleaseRequest, Request, SetValueRequest, ROUTER_KEY};
pub use query::{query, Query, QueryResponse, ResolveResponse};
pub use registry::NameRegistry;
pub use shared::SharedRegistry;
