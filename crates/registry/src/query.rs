//! Read-only queries against the registry.

use crate::errors::Result;
use crate::registry::NameRegistry;
use nameservice_ledger::Ledger;
use nameservice_storage::KvStore;
use nameservice_types::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// Value a name points at.
    Resolve { name: String },
    /// Full record for a name.
    Whois { name: String },
    /// Every owned name.
    Names,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveResponse {
    pub value: String,
}

/// Untagged on the wire. Variants are tried in order, so the record comes
/// before the bare `{"value": ..}` shape it would otherwise collapse into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Whois(Record),
    Names(Vec<String>),
    Resolve(ResolveResponse),
}

impl QueryResponse {
    /// Human-readable rendering, one line per item.
    pub fn render(&self) -> String {
        match self {
            QueryResponse::Resolve(resp) => resp.value.clone(),
            QueryResponse::Whois(record) => record.to_string(),
            QueryResponse::Names(names) => names.join("\n"),
        }
    }
}

/// Answer `query`. Un-owned names answer with the default record rather than
/// an error.
pub fn query<K: KvStore, L: Ledger>(
    registry: &NameRegistry<K, L>,
    query: &Query,
) -> Result<QueryResponse> {
    Ok(match query {
        Query::Resolve { name } => QueryResponse::Resolve(ResolveResponse {
            value: registry.resolve(name)?,
        }),
        Query::Whois { name } => QueryResponse::Whois(registry.lookup(name)?),
        Query::Names => QueryResponse::Names(registry.names()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use nameservice_ledger::InMemoryLedger;
    use nameservice_storage::MemoryKvStore;
    use nameservice_types::{Address, Coins};

    fn registry() -> NameRegistry<MemoryKvStore, InMemoryLedger> {
        let ledger = InMemoryLedger::with_balances([(
            Address::new([1; 32]),
            "100nametoken".parse().unwrap(),
        )])
        .unwrap();
        NameRegistry::new(MemoryKvStore::new(), ledger, &RegistryConfig::default())
    }

    #[test]
    fn queries_on_unowned_name() {
        let registry = registry();
        let resolve = query(
            &registry,
            &Query::Resolve {
                name: "ghost.id".into(),
            },
        )
        .unwrap();
        assert_eq!(
            resolve,
            QueryResponse::Resolve(ResolveResponse {
                value: String::new()
            })
        );

        let whois = query(
            &registry,
            &Query::Whois {
                name: "ghost.id".into(),
            },
        )
        .unwrap();
        assert_eq!(
            whois,
            QueryResponse::Whois(Record::unowned(Coins::default_min_price()))
        );
        assert_eq!(
            query(&registry, &Query::Names).unwrap(),
            QueryResponse::Names(vec![])
        );
    }

    #[test]
    fn resolve_response_json_shape() {
        let mut registry = registry();
        let owner = Address::new([1; 32]);
        registry
            .buy("a.id", &"2nametoken".parse().unwrap(), &owner)
            .unwrap();
        registry.set_value("a.id", "8.8.8.8", &owner).unwrap();

        let resp = query(&registry, &Query::Resolve { name: "a.id".into() }).unwrap();
        assert_eq!(
            serde_json::to_string(&resp).unwrap(),
            r#"{"value":"8.8.8.8"}"#
        );
        assert_eq!(resp.render(), "8.8.8.8");

        let names = query(&registry, &Query::Names).unwrap();
        assert_eq!(serde_json::to_string(&names).unwrap(), r#"["a.id"]"#);
    }

    #[test]
    fn responses_decode_back_to_same_variant() {
        let mut registry = registry();
        let owner = Address::new([1; 32]);
        registry
            .buy("a.id", &"2nametoken".parse().unwrap(), &owner)
            .unwrap();
        registry.set_value("a.id", "1.2.3.4", &owner).unwrap();

        for q in [
            Query::Resolve { name: "a.id".into() },
            Query::Whois { name: "a.id".into() },
            Query::Names,
        ] {
            let resp = query(&registry, &q).unwrap();
            let json = serde_json::to_string(&resp).unwrap();
            let back: QueryResponse = serde_json::from_str(&json).unwrap();
            assert_eq!(back, resp, "{json}");
        }

        // A single name must not be read as a resolve body.
        let back: QueryResponse = serde_json::from_str(r#"["a.id"]"#).unwrap();
        assert_eq!(back, QueryResponse::Names(vec!["a.id".into()]));
        let back: QueryResponse = serde_json::from_str("[]").unwrap();
        assert_eq!(back, QueryResponse::Names(vec![]));
    }

    #[test]
    fn query_decodes_from_tagged_json() {
        let q: Query = serde_json::from_str(r#"{"query":"whois","name":"a.id"}"#).unwrap();
        assert_eq!(q, Query::Whois { name: "a.id".into() });
        let q: Query = serde_json::from_str(r#"{"query":"names"}"#).unwrap();
        assert_eq!(q, Query::Names);
    }
}
