//! Name registry state machine
//!
//! A name is either un-owned (nothing stored) or owned (a stored record with
//! a non-empty owner). The only transitions are:
//!
//! * buy: un-owned → owned, or owned → owned with a new owner and price;
//! * set value: owned → owned with a new value;
//! * release: owned → un-owned.
//!
//! Buying an un-owned name burns the bid from the buyer. Buying an owned name
//! pays the bid to the current owner. Nothing is written until the ledger has
//! accepted the movement of funds.

use crate::config::RegistryConfig;
use crate::errors::{RegistryError, Result};
use nameservice_ledger::Ledger;
use nameservice_storage::{KvStore, RecordStore};
use nameservice_types::{Address, Coins, NameState, Record};
use tracing::{debug, info};

/// Registry of names backed by a key-value store and a ledger.
#[derive(Debug)]
pub struct NameRegistry<K, L> {
    store: RecordStore<K>,
    ledger: L,
}

impl<K: KvStore, L: Ledger> NameRegistry<K, L> {
    pub fn new(kv: K, ledger: L, config: &RegistryConfig) -> Self {
        Self {
            store: RecordStore::new(kv, config.min_price.clone()),
            ledger,
        }
    }

    pub fn store(&self) -> &RecordStore<K> {
        &self.store
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn min_price(&self) -> &Coins {
        self.store.min_price()
    }

    /// Point `name` at `value`. Only the current owner may do this.
    pub fn set_value(&mut self, name: &str, value: &str, requester: &Address) -> Result<()> {
        let mut record = match self.store.state(name)? {
            NameState::Owned(record) if record.owner == *requester => record,
            _ => {
                debug!(name, requester = %requester, "set value rejected: not the owner");
                return Err(RegistryError::Unauthorized {
                    name: name.to_string(),
                });
            }
        };

        record.value = value.to_string();
        self.store.put(name, &record)?;
        info!(name, owner = %requester, "name value updated");
        Ok(())
    }

    /// Bid `bid` for `name` on behalf of `buyer`.
    pub fn buy(&mut self, name: &str, bid: &Coins, buyer: &Address) -> Result<()> {
        let state = self.store.state(name)?;
        let price = match &state {
            NameState::Owned(record) => &record.price,
            NameState::Unowned => self.store.min_price(),
        };
        if !bid.is_all_gt(price) {
            debug!(name, %bid, %price, "bid rejected: not above current price");
            return Err(RegistryError::BidTooLow {
                name: name.to_string(),
                bid: bid.clone(),
                price: price.clone(),
            });
        }

        let mut record = match state {
            NameState::Owned(record) => {
                self.ledger.transfer(buyer, &record.owner, bid)?;
                info!(name, from = %record.owner, to = %buyer, %bid, "name sold");
                record
            }
            NameState::Unowned => {
                self.ledger.debit(buyer, bid)?;
                info!(name, buyer = %buyer, %bid, "name claimed, bid burned");
                Record::unowned(self.store.min_price().clone())
            }
        };

        record.owner = *buyer;
        record.price = bid.clone();
        self.store.put(name, &record)?;
        Ok(())
    }

    /// Give up `name`. Only the current owner may do this.
    pub fn release(&mut self, name: &str, requester: &Address) -> Result<()> {
        match self.store.state(name)? {
            NameState::Unowned => Err(RegistryError::NotFound {
                name: name.to_string(),
            }),
            NameState::Owned(record) if record.owner != *requester => {
                debug!(name, requester = %requester, "release rejected: not the owner");
                Err(RegistryError::Unauthorized {
                    name: name.to_string(),
                })
            }
            NameState::Owned(_) => {
                self.store.delete(name)?;
                info!(name, owner = %requester, "name released");
                Ok(())
            }
        }
    }

    /// Value `name` resolves to; empty for un-owned names.
    pub fn resolve(&self, name: &str) -> Result<String> {
        Ok(self.store.get(name)?.value)
    }

    /// Full record for `name`, synthesized if un-owned.
    pub fn lookup(&self, name: &str) -> Result<Record> {
        Ok(self.store.get(name)?)
    }

    /// Every owned name, in key order.
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.store.names().collect::<nameservice_storage::Result<_>>()?)
    }

    pub fn has_owner(&self, name: &str) -> Result<bool> {
        Ok(self.store.state(name)?.is_owned())
    }

    pub fn owner(&self, name: &str) -> Result<Option<Address>> {
        Ok(self.store.state(name)?.owner().copied())
    }

    pub fn price(&self, name: &str) -> Result<Coins> {
        Ok(self.store.get(name)?.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nameservice_ledger::{LedgerCall, MockLedger};
    use nameservice_storage::MemoryKvStore;

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    fn addr(seed: u8) -> Address {
        Address::new([seed; 32])
    }

    fn registry(ledger: MockLedger) -> NameRegistry<MemoryKvStore, MockLedger> {
        NameRegistry::new(
            MemoryKvStore::new(),
            ledger,
            &RegistryConfig::with_min_price(coins("1token")),
        )
    }

    #[test]
    fn test_first_purchase_burns_bid() {
        let ledger = MockLedger::new()
            .with_balance(addr(1), coins("10token"))
            .unwrap();
        let mut registry = registry(ledger);

        registry.buy("alice.id", &coins("2token"), &addr(1)).unwrap();

        assert_eq!(
            registry.ledger().calls(),
            &[LedgerCall::Debit {
                account: addr(1),
                amount: coins("2token"),
            }]
        );
        let record = registry.lookup("alice.id").unwrap();
        assert_eq!(record.owner, addr(1));
        assert_eq!(record.price, coins("2token"));
        assert_eq!(record.value, "");
        assert_eq!(registry.ledger().total_supply().unwrap(), coins("8token"));
    }

    #[test]
    fn test_bid_at_min_price_is_too_low() {
        let ledger = MockLedger::new()
            .with_balance(addr(1), coins("10token"))
            .unwrap();
        let mut registry = registry(ledger);

        let err = registry
            .buy("alice.id", &coins("1token"), &addr(1))
            .unwrap_err();
        assert!(matches!(err, RegistryError::BidTooLow { .. }));
        assert!(registry.ledger().calls().is_empty());
        assert!(!registry.has_owner("alice.id").unwrap());
    }

    #[test]
    fn test_resale_preserves_value() {
        let ledger = MockLedger::new()
            .with_balance(addr(1), coins("10token"))
            .unwrap()
            .with_balance(addr(2), coins("10token"))
            .unwrap();
        let mut registry = registry(ledger);

        registry.buy("alice.id", &coins("2token"), &addr(1)).unwrap();
        registry.set_value("alice.id", "1.2.3.4", &addr(1)).unwrap();
        registry.buy("alice.id", &coins("3token"), &addr(2)).unwrap();

        let record = registry.lookup("alice.id").unwrap();
        assert_eq!(record.owner, addr(2));
        assert_eq!(record.value, "1.2.3.4");
        assert_eq!(registry.ledger().balance(&addr(1)).unwrap(), coins("11token"));
        assert_eq!(registry.ledger().balance(&addr(2)).unwrap(), coins("7token"));
    }

    #[test]
    fn test_set_value_on_unowned_is_unauthorized() {
        let mut registry = registry(MockLedger::new());
        let err = registry
            .set_value("nobody.id", "x", &addr(1))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized { .. }));
        assert!(!registry.store().exists("nobody.id").unwrap());
    }

    #[test]
    fn test_owner_and_price_helpers() {
        let ledger = MockLedger::new()
            .with_balance(addr(1), coins("10token"))
            .unwrap();
        let mut registry = registry(ledger);
        assert_eq!(registry.owner("a.id").unwrap(), None);
        assert_eq!(registry.price("a.id").unwrap(), coins("1token"));

        registry.buy("a.id", &coins("4token"), &addr(1)).unwrap();
        assert_eq!(registry.owner("a.id").unwrap(), Some(addr(1)));
        assert_eq!(registry.price("a.id").unwrap(), coins("4token"));
        assert_eq!(registry.names().unwrap(), vec!["a.id".to_string()]);
    }
}
