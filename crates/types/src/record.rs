use crate::address::Address;
use crate::coins::Coins;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted state for one name.
///
/// The name itself is the storage key and is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// What the name currently resolves to.
    pub value: String,
    /// Current owner; [`Address::EMPTY`] when nobody has bought the name.
    pub owner: Address,
    /// Price paid by the last successful bid, or the minimum price.
    pub price: Coins,
}

impl Record {
    /// The implicit record of a name that has never been bought.
    pub fn unowned(min_price: Coins) -> Self {
        Self {
            value: String::new(),
            owner: Address::EMPTY,
            price: min_price,
        }
    }

    pub fn has_owner(&self) -> bool {
        !self.owner.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let owner = if self.has_owner() {
            self.owner.to_string()
        } else {
            String::new()
        };
        let line = format!(
            "Owner: {} Value: {} Price: {}",
            owner, self.value, self.price
        );
        f.write_str(line.trim())
    }
}

/// Ownership state of a name.
///
/// `Unowned` is represented in storage by the absence of a key; `Owned`
/// always carries a record whose owner is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameState {
    Unowned,
    Owned(Record),
}

impl NameState {
    pub fn is_owned(&self) -> bool {
        matches!(self, NameState::Owned(_))
    }

    pub fn owner(&self) -> Option<&Address> {
        match self {
            NameState::Owned(record) => Some(&record.owner),
            NameState::Unowned => None,
        }
    }

    /// Materialize the record, synthesizing the default for unowned names.
    pub fn into_record(self, min_price: &Coins) -> Record {
        match self {
            NameState::Owned(record) => record,
            NameState::Unowned => Record::unowned(min_price.clone()),
        }
    }
}
