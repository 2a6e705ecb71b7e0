//! Error types for the name registry

use nameservice_ledger::LedgerError;
use nameservice_storage::StorageError;
use nameservice_types::{Address, Coins};
use thiserror::Error;

/// Namespace that qualifies [`RegistryError::code`] values.
pub const CODESPACE: &str = "nameservice";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthorized: incorrect owner for name {name}")]
    Unauthorized { name: String },

    #[error("Name does not exist: {name}")]
    NotFound { name: String },

    #[error("Bid not high enough for {name}: bid {bid}, price {price}")]
    BidTooLow {
        name: String,
        bid: Coins,
        price: Coins,
    },

    #[error("Insufficient funds: {account} cannot cover {needed}")]
    InsufficientFunds { account: Address, needed: Coins },

    #[error("Refusing to store un-owned record for name {name}")]
    InvalidRecord { name: String },

    #[error("Registry storage error: {0}")]
    Storage(#[source] StorageError),

    #[error("Registry ledger error: {0}")]
    Ledger(#[source] LedgerError),
}

impl RegistryError {
    /// Stable numeric code within [`CODESPACE`], for transports that report
    /// failures as (codespace, code) pairs.
    pub fn code(&self) -> u32 {
        match self {
            RegistryError::InvalidRequest(_) => 1,
            RegistryError::Unauthorized { .. } => 4,
            RegistryError::InsufficientFunds { .. } => 5,
            RegistryError::BidTooLow { .. } => 6,
            RegistryError::NotFound { .. } => 101,
            RegistryError::InvalidRecord { .. } => 102,
            RegistryError::Storage(_) => 1000,
            RegistryError::Ledger(_) => 1001,
        }
    }

    pub fn codespace(&self) -> &'static str {
        CODESPACE
    }

    /// Domain outcomes the caller can act on, as opposed to backend faults.
    pub fn is_domain(&self) -> bool {
        !matches!(self, RegistryError::Storage(_) | RegistryError::Ledger(_))
    }
}

impl From<StorageError> for RegistryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidRecord { name } => RegistryError::InvalidRecord { name },
            other => RegistryError::Storage(other),
        }
    }
}

impl From<LedgerError> for RegistryError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                account, needed, ..
            } => RegistryError::InsufficientFunds { account, needed },
            other => RegistryError::Ledger(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_invalid_record_maps_to_domain_error() {
        let err: RegistryError = StorageError::InvalidRecord {
            name: "x.id".into(),
        }
        .into();
        assert!(matches!(err, RegistryError::InvalidRecord { .. }));
        assert_eq!(err.code(), 102);
        assert!(err.is_domain());
    }

    #[test]
    fn ledger_shortfall_maps_to_insufficient_funds() {
        let account = Address::new([4u8; 32]);
        let err: RegistryError = LedgerError::InsufficientFunds {
            account,
            needed: "3token".parse().unwrap(),
            available: Coins::empty(),
        }
        .into();
        assert!(
            matches!(err, RegistryError::InsufficientFunds { account: a, .. } if a == account)
        );
        assert_eq!(err.codespace(), "nameservice");
    }

    #[test]
    fn backend_faults_are_not_domain_outcomes() {
        let err: RegistryError = LedgerError::Overflow {
            account: Address::new([1u8; 32]),
        }
        .into();
        assert!(!err.is_domain());
        assert_eq!(err.code(), 1001);
    }
}
