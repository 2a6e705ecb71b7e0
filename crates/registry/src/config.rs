use nameservice_types::Coins;
use serde::{Deserialize, Serialize};

/// Registry-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Starting price of a name nobody has bought yet.
    pub min_price: Coins,
}

impl RegistryConfig {
    pub fn with_min_price(min_price: Coins) -> Self {
        Self { min_price }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            min_price: Coins::default_min_price(),
        }
    }
}
