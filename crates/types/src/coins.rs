//! Multi-denomination amounts
//!
//! A [`Coins`] value is kept in canonical form at all times: sorted by
//! denomination, no duplicate denominations and no zero entries. Every
//! constructor and every arithmetic helper preserves that form, so two
//! `Coins` are equal exactly when they hold the same amounts.
//!
//! Comparison is partial across denominations. `a.is_all_gt(&b)` asks whether
//! `a` beats `b` in every denomination `b` holds, which is the rule used to
//! accept bids.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Denomination of the default minimum name price.
pub const NAME_TOKEN_DENOM: &str = "nametoken";

const MIN_DENOM_LEN: usize = 2;
const MAX_DENOM_LEN: usize = 64;

/// Errors raised while building or parsing coin amounts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoinsError {
    #[error("invalid denomination: {0:?}")]
    InvalidDenom(String),
    #[error("duplicate denomination: {0}")]
    DuplicateDenom(String),
    #[error("invalid coin expression: {0:?}")]
    InvalidCoin(String),
}

/// Check a denomination against the naming rules.
pub fn validate_denom(denom: &str) -> Result<(), CoinsError> {
    let mut chars = denom.chars();
    let leading_ok = chars.next().is_some_and(|c| c.is_ascii_lowercase());
    let rest_ok = chars.all(|c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '/' | '.' | '-' | '_')
    });
    let len_ok = (MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&denom.len());

    if leading_ok && rest_ok && len_ok {
        Ok(())
    } else {
        Err(CoinsError::InvalidDenom(denom.to_string()))
    }
}

/// A single (denomination, amount) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Result<Self, CoinsError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        Ok(Self { denom, amount })
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinsError::InvalidCoin(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(CoinsError::InvalidCoin(s.to_string()));
        }
        let amount = amount
            .parse::<u128>()
            .map_err(|_| CoinsError::InvalidCoin(s.to_string()))?;
        Coin::new(amount, denom)
    }
}

/// Canonical multi-denomination amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// The empty (zero) amount.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build a canonical amount. Zero entries are dropped; a denomination may
    /// appear only once.
    pub fn new(coins: impl IntoIterator<Item = Coin>) -> Result<Self, CoinsError> {
        let mut coins: Vec<Coin> = coins.into_iter().collect();
        for coin in &coins {
            validate_denom(&coin.denom)?;
        }
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        if let Some(dup) = coins.windows(2).find(|w| w[0].denom == w[1].denom) {
            return Err(CoinsError::DuplicateDenom(dup[0].denom.clone()));
        }
        coins.retain(|c| c.amount > 0);
        Ok(Self(coins))
    }

    /// Convenience constructor for a single denomination.
    pub fn single(amount: u128, denom: impl Into<String>) -> Result<Self, CoinsError> {
        Self::new([Coin::new(amount, denom)?])
    }

    /// Default minimum price for a name nobody has bought yet: `1nametoken`.
    pub fn default_min_price() -> Self {
        Self(vec![Coin {
            denom: NAME_TOKEN_DENOM.to_string(),
            amount: 1,
        }])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Zero in every denomination.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Holds at least one denomination and every held amount is positive.
    pub fn is_all_positive(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map(|idx| self.0[idx].amount)
            .unwrap_or(0)
    }

    /// `self` is strictly greater than `other` in every denomination of
    /// `other`. An empty `self` is never greater; an empty `other` is beaten
    /// by any non-empty `self`.
    pub fn is_all_gt(&self, other: &Coins) -> bool {
        if self.is_empty() {
            return false;
        }
        other
            .iter()
            .all(|coin| self.amount_of(&coin.denom) > coin.amount)
    }

    /// `self` covers `other` in every denomination of `other`.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other
            .iter()
            .all(|coin| self.amount_of(&coin.denom) >= coin.amount)
    }

    /// Denomination-wise sum, `None` on overflow.
    pub fn checked_add(&self, other: &Coins) -> Option<Coins> {
        let mut out = Vec::with_capacity(self.len() + other.len());
        let (mut a, mut b) = (self.0.iter().peekable(), other.0.iter().peekable());
        loop {
            let next = match (a.peek(), b.peek()) {
                (Some(x), Some(y)) => match x.denom.cmp(&y.denom) {
                    Ordering::Less => a.next().cloned(),
                    Ordering::Greater => b.next().cloned(),
                    Ordering::Equal => {
                        let amount = x.amount.checked_add(y.amount)?;
                        let denom = x.denom.clone();
                        a.next();
                        b.next();
                        Some(Coin { denom, amount })
                    }
                },
                (Some(_), None) => a.next().cloned(),
                (None, Some(_)) => b.next().cloned(),
                (None, None) => break,
            };
            out.extend(next);
        }
        Some(Self(out))
    }

    /// Denomination-wise difference, `None` if any denomination would go
    /// negative.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        if !self.is_all_gte(other) {
            return None;
        }
        let out = self
            .0
            .iter()
            .map(|coin| Coin {
                denom: coin.denom.clone(),
                amount: coin.amount - other.amount_of(&coin.denom),
            })
            .filter(|coin| coin.amount > 0)
            .collect();
        Some(Self(out))
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoinsError;

    fn try_from(value: Vec<Coin>) -> Result<Self, Self::Error> {
        Coins::new(value)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(value: Coins) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, coin) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

/// Parses `"2nametoken,5gold"`. The empty string is the empty amount.
impl FromStr for Coins {
    type Err = CoinsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::empty());
        }
        let coins = s
            .split(',')
            .map(str::parse::<Coin>)
            .collect::<Result<Vec<_>, _>>()?;
        Coins::new(coins)
    }
}
