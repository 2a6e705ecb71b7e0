//! Nameservice Ledger
//!
//! Fund movement for the registry: paying the previous owner on resale and
//! burning the bid on first purchase. The registry only sees the [`Ledger`]
//! trait; balances live wherever the implementation keeps them.

pub mod ledger;
pub mod persistent;

pub use ledger::{InMemoryLedger, Ledger, LedgerCall, LedgerError, MockLedger, Result};
pub use persistent::{KvLedger, BALANCE_PREFIX};
