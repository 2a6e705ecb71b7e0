//! Account ledger interface for name purchases
//!
//! Provides a small, deterministic interface for crediting, debiting and
//! transferring multi-denomination balances. Debits and transfers are
//! all-or-nothing: when any denomination is short, nothing moves.

use nameservice_storage::StorageError;
use nameservice_types::{Address, Coins};
use std::collections::HashMap;

#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("Insufficient funds in {account}: needed {needed}, available {available}")]
    InsufficientFunds {
        account: Address,
        needed: Coins,
        available: Coins,
    },

    #[error("Balance overflow for {account}")]
    Overflow { account: Address },

    #[error("Ledger storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Interface for account ledger operations.
pub trait Ledger: Send + Sync {
    /// Current balance of `account` (empty if unknown).
    fn balance(&self, account: &Address) -> Result<Coins>;

    /// Mint `amount` into `account`.
    fn credit(&mut self, account: &Address, amount: &Coins) -> Result<()>;

    /// Burn `amount` from `account`, with no credit anywhere else.
    fn debit(&mut self, account: &Address, amount: &Coins) -> Result<()>;

    /// Move `amount` from `from` to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<()>;

    /// Sum of all balances.
    fn total_supply(&self) -> Result<Coins>;
}

/// `balance - amount`, or `InsufficientFunds` naming `account`.
pub(crate) fn deduct(account: &Address, balance: &Coins, amount: &Coins) -> Result<Coins> {
    balance
        .checked_sub(amount)
        .ok_or_else(|| LedgerError::InsufficientFunds {
            account: *account,
            needed: amount.clone(),
            available: balance.clone(),
        })
}

/// `balance + amount`, or `Overflow` naming `account`.
pub(crate) fn accrue(account: &Address, balance: &Coins, amount: &Coins) -> Result<Coins> {
    balance
        .checked_add(amount)
        .ok_or(LedgerError::Overflow { account: *account })
}

// -----------------------------------------------------------------------------
// In-memory implementation (for tests and ephemeral runs)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Address, Coins>,
    total_supply: Coins,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-funded with the given balances.
    pub fn with_balances(balances: impl IntoIterator<Item = (Address, Coins)>) -> Result<Self> {
        let mut ledger = Self::new();
        for (account, amount) in balances {
            ledger.credit(&account, &amount)?;
        }
        Ok(ledger)
    }

    fn balance_of(&self, account: &Address) -> Coins {
        self.balances.get(account).cloned().unwrap_or_default()
    }

    fn set_balance(&mut self, account: &Address, balance: Coins) {
        if balance.is_zero() {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, balance);
        }
    }
}

impl Ledger for InMemoryLedger {
    fn balance(&self, account: &Address) -> Result<Coins> {
        Ok(self.balance_of(account))
    }

    fn credit(&mut self, account: &Address, amount: &Coins) -> Result<()> {
        let balance = accrue(account, &self.balance_of(account), amount)?;
        let supply = accrue(account, &self.total_supply, amount)?;
        self.set_balance(account, balance);
        self.total_supply = supply;
        Ok(())
    }

    fn debit(&mut self, account: &Address, amount: &Coins) -> Result<()> {
        let balance = deduct(account, &self.balance_of(account), amount)?;
        self.set_balance(account, balance);
        // Supply always covers any single balance.
        self.total_supply = self
            .total_supply
            .checked_sub(amount)
            .unwrap_or_default();
        Ok(())
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<()> {
        let from_balance = deduct(from, &self.balance_of(from), amount)?;
        if from == to {
            return Ok(());
        }
        let to_balance = accrue(to, &self.balance_of(to), amount)?;
        self.set_balance(from, from_balance);
        self.set_balance(to, to_balance);
        Ok(())
    }

    fn total_supply(&self) -> Result<Coins> {
        Ok(self.total_supply.clone())
    }
}

// -----------------------------------------------------------------------------
// Mock ledger (for deterministic testing)
// -----------------------------------------------------------------------------

/// One call observed by [`MockLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Credit {
        account: Address,
        amount: Coins,
    },
    Debit {
        account: Address,
        amount: Coins,
    },
    Transfer {
        from: Address,
        to: Address,
        amount: Coins,
    },
}

/// Records every call and can be told to refuse all outgoing movements.
#[derive(Debug, Clone, Default)]
pub struct MockLedger {
    inner: InMemoryLedger,
    calls: Vec<LedgerCall>,
    refuse_outgoing: bool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style funding that is not recorded as a call.
    pub fn with_balance(mut self, account: Address, amount: Coins) -> Result<Self> {
        self.inner.credit(&account, &amount)?;
        Ok(self)
    }

    /// When set, every debit and transfer fails with `InsufficientFunds`.
    pub fn refuse_outgoing(&mut self, refuse: bool) {
        self.refuse_outgoing = refuse;
    }

    pub fn calls(&self) -> &[LedgerCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn refusal(&self, account: &Address, amount: &Coins) -> LedgerError {
        LedgerError::InsufficientFunds {
            account: *account,
            needed: amount.clone(),
            available: self.inner.balance_of(account),
        }
    }
}

impl Ledger for MockLedger {
    fn balance(&self, account: &Address) -> Result<Coins> {
        self.inner.balance(account)
    }

    fn credit(&mut self, account: &Address, amount: &Coins) -> Result<()> {
        self.calls.push(LedgerCall::Credit {
            account: *account,
            amount: amount.clone(),
        });
        self.inner.credit(account, amount)
    }

    fn debit(&mut self, account: &Address, amount: &Coins) -> Result<()> {
        self.calls.push(LedgerCall::Debit {
            account: *account,
            amount: amount.clone(),
        });
        if self.refuse_outgoing {
            return Err(self.refusal(account, amount));
        }
        self.inner.debit(account, amount)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coins) -> Result<()> {
        self.calls.push(LedgerCall::Transfer {
            from: *from,
            to: *to,
            amount: amount.clone(),
        });
        if self.refuse_outgoing {
            return Err(self.refusal(from, amount));
        }
        self.inner.transfer(from, to, amount)
    }

    fn total_supply(&self) -> Result<Coins> {
        self.inner.total_supply()
    }
}
