//! In-memory pooled balance
//!
//! The pool is the only shared mutable resource outside the transfer log.
//! Deposits increase it; only quorum-reaching approvals decrease it.

use crate::error::FundsError;
use multisig_core::{Amount, Identity};
use std::collections::HashMap;

/// Capability the approval engine uses to move funds out of the pool.
///
/// `transfer` must be all-or-nothing: on `Err` no balance may have changed.
pub trait FundsTransfer {
    /// Current pooled balance
    fn balance(&self) -> Amount;

    /// Move `amount` from the pool to `to`
    fn transfer(&mut self, amount: Amount, to: &Identity) -> Result<(), FundsError>;
}

/// Pooled balance plus the balances received by each destination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pool {
    balance: Amount,
    /// Identity -> total received from the pool
    accounts: HashMap<Identity, Amount>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a pool from persisted parts
    pub fn from_parts(balance: Amount, accounts: HashMap<Identity, Amount>) -> Self {
        Self { balance, accounts }
    }

    /// Credit the pool. Anyone may deposit.
    pub fn deposit(&mut self, from: &Identity, amount: Amount) -> Result<Amount, FundsError> {
        let balance = self
            .balance
            .checked_add(&amount)
            .ok_or_else(|| FundsError::Overflow("pool".to_string()))?;
        self.balance = balance;

        tracing::info!(from = %from, amount = %amount, balance = %balance, "Deposit received");
        Ok(balance)
    }

    /// Balance received by an account (zero if it was never paid)
    pub fn balance_of(&self, account: &Identity) -> Amount {
        self.accounts.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// All accounts paid by the pool
    pub fn accounts(&self) -> &HashMap<Identity, Amount> {
        &self.accounts
    }
}

impl FundsTransfer for Pool {
    fn balance(&self) -> Amount {
        self.balance
    }

    fn transfer(&mut self, amount: Amount, to: &Identity) -> Result<(), FundsError> {
        // Compute both sides before touching state
        let remaining =
            self.balance
                .checked_sub(&amount)
                .ok_or(FundsError::InsufficientFunds {
                    available: self.balance,
                    required: amount,
                })?;
        let credited = self
            .balance_of(to)
            .checked_add(&amount)
            .ok_or_else(|| FundsError::Overflow(to.to_string()))?;

        self.balance = remaining;
        self.accounts.insert(to.clone(), credited);

        tracing::info!(to = %to, amount = %amount, remaining = %remaining, "Funds released");
        Ok(())
    }
}
