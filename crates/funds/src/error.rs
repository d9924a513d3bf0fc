//! Funds errors

use multisig_core::Amount;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FundsError {
    #[error("Insufficient funds in pool: available {available}, required {required}")]
    InsufficientFunds { available: Amount, required: Amount },

    #[error("Balance overflow while crediting {0}")]
    Overflow(String),
}
