//! Wallet errors

use crate::transfer::TransferId;
use multisig_core::Identity;
use multisig_funds::FundsError;
use thiserror::Error;

/// Errors raised while constructing the approver registry.
/// No wallet exists when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Cannot require {quorum} approvals with only {approvers} approvers")]
    InvalidQuorum { quorum: u32, approvers: usize },

    #[error("Quorum must be at least 2, got {quorum}")]
    QuorumTooLow { quorum: u32 },
}

/// Errors raised by a single wallet call. A failed call changes nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("{0} is not an approver")]
    NotApprover(Identity),

    #[error("Transfer not found: {0}")]
    NotFound(TransferId),

    #[error("Transfer {0} has already been sent")]
    AlreadySent(TransferId),

    #[error("{approver} cannot approve transfer {id} twice")]
    DuplicateApproval { id: TransferId, approver: Identity },

    #[error(transparent)]
    Funds(#[from] FundsError),
}

impl WalletError {
    /// True when the call failed because the pool could not cover the transfer
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, WalletError::Funds(FundsError::InsufficientFunds { .. }))
    }
}
