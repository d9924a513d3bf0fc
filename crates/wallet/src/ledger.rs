//! Transfer ledger - append-only log and quorum state machine
//!
//! ```text
//! create_transfer
//!     │
//!     ▼
//! ┌─────────────────────────────┐
//! │ PENDING (approvals < quorum)│ ← approve_transfer from distinct approvers
//! └─────────────────────────────┘
//!     │ approval reaching quorum + successful dispatch
//!     ▼
//! ┌─────────────────────────────┐
//! │ SENT (terminal)             │ ← further approvals rejected
//! └─────────────────────────────┘
//! ```

use crate::error::WalletError;
use crate::registry::ApproverRegistry;
use crate::transfer::{ApprovalOutcome, TransferId, TransferRequest, TransferView};
use multisig_core::{Identity, PositiveAmount};
use multisig_funds::FundsTransfer;

/// Owns the transfer log. Entries are appended and updated in place by id,
/// never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferLedger {
    transfers: Vec<TransferRequest>,
}

impl TransferLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted requests, which must be ordered by id from 0
    pub(crate) fn from_transfers(transfers: Vec<TransferRequest>) -> Self {
        Self { transfers }
    }

    /// Append a new pending request. Only approvers may create transfers.
    ///
    /// Zero amounts are ruled out by `PositiveAmount`. The pool balance is not
    /// checked here; insufficiency surfaces at dispatch.
    pub fn create_transfer(
        &mut self,
        registry: &ApproverRegistry,
        amount: PositiveAmount,
        to: Identity,
        caller: &Identity,
    ) -> Result<TransferId, WalletError> {
        ensure_approver(registry, caller)?;
        let amount = amount.amount();

        let id = self.transfers.len() as TransferId;
        tracing::info!(id, amount = %amount, to = %to, created_by = %caller, "Transfer created");

        self.transfers
            .push(TransferRequest::new(id, amount, to, caller.clone()));
        Ok(id)
    }

    /// Record `caller`'s approval of transfer `id`.
    ///
    /// The approval that reaches quorum dispatches the funds within this call.
    /// The change is staged on a copy and only written back once the dispatch
    /// succeeded, so a failed dispatch leaves both the log and the pool as they were.
    pub fn approve_transfer<F>(
        &mut self,
        registry: &ApproverRegistry,
        id: TransferId,
        caller: &Identity,
        funds: &mut F,
    ) -> Result<ApprovalOutcome, WalletError>
    where
        F: FundsTransfer + ?Sized,
    {
        ensure_approver(registry, caller)?;

        let index = usize::try_from(id).map_err(|_| WalletError::NotFound(id))?;
        let current = self
            .transfers
            .get(index)
            .ok_or(WalletError::NotFound(id))?;

        if current.is_sent() {
            tracing::debug!(id, approver = %caller, "Approval rejected: already sent");
            return Err(WalletError::AlreadySent(id));
        }

        let mut staged = current.clone();
        if !staged.add_approval(caller.clone()) {
            tracing::debug!(id, approver = %caller, "Approval rejected: duplicate");
            return Err(WalletError::DuplicateApproval {
                id,
                approver: caller.clone(),
            });
        }

        let quorum = registry.quorum();
        let outcome = if staged.approval_count() >= quorum as usize {
            staged.mark_sent();
            if let Err(e) = funds.transfer(staged.amount, &staged.to) {
                tracing::warn!(id, approver = %caller, error = %e, "Dispatch failed, approval discarded");
                return Err(e.into());
            }
            ApprovalOutcome::Sent
        } else {
            ApprovalOutcome::Pending {
                approvals: staged.approval_count(),
                remaining: staged.remaining(quorum),
            }
        };

        tracing::info!(
            id,
            approver = %caller,
            approvals = staged.approval_count(),
            sent = staged.is_sent(),
            "Transfer approved"
        );
        self.transfers[index] = staged;

        Ok(outcome)
    }

    /// All requests, ascending by id
    pub fn transfers(&self) -> &[TransferRequest] {
        &self.transfers
    }

    /// Caller-facing projection of the whole log
    pub fn get_transfers(&self) -> Vec<TransferView> {
        self.transfers.iter().map(TransferRequest::view).collect()
    }

    pub fn get(&self, id: TransferId) -> Option<&TransferRequest> {
        usize::try_from(id).ok().and_then(|i| self.transfers.get(i))
    }

    /// False for unknown ids
    pub fn has_approved(&self, id: TransferId, approver: &Identity) -> bool {
        self.get(id).is_some_and(|t| t.has_approved(approver))
    }

    /// Requests still waiting for approvals
    pub fn pending(&self) -> impl Iterator<Item = &TransferRequest> {
        self.transfers.iter().filter(|t| !t.is_sent())
    }

    pub fn stats(&self) -> LedgerStats {
        let sent = self.transfers.iter().filter(|t| t.is_sent()).count();
        LedgerStats {
            pending: self.transfers.len() - sent,
            sent,
        }
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}

fn ensure_approver(registry: &ApproverRegistry, caller: &Identity) -> Result<(), WalletError> {
    if registry.is_approver(caller) {
        Ok(())
    } else {
        tracing::debug!(caller = %caller, "Rejected call from non-approver");
        Err(WalletError::NotApprover(caller.clone()))
    }
}

/// Counts of requests by state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub pending: usize,
    pub sent: usize,
}
