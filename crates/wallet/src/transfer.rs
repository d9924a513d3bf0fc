//! Transfer request data structures

use chrono::{DateTime, Utc};
use multisig_core::{Amount, Identity};
use serde::{Deserialize, Serialize};

/// Sequential transfer id, assigned from 0 in creation order
pub type TransferId = u64;

/// A request to move funds out of the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    pub id: TransferId,

    pub amount: Amount,

    /// Destination; need not be an approver
    pub to: Identity,

    /// Approver who created the request
    pub created_by: Identity,

    /// Approvers who signed off, in approval order, no repeats
    approvals: Vec<Identity>,

    /// Set once, when the approval count reaches quorum
    sent: bool,

    pub created_at: DateTime<Utc>,

    pub sent_at: Option<DateTime<Utc>>,
}

impl TransferRequest {
    pub fn new(id: TransferId, amount: Amount, to: Identity, created_by: Identity) -> Self {
        Self {
            id,
            amount,
            to,
            created_by,
            approvals: Vec::new(),
            sent: false,
            created_at: Utc::now(),
            sent_at: None,
        }
    }

    /// Rebuild a request from storage
    pub(crate) fn restore(
        id: TransferId,
        amount: Amount,
        to: Identity,
        created_by: Identity,
        approvals: Vec<Identity>,
        created_at: DateTime<Utc>,
        sent_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            amount,
            to,
            created_by,
            approvals,
            sent: sent_at.is_some(),
            created_at,
            sent_at,
        }
    }

    pub fn approvals(&self) -> &[Identity] {
        &self.approvals
    }

    pub fn approval_count(&self) -> usize {
        self.approvals.len()
    }

    pub fn has_approved(&self, approver: &Identity) -> bool {
        self.approvals.contains(approver)
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }

    /// Approvals still needed before dispatch
    pub fn remaining(&self, quorum: u32) -> usize {
        (quorum as usize).saturating_sub(self.approvals.len())
    }

    /// Record an approval (returns false if this approver already signed)
    pub(crate) fn add_approval(&mut self, approver: Identity) -> bool {
        if self.has_approved(&approver) {
            return false;
        }

        self.approvals.push(approver);
        true
    }

    pub(crate) fn mark_sent(&mut self) {
        self.sent = true;
        self.sent_at = Some(Utc::now());
    }

    pub fn view(&self) -> TransferView {
        TransferView {
            id: self.id,
            amount: self.amount,
            approvals: self.approvals.len(),
            to: self.to.clone(),
            sent: self.sent,
        }
    }
}

/// Caller-facing projection of a transfer request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferView {
    pub id: TransferId,
    pub amount: Amount,
    pub approvals: usize,
    pub to: Identity,
    pub sent: bool,
}

/// Result of a successful approval call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// Recorded; quorum not reached yet
    Pending { approvals: usize, remaining: usize },
    /// This approval completed the quorum and the funds were dispatched
    Sent,
}

impl ApprovalOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ApprovalOutcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    fn request() -> TransferRequest {
        TransferRequest::new(0, Amount::from_units(100), id("x"), id("alice"))
    }

    #[test]
    fn test_new_request_is_pending() {
        let req = request();
        assert_eq!(req.approval_count(), 0);
        assert!(!req.is_sent());
        assert!(req.sent_at.is_none());
        assert_eq!(req.remaining(2), 2);
    }

    #[test]
    fn test_duplicate_approval_not_counted() {
        let mut req = request();
        assert!(req.add_approval(id("bob")));
        assert!(!req.add_approval(id("BOB")));
        assert_eq!(req.approval_count(), 1);
        assert_eq!(req.remaining(2), 1);
    }

    #[test]
    fn test_view_projection() {
        let mut req = request();
        req.add_approval(id("bob"));
        req.add_approval(id("carol"));
        req.mark_sent();

        let view = req.view();
        assert_eq!(view.id, 0);
        assert_eq!(view.amount, Amount::from_units(100));
        assert_eq!(view.approvals, 2);
        assert_eq!(view.to, id("x"));
        assert!(view.sent);
        assert_eq!(req.remaining(2), 0);
    }
}
