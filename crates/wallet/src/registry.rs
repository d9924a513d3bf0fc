//! Approver registry - fixed membership and quorum

use crate::error::RegistryError;
use multisig_core::Identity;

/// The approvers of a wallet and how many of them must sign off.
///
/// # Invariant
/// `1 < quorum <= approvers.len()`. Enforced by [`ApproverRegistry::new`];
/// the registry is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproverRegistry {
    approvers: Vec<Identity>,
    quorum: u32,
}

impl ApproverRegistry {
    /// Validate and store the approver set.
    ///
    /// The upper bound is checked first: one approver with quorum 2 is
    /// `InvalidQuorum`, not `QuorumTooLow`. Duplicate identities are kept as given.
    pub fn new(approvers: Vec<Identity>, quorum: u32) -> Result<Self, RegistryError> {
        if quorum as usize > approvers.len() {
            return Err(RegistryError::InvalidQuorum {
                quorum,
                approvers: approvers.len(),
            });
        }

        if quorum <= 1 {
            return Err(RegistryError::QuorumTooLow { quorum });
        }

        Ok(Self { approvers, quorum })
    }

    pub fn is_approver(&self, identity: &Identity) -> bool {
        self.approvers.contains(identity)
    }

    /// Approvers in construction order
    pub fn approvers(&self) -> &[Identity] {
        &self.approvers
    }

    pub fn quorum(&self) -> u32 {
        self.quorum
    }
}
