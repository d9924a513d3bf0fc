//! Wallet - one explicit custody instance

use crate::error::{RegistryError, WalletError};
use crate::ledger::{LedgerStats, TransferLedger};
use crate::registry::ApproverRegistry;
use crate::transfer::{ApprovalOutcome, TransferId, TransferRequest, TransferView};
use multisig_core::{Amount, Identity, PositiveAmount};
use multisig_funds::FundsTransfer;

/// Approver registry, transfer log and the funds they control.
///
/// Every call takes the caller identity explicitly. Independent wallets share
/// nothing and can coexist in one process.
#[derive(Debug, Clone)]
pub struct Wallet<F> {
    registry: ApproverRegistry,
    ledger: TransferLedger,
    funds: F,
}

impl<F: FundsTransfer> Wallet<F> {
    /// Construct a wallet. Fails with `InvalidQuorum` or `QuorumTooLow`.
    pub fn new(approvers: Vec<Identity>, quorum: u32, funds: F) -> Result<Self, RegistryError> {
        let registry = ApproverRegistry::new(approvers, quorum)?;
        tracing::info!(
            approvers = registry.approvers().len(),
            quorum,
            "Wallet created"
        );

        Ok(Self {
            registry,
            ledger: TransferLedger::new(),
            funds,
        })
    }

    /// Reassemble a wallet from already-validated parts
    pub(crate) fn from_parts(registry: ApproverRegistry, ledger: TransferLedger, funds: F) -> Self {
        Self {
            registry,
            ledger,
            funds,
        }
    }

    pub fn create_transfer(
        &mut self,
        amount: PositiveAmount,
        to: Identity,
        caller: &Identity,
    ) -> Result<TransferId, WalletError> {
        self.ledger
            .create_transfer(&self.registry, amount, to, caller)
    }

    pub fn approve_transfer(
        &mut self,
        id: TransferId,
        caller: &Identity,
    ) -> Result<ApprovalOutcome, WalletError> {
        self.ledger
            .approve_transfer(&self.registry, id, caller, &mut self.funds)
    }

    pub fn get_transfers(&self) -> Vec<TransferView> {
        self.ledger.get_transfers()
    }

    pub fn get_transfer(&self, id: TransferId) -> Option<&TransferRequest> {
        self.ledger.get(id)
    }

    pub fn has_approved(&self, id: TransferId, approver: &Identity) -> bool {
        self.ledger.has_approved(id, approver)
    }

    pub fn stats(&self) -> LedgerStats {
        self.ledger.stats()
    }

    pub fn approvers(&self) -> &[Identity] {
        self.registry.approvers()
    }

    pub fn quorum(&self) -> u32 {
        self.registry.quorum()
    }

    pub fn is_approver(&self, identity: &Identity) -> bool {
        self.registry.is_approver(identity)
    }

    pub fn registry(&self) -> &ApproverRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &TransferLedger {
        &self.ledger
    }

    /// Pooled balance as reported by the funds capability
    pub fn balance(&self) -> Amount {
        self.funds.balance()
    }

    pub fn funds(&self) -> &F {
        &self.funds
    }

    /// Mutable access for the deposit path, which is open to anyone
    pub fn funds_mut(&mut self) -> &mut F {
        &mut self.funds
    }
}
