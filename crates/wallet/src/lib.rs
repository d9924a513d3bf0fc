//! # Multisig Wallet
//!
//! Threshold-approval custody: a fixed set of approvers jointly controls a
//! pooled balance, and every withdrawal needs a quorum of distinct approvals.
//!
//! ## Components
//! - [`ApproverRegistry`]: membership and quorum, validated once at construction
//! - [`TransferLedger`]: append-only log of transfer requests and the
//!   `Pending -> Sent` state machine
//! - [`Wallet`]: one explicit instance tying both to a funds capability
//! - [`WalletStore`]: SQLite snapshot storage
//!
//! ## Quorum dispatch
//! The approval that completes the quorum dispatches the funds in the same
//! call. If the dispatch fails, the approval is not recorded.

mod config;
mod error;
mod ledger;
mod registry;
mod store;
mod transfer;
mod wallet;

pub use config::{ConfigError, WalletConfig};
pub use error::{RegistryError, WalletError};
pub use ledger::{LedgerStats, TransferLedger};
pub use registry::ApproverRegistry;
pub use store::{StoreError, WalletStore};
pub use transfer::{ApprovalOutcome, TransferId, TransferRequest, TransferView};
pub use wallet::Wallet;
