//! Wallet configuration
//!
//! Describes a wallet deployment: who approves, how many must agree, and the
//! initial deposit. Loaded from a JSON file; missing fields take defaults.

use crate::error::RegistryError;
use crate::wallet::Wallet;
use multisig_core::{Amount, Identity};
use multisig_funds::{FundsError, Pool};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Funds(#[from] FundsError),
}

/// Deployment parameters for a wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Approver identities, in order
    #[serde(default = "default_approvers")]
    pub approvers: Vec<Identity>,

    /// Distinct approvals required to release a transfer
    #[serde(default = "default_quorum")]
    pub quorum: u32,

    /// Initial deposit credited to the pool by the first approver
    #[serde(default = "default_seed")]
    pub seed: Amount,
}

fn default_approvers() -> Vec<Identity> {
    ["APPROVER0", "APPROVER1", "APPROVER2"]
        .iter()
        .filter_map(|name| Identity::new(name).ok())
        .collect()
}

fn default_quorum() -> u32 {
    2
}

fn default_seed() -> Amount {
    Amount::from_units(10_000)
}

impl Default for WalletConfig {
    /// Three approvers, quorum 2, pool seeded with 10000
    fn default() -> Self {
        Self {
            approvers: default_approvers(),
            quorum: default_quorum(),
            seed: default_seed(),
        }
    }
}

impl WalletConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Construct the wallet and apply the seed deposit
    pub fn build(&self) -> Result<Wallet<Pool>, ConfigError> {
        let mut wallet = Wallet::new(self.approvers.clone(), self.quorum, Pool::new())?;

        if !self.seed.is_zero() {
            if let Some(depositor) = self.approvers.first() {
                wallet.funds_mut().deposit(depositor, self.seed)?;
            }
        }

        Ok(wallet)
    }
}
