//! Application context - wires the wallet to its store

use multisig_funds::Pool;
use multisig_wallet::{StoreError, Wallet, WalletStore};
use std::path::{Path, PathBuf};

/// Application context - the loaded wallet and where it lives
pub struct AppContext {
    store: WalletStore,
    wallet: Option<Wallet<Pool>>,
    db_path: PathBuf,
}

impl AppContext {
    /// Open the data directory and load the wallet, if one was initialized
    pub fn new(data_path: impl AsRef<Path>) -> Result<Self, ContextError> {
        let data_path = data_path.as_ref();
        std::fs::create_dir_all(data_path)?;

        let db_path = data_path.join("wallet.db");
        let store = WalletStore::open(&db_path)?;
        let wallet = store.load()?;

        if let Some(ref w) = wallet {
            tracing::debug!(
                db = %db_path.display(),
                transfers = w.ledger().len(),
                "Wallet loaded"
            );
        }

        Ok(Self {
            store,
            wallet,
            db_path,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.wallet.is_some()
    }

    /// Install a freshly constructed wallet and persist it
    pub fn install(&mut self, wallet: Wallet<Pool>) -> Result<(), ContextError> {
        if self.wallet.is_some() {
            return Err(ContextError::AlreadyInitialized);
        }
        self.store.save(&wallet)?;
        self.wallet = Some(wallet);
        Ok(())
    }

    pub fn wallet(&self) -> Result<&Wallet<Pool>, ContextError> {
        self.wallet.as_ref().ok_or(ContextError::NotInitialized)
    }

    /// Apply `change` to a copy of the wallet, persist the copy, then make it
    /// current. A failed change or a failed save leaves the loaded wallet as it was.
    pub fn update<T, E>(
        &mut self,
        change: impl FnOnce(&mut Wallet<Pool>) -> Result<T, E>,
    ) -> Result<T, anyhow::Error>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut staged = self.wallet()?.clone();
        let result = change(&mut staged)?;
        self.store.save(&staged)?;
        self.wallet = Some(staged);
        Ok(result)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Errors while loading or saving the wallet
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Wallet not initialized (run `multisig init` first)")]
    NotInitialized,

    #[error("Wallet already initialized")]
    AlreadyInitialized,
}
