//! SQLite storage for wallet snapshots
//!
//! The whole wallet (approvers, quorum, transfer log, pool) is written in one
//! transaction, so a snapshot on disk is always one the engine produced.

use crate::ledger::TransferLedger;
use crate::registry::ApproverRegistry;
use crate::transfer::{TransferId, TransferRequest};
use crate::wallet::Wallet;
use chrono::{DateTime, Utc};
use multisig_core::{Amount, Identity};
use multisig_funds::Pool;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Errors from the wallet store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt wallet data: {0}")]
    Corrupt(String),
}

/// SQLite storage for a single wallet
pub struct WalletStore {
    conn: Connection,
}

impl WalletStore {
    /// Open (or create) the store at the given database path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS wallet_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS approvers (
                position INTEGER PRIMARY KEY,
                identity TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS transfers (
                id INTEGER PRIMARY KEY,
                amount TEXT NOT NULL,
                to_identity TEXT NOT NULL,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL,
                sent_at TEXT
            );
            CREATE TABLE IF NOT EXISTS approvals (
                transfer_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                approver TEXT NOT NULL,
                PRIMARY KEY (transfer_id, position)
            );
            CREATE TABLE IF NOT EXISTS accounts (
                identity TEXT PRIMARY KEY,
                balance TEXT NOT NULL
            );",
        )?;

        Ok(())
    }

    /// True once a wallet snapshot has been saved
    pub fn is_initialized(&self) -> Result<bool, StoreError> {
        Ok(self.meta("quorum")?.is_some())
    }

    /// Replace the stored snapshot with `wallet`
    pub fn save(&mut self, wallet: &Wallet<Pool>) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;

        tx.execute_batch(
            "DELETE FROM wallet_meta;
             DELETE FROM approvers;
             DELETE FROM transfers;
             DELETE FROM approvals;
             DELETE FROM accounts;",
        )?;

        tx.execute(
            "INSERT INTO wallet_meta (key, value) VALUES ('quorum', ?1), ('pool_balance', ?2)",
            params![wallet.quorum().to_string(), wallet.balance().to_string()],
        )?;

        for (position, approver) in wallet.approvers().iter().enumerate() {
            tx.execute(
                "INSERT INTO approvers (position, identity) VALUES (?1, ?2)",
                params![position as i64, approver.as_str()],
            )?;
        }

        for transfer in wallet.ledger().transfers() {
            tx.execute(
                "INSERT INTO transfers (id, amount, to_identity, created_by, created_at, sent_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    transfer.id as i64,
                    transfer.amount.to_string(),
                    transfer.to.as_str(),
                    transfer.created_by.as_str(),
                    transfer.created_at.to_rfc3339(),
                    transfer.sent_at.map(|t| t.to_rfc3339()),
                ],
            )?;

            for (position, approver) in transfer.approvals().iter().enumerate() {
                tx.execute(
                    "INSERT INTO approvals (transfer_id, position, approver) VALUES (?1, ?2, ?3)",
                    params![transfer.id as i64, position as i64, approver.as_str()],
                )?;
            }
        }

        for (account, balance) in wallet.funds().accounts() {
            tx.execute(
                "INSERT INTO accounts (identity, balance) VALUES (?1, ?2)",
                params![account.as_str(), balance.to_string()],
            )?;
        }

        tx.commit()?;
        tracing::debug!(transfers = wallet.ledger().len(), "Wallet snapshot saved");
        Ok(())
    }

    /// Load the stored wallet, or None if nothing was saved yet
    pub fn load(&self) -> Result<Option<Wallet<Pool>>, StoreError> {
        let Some(quorum) = self.meta("quorum")? else {
            return Ok(None);
        };
        let quorum: u32 = quorum
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("quorum: {}", quorum)))?;

        let approvers = self
            .query_strings("SELECT identity FROM approvers ORDER BY position")?
            .iter()
            .map(|s| parse_identity(s))
            .collect::<Result<Vec<_>, _>>()?;
        let registry = ApproverRegistry::new(approvers, quorum)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        let transfers = self.load_transfers()?;
        for transfer in &transfers {
            check_transfer(&registry, transfer)?;
        }
        let ledger = TransferLedger::from_transfers(transfers);

        let pool_balance = match self.meta("pool_balance")? {
            Some(raw) => parse_amount(&raw)?,
            None => Amount::ZERO,
        };
        let pool = Pool::from_parts(pool_balance, self.load_accounts()?);

        Ok(Some(Wallet::from_parts(registry, ledger, pool)))
    }

    fn load_transfers(&self) -> Result<Vec<TransferRequest>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, to_identity, created_by, created_at, sent_at
             FROM transfers ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut transfers = Vec::with_capacity(rows.len());
        for (expected, (id, amount, to, created_by, created_at, sent_at)) in
            rows.into_iter().enumerate()
        {
            if id != expected as i64 {
                return Err(StoreError::Corrupt(format!(
                    "transfer ids not sequential: expected {}, got {}",
                    expected, id
                )));
            }
            let id = id as TransferId;

            transfers.push(TransferRequest::restore(
                id,
                parse_amount(&amount)?,
                parse_identity(&to)?,
                parse_identity(&created_by)?,
                self.load_approvals(id)?,
                parse_time(&created_at)?,
                sent_at.as_deref().map(parse_time).transpose()?,
            ));
        }

        Ok(transfers)
    }

    fn load_approvals(&self, id: TransferId) -> Result<Vec<Identity>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT approver FROM approvals WHERE transfer_id = ?1 ORDER BY position",
        )?;

        let approvers = stmt
            .query_map(params![id as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        approvers.iter().map(|s| parse_identity(s)).collect()
    }

    fn load_accounts(&self) -> Result<HashMap<Identity, Amount>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT identity, balance FROM accounts")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|(identity, balance)| {
                Ok::<_, StoreError>((parse_identity(identity)?, parse_amount(balance)?))
            })
            .collect()
    }

    fn meta(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM wallet_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn query_strings(&self, sql: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(values)
    }
}

fn parse_identity(raw: &str) -> Result<Identity, StoreError> {
    Identity::new(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// A stored request must be one the ledger could have produced
fn check_transfer(registry: &ApproverRegistry, transfer: &TransferRequest) -> Result<(), StoreError> {
    let corrupt = |reason: String| StoreError::Corrupt(format!("transfer {}: {}", transfer.id, reason));

    if transfer.amount.is_zero() {
        return Err(corrupt("zero amount".to_string()));
    }

    let mut seen = HashSet::new();
    for approver in transfer.approvals() {
        if !registry.is_approver(approver) {
            return Err(corrupt(format!("approval by non-approver {}", approver)));
        }
        if !seen.insert(approver) {
            return Err(corrupt(format!("duplicate approval by {}", approver)));
        }
    }

    let quorum_reached = transfer.approval_count() >= registry.quorum() as usize;
    if transfer.is_sent() != quorum_reached {
        return Err(corrupt(format!(
            "sent={} with {} of {} approvals",
            transfer.is_sent(),
            transfer.approval_count(),
            registry.quorum()
        )));
    }

    Ok(())
}

fn parse_amount(raw: &str) -> Result<Amount, StoreError> {
    raw.parse::<Amount>()
        .map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt(format!("invalid date: {}", raw)))
}
