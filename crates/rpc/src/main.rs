//! Multisig CLI - Main entry point

use clap::{Parser, Subcommand};
use multisig_core::{Amount, Identity, PositiveAmount};
use multisig_rpc::{commands, AppContext};
use multisig_wallet::{TransferId, WalletConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisig")]
#[command(about = "Multisig - Threshold-approval custody wallet", long_about = None)]
struct Cli {
    /// Data directory path (defaults to $MULTISIG_DATA, then ./data)
    #[arg(short, long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the wallet: approvers, quorum and initial deposit
    Init {
        /// JSON config file (approvers, quorum, seed)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Approver identity (repeat for each approver, in order)
        #[arg(long = "approver")]
        approvers: Vec<Identity>,
        /// Distinct approvals required per transfer
        #[arg(long)]
        quorum: Option<u32>,
        /// Initial deposit, credited by the first approver
        #[arg(long)]
        seed: Option<Amount>,
    },

    /// Deposit funds into the pool
    Deposit {
        /// Depositor identity
        from: Identity,
        /// Amount to deposit
        amount: Amount,
    },

    /// Create a transfer request
    Create {
        /// Amount to transfer (must be positive)
        amount: PositiveAmount,
        /// Destination identity
        to: Identity,
        /// Calling approver
        #[arg(long = "as")]
        caller: Identity,
    },

    /// Approve a transfer request
    Approve {
        /// Transfer id
        id: TransferId,
        /// Calling approver
        #[arg(long = "as")]
        caller: Identity,
    },

    /// List all transfer requests
    Transfers {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List approvers and quorum
    Approvers,

    /// Show the pool balance, or an account's received balance
    Balance {
        /// Account identity
        account: Option<Identity>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let data_path = cli
        .data
        .or_else(|| std::env::var_os("MULTISIG_DATA").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("./data"));

    let mut ctx = AppContext::new(&data_path)?;

    match cli.command {
        Commands::Init {
            config,
            approvers,
            quorum,
            seed,
        } => {
            let mut wallet_config = match config {
                Some(path) => WalletConfig::from_file(path)?,
                None => WalletConfig::default(),
            };
            if !approvers.is_empty() {
                wallet_config.approvers = approvers;
            }
            if let Some(quorum) = quorum {
                wallet_config.quorum = quorum;
            }
            if let Some(seed) = seed {
                wallet_config.seed = seed;
            }

            commands::init(&mut ctx, &wallet_config)?;
        }

        Commands::Deposit { from, amount } => {
            commands::deposit(&mut ctx, &from, amount)?;
        }

        Commands::Create { amount, to, caller } => {
            commands::create(&mut ctx, &caller, amount, to)?;
        }

        Commands::Approve { id, caller } => {
            commands::approve(&mut ctx, &caller, id)?;
        }

        Commands::Transfers { json } => {
            commands::transfers(&ctx, json)?;
        }

        Commands::Approvers => {
            commands::approvers(&ctx)?;
        }

        Commands::Balance { account } => {
            commands::balance(&ctx, account.as_ref())?;
        }
    }

    Ok(())
}
