//! CLI commands

use multisig_core::{Amount, Identity, PositiveAmount};
use multisig_funds::FundsTransfer;
use multisig_wallet::{ApprovalOutcome, TransferId, TransferView, WalletConfig};

use crate::context::AppContext;

/// Deploy the wallet described by `config`
pub fn init(ctx: &mut AppContext, config: &WalletConfig) -> Result<(), anyhow::Error> {
    if ctx.is_initialized() {
        anyhow::bail!("Wallet already initialized at {}", ctx.db_path().display());
    }

    let wallet = config.build()?;
    let balance = wallet.balance();
    ctx.install(wallet)?;

    println!(
        "✅ Wallet initialized: {} approvers, quorum {}, pool {}",
        config.approvers.len(),
        config.quorum,
        balance
    );
    Ok(())
}

/// Add funds to the pool. Anyone may deposit.
pub fn deposit(ctx: &mut AppContext, from: &Identity, amount: Amount) -> Result<Amount, anyhow::Error> {
    let balance = ctx.update(|wallet| wallet.funds_mut().deposit(from, amount))?;

    println!("✅ Deposited {} from {} (pool: {})", amount, from, balance);
    Ok(balance)
}

/// Create a transfer request as `caller`
pub fn create(
    ctx: &mut AppContext,
    caller: &Identity,
    amount: PositiveAmount,
    to: Identity,
) -> Result<TransferId, anyhow::Error> {
    let id = ctx.update(|wallet| wallet.create_transfer(amount, to.clone(), caller))?;

    println!("✅ Transfer #{} created: {} to {} (by {})", id, amount, to, caller);
    Ok(id)
}

/// Approve transfer `id` as `caller`
pub fn approve(
    ctx: &mut AppContext,
    caller: &Identity,
    id: TransferId,
) -> Result<ApprovalOutcome, anyhow::Error> {
    let outcome = ctx.update(|wallet| wallet.approve_transfer(id, caller))?;

    match outcome {
        ApprovalOutcome::Pending {
            approvals,
            remaining,
        } => {
            println!(
                "✅ Transfer #{} approved by {} ({} approvals, {} more needed)",
                id, caller, approvals, remaining
            );
        }
        ApprovalOutcome::Sent => {
            let wallet = ctx.wallet()?;
            println!(
                "✅ Transfer #{} approved by {}: quorum reached, funds sent (pool: {})",
                id,
                caller,
                wallet.balance()
            );
        }
    }

    Ok(outcome)
}

/// List the transfer log
pub fn transfers(ctx: &AppContext, json: bool) -> Result<Vec<TransferView>, anyhow::Error> {
    let views = ctx.wallet()?.get_transfers();

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(views);
    }

    if views.is_empty() {
        println!("No transfers found");
        return Ok(views);
    }

    println!("Transfers ({}):", views.len());
    println!("{:-<64}", "");
    println!(
        "{:>6} | {:>14} | {:>16} | {:>9} | {:>7}",
        "ID", "Amount", "To", "Approvals", "Status"
    );
    println!("{:-<64}", "");

    for view in &views {
        println!(
            "{:>6} | {:>14} | {:>16} | {:>9} | {:>7}",
            view.id,
            view.amount,
            view.to,
            view.approvals,
            if view.sent { "sent" } else { "pending" },
        );
    }

    Ok(views)
}

/// Show approvers and quorum
pub fn approvers(ctx: &AppContext) -> Result<(), anyhow::Error> {
    let wallet = ctx.wallet()?;

    println!(
        "Approvers ({}), quorum {}:",
        wallet.approvers().len(),
        wallet.quorum()
    );
    for (position, approver) in wallet.approvers().iter().enumerate() {
        println!("  [{}] {}", position, approver);
    }

    Ok(())
}

/// Show the pool balance, or what an account has received from the pool
pub fn balance(ctx: &AppContext, account: Option<&Identity>) -> Result<Amount, anyhow::Error> {
    let wallet = ctx.wallet()?;

    let amount = match account {
        Some(account) => {
            let received = wallet.funds().balance_of(account);
            println!("Balance for {}: {}", account, received);
            received
        }
        None => {
            let pool = wallet.funds().balance();
            println!("Pool balance: {}", pool);
            pool
        }
    };

    Ok(amount)
}
