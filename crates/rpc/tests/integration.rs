//! Integration tests for the multisig wallet
//!
//! These tests drive the command layer against a real data directory, so
//! every step goes through the SQLite store and back.

use multisig_core::{Amount, AmountError, Identity, PositiveAmount};
use multisig_funds::FundsError;
use multisig_rpc::{commands, AppContext};
use multisig_wallet::{ApprovalOutcome, ConfigError, RegistryError, WalletConfig, WalletError};
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn id(s: &str) -> Identity {
    Identity::new(s).unwrap()
}

fn amount(val: u64) -> Amount {
    Amount::from_units(val)
}

fn positive(val: u64) -> PositiveAmount {
    PositiveAmount::new(amount(val)).unwrap()
}

/// Three approvers, quorum 2, pool seeded with 1000
fn config() -> WalletConfig {
    WalletConfig {
        approvers: vec![id("acct0"), id("acct1"), id("acct2")],
        quorum: 2,
        seed: amount(1000),
    }
}

fn wallet_error(err: &anyhow::Error) -> &WalletError {
    err.downcast_ref::<WalletError>()
        .expect("expected a wallet error")
}

/// Test: create → approve → approve (dispatch) → approve (rejected)
#[test]
fn test_end_to_end_quorum_release() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::new(temp_dir.path()).unwrap();
    commands::init(&mut ctx, &config()).unwrap();

    // 1. Approver 0 creates a transfer of 100 to X
    let tid = commands::create(&mut ctx, &id("acct0"), positive(100), id("x")).unwrap();
    assert_eq!(tid, 0);

    let transfers = commands::transfers(&ctx, false).unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].approvals, 0);
    assert!(!transfers[0].sent);

    // 2. Approver 1 approves: still pending
    let outcome = commands::approve(&mut ctx, &id("acct1"), tid).unwrap();
    assert_eq!(outcome, ApprovalOutcome::Pending { approvals: 1, remaining: 1 });
    let transfers = commands::transfers(&ctx, false).unwrap();
    assert_eq!(transfers[0].approvals, 1);
    assert!(!transfers[0].sent);

    // 3. Approver 2 approves: quorum reached, funds move
    let outcome = commands::approve(&mut ctx, &id("acct2"), tid).unwrap();
    assert!(outcome.is_sent());
    let transfers = commands::transfers(&ctx, false).unwrap();
    assert_eq!(transfers[0].approvals, 2);
    assert!(transfers[0].sent);

    assert_eq!(commands::balance(&ctx, None).unwrap().value(), dec!(900));
    assert_eq!(commands::balance(&ctx, Some(&id("x"))).unwrap().value(), dec!(100));

    // 4. Approver 0 is too late
    let err = commands::approve(&mut ctx, &id("acct0"), tid).unwrap_err();
    assert_eq!(wallet_error(&err), &WalletError::AlreadySent(0));
}

/// Test: state survives across invocations
#[test]
fn test_state_persists_between_contexts() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut ctx = AppContext::new(temp_dir.path()).unwrap();
        commands::init(&mut ctx, &config()).unwrap();
        commands::create(&mut ctx, &id("acct0"), positive(100), id("x")).unwrap();
        commands::approve(&mut ctx, &id("acct1"), 0).unwrap();
    }

    // A new process sees the pending approval
    let mut ctx = AppContext::new(temp_dir.path()).unwrap();
    assert!(ctx.is_initialized());
    assert!(ctx.wallet().unwrap().has_approved(0, &id("acct1")));

    let err = commands::approve(&mut ctx, &id("acct1"), 0).unwrap_err();
    assert!(matches!(
        wallet_error(&err),
        WalletError::DuplicateApproval { id: 0, .. }
    ));

    commands::approve(&mut ctx, &id("acct2"), 0).unwrap();

    let ctx = AppContext::new(temp_dir.path()).unwrap();
    let wallet = ctx.wallet().unwrap();
    assert!(wallet.get_transfers()[0].sent);
    assert_eq!(wallet.balance(), amount(900));
}

/// Test: non-approvers cannot create or approve
#[test]
fn test_non_approver_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::new(temp_dir.path()).unwrap();
    commands::init(&mut ctx, &config()).unwrap();

    let err = commands::create(&mut ctx, &id("acct3"), positive(100), id("x")).unwrap_err();
    assert_eq!(wallet_error(&err), &WalletError::NotApprover(id("acct3")));
    assert!(commands::transfers(&ctx, false).unwrap().is_empty());

    commands::create(&mut ctx, &id("acct0"), positive(100), id("x")).unwrap();
    let err = commands::approve(&mut ctx, &id("acct3"), 0).unwrap_err();
    assert_eq!(wallet_error(&err), &WalletError::NotApprover(id("acct3")));
    assert_eq!(commands::transfers(&ctx, false).unwrap()[0].approvals, 0);
}

/// Test: unknown transfer id
#[test]
fn test_approve_unknown_transfer() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::new(temp_dir.path()).unwrap();
    commands::init(&mut ctx, &config()).unwrap();

    let err = commands::approve(&mut ctx, &id("acct0"), 3).unwrap_err();
    assert_eq!(wallet_error(&err), &WalletError::NotFound(3));
}

/// Test: a dispatch the pool cannot cover fails atomically and is retryable
#[test]
fn test_insufficient_pool_rolls_back() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::new(temp_dir.path()).unwrap();
    commands::init(&mut ctx, &config()).unwrap();

    commands::create(&mut ctx, &id("acct0"), positive(1500), id("x")).unwrap();
    commands::approve(&mut ctx, &id("acct0"), 0).unwrap();

    let err = commands::approve(&mut ctx, &id("acct1"), 0).unwrap_err();
    assert_eq!(
        wallet_error(&err),
        &WalletError::Funds(FundsError::InsufficientFunds {
            available: amount(1000),
            required: amount(1500),
        })
    );

    // Nothing was recorded, in memory or on disk
    let reloaded = AppContext::new(temp_dir.path()).unwrap();
    for c in [&ctx, &reloaded] {
        let wallet = c.wallet().unwrap();
        assert_eq!(wallet.get_transfers()[0].approvals, 1);
        assert!(!wallet.get_transfers()[0].sent);
        assert!(!wallet.has_approved(0, &id("acct1")));
        assert_eq!(wallet.balance(), amount(1000));
    }

    // Anyone may top up the pool, then the approval goes through
    commands::deposit(&mut ctx, &id("outsider"), amount(500)).unwrap();
    let outcome = commands::approve(&mut ctx, &id("acct1"), 0).unwrap();
    assert!(outcome.is_sent());
    assert!(commands::balance(&ctx, None).unwrap().is_zero());
    assert_eq!(commands::balance(&ctx, Some(&id("x"))).unwrap(), amount(1500));
}

/// Test: construction errors, including the one-approver boundary
#[test]
fn test_init_rejects_bad_quorum() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::new(temp_dir.path()).unwrap();

    let too_high = WalletConfig { quorum: 5, ..config() };
    let err = commands::init(&mut ctx, &too_high).unwrap_err();
    assert!(err.to_string().contains("only 3 approvers"));

    let too_low = WalletConfig { quorum: 1, ..config() };
    let err = commands::init(&mut ctx, &too_low).unwrap_err();
    assert!(err.to_string().contains("at least 2"));

    let single = WalletConfig {
        approvers: vec![id("acct0")],
        quorum: 2,
        seed: Amount::ZERO,
    };
    let err = commands::init(&mut ctx, &single).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Registry(RegistryError::InvalidQuorum {
            quorum: 2,
            approvers: 1
        }))
    ));

    // No wallet was created by the failed attempts
    assert!(!ctx.is_initialized());
    assert!(!AppContext::new(temp_dir.path()).unwrap().is_initialized());
}

/// Test: init only once, and commands require init
#[test]
fn test_init_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::new(temp_dir.path()).unwrap();

    assert!(commands::transfers(&ctx, false).is_err());

    commands::init(&mut ctx, &config()).unwrap();
    assert!(commands::init(&mut ctx, &config()).is_err());

    let wallet = ctx.wallet().unwrap();
    assert_eq!(wallet.approvers(), &[id("acct0"), id("acct1"), id("acct2")]);
    assert_eq!(wallet.quorum(), 2);
}

/// Test: ids follow creation order and views echo the request
#[test]
fn test_sequential_transfer_ids() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::new(temp_dir.path()).unwrap();
    commands::init(&mut ctx, &config()).unwrap();

    for (expected, creator) in ["acct0", "acct1", "acct2"].iter().enumerate() {
        let tid = commands::create(&mut ctx, &id(creator), positive(10 + expected as u64), id("dest"))
            .unwrap();
        assert_eq!(tid, expected as u64);
    }

    let transfers = commands::transfers(&ctx, true).unwrap();
    assert_eq!(transfers.len(), 3);
    for (i, view) in transfers.iter().enumerate() {
        assert_eq!(view.id, i as u64);
        assert_eq!(view.amount, amount(10 + i as u64));
        assert_eq!(view.to, id("dest"));
        assert_eq!(view.approvals, 0);
        assert!(!view.sent);
    }
}

/// Test: a zero transfer cannot be requested, from the command line or the API
#[test]
fn test_zero_amount_transfer_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = AppContext::new(temp_dir.path()).unwrap();
    commands::init(&mut ctx, &config()).unwrap();

    assert!(matches!(
        "0".parse::<PositiveAmount>(),
        Err(AmountError::NotPositive(_))
    ));
    assert!(PositiveAmount::try_from(Amount::ZERO).is_err());

    // The log is untouched and the next real request still gets id 0
    assert!(commands::transfers(&ctx, false).unwrap().is_empty());
    let tid = commands::create(&mut ctx, &id("acct0"), positive(1), id("x")).unwrap();
    assert_eq!(tid, 0);
}
