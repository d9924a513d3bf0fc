//! Multisig RPC - CLI orchestrator
//!
//! This crate provides the `multisig` binary and the command handlers it
//! dispatches to. Each invocation loads the wallet, runs one command, and
//! saves the result.

pub mod commands;
pub mod context;

pub use context::{AppContext, ContextError};
