//! Multisig Funds - The value-moving side of the wallet
//!
//! The approval engine never touches balances directly. It calls into a
//! [`FundsTransfer`] capability once a request reaches quorum, and that
//! capability either moves the whole amount or fails without side effects.
//!
//! [`Pool`] is the in-memory implementation used by the CLI and the tests.

pub mod error;
pub mod pool;

pub use error::FundsError;
pub use pool::{FundsTransfer, Pool};
