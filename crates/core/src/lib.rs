//! Multisig Core - Domain types
//!
//! This crate contains the primitives shared by every multisig crate:
//! - `Amount`: Non-negative decimal wrapper for pooled and transferred funds
//! - `PositiveAmount`: Non-zero `Amount`, the size of a transfer request
//! - `Identity`: Validated identifier of an approver, depositor or recipient

pub mod amount;
pub mod identity;

pub use amount::{Amount, AmountError, PositiveAmount};
pub use identity::{Identity, IdentityError};
