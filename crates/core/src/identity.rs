//! Identity - Validated identifier of a wallet participant
//!
//! Approvers, depositors and recipients are all identified the same way.
//! Identities are normalized to upper case, so `alice` and `ALICE` compare equal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum identity length in characters
pub const MAX_IDENTITY_LEN: usize = 64;

/// Errors that can occur when parsing an identity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Empty identity")]
    Empty,

    #[error("Identity too long (max 64 chars): {0}")]
    TooLong(String),

    #[error("Invalid identity format: {0}")]
    InvalidFormat(String),
}

/// Identity of an approver or account
///
/// # Examples
/// ```
/// use multisig_core::Identity;
///
/// let alice: Identity = "alice".parse().unwrap();
/// assert_eq!(alice.as_str(), "ALICE");
///
/// assert!("".parse::<Identity>().is_err());
/// assert!("bad id".parse::<Identity>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityError> {
        let raw = raw.as_ref().trim();

        if raw.is_empty() {
            return Err(IdentityError::Empty);
        }
        if raw.chars().count() > MAX_IDENTITY_LEN {
            return Err(IdentityError::TooLong(raw.to_string()));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.'))
        {
            return Err(IdentityError::InvalidFormat(raw.to_string()));
        }

        Ok(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_normalized() {
        let a: Identity = "  alice ".parse().unwrap();
        let b: Identity = "ALICE".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "ALICE");
    }

    #[test]
    fn test_identity_allows_address_like_values() {
        let id = Identity::new("0xAbC123").unwrap();
        assert_eq!(id.as_str(), "0XABC123");
        assert!(Identity::new("acct:ops.cold-1").is_ok());
    }

    #[test]
    fn test_identity_rejections() {
        assert_eq!(Identity::new("   "), Err(IdentityError::Empty));
        assert!(matches!(
            Identity::new("a".repeat(MAX_IDENTITY_LEN + 1)),
            Err(IdentityError::TooLong(_))
        ));
        assert!(matches!(
            Identity::new("bob smith"),
            Err(IdentityError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_identity_serde() {
        let id = Identity::new("bob").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"BOB\"");
        let bad: Result<Identity, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
