//! Credential and decoded token types.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, SignError};

/// An `{id, secret}` pair owned by the caller's directory.
///
/// The secret is cleared from memory when the credential is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    #[zeroize(skip)]
    id: String,
    secret: String,
}

impl Credential {
    /// Create a credential from any integer or string id and secret.
    pub fn new(id: impl fmt::Display, secret: impl fmt::Display) -> Self {
        Self {
            id: id.to_string(),
            secret: secret.to_string(),
        }
    }

    /// The id as given.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// The id without leading zeros, `"0"` for an all-zero id.
    ///
    /// Checksums are computed over this form so zero padding never changes a
    /// token.
    pub fn canonical_id(&self) -> &str {
        canonical_id(&self.id)
    }

    /// Reject ids with non-decimal characters, and ids or secrets that are
    /// empty or zero.
    ///
    /// A numeric `0` and the string `"0"` both reach this point as `"0"`, so
    /// both count as missing.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(SignError::MissingId);
        }
        if self.secret.is_empty() || self.secret == "0" {
            return Err(SignError::MissingSecret);
        }
        if !self.id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SignError::NonDecimalId(self.id.clone()));
        }
        if self.canonical_id() == "0" {
            return Err(SignError::MissingId);
        }
        Ok(())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Strip leading zeros from a decimal id.
pub fn canonical_id(id: &str) -> &str {
    match id.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

/// Parsed contents of a token whose timestamp is inside the validity window.
///
/// The checksum has not been verified yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedToken {
    /// Canonical id (no zero padding).
    pub id: String,
    /// Absolute epoch seconds the token was issued at.
    pub timestamp: u64,
    /// Checksum digits as carried by the token.
    pub checksum: String,
}
