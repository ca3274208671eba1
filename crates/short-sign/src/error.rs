//! Error types for short token operations.

use thiserror::Error;

/// Boxed error returned by caller-supplied checksum functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while issuing tokens or converting between radixes.
///
/// An expired or forged token is not an error: decoding and verification
/// report those as `None`.
#[derive(Debug, Error)]
pub enum SignError {
    /// Credential id is empty.
    #[error("Missing id")]
    MissingId,

    /// Credential secret is empty.
    #[error("Missing secret")]
    MissingSecret,

    /// Id contains something other than decimal digits.
    #[error("Invalid id '{0}': only decimal digits are allowed")]
    NonDecimalId(String),

    /// Id does not fit into the id field of the layout.
    #[error("Id '{id}' does not fit into {width} digits")]
    IdTooWide { id: String, width: u32 },

    /// A digit group is narrower than the protocol minimum.
    #[error("Invalid {field} digits: expected at least {min}, got {got}")]
    DigitsTooNarrow {
        field: &'static str,
        min: u32,
        got: u32,
    },

    /// A digit group is wider than the protocol allows.
    #[error("Invalid {field} digits: expected at most {max}, got {got}")]
    DigitsTooWide {
        field: &'static str,
        max: u32,
        got: u32,
    },

    /// Alphabet is too short or repeats a symbol.
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// Input contains a symbol missing from the source alphabet.
    #[error("Unknown symbol '{0}' for source alphabet")]
    UnknownSymbol(char),

    /// Radix is outside `2..=alphabet length`.
    #[error("Invalid radix {radix} for an alphabet of {len} symbols")]
    InvalidRadix { radix: usize, len: usize },

    /// Hash name is not one of the built-in digests.
    #[error("Unknown hash algorithm '{0}'")]
    UnknownHashAlgorithm(String),

    /// HMAC construction rejected the key.
    #[error("Invalid HMAC key")]
    InvalidKey,

    /// A custom checksum function failed.
    #[error("Checksum function failed: {0}")]
    Hash(#[source] BoxError),
}

/// Result type alias for short token operations.
pub type Result<T> = std::result::Result<T, SignError>;
