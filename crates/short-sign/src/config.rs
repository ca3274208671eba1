//! Configuration for token issuance and verification.

use serde::Deserialize;

use crate::error::{Result, SignError};
use crate::hash::HashAlgorithm;
use crate::radix::Alphabet;

/// Narrowest digit group the protocol accepts.
pub const MIN_DIGITS: u32 = 3;

/// Widest timestamp group; `10^18` still fits a signed 64-bit epoch.
pub const MAX_TIMESTAMP_DIGITS: u32 = 18;

/// Widest id group.
pub const MAX_ID_DIGITS: u32 = 32;

/// Widest checksum group; a SHA-512 digest has 128 hex characters.
pub const MAX_CHECKSUM_DIGITS: u32 = 128;

/// Widths of the three digit groups of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DigitLayout {
    pub timestamp: u32,
    pub id: u32,
    pub checksum: u32,
}

impl Default for DigitLayout {
    fn default() -> Self {
        Self {
            timestamp: 6,
            id: 8,
            checksum: 4,
        }
    }
}

impl DigitLayout {
    pub fn new(timestamp: u32, id: u32, checksum: u32) -> Self {
        Self {
            timestamp,
            id,
            checksum,
        }
    }

    /// Length of every token built with this layout.
    pub fn total(&self) -> usize {
        (self.timestamp as usize)
            .saturating_add(self.id as usize)
            .saturating_add(self.checksum as usize)
    }

    /// Check every group against the protocol limits.
    pub fn validate(&self) -> Result<()> {
        for (field, got, max) in [
            ("timestamp", self.timestamp, MAX_TIMESTAMP_DIGITS),
            ("id", self.id, MAX_ID_DIGITS),
            ("checksum", self.checksum, MAX_CHECKSUM_DIGITS),
        ] {
            if got < MIN_DIGITS {
                return Err(SignError::DigitsTooNarrow {
                    field,
                    min: MIN_DIGITS,
                    got,
                });
            }
            if got > max {
                return Err(SignError::DigitsTooWide { field, max, got });
            }
        }
        Ok(())
    }
}

/// Configuration for issuing tokens.
#[derive(Debug, Clone)]
pub struct SignConfig {
    /// Digit group widths.
    pub layout: DigitLayout,
    /// Digest used for the checksum.
    pub hash: HashAlgorithm,
    /// Key the digest with the secret instead of appending the secret to the
    /// message.
    pub hmac: bool,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            layout: DigitLayout::default(),
            hash: HashAlgorithm::Md5,
            hmac: true,
        }
    }
}

impl SignConfig {
    /// Create a config with the default layout, MD5 and HMAC enabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: DigitLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_hmac(mut self, hmac: bool) -> Self {
        self.hmac = hmac;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()
    }
}

/// Alphabet substitution to undo before a token is split.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RadixPreprocessing {
    /// Alphabet the presented token is written in.
    pub from: Alphabet,
    /// Alphabet the token is converted back into, usually decimal.
    pub to: Alphabet,
}

impl RadixPreprocessing {
    pub fn new(from: Alphabet, to: Alphabet) -> Self {
        Self { from, to }
    }
}

/// Configuration for decoding and verifying tokens.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Must match the config the token was issued with.
    pub sign: SignConfig,
    /// Validity window in seconds.
    pub expires_in: u64,
    pub preprocess: Option<RadixPreprocessing>,
}

impl VerifyConfig {
    pub fn new(sign: SignConfig, expires_in: u64) -> Self {
        Self {
            sign,
            expires_in,
            preprocess: None,
        }
    }

    pub fn with_preprocessing(mut self, preprocess: RadixPreprocessing) -> Self {
        self.preprocess = Some(preprocess);
        self
    }

    pub fn layout(&self) -> &DigitLayout {
        &self.sign.layout
    }
}
