//! Stateless short tokens made of decimal digits.
//!
//! A token packs three fixed-width digit groups:
//!
//! ```text
//! timestamp shot (6) | zero-padded id (8) | checksum (4)
//! ```
//!
//! The checksum is a truncated (HMAC-)digest over the id, the issue time and
//! the id's secret, so a verifier only needs to look the secret up by id.
//! Nothing is stored on issue and tokens expire on their own.
//!
//! This crate provides functionality for:
//! - Converting digit strings between arbitrary alphabets ([`change_radix`])
//! - Issuing tokens ([`encode`])
//! - Decoding tokens without verifying them ([`decode`])
//! - Verifying tokens against credentials from a sync or async directory
//!   ([`find_one`], [`find_one_async`])
//!
//! # Example
//!
//! ```rust
//! use short_sign::{Credential, Lookup, SignConfig, VerifyConfig, encode, find_one};
//!
//! let config = SignConfig::default();
//! let credential = Credential::new(12345678, "s3cret");
//! let token = encode(&credential, &config).unwrap();
//! assert_eq!(token.token.len(), 18);
//!
//! // Later, look the secret up by the id carried in the token.
//! let directory = |id: &str| {
//!     assert_eq!(id, "12345678");
//!     Lookup::One(Credential::new(12345678, "s3cret"))
//! };
//! let verify = VerifyConfig::new(config, 60);
//! let found = find_one(&token.token, &verify, &directory)
//!     .unwrap()
//!     .into_ready()
//!     .unwrap();
//! assert_eq!(found, Some(credential));
//! ```

mod config;
mod data;
mod error;
mod hash;
mod parse;
mod radix;
mod timestamp;
mod token;
mod verify;

// Public re-exports
pub use config::{
    DigitLayout, MAX_CHECKSUM_DIGITS, MAX_ID_DIGITS, MAX_TIMESTAMP_DIGITS, MIN_DIGITS,
    RadixPreprocessing, SignConfig, VerifyConfig,
};
pub use data::{Credential, DecodedToken, canonical_id};
pub use error::{BoxError, Result, SignError};
pub use hash::{ChecksumFn, HashAlgorithm, compute_checksum};
pub use parse::{TokenParts, decode, decode_at, split};
pub use radix::{
    Alphabet, BASE64_SYMBOLS, BASE64_URL_SYMBOLS, DECIMAL_SYMBOLS, HEX_SYMBOLS, change_radix,
    change_radix_int, pad_start,
};
pub use timestamp::{decode_shot, encode_shot, now_secs};
pub use token::{SignedToken, assemble, encode, encode_at};
pub use verify::{
    AsyncCredentialLookup, CredentialLookup, Lookup, Verification, find_one, find_one_async,
    find_one_async_at, find_one_at,
};
