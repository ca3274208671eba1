//! Token issuance.

use std::fmt;

use crate::config::SignConfig;
use crate::data::Credential;
use crate::error::{Result, SignError};
use crate::hash::compute_checksum;
use crate::radix::pad_start;
use crate::timestamp::{encode_shot, now_secs};

/// An issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    /// The full digit string (timestamp shot + padded id + checksum).
    pub token: String,
    /// Canonical id the token was issued for.
    pub id: String,
    /// Epoch seconds the token was issued at.
    pub timestamp: u64,
}

impl fmt::Display for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Join the three digit groups. Widths are the caller's responsibility.
pub fn assemble(shot: &str, id: &str, checksum: &str) -> String {
    let mut token = String::with_capacity(shot.len() + id.len() + checksum.len());
    token.push_str(shot);
    token.push_str(id);
    token.push_str(checksum);
    token
}

/// Issue a token for `credential` at the current time.
///
/// # Errors
/// Fails before reading the clock when the layout, id or secret is invalid,
/// and propagates failures of a custom checksum function.
pub fn encode(credential: &Credential, config: &SignConfig) -> Result<SignedToken> {
    validate(credential, config)?;
    issue(credential, config, now_secs())
}

/// Issue a token for `credential` as if the current time were `now`.
pub fn encode_at(credential: &Credential, config: &SignConfig, now: u64) -> Result<SignedToken> {
    validate(credential, config)?;
    issue(credential, config, now)
}

fn validate(credential: &Credential, config: &SignConfig) -> Result<()> {
    config.validate()?;
    credential.validate()?;
    let id = credential.canonical_id();
    if id.len() > config.layout.id as usize {
        return Err(SignError::IdTooWide {
            id: id.to_string(),
            width: config.layout.id,
        });
    }
    Ok(())
}

fn issue(credential: &Credential, config: &SignConfig, now: u64) -> Result<SignedToken> {
    let layout = &config.layout;
    let id = credential.canonical_id();

    let shot = encode_shot(now, layout.timestamp)?;
    let checksum = compute_checksum(credential, now, config)?;
    let token = assemble(&shot, &pad_start(id, layout.id as usize, '0'), &checksum);

    log::debug!("issued token for id {id} at {now}");

    Ok(SignedToken {
        token,
        id: id.to_string(),
        timestamp: now,
    })
}
