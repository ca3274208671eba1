//! Token splitting and decoding.

use std::borrow::Cow;

use crate::config::{DigitLayout, VerifyConfig};
use crate::data::{DecodedToken, canonical_id};
use crate::radix::change_radix;
use crate::timestamp::{decode_shot, now_secs};

/// The three digit groups of a token, borrowed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenParts<'a> {
    pub timestamp: &'a str,
    pub id: &'a str,
    pub checksum: &'a str,
}

/// Slice `token` at the fixed offsets of `layout`.
///
/// Returns `None` if the token is not made of exactly `layout.total()`
/// decimal digits.
pub fn split<'a>(token: &'a str, layout: &DigitLayout) -> Option<TokenParts<'a>> {
    if token.len() != layout.total() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (timestamp, rest) = token.split_at(layout.timestamp as usize);
    let (id, checksum) = rest.split_at(layout.id as usize);
    Some(TokenParts {
        timestamp,
        id,
        checksum,
    })
}

/// Decode a token at the current time without verifying its checksum.
///
/// Malformed tokens and tokens outside the validity window yield `None`.
pub fn decode(token: &str, config: &VerifyConfig) -> Option<DecodedToken> {
    decode_at(token, config, now_secs())
}

/// Decode a token as if the current time were `now`.
pub fn decode_at(token: &str, config: &VerifyConfig, now: u64) -> Option<DecodedToken> {
    if let Err(e) = config.layout().validate() {
        log::debug!("rejecting token: {e}");
        return None;
    }

    let token = preprocess(token, config)?;
    let Some(parts) = split(&token, config.layout()) else {
        log::debug!("rejecting token: malformed");
        return None;
    };
    let Some(timestamp) = decode_shot(parts.timestamp, config.expires_in, now) else {
        log::debug!("rejecting token for id {}: outside validity window", parts.id);
        return None;
    };

    Some(DecodedToken {
        id: canonical_id(parts.id).to_string(),
        timestamp,
        checksum: parts.checksum.to_string(),
    })
}

fn preprocess<'a>(token: &'a str, config: &VerifyConfig) -> Option<Cow<'a, str>> {
    let Some(preprocess) = &config.preprocess else {
        return Some(Cow::Borrowed(token));
    };
    match change_radix(token, &preprocess.from, &preprocess.to, None) {
        Ok(converted) => Some(Cow::Owned(converted)),
        Err(e) => {
            log::debug!("rejecting token: {e}");
            None
        }
    }
}
