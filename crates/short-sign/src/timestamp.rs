//! Truncated timestamps ("shots") that fit a fixed number of digits.
//!
//! A shot is `now mod 10^d`. Shots below `10^d / 10` are lifted by half a
//! window so every shot is exactly `d` significant digits. Decoding rebuilds
//! the absolute time from the decoder's own window and, when that lands
//! outside the validity range, undoes the half-window lift (leading `5`) or a
//! window rollover (leading `9`).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::MAX_TIMESTAMP_DIGITS;
use crate::error::{Result, SignError};
use crate::radix::pad_start;

/// Current wall-clock time in epoch seconds.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

fn window_max(digits: u32) -> Option<u64> {
    if digits > MAX_TIMESTAMP_DIGITS {
        return None;
    }
    10u64.checked_pow(digits)
}

/// Encode `now` into a shot of exactly `digits` digits.
///
/// # Errors
/// Fails when `digits` exceeds [`MAX_TIMESTAMP_DIGITS`].
pub fn encode_shot(now: u64, digits: u32) -> Result<String> {
    let max = window_max(digits).ok_or(SignError::DigitsTooWide {
        field: "timestamp",
        max: MAX_TIMESTAMP_DIGITS,
        got: digits,
    })?;
    let mut shot = now % max;
    if shot < max / 10 {
        shot += max / 2;
    }
    Ok(pad_start(&shot.to_string(), digits as usize, '0'))
}

/// Recover the absolute timestamp of `shot`, as seen at `now`.
///
/// Returns `None` unless the timestamp falls in `(now - expires_in, now]`.
pub fn decode_shot(shot: &str, expires_in: u64, now: u64) -> Option<u64> {
    if shot.is_empty() || !shot.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = u32::try_from(shot.len()).ok()?;
    let max = i128::from(window_max(digits)?);
    let value: i128 = shot.parse().ok()?;
    let now = i128::from(now);
    let earliest = now - i128::from(expires_in);
    let in_range = |t: i128| earliest < t && t <= now;

    let t = now - now % max + value;
    if in_range(t) {
        return u64::try_from(t).ok();
    }

    let retry = match shot.as_bytes()[0] {
        b'5' => t - max / 2,
        b'9' => t - max,
        _ => {
            log::trace!("shot {shot} outside window at {now}");
            return None;
        }
    };
    log::trace!("shot {shot} outside window at {now}, retrying as {retry}");
    if in_range(retry) {
        u64::try_from(retry).ok()
    } else {
        None
    }
}
