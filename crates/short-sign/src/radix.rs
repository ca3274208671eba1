//! Arbitrary-radix conversion of digit strings.
//!
//! Values are folded one symbol at a time into a little-endian digit array of
//! the target radix. Every fold multiplies the accumulated value by ten, no
//! matter how many symbols the source alphabet has: source strings are read as
//! decimal numerals whose "digits" may exceed nine. Tokens already in
//! circulation depend on this, so it must not be changed to a true
//! base-`from.len()` conversion.

use std::fmt;

use serde::Deserialize;

use crate::error::{Result, SignError};

/// Decimal digits.
pub const DECIMAL_SYMBOLS: &str = "0123456789";

/// Lower-case hexadecimal digits, as rendered by digests.
pub const HEX_SYMBOLS: &str = "0123456789abcdef";

/// Default 64-symbol alphabet.
pub const BASE64_SYMBOLS: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+/";

/// 64-symbol alphabet safe for URL path segments.
pub const BASE64_URL_SYMBOLS: &str =
    "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ+_";

/// An ordered set of unique symbols; a symbol's value is its position.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet, rejecting repeated symbols and alphabets shorter
    /// than two symbols.
    pub fn new(symbols: &str) -> Result<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.len() < 2 {
            return Err(SignError::InvalidAlphabet(format!(
                "expected at least 2 symbols, got {}",
                symbols.len()
            )));
        }
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].contains(symbol) {
                return Err(SignError::InvalidAlphabet(format!(
                    "symbol '{symbol}' appears more than once"
                )));
            }
        }
        Ok(Self { symbols })
    }

    fn from_const(symbols: &'static str) -> Self {
        Self {
            symbols: symbols.chars().collect(),
        }
    }

    pub fn decimal() -> Self {
        Self::from_const(DECIMAL_SYMBOLS)
    }

    pub fn hex() -> Self {
        Self::from_const(HEX_SYMBOLS)
    }

    pub fn base64() -> Self {
        Self::from_const(BASE64_SYMBOLS)
    }

    pub fn base64_url() -> Self {
        Self::from_const(BASE64_URL_SYMBOLS)
    }

    /// Number of symbols, never below 2.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Value of `symbol`, if it belongs to the alphabet.
    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    /// Symbol for `value`. Callers keep `value` below [`Alphabet::len`].
    fn symbol(&self, value: usize) -> char {
        self.symbols[value]
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::base64()
    }
}

impl TryFrom<String> for Alphabet {
    type Error = SignError;

    fn try_from(symbols: String) -> Result<Self> {
        Self::new(&symbols)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|s| write!(f, "{s}"))
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alphabet({self})")
    }
}

/// Convert `value`, written with the symbols of `from`, into `to`.
///
/// `radix` defaults to the length of `to` and may be smaller to use only a
/// prefix of the target alphabet. A leading `-` is carried over unchanged.
/// Empty input (or input made only of zero symbols) yields the first symbol
/// of `to`.
///
/// # Errors
/// * [`SignError::InvalidRadix`] if `radix` is outside `2..=to.len()`
/// * [`SignError::UnknownSymbol`] if `value` uses a symbol missing from `from`
pub fn change_radix(
    value: &str,
    from: &Alphabet,
    to: &Alphabet,
    radix: Option<usize>,
) -> Result<String> {
    let radix = radix.unwrap_or(to.len());
    if radix < 2 || radix > to.len() {
        return Err(SignError::InvalidRadix {
            radix,
            len: to.len(),
        });
    }

    // A bare "-" carries no sign.
    let (negative, body) = match value.strip_prefix('-') {
        Some(rest) if !rest.is_empty() => (true, rest),
        Some(rest) => (false, rest),
        None => (false, value),
    };

    // Little-endian digits in the target radix.
    let mut digits: Vec<usize> = Vec::new();
    for symbol in body.chars() {
        let mut carry = from
            .index_of(symbol)
            .ok_or(SignError::UnknownSymbol(symbol))?;
        let mut i = 0;
        while carry > 0 || i < digits.len() {
            if i == digits.len() {
                digits.push(0);
            }
            carry += digits[i] * 10;
            digits[i] = carry % radix;
            carry /= radix;
            i += 1;
        }
    }

    let mut out = String::with_capacity(digits.len() + 1);
    if negative {
        out.push('-');
    }
    if digits.is_empty() {
        out.push(to.symbol(0));
    } else {
        out.extend(digits.iter().rev().map(|&d| to.symbol(d)));
    }
    Ok(out)
}

/// Convert a native integer into `to`. The integer is read in decimal.
pub fn change_radix_int(value: i128, to: &Alphabet, radix: Option<usize>) -> Result<String> {
    change_radix(&value.to_string(), &Alphabet::decimal(), to, radix)
}

/// Left-pad `value` with `fill` to exactly `width` symbols.
///
/// Values wider than `width` keep their trailing `width` symbols.
pub fn pad_start(value: &str, width: usize, fill: char) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.chars().skip(len - width).collect();
    }
    let mut out: String = std::iter::repeat_n(fill, width - len).collect();
    out.push_str(value);
    out
}
