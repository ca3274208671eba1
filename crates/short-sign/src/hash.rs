//! Checksum computation binding id, timestamp and secret.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use hmac::{Hmac, Mac};
use md5::Md5;
use serde::{Deserialize, Deserializer};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

use crate::config::SignConfig;
use crate::data::Credential;
use crate::error::{BoxError, Result, SignError};
use crate::radix::{Alphabet, change_radix, pad_start};

/// Caller-supplied digest: `(message, key)` to a hex string. `key` is the
/// secret in HMAC mode and `None` otherwise.
pub type ChecksumFn =
    dyn Fn(&str, Option<&str>) -> std::result::Result<String, BoxError> + Send + Sync;

/// Digest used to derive token checksums.
#[derive(Clone)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Custom(Arc<ChecksumFn>),
}

impl HashAlgorithm {
    /// Wrap a custom digest function.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> std::result::Result<String, BoxError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Hex digest of `message`, keyed with `key` when one is given.
    pub fn digest_hex(&self, message: &str, key: Option<&str>) -> Result<String> {
        macro_rules! hmac_hex {
            ($digest:ty, $key:expr) => {{
                let mut mac = Hmac::<$digest>::new_from_slice($key.as_bytes())
                    .map_err(|_| SignError::InvalidKey)?;
                mac.update(message.as_bytes());
                hex::encode(mac.finalize().into_bytes())
            }};
        }

        let hex = match (self, key) {
            (Self::Md5, None) => hex::encode(Md5::digest(message.as_bytes())),
            (Self::Md5, Some(key)) => hmac_hex!(Md5, key),
            (Self::Sha1, None) => hex::encode(Sha1::digest(message.as_bytes())),
            (Self::Sha1, Some(key)) => hmac_hex!(Sha1, key),
            (Self::Sha256, None) => hex::encode(Sha256::digest(message.as_bytes())),
            (Self::Sha256, Some(key)) => hmac_hex!(Sha256, key),
            (Self::Sha512, None) => hex::encode(Sha512::digest(message.as_bytes())),
            (Self::Sha512, Some(key)) => hmac_hex!(Sha512, key),
            (Self::Custom(f), key) => f(message, key).map_err(SignError::Hash)?,
        };
        Ok(hex)
    }
}

impl fmt::Debug for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => f.write_str("Md5"),
            Self::Sha1 => f.write_str("Sha1"),
            Self::Sha256 => f.write_str("Sha256"),
            Self::Sha512 => f.write_str("Sha512"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = SignError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(SignError::UnknownHashAlgorithm(name.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for HashAlgorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Compute the checksum digits for `credential` at `timestamp`.
///
/// The digest is taken over `id || timestamp` keyed with the secret (HMAC
/// mode) or over `id || timestamp || secret`. Its leading `checksum` hex
/// characters are converted to decimal and fitted to the checksum width.
pub fn compute_checksum(
    credential: &Credential,
    timestamp: u64,
    config: &SignConfig,
) -> Result<String> {
    let id = credential.canonical_id();
    let secret = credential.secret();
    let (message, key) = if config.hmac {
        (format!("{id}{timestamp}"), Some(secret))
    } else {
        (format!("{id}{timestamp}{secret}"), None)
    };

    let digest = config.hash.digest_hex(&message, key)?.to_lowercase();
    let width = config.layout.checksum as usize;
    let truncated: String = digest.chars().take(width).collect();
    let decimal = change_radix(&truncated, &Alphabet::hex(), &Alphabet::decimal(), Some(10))?;
    Ok(pad_start(&decimal, width, '0'))
}

/// Constant-time comparison of two checksums.
pub(crate) fn checksums_equal(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DigitLayout;

    fn config(hash: HashAlgorithm, hmac: bool) -> SignConfig {
        SignConfig::new().with_hash(hash).with_hmac(hmac)
    }

    #[test]
    fn test_known_checksums() {
        let credential = Credential::new(12345678, "abc");
        let cases = [
            (HashAlgorithm::Md5, true, "9715"),
            (HashAlgorithm::Md5, false, "4180"),
            (HashAlgorithm::Sha1, true, "0644"),
            (HashAlgorithm::Sha1, false, "9570"),
            (HashAlgorithm::Sha256, true, "6087"),
            (HashAlgorithm::Sha256, false, "0724"),
            (HashAlgorithm::Sha512, true, "2902"),
            (HashAlgorithm::Sha512, false, "5894"),
        ];
        for (hash, hmac, expected) in cases {
            let name = format!("{hash:?}/{hmac}");
            let checksum = compute_checksum(&credential, 1_700_000_000, &config(hash, hmac)).unwrap();
            assert_eq!(checksum, expected, "{name}");
        }
    }

    #[test]
    fn test_digest_hex() {
        let digest = HashAlgorithm::Md5
            .digest_hex("123456781700000000", Some("abc"))
            .unwrap();
        assert_eq!(digest, "96b5a6b32cf04917b2651cece5f43c9a");
        let digest = HashAlgorithm::Sha1
            .digest_hex("421700050000secret", None)
            .unwrap();
        assert_eq!(digest, "ebbfc57c6982b5d1662ddb22392569d0cd493983");
    }

    #[test]
    fn test_checksum_width() {
        let credential = Credential::new(42, "secret");
        let config = SignConfig::new().with_layout(DigitLayout::new(6, 8, 6));
        let checksum = compute_checksum(&credential, 1_700_050_000, &config).unwrap();
        assert_eq!(checksum, "659063");
    }

    #[test]
    fn test_checksum_ignores_id_padding() {
        let config = SignConfig::default();
        let a = compute_checksum(&Credential::new("0042", "secret"), 1_700_050_000, &config);
        let b = compute_checksum(&Credential::new(42, "secret"), 1_700_050_000, &config);
        assert_eq!(a.unwrap(), "6590");
        assert_eq!(b.unwrap(), "6590");
    }

    #[test]
    fn test_checksum_changes_with_secret() {
        let config = SignConfig::default();
        let a = compute_checksum(&Credential::new(42, "secret"), 1_700_050_000, &config).unwrap();
        let b = compute_checksum(&Credential::new(42, "other"), 1_700_050_000, &config).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_custom_hash_receives_key_in_hmac_mode() {
        let hash = HashAlgorithm::custom(|message, key| {
            assert_eq!(message, "71700000000");
            assert_eq!(key, Some("k"));
            Ok("00ff".to_string())
        });
        let checksum =
            compute_checksum(&Credential::new(7, "k"), 1_700_000_000, &config(hash, true)).unwrap();
        // "00ff" folds to 165
        assert_eq!(checksum, "0165");
    }

    #[test]
    fn test_custom_hash_without_hmac() {
        let hash = HashAlgorithm::custom(|message, key| {
            assert_eq!(message, "71700000000k");
            assert!(key.is_none());
            Ok("ABC123".to_string())
        });
        let checksum =
            compute_checksum(&Credential::new(7, "k"), 1_700_000_000, &config(hash, false)).unwrap();
        // lower-cased "abc1" folds to 10*1000 + 11*100 + 12*10 + 1 = 11221
        assert_eq!(checksum, "1221");
    }

    #[test]
    fn test_custom_hash_error_propagates() {
        let hash = HashAlgorithm::custom(|_, _| Err("backend down".into()));
        let result = compute_checksum(&Credential::new(7, "k"), 1, &config(hash, true));
        match result {
            Err(SignError::Hash(e)) => assert_eq!(e.to_string(), "backend down"),
            other => panic!("expected hash error, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_hash_non_hex_output() {
        let hash = HashAlgorithm::custom(|_, _| Ok("zzzz".to_string()));
        let result = compute_checksum(&Credential::new(7, "k"), 1, &config(hash, true));
        assert!(matches!(result, Err(SignError::UnknownSymbol('z'))));
    }

    #[test]
    fn test_parse_algorithm_names() {
        assert!(matches!("md5".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Md5)));
        assert!(matches!("SHA1".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha1)));
        assert!(matches!("Sha256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256)));
        assert!(matches!("sha512".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha512)));
        assert!(matches!(
            "crc32".parse::<HashAlgorithm>(),
            Err(SignError::UnknownHashAlgorithm(name)) if name == "crc32"
        ));
    }

    #[test]
    fn test_checksums_equal() {
        assert!(checksums_equal("1234", "1234"));
        assert!(!checksums_equal("1234", "1235"));
        assert!(!checksums_equal("1234", "12345"));
    }
}
