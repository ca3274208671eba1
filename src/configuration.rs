use std::path::Path;

use serde::Deserialize;
use short_sign::{
    DigitLayout, HashAlgorithm, RadixPreprocessing, SignConfig, SignError, VerifyConfig,
};
use thiserror::Error;

/// Default validity window, in seconds.
pub const DEFAULT_EXPIRES_IN: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] SignError),
}

/// Token settings shared by the `encode`, `decode` and `verify` commands.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub layout: DigitLayout,
    pub hash: HashAlgorithm,
    pub hmac: bool,
    pub expires_in: u64,
    pub preprocess: Option<RadixPreprocessing>,
}

impl Default for Config {
    fn default() -> Self {
        let sign = SignConfig::default();
        Self {
            layout: sign.layout,
            hash: sign.hash,
            hmac: sign.hmac,
            expires_in: DEFAULT_EXPIRES_IN,
            preprocess: None,
        }
    }
}

impl Config {
    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.layout.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    pub fn sign_config(&self) -> SignConfig {
        SignConfig::new()
            .with_layout(self.layout)
            .with_hash(self.hash.clone())
            .with_hmac(self.hmac)
    }

    /// Verification settings, with `expires_in` overriding the configured window.
    pub fn verify_config(&self, expires_in: Option<u64>) -> VerifyConfig {
        let config = VerifyConfig::new(self.sign_config(), expires_in.unwrap_or(self.expires_in));
        match &self.preprocess {
            Some(preprocess) => config.with_preprocessing(preprocess.clone()),
            None => config,
        }
    }
}
