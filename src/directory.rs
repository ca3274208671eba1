//! In-memory credential directory loaded from YAML.
//!
//! ```yaml
//! credentials:
//!   - id: 12345678
//!     secret: "s3cret"
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use short_sign::{Credential, CredentialLookup, Lookup, SignError, canonical_id};

use crate::configuration::ConfigError;

// ============================================================================
// File Format
// ============================================================================

/// Ids and secrets may be written as numbers or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(u64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CredentialEntry {
    id: Scalar,
    secret: Scalar,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CredentialsFile {
    credentials: Vec<CredentialEntry>,
}

// ============================================================================
// Credential Store
// ============================================================================

/// Credentials grouped by canonical id, in insertion order.
#[derive(Debug, Default)]
pub struct CredentialStore {
    by_id: HashMap<String, Vec<Credential>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a credentials document. Every entry must have a decimal id and a
    /// non-empty secret.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: CredentialsFile = serde_yaml::from_str(yaml)?;
        let mut store = Self::new();
        for entry in file.credentials {
            store.insert(Credential::new(entry.id, entry.secret))?;
        }
        log::info!("Loaded {} credentials for {} ids", store.len(), store.by_id.len());
        Ok(store)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Add a credential. Several credentials may share an id (e.g. during
    /// secret rotation); verification tries them in insertion order.
    pub fn insert(&mut self, credential: Credential) -> Result<(), SignError> {
        credential.validate()?;
        self.by_id
            .entry(credential.canonical_id().to_string())
            .or_default()
            .push(credential);
        Ok(())
    }

    /// Remove every credential for `id`.
    pub fn remove(&mut self, id: &str) -> Vec<Credential> {
        self.by_id.remove(canonical_id(id)).unwrap_or_default()
    }

    /// Total number of credentials.
    pub fn len(&self) -> usize {
        self.by_id.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl CredentialLookup for CredentialStore {
    fn lookup(&self, id: &str) -> Lookup {
        match self.by_id.get(canonical_id(id)).map(Vec::as_slice) {
            None | Some([]) => Lookup::Missing,
            Some([credential]) => Lookup::One(credential.clone()),
            Some(credentials) => Lookup::Many(credentials.to_vec()),
        }
    }
}
