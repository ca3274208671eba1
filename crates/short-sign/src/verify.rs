//! Token verification against credentials resolved by id.
//!
//! The caller's directory answers with a [`Lookup`]. Settled answers are
//! checked immediately; a pending answer turns the whole verification into a
//! future that finishes the checksum comparison once the lookup completes.

use std::fmt;
use std::future::{Future, IntoFuture};

use async_trait::async_trait;
use futures::future::{self, BoxFuture};

use crate::config::{SignConfig, VerifyConfig};
use crate::data::{Credential, DecodedToken, canonical_id};
use crate::error::Result;
use crate::hash::{checksums_equal, compute_checksum};
use crate::parse::decode_at;
use crate::timestamp::now_secs;

/// Candidates a directory holds for an id.
pub enum Lookup {
    /// No credential for the id.
    Missing,
    One(Credential),
    /// Checked in order; the first match wins.
    Many(Vec<Credential>),
    /// Resolves later to one of the other variants.
    Pending(BoxFuture<'static, Lookup>),
}

impl Lookup {
    /// Wrap a future resolving to the candidates.
    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = Lookup> + Send + 'static,
    {
        Self::Pending(Box::pin(fut))
    }

    fn into_candidates(self) -> std::result::Result<Vec<Credential>, BoxFuture<'static, Lookup>> {
        match self {
            Self::Missing => Ok(Vec::new()),
            Self::One(credential) => Ok(vec![credential]),
            Self::Many(credentials) => Ok(credentials),
            Self::Pending(fut) => Err(fut),
        }
    }
}

impl From<Credential> for Lookup {
    fn from(credential: Credential) -> Self {
        Self::One(credential)
    }
}

impl From<Option<Credential>> for Lookup {
    fn from(credential: Option<Credential>) -> Self {
        credential.map_or(Self::Missing, Self::One)
    }
}

impl From<Vec<Credential>> for Lookup {
    fn from(credentials: Vec<Credential>) -> Self {
        Self::Many(credentials)
    }
}

impl fmt::Debug for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("Missing"),
            Self::One(credential) => f.debug_tuple("One").field(credential).finish(),
            Self::Many(credentials) => f.debug_tuple("Many").field(credentials).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Resolve candidate credentials by id.
pub trait CredentialLookup {
    fn lookup(&self, id: &str) -> Lookup;
}

impl<F> CredentialLookup for F
where
    F: Fn(&str) -> Lookup,
{
    fn lookup(&self, id: &str) -> Lookup {
        self(id)
    }
}

/// Resolve candidate credentials by id asynchronously.
#[async_trait]
pub trait AsyncCredentialLookup: Send + Sync {
    async fn lookup(&self, id: &str) -> Lookup;
}

/// Outcome of [`find_one`].
pub enum Verification {
    /// The lookup was settled; `None` means the token is invalid.
    Ready(Option<Credential>),
    /// The lookup is still running.
    Pending(BoxFuture<'static, Result<Option<Credential>>>),
}

impl Verification {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// The settled outcome, or `self` back if it is still pending.
    pub fn into_ready(self) -> std::result::Result<Option<Credential>, Self> {
        match self {
            Self::Ready(credential) => Ok(credential),
            pending => Err(pending),
        }
    }

    /// Wait for the outcome. Same as awaiting `self`.
    pub async fn resolve(self) -> Result<Option<Credential>> {
        self.await
    }
}

impl IntoFuture for Verification {
    type Output = Result<Option<Credential>>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Self::Ready(credential) => Box::pin(future::ready(Ok(credential))),
            Self::Pending(fut) => fut,
        }
    }
}

impl fmt::Debug for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(credential) => f.debug_tuple("Ready").field(credential).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Find the credential a token was issued for.
///
/// This function:
/// 1. Decodes the token at the current time (expired or malformed → `None`)
/// 2. Looks up candidates for the decoded id
/// 3. Returns the first candidate whose checksum matches
///
/// # Errors
/// Only failures of a custom checksum function are errors. An invalid token
/// is `Ok(Verification::Ready(None))`.
pub fn find_one<D>(token: &str, config: &VerifyConfig, directory: &D) -> Result<Verification>
where
    D: CredentialLookup + ?Sized,
{
    find_one_at(token, config, directory, now_secs())
}

/// [`find_one`] with the clock pinned to `now`.
pub fn find_one_at<D>(
    token: &str,
    config: &VerifyConfig,
    directory: &D,
    now: u64,
) -> Result<Verification>
where
    D: CredentialLookup + ?Sized,
{
    let Some(decoded) = decode_at(token, config, now) else {
        return Ok(Verification::Ready(None));
    };

    match directory.lookup(&decoded.id).into_candidates() {
        Ok(candidates) => first_match(candidates, &decoded, &config.sign).map(Verification::Ready),
        Err(fut) => {
            let sign = config.sign.clone();
            Ok(Verification::Pending(Box::pin(async move {
                let candidates = settle(fut.await).await;
                first_match(candidates, &decoded, &sign)
            })))
        }
    }
}

/// Find the credential a token was issued for using an async directory.
pub async fn find_one_async<D>(
    token: &str,
    config: &VerifyConfig,
    directory: &D,
) -> Result<Option<Credential>>
where
    D: AsyncCredentialLookup + ?Sized,
{
    find_one_async_at(token, config, directory, now_secs()).await
}

/// [`find_one_async`] with the clock pinned to `now`.
pub async fn find_one_async_at<D>(
    token: &str,
    config: &VerifyConfig,
    directory: &D,
    now: u64,
) -> Result<Option<Credential>>
where
    D: AsyncCredentialLookup + ?Sized,
{
    let Some(decoded) = decode_at(token, config, now) else {
        return Ok(None);
    };
    let candidates = settle(directory.lookup(&decoded.id).await).await;
    first_match(candidates, &decoded, &config.sign)
}

async fn settle(mut lookup: Lookup) -> Vec<Credential> {
    loop {
        match lookup.into_candidates() {
            Ok(candidates) => return candidates,
            Err(fut) => lookup = fut.await,
        }
    }
}

fn first_match(
    candidates: Vec<Credential>,
    decoded: &DecodedToken,
    config: &SignConfig,
) -> Result<Option<Credential>> {
    let count = candidates.len();
    for candidate in candidates {
        if canonical_id(candidate.id()) != decoded.id {
            continue;
        }
        let checksum = compute_checksum(&candidate, decoded.timestamp, config)?;
        if checksums_equal(&checksum, &decoded.checksum) {
            return Ok(Some(candidate));
        }
    }
    log::debug!(
        "rejecting token for id {}: no match among {count} candidates",
        decoded.id
    );
    Ok(None)
}
