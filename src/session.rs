//! Session persistence on top of the cache.
//!
//! Login writes the user record and access token; app start reads them back
//! without touching the network; logout removes both.
//!
//! The two keys are written separately. A login whose token write fails
//! removes the user record again, so a restore never pairs one user's record
//! with another user's token.

use crate::api::models::{AuthResponse, User};
use crate::error::{Error, Result};
use crate::key::{ACCESS_TOKEN, SESSION_KEYS, USER_INFO};
use crate::service::CacheService;
use crate::store::KeyValueStore;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A session read back from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub user: User,
    pub access_token: String,
}

/// Registered claims read from the token payload.
#[derive(Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

/// Decode the payload segment of a JWT without verifying its signature.
fn token_claims(token: &str) -> Option<TokenClaims> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

impl StoredSession {
    /// Expiry from the token's `exp` claim, if it has one.
    pub fn token_expiry(&self) -> Option<DateTime<Utc>> {
        token_claims(&self.access_token)?
            .exp
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Whether the token is unusable at `now`.
    ///
    /// A token that cannot be decoded counts as expired. A decodable token
    /// without an `exp` claim never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match token_claims(&self.access_token) {
            None => true,
            Some(TokenClaims { exp: None }) => false,
            Some(TokenClaims { exp: Some(exp) }) => {
                DateTime::from_timestamp(exp, 0).map_or(true, |expiry| now >= expiry)
            }
        }
    }

    /// [`is_expired_at`](StoredSession::is_expired_at) the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Session state kept in the cache under `userInfo` / `accessToken`.
pub struct Session<S: KeyValueStore> {
    cache: CacheService<S>,
}

impl<S: KeyValueStore> Clone for Session<S> {
    fn clone(&self) -> Self {
        Session {
            cache: self.cache.clone(),
        }
    }
}

/// Map a cache miss to `None`, keep every other error.
fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::CacheMiss { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Session bound to the given cache.
    pub fn new(cache: CacheService<S>) -> Self {
        Session { cache }
    }

    /// Persist a successful login.
    ///
    /// # Errors
    ///
    /// Propagates the first `set` failure. If the user record was written
    /// but the token write fails, the session keys are removed (best-effort)
    /// before returning, leaving no session rather than a mixed one.
    pub async fn persist(&self, auth: &AuthResponse) -> Result<()> {
        self.cache.set(USER_INFO, &auth.user).await?;

        if let Err(e) = self.cache.set(ACCESS_TOKEN, &auth.access_token).await {
            warn!(
                "Token write for user {} failed, dropping partial session: {}",
                auth.user.id, e
            );
            self.discard_partial().await;
            return Err(e);
        }

        info!("✓ Session persisted for user {}", auth.user.id);
        Ok(())
    }

    /// Remove the session keys one by one, user record first.
    async fn discard_partial(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.cache.remove(key).await {
                warn!("Failed to remove {} after partial login: {}", key, e);
            }
        }
    }

    /// Read the stored session, cache only.
    ///
    /// Returns `None` unless both the user record and the token are present.
    ///
    /// # Errors
    ///
    /// Corrupt entries and store faults are returned as errors, not `None`.
    pub async fn restore(&self) -> Result<Option<StoredSession>> {
        let user = self.current_user().await?;
        let access_token = self.access_token().await?;

        match (user, access_token) {
            (Some(user), Some(access_token)) => {
                debug!("✓ Session restored for user {}", user.id);
                Ok(Some(StoredSession { user, access_token }))
            }
            _ => {
                debug!("No complete session in cache");
                Ok(None)
            }
        }
    }

    /// Like [`restore`](Session::restore), but `None` when the stored token
    /// has expired or cannot be decoded.
    ///
    /// # Errors
    ///
    /// Same as `restore()`.
    pub async fn restore_valid(&self) -> Result<Option<StoredSession>> {
        Ok(self.restore().await?.filter(|session| {
            let expired = session.is_expired();
            if expired {
                info!("Stored token for user {} has expired", session.user.id);
            }
            !expired
        }))
    }

    /// Stored user record, if any.
    ///
    /// # Errors
    ///
    /// Corrupt entries and store faults.
    pub async fn current_user(&self) -> Result<Option<User>> {
        optional(self.cache.get(USER_INFO).await)
    }

    /// Stored access token, if any.
    ///
    /// # Errors
    ///
    /// Corrupt entries and store faults.
    pub async fn access_token(&self) -> Result<Option<String>> {
        optional(self.cache.get(ACCESS_TOKEN).await)
    }

    /// Remove the stored session.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreWriteError` if the store fails.
    pub async fn logout(&self) -> Result<()> {
        self.cache.remove_many(&SESSION_KEYS).await?;
        info!("✓ Session cleared");
        Ok(())
    }
}
