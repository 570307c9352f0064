use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use http::HeaderValue;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::auth::claims::{JwtClaims, JwtHeader};
use crate::auth::jwt::sign_token;
use crate::auth::signer::{EcdsaSigner, Signer};
use crate::cache::token::CachedToken;
use crate::config::settings::AuthConfig;
use crate::errors::{TokenError, TokenResult};
use crate::helpers::time::{elapsed_seconds, epoch_seconds, Clock, SystemClock};
use crate::observability::metrics;
use crate::utils::constants::{DEFAULT_FRESHNESS_WINDOW_SECS, TOKEN_HARD_EXPIRY_SECS};

/// Issues and caches provider authentication tokens.
///
/// One cached token per manager. Callers share the manager (usually behind an
/// `Arc`) and call [`TokenManager::current_token`] before each request. A
/// cached token is handed out while it is younger than the freshness window,
/// otherwise a new one is signed in place.
///
/// The check-and-replace of the cache slot runs under one lock, so no caller
/// ever sees a half-written entry. Signing happens under that lock as well:
/// callers queued behind a regeneration get the token it stored.
pub struct TokenManager {
    signer: Box<dyn Signer>,
    issuer: String,
    key_id: String,
    clock: Arc<dyn Clock>,
    freshness_window_secs: i64,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(
        signer: Box<dyn Signer>,
        issuer: impl Into<String>,
        key_id: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            signer,
            issuer: issuer.into(),
            key_id: key_id.into(),
            clock,
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS as i64,
            cached: Mutex::new(None),
        }
    }

    /// Manager for the configured key file, signing with ES256 on the system clock.
    pub async fn from_config(cfg: &AuthConfig) -> TokenResult<Self> {
        let signer = EcdsaSigner::from_file(&cfg.key_path).await?;
        let clock = Arc::new(SystemClock);
        Self::new(Box::new(signer), cfg.team_id.as_str(), cfg.key_id.as_str(), clock)
            .with_freshness_window(Duration::from_secs(cfg.freshness_window_seconds))
    }

    /// Override the default freshness window. Whole seconds only.
    ///
    /// invariant: 0 < window < `TOKEN_HARD_EXPIRY_SECS`
    pub fn with_freshness_window(mut self, window: Duration) -> TokenResult<Self> {
        let secs = window.as_secs();
        if secs == 0 || secs >= TOKEN_HARD_EXPIRY_SECS {
            return Err(TokenError::InvalidConfig(format!(
                "freshness window {}s must be within 1..{}s",
                secs, TOKEN_HARD_EXPIRY_SECS
            )));
        }
        self.freshness_window_secs = secs as i64;
        Ok(self)
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs as u64)
    }

    /// `bearer <jwt>` for the next request, signing a new token when the
    /// cached one is missing or too old.
    ///
    /// On [`TokenError::SigningFailed`] the cache is left as it was, so the
    /// next call simply tries again.
    pub async fn current_token(&self) -> TokenResult<String> {
        let mut slot = self.cached.lock().await;

        if let Some(cached) = slot.as_ref() {
            let now = self.clock.now();
            if self.is_fresh(&cached.issued_at, &now) {
                debug!(
                    issuer = %self.issuer,
                    key_id = %self.key_id,
                    issued_at = epoch_seconds(&cached.issued_at),
                    "token reused"
                );
                metrics::record_reused();
                return Ok(cached.value.clone());
            }
        }

        let fresh = self.generate().inspect_err(|e| {
            warn!(
                issuer = %self.issuer,
                key_id = %self.key_id,
                "token generation failed: {}", e
            );
            metrics::record_signing_failure();
        })?;
        let value = fresh.value.clone();
        *slot = Some(fresh);
        Ok(value)
    }

    /// [`TokenManager::current_token`] as a sensitive header value.
    pub async fn authorization_header(&self) -> TokenResult<HeaderValue> {
        let token = self.current_token().await?;
        let mut value = HeaderValue::from_str(&token).map_err(|e| {
            TokenError::Encoding(format!("token is not a valid header value: {e}"))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Drop the cached token. The next call signs a new one.
    pub async fn invalidate(&self) {
        if self.cached.lock().await.take().is_some() {
            debug!(issuer = %self.issuer, key_id = %self.key_id, "cached token invalidated");
        }
    }

    /// Issuance time of the cached token, if any.
    pub async fn cached_issued_at(&self) -> Option<DateTime<Utc>> {
        self.cached.lock().await.as_ref().map(|c| c.issued_at)
    }

    /// A clock that stepped back behind `issued_at` makes the token stale too.
    fn is_fresh(&self, issued_at: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
        (0..self.freshness_window_secs).contains(&elapsed_seconds(issued_at, now))
    }

    fn generate(&self) -> TokenResult<CachedToken> {
        let issued_at = self.clock.now();
        let iat = epoch_seconds(&issued_at);

        let header = JwtHeader::es256(&self.key_id);
        let claims = JwtClaims::new(&self.issuer, iat, &self.key_id);
        let value = sign_token(self.signer.as_ref(), &header, &claims)?;

        debug!(issuer = %self.issuer, key_id = %self.key_id, issued_at = iat, "token generated");
        metrics::record_generated();
        Ok(CachedToken::new(value, issued_at))
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("issuer", &self.issuer)
            .field("key_id", &self.key_id)
            .field("freshness_window_secs", &self.freshness_window_secs)
            .finish_non_exhaustive()
    }
}
