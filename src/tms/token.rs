//! # Token Manager
//!
//! Owns the external session token and its expiry. The provider issues
//! bearer tokens through a password grant; a token is considered usable
//! only while it has more than five minutes of life left, so callers never
//! race the expiry on an in-flight request.
//!
//! Reads take a shared lock and never touch the network. Refreshes are
//! collapsed into a single in-flight authentication: concurrent callers
//! that all observe a stale token serialize on the refresh lock, and all
//! but the first find a fresh token when they re-check.

use chrono::{DateTime, Duration, Utc};
use std::time::Duration as StdDuration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use crate::config::TmsConfig;
use crate::constants::{tms_auth, tms_urls, TMS_HTTP_TIMEOUT_SECS, TOKEN_EXPIRY_MARGIN_SECS};
use crate::error::{FreightError, Result};
use crate::tms::wire::{AuthRequest, AuthResponse};

/// Cached session token. Replaced wholesale on every successful
/// authentication, never partially updated.
#[derive(Debug, Clone, Default)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthToken {
    /// Whether the token is usable at `now`: non-empty and not within the
    /// expiry safety margin.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) < expires_at,
            None => false,
        }
    }
}

/// Manages the bearer token for the external TMS API.
pub struct TokenManager {
    config: TmsConfig,
    http: reqwest::Client,
    token: RwLock<AuthToken>,
    refresh_lock: Mutex<()>,
}

impl TokenManager {
    pub fn new(config: TmsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(TMS_HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                FreightError::configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http,
            token: RwLock::new(AuthToken::default()),
            refresh_lock: Mutex::new(()),
        })
    }

    fn base_url(&self) -> String {
        if let Some(ref base) = self.config.base_url_override {
            return base.clone();
        }
        if self.config.sandbox {
            tms_urls::SANDBOX_BASE.to_string()
        } else {
            tms_urls::PRODUCTION_BASE.to_string()
        }
    }

    /// Read-only validity check against the cached token.
    pub async fn is_valid(&self) -> bool {
        self.token.read().await.is_usable_at(Utc::now())
    }

    /// Current bearer token value, empty when never authenticated.
    pub async fn bearer_token(&self) -> String {
        self.token.read().await.token.clone()
    }

    /// Return immediately when the cached token is usable; otherwise run a
    /// full authentication. Concurrent stale observers share one refresh.
    pub async fn ensure_valid(&self) -> Result<()> {
        if self.is_valid().await {
            return Ok(());
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited for the lock.
        if self.is_valid().await {
            debug!("Token refreshed by concurrent caller, skipping authentication");
            return Ok(());
        }

        self.authenticate().await
    }

    /// Authenticate against the provider's token endpoint with the
    /// password grant. On failure the cached token is left unchanged.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<()> {
        let auth_url = format!("{}{}", self.base_url(), tms_urls::OAUTH_TOKEN_PATH);

        let auth_req = AuthRequest {
            grant_type: tms_auth::GRANT_TYPE.to_string(),
            client_id: self.config.client_id.clone(),
            client_secret: self.config.client_secret.clone(),
            username: self.config.username.clone(),
            password: self.config.password.clone(),
            scope: tms_auth::SCOPE.to_string(),
            account_type: tms_auth::ACCOUNT_TYPE.to_string(),
        };

        let response = self
            .http
            .post(&auth_url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.config.api_key)
            .json(&auth_req)
            .send()
            .await
            .map_err(|e| FreightError::authentication(None, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FreightError::authentication(Some(status.as_u16()), e.to_string()))?;

        if status != reqwest::StatusCode::OK {
            return Err(FreightError::authentication(Some(status.as_u16()), body));
        }

        let auth_resp: AuthResponse = serde_json::from_str(&body).map_err(|e| {
            FreightError::authentication(
                Some(status.as_u16()),
                format!("Failed to decode token response: {e}"),
            )
        })?;

        let expires_at = Utc::now() + Duration::seconds(auth_resp.expires_in);
        {
            let mut token = self.token.write().await;
            *token = AuthToken {
                token: auth_resp.access_token,
                expires_at: Some(expires_at),
            };
        }

        info!(expires_at = %expires_at, "Authenticated with TMS provider");
        Ok(())
    }

    /// The provider hands back a refresh token but its refresh grant is
    /// not used; refreshing is a full re-authentication.
    pub async fn refresh_token(&self) -> Result<()> {
        self.authenticate().await
    }
}
