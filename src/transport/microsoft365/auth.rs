//! OAuth2 client-credentials flow against the Microsoft identity platform
//!
//! The transport authenticates as a daemon application: no user
//! interaction, a tenant-wide token obtained from the `tenant_id` /
//! `client_id` / `client_secret` triple. Tokens are cached and renewed
//! shortly before they expire.

use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use serde::Deserialize;
use tracing::debug;

use super::client::{parse_failure, ApiFailure};

const LOGIN_ENDPOINT: &str = "https://login.microsoftonline.com";
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Time subtracted from a token's lifetime before it is considered stale
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Tenant and application credentials for the client-credentials grant
#[derive(Clone)]
pub(crate) struct ClientCredentials {
    pub(crate) tenant_id: String,
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Caching source of bearer tokens for the Graph API
pub(super) struct TokenSource {
    credentials: ClientCredentials,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub(super) fn new(credentials: ClientCredentials) -> Self {
        TokenSource {
            credentials,
            cache: Mutex::new(None),
        }
    }

    /// Returns a valid bearer token, requesting a fresh one when the
    /// cached token is missing or about to expire.
    pub(super) fn bearer_token(
        &self,
        http: &reqwest::blocking::Client,
    ) -> Result<String, ApiFailure> {
        let mut cache = self.cache.lock().unwrap();

        if let Some(token) = cache.as_ref() {
            if Instant::now() + REFRESH_MARGIN < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token(http)?;
        let access_token = token.access_token.clone();
        *cache = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });

        Ok(access_token)
    }

    fn request_token(
        &self,
        http: &reqwest::blocking::Client,
    ) -> Result<TokenResponse, ApiFailure> {
        let url = format!(
            "{LOGIN_ENDPOINT}/{}/oauth2/v2.0/token",
            self.credentials.tenant_id
        );
        debug!(tenant_id = %self.credentials.tenant_id, "requesting client-credentials token");

        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = http
            .post(&url)
            .form(&params)
            .send()
            .map_err(ApiFailure::Network)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(ApiFailure::Network)?;

        if status >= 400 {
            return Err(parse_failure(status, body));
        }

        serde_json::from_str(&body).map_err(|_| ApiFailure::Unexpected { status, body })
    }
}
