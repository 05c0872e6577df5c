use chrono::Utc;
use log::info;
use reqwest::Client;
use std::fs;
use std::path::Path;

use super::dto::{CredentialsFile, InstalledCredentials, StoredToken, TokenResponse};
use crate::error::AuthError;

pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

// Refresh a minute early so the token does not lapse mid-run.
const EXPIRY_MARGIN_MS: i64 = 60_000;

/// Installed-app OAuth2 client for read-only spreadsheet access.
pub struct GoogleOAuth {
    client: Client,
    credentials: InstalledCredentials,
}

impl GoogleOAuth {
    pub fn new(credentials: InstalledCredentials) -> Self {
        Self {
            client: Client::new(),
            credentials,
        }
    }

    /// Load the client from a `credentials.json` file
    pub fn from_file(path: &Path) -> Result<Self, AuthError> {
        let content = fs::read_to_string(path).map_err(|source| AuthError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: CredentialsFile =
            serde_json::from_str(&content).map_err(|source| AuthError::Json {
                path: path.display().to_string(),
                source,
            })?;

        Ok(Self::new(file.installed))
    }

    fn redirect_uri(&self) -> &str {
        self.credentials
            .redirect_uris
            .first()
            .map(String::as_str)
            .unwrap_or(OOB_REDIRECT_URI)
    }

    fn token_uri(&self) -> &str {
        self.credentials
            .token_uri
            .as_deref()
            .unwrap_or(DEFAULT_TOKEN_URI)
    }

    /// Build the URL the user visits to grant offline read-only access
    pub fn auth_url(&self) -> String {
        let auth_uri = self
            .credentials
            .auth_uri
            .as_deref()
            .unwrap_or(DEFAULT_AUTH_URI);

        format!(
            "{}\
             ?access_type=offline\
             &scope={}\
             &response_type=code\
             &client_id={}\
             &redirect_uri={}",
            auth_uri,
            urlencoding::encode(SHEETS_READONLY_SCOPE),
            urlencoding::encode(&self.credentials.client_id),
            urlencoding::encode(self.redirect_uri())
        )
    }

    /// Trade an authorization code for a token
    pub async fn exchange_code(&self, code: &str) -> Result<StoredToken, AuthError> {
        let params = [
            ("code", code.trim()),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.request_token(&params).await?;
        Ok(into_stored_token(response, None))
    }

    /// Get a fresh access token using the stored refresh token
    pub async fn refresh(&self, token: &StoredToken) -> Result<StoredToken, AuthError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or(AuthError::MissingRefreshToken)?;

        let params = [
            ("refresh_token", refresh_token),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self.request_token(&params).await?;
        info!("Access token refreshed");
        Ok(into_stored_token(response, Some(refresh_token)))
    }

    /// Return the token unchanged when still valid, otherwise refresh it.
    /// The flag tells the caller whether it needs to persist the result.
    pub async fn ensure_fresh(&self, token: StoredToken) -> Result<(StoredToken, bool), AuthError> {
        if !is_token_expired(&token) {
            return Ok((token, false));
        }

        let refreshed = self.refresh(&token).await?;
        Ok((refreshed, true))
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let response = self
            .client
            .post(self.token_uri())
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint { status, message });
        }

        Ok(response.json().await?)
    }
}

fn into_stored_token(response: TokenResponse, previous_refresh: Option<&str>) -> StoredToken {
    let expiry_date = response
        .expires_in
        .map(|secs| current_timestamp_ms().saturating_add(secs.saturating_mul(1000)));

    StoredToken {
        access_token: response.access_token,
        refresh_token: response
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string)),
        scope: response.scope,
        token_type: response.token_type,
        expiry_date,
    }
}

/// Get current Unix timestamp in milliseconds
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// A token with no recorded expiry is trusted until the API rejects it.
pub fn is_token_expired(token: &StoredToken) -> bool {
    token
        .expiry_date
        .is_some_and(|expiry| expiry <= current_timestamp_ms() + EXPIRY_MARGIN_MS)
}
