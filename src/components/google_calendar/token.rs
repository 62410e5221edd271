use crate::config::Config;
use crate::error::{auth_error, CalendarResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens expiring within this margin are refreshed before use
const EXPIRY_MARGIN_SECS: i64 = 60;

/// OAuth token as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// Whether the access token can still be used at `now`
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => expiry - Duration::seconds(EXPIRY_MARGIN_SECS) > now,
            None => true,
        }
    }
}

/// OAuth client credentials file, as downloaded from the Google console
#[derive(Debug, Deserialize)]
struct ClientSecrets {
    installed: Option<ClientInfo>,
    web: Option<ClientInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct ClientInfo {
    client_id: String,
    client_secret: String,
    token_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    token_type: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Clone)]
pub struct TokenManager {
    credentials_path: PathBuf,
    token_path: PathBuf,
    client: Client,
    cached: Arc<Mutex<Option<StoredToken>>>,
}

impl TokenManager {
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            credentials_path: config.credentials_path(),
            token_path: config.token_path(),
            client,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    /// Get a usable access token, refreshing and persisting it when expired
    pub async fn access_token(&self) -> CalendarResult<String> {
        // Hold the lock across a refresh so concurrent fetches refresh once
        let mut cached = self.cached.lock().await;

        let token = match cached.take() {
            Some(token) => token,
            None => self.read_token().await?,
        };

        let token = if token.is_fresh(Utc::now()) {
            token
        } else {
            debug!("Access token expired, refreshing");
            let refreshed = self.refresh_token(&token).await?;
            self.save_token(&refreshed).await?;
            refreshed
        };

        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn read_token(&self) -> CalendarResult<StoredToken> {
        let content = fs::read_to_string(&self.token_path).await.map_err(|e| {
            auth_error(&format!(
                "Unable to read token file {}: {}",
                self.token_path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| auth_error(&format!("Failed to parse token JSON: {}", e)))
    }

    async fn read_client(&self) -> CalendarResult<ClientInfo> {
        let content = fs::read_to_string(&self.credentials_path).await.map_err(|e| {
            auth_error(&format!(
                "Unable to read client secret file {}: {}",
                self.credentials_path.display(),
                e
            ))
        })?;

        let secrets: ClientSecrets = serde_json::from_str(&content)
            .map_err(|e| auth_error(&format!("Failed to parse client secret file: {}", e)))?;

        secrets
            .installed
            .or(secrets.web)
            .ok_or_else(|| auth_error("Client secret file has no 'installed' or 'web' section"))
    }

    /// Refresh an expired token
    async fn refresh_token(&self, token: &StoredToken) -> CalendarResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| auth_error("Token expired and has no refresh token"))?;

        let client_info = self.read_client().await?;
        let token_uri = client_info
            .token_uri
            .clone()
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

        let params = [
            ("client_id", client_info.client_id),
            ("client_secret", client_info.client_secret),
            ("refresh_token", refresh_token.clone()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let refreshed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        let expires_in = refreshed.expires_in.unwrap_or(3600);

        Ok(StoredToken {
            access_token: refreshed.access_token,
            token_type: refreshed.token_type.or_else(|| token.token_type.clone()),
            refresh_token: Some(refresh_token),
            expiry: Some(Utc::now() + Duration::seconds(expires_in)),
        })
    }

    async fn save_token(&self, token: &StoredToken) -> CalendarResult<()> {
        let json = serde_json::to_string_pretty(token)?;
        fs::write(&self.token_path, json).await?;
        info!("Saved refreshed token to {}", self.token_path.display());
        Ok(())
    }
}
