use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::domain::{
    common::entities::app_errors::CoreError,
    extraction::{ports::CredentialProvider, value_objects::BearerToken},
};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Cached tokens are refreshed this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

/// Exchanges a service-account key file for an OAuth2 access token (JWT
/// bearer grant) and caches it until shortly before expiry.
#[derive(Debug, Clone)]
pub struct ServiceAccountCredentialProvider {
    credentials_path: Option<PathBuf>,
    client: Client,
    cached: Arc<RwLock<Option<BearerToken>>>,
}

impl ServiceAccountCredentialProvider {
    /// `timeout` bounds the token exchange the same way it bounds inference.
    pub fn new(
        credentials_path: Option<PathBuf>,
        timeout: std::time::Duration,
    ) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Configuration(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            credentials_path,
            client,
            cached: Arc::new(RwLock::new(None)),
        })
    }

    async fn cached_token(&self) -> Option<BearerToken> {
        let refresh_at = Utc::now() + Duration::seconds(REFRESH_MARGIN_SECS);
        self.cached
            .read()
            .await
            .as_ref()
            .filter(|token| !token.is_expired_at(refresh_at))
            .cloned()
    }

    async fn fetch_token(&self, path: &Path) -> Result<BearerToken, CoreError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            CoreError::Configuration(format!(
                "cannot read service account file {}: {}",
                path.display(),
                e
            ))
        })?;

        let key: ServiceAccountKey = serde_json::from_str(&raw).map_err(|e| {
            CoreError::Configuration(format!("invalid service account file: {}", e))
        })?;

        let assertion = self.sign_assertion(&key)?;

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("token request failed: {}", e);
                CoreError::Configuration(format!("failed to obtain Google access token: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("token endpoint error: {} - {}", status, error_text);
            return Err(CoreError::Configuration(format!(
                "failed to obtain Google access token: {} - {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            CoreError::Configuration(format!("invalid token endpoint response: {}", e))
        })?;

        Ok(BearerToken::new(
            token.access_token,
            Utc::now() + Duration::seconds(token.expires_in),
        ))
    }

    fn sign_assertion(&self, key: &ServiceAccountKey) -> Result<String, CoreError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| CoreError::Configuration(format!("invalid service account key: {}", e)))?;

        jsonwebtoken::encode(&header, &claims, &encoding_key)
            .map_err(|e| CoreError::Configuration(format!("cannot sign token assertion: {}", e)))
    }
}

impl CredentialProvider for ServiceAccountCredentialProvider {
    #[instrument(skip(self))]
    async fn acquire(&self) -> Result<BearerToken, CoreError> {
        if let Some(token) = self.cached_token().await {
            return Ok(token);
        }

        let path = self.credentials_path.as_deref().ok_or_else(|| {
            CoreError::Configuration("GOOGLE_APPLICATION_CREDENTIALS is not configured".into())
        })?;

        let token = self.fetch_token(path).await?;
        tracing::debug!(expires_at = %token.expires_at, "access token refreshed");

        *self.cached.write().await = Some(token.clone());
        Ok(token)
    }
}
