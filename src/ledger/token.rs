//! OAuth access tokens for the Sheets API.
//!
//! Service-account keys are exchanged through the JWT bearer grant; the
//! resulting token is cached until shortly before it expires.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use moka::future::Cache;
use serde::{Deserialize, Serialize};

use super::LedgerError;

const SHEETS_SCOPE: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECONDS: i64 = 60 * 60;
/// Tokens live one hour; refresh a few minutes early.
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(55 * 60);
const TOKEN_CACHE_KEY: &str = "sheets_access_token";

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, LedgerError>;
}

/// Fixed token, e.g. one minted with `gcloud auth print-access-token`.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, LedgerError> {
        Ok(self.token.clone())
    }
}

/// Fields of a Google service-account key file that the grant needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, LedgerError> {
        let raw = std::fs::read(path).map_err(|e| {
            LedgerError::Credentials(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_slice(&raw).map_err(|e| LedgerError::Credentials(e.to_string()))
    }
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
}

pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http_client: reqwest::Client,
    cache: Cache<String, String>,
}

impl ServiceAccountTokenProvider {
    pub fn new(key: ServiceAccountKey, http_client: reqwest::Client) -> Result<Self, LedgerError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| LedgerError::Credentials(format!("invalid private key: {}", e)))?;

        let cache = Cache::builder()
            .time_to_live(TOKEN_CACHE_TTL)
            .max_capacity(1)
            .build();

        Ok(Self {
            key,
            encoding_key,
            http_client,
            cache,
        })
    }

    fn signed_assertion(&self) -> Result<String, LedgerError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECONDS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| LedgerError::Token(e.to_string()))
    }

    async fn fetch_token(&self) -> Result<String, LedgerError> {
        let assertion = self.signed_assertion()?;
        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Token(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response.json().await?;
        log::debug!("Obtained new Sheets access token for {}", self.key.client_email);
        Ok(token.access_token)
    }
}

#[async_trait]
impl AccessTokenProvider for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String, LedgerError> {
        if let Some(token) = self.cache.get(TOKEN_CACHE_KEY).await {
            return Ok(token);
        }

        let token = self.fetch_token().await?;
        self.cache
            .insert(TOKEN_CACHE_KEY.to_string(), token.clone())
            .await;
        Ok(token)
    }
}
