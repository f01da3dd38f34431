//! Privileged-token verification.
//!
//! An invalid or absent token is not an error: the submission simply
//! proceeds as anonymous. With an endpoint configured, tokens are verified
//! remotely and verdicts cached briefly; otherwise they are decoded
//! locally as HS256 JWTs against the configured secret.

use jsonwebtoken::{decode, DecodingKey, Validation};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use comment_core::AuthSettings;

/// Cache TTL for remote verification verdicts.
const VERDICT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Maximum cached verdicts.
const VERDICT_CACHE_MAX_CAPACITY: u64 = 10_000;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    valid: bool,
}

/// Token verifier with remote and local modes.
pub struct TokenVerifier {
    endpoint: Option<String>,
    secret: String,
    http: reqwest::Client,
    cache: Cache<String, bool>,
}

impl TokenVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            secret: settings.secret.clone(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("failed to create HTTP client"),
            cache: Cache::builder()
                .max_capacity(VERDICT_CACHE_MAX_CAPACITY)
                .time_to_live(VERDICT_CACHE_TTL)
                .build(),
        }
    }

    /// Whether `token` grants owner privileges.
    pub async fn verify(&self, token: Option<&str>) -> bool {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return false;
        };

        if let Some(cached) = self.cache.get(token).await {
            debug!("token verdict cache hit");
            return cached;
        }

        let valid = match &self.endpoint {
            Some(endpoint) => self.remote_verify(endpoint, token).await,
            None => self.local_verify(token),
        };

        self.cache.insert(token.to_string(), valid).await;
        valid
    }

    async fn remote_verify(&self, endpoint: &str, token: &str) -> bool {
        let body = serde_json::json!({ "token": token });
        let response = match self.http.post(endpoint).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "token verifier unreachable, treating as anonymous");
                return false;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "token verifier rejected the request");
            return false;
        }

        match response.json::<VerifyResponse>().await {
            Ok(v) => v.valid,
            Err(e) => {
                warn!(error = %e, "invalid verifier response, treating as anonymous");
                false
            }
        }
    }

    fn local_verify(&self, token: &str) -> bool {
        if self.secret.is_empty() {
            return false;
        }
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .is_ok()
    }
}
