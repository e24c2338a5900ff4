//! OAuth access tokens for a service account (JWT bearer grant).

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::credentials::ServiceAccountKey;
use crate::error::{Result, SparkIndexError};

/// OAuth scope required by the Indexing API
pub const INDEXING_SCOPE: &str = "https://www.googleapis.com/auth/indexing";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the server-reported expiry
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

/// A bearer token and when it stops being valid
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Exchanges signed service-account assertions for access tokens and caches
/// the current one until shortly before it expires.
pub struct TokenProvider {
    client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(client: Client, key: ServiceAccountKey, scope: &str) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            SparkIndexError::Credentials(format!("Service account private_key is not a valid RSA key: {}", e))
        })?;

        Ok(Self {
            client,
            key,
            encoding_key,
            scope: scope.to_string(),
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Current access token, fetching a new one when missing or near expiry
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
            log::debug!("Access token expiring at {}, refreshing", token.expires_at);
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| SparkIndexError::Credentials(format!("Failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self) -> Result<AccessToken> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| SparkIndexError::Indexing(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(SparkIndexError::Indexing(format!(
                "Token exchange error {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SparkIndexError::Indexing(format!("Failed to parse token response: {}", e)))?;

        log::debug!("Obtained access token for {} (expires in {}s)", self.key.client_email, token.expires_in);

        Ok(AccessToken {
            value: token.access_token,
            expires_at: now + ChronoDuration::seconds(token.expires_in),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub(crate) const TEST_PRIVATE_KEY: &str = include_str!("testdata/test_key.pem");

    pub(crate) fn test_key(token_uri: &str) -> ServiceAccountKey {
        ServiceAccountKey {
            client_email: "indexer@sparklocal.iam.gserviceaccount.com".to_string(),
            private_key: TEST_PRIVATE_KEY.to_string(),
            token_uri: token_uri.to_string(),
            project_id: Some("sparklocal".to_string()),
            private_key_id: Some("key-1".to_string()),
        }
    }

    #[test]
    fn test_rejects_invalid_private_key() {
        let mut key = test_key("https://oauth2.googleapis.com/token");
        key.private_key = "not a pem".to_string();
        let result = TokenProvider::new(Client::new(), key, INDEXING_SCOPE);
        assert!(matches!(result, Err(SparkIndexError::Credentials(_))));
    }

    #[test]
    fn test_assertion_has_three_segments() {
        let provider =
            TokenProvider::new(Client::new(), test_key("https://oauth2.googleapis.com/token"), INDEXING_SCOPE)
                .unwrap();
        let jwt = provider.assertion(Utc::now()).unwrap();
        assert_eq!(jwt.split('.').count(), 3);
    }

    #[test]
    fn test_token_freshness() {
        let now = Utc::now();
        let fresh = AccessToken {
            value: "a".to_string(),
            expires_at: now + ChronoDuration::seconds(600),
        };
        let stale = AccessToken {
            value: "b".to_string(),
            expires_at: now + ChronoDuration::seconds(30),
        };
        assert!(fresh.is_fresh(now));
        assert!(!stale.is_fresh(now));
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .and(body_string_contains("assertion="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.test",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = TokenProvider::new(
            Client::new(),
            test_key(&format!("{}/token", server.uri())),
            INDEXING_SCOPE,
        )
        .unwrap();

        assert_eq!(provider.access_token().await.unwrap(), "ya29.test");
        assert_eq!(provider.access_token().await.unwrap(), "ya29.test");
    }

    #[tokio::test]
    async fn test_token_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
            .mount(&server)
            .await;

        let provider = TokenProvider::new(
            Client::new(),
            test_key(&format!("{}/token", server.uri())),
            INDEXING_SCOPE,
        )
        .unwrap();

        let err = provider.access_token().await.unwrap_err();
        assert!(err.to_string().contains("invalid_grant"));
    }
}
