use crate::digest::config::{AuthConfig, Credentials};
use crate::digest::http::body_text;
use crate::error::AuthError;
use reqwest::blocking::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Short-lived bearer token. Never cached: every holder fetched its own.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    /// Expiry as reported by the vendor, epoch milliseconds.
    pub expires_at: Option<u64>,
}

impl AccessToken {
    #[cfg(test)]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expires_at: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

pub struct AuthClient {
    http: Client,
    config: AuthConfig,
    credentials: Credentials,
}

fn parse_token_payload(raw: &str) -> Result<AccessToken, AuthError> {
    let missing = || AuthError::MissingToken {
        payload: raw.to_string(),
    };
    let json: Value = serde_json::from_str(raw).map_err(|_| missing())?;
    let value = json
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(missing)?;

    Ok(AccessToken {
        value: value.to_string(),
        expires_at: json.get("expires_at").and_then(Value::as_u64),
    })
}

impl AuthClient {
    pub fn new(http: Client, config: AuthConfig, credentials: Credentials) -> Self {
        Self {
            http,
            config,
            credentials,
        }
    }

    /// One full OAuth round trip. Each call carries a fresh `RqUID`.
    pub fn get_token(&self) -> Result<AccessToken, AuthError> {
        let response = self
            .http
            .post(&self.config.url)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header("RqUID", Uuid::new_v4().to_string())
            .header("Accept", "application/json")
            .form(&[("scope", self.config.scope.as_str())])
            .send()
            .map_err(AuthError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status {
                status: status.as_u16(),
                body: body_text(response),
            });
        }

        let raw = response.text().map_err(AuthError::Transport)?;
        parse_token_payload(&raw)
    }
}
