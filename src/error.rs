use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required credentials: set {0}")]
    MissingCredentials(String),
    #[error("config invalid or unreadable: {0}")]
    InvalidConfig(String),
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("authorization failed: {status} {body}")]
    Status { status: u16, body: String },
    #[error("access_token missing in token response: {payload}")]
    MissingToken { payload: String },
}

/// The article behind a link could not be turned into text.
#[derive(Debug, Error)]
pub enum NotAvailable {
    #[error("link unavailable: {url}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("link unavailable: {url} (status {status})")]
    BadStatus { url: String, status: u16 },
    #[error("link unavailable: {url} (empty response body)")]
    EmptyBody { url: String },
    #[error("failed to extract text from PDF at {url} (corrupted or unsupported PDF): {reason}")]
    Corrupted { url: String, reason: String },
    #[error("article text is empty: {url} has no recognizable text")]
    EmptyText { url: String },
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("chat endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("chat request failed: {status} {body}")]
    Status { status: u16, body: String },
    #[error("unexpected chat response shape: {payload}")]
    UnexpectedShape { payload: String },
}

#[derive(Debug, Error)]
pub enum ArxsumError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    NotAvailable(#[from] NotAvailable),
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[cfg(test)]
mod tests {
    use super::{ArxsumError, ConfigError, NotAvailable, RequestError};

    #[test]
    fn not_available_messages_name_the_url() {
        let err = NotAvailable::BadStatus {
            url: "https://arxiv.org/pdf/1804.08875".to_string(),
            status: 404,
        };
        let text = err.to_string();
        assert!(text.contains("https://arxiv.org/pdf/1804.08875"));
        assert!(text.contains("404"));
    }

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err: ArxsumError = ConfigError::MissingCredentials("GIGACHAT_CLIENT_ID".into()).into();
        assert!(matches!(err, ArxsumError::Config(_)));
        assert_eq!(
            err.to_string(),
            "missing required credentials: set GIGACHAT_CLIENT_ID"
        );

        let err: ArxsumError = RequestError::UnexpectedShape {
            payload: "{}".into(),
        }
        .into();
        assert!(err.to_string().contains("{}"));
    }
}
