use crate::digest::config::TlsConfig;
use crate::error::ConfigError;
use crate::warn::{self, WarnEvent};
use reqwest::Certificate;
use reqwest::blocking::Client;
use std::fs;

const USER_AGENT: &str = concat!("arxsum/", env!("CARGO_PKG_VERSION"));

/// Build the blocking client shared by the fetcher, auth and chat calls.
///
/// Per-call timeouts are set on each request, not here.
pub fn build_client(tls: &TlsConfig) -> Result<Client, ConfigError> {
    let mut builder = Client::builder().user_agent(USER_AGENT);

    if let Some(path) = tls.ca_cert.as_deref() {
        let pem = fs::read(path).map_err(|err| {
            ConfigError::InvalidConfig(format!(
                "failed to read CA bundle {}: {err}",
                path.display()
            ))
        })?;
        let cert = Certificate::from_pem(&pem).map_err(|err| {
            ConfigError::InvalidConfig(format!("invalid CA bundle {}: {err}", path.display()))
        })?;
        builder = builder.add_root_certificate(cert);
    }

    if tls.insecure {
        warn::emit(WarnEvent {
            code: "INSECURE_TLS",
            stage: "http",
            action: "build-client",
            target: "all-outbound-requests",
            reason: "certificate validation disabled by tls.insecure / ARXSUM_INSECURE_TLS",
            err: "",
        });
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().map_err(ConfigError::HttpClient)
}

/// Read a response body for diagnostics without failing the caller.
pub fn body_text(response: reqwest::blocking::Response) -> String {
    response.text().unwrap_or_default()
}
