use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

pub const CLIENT_ID_VAR: &str = "GIGACHAT_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "GIGACHAT_CLIENT_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub url: String,
    pub scope: String,
    pub timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            url: "https://ngw.devices.sberbank.ru:9443/api/v2/oauth".to_string(),
            scope: "GIGACHAT_API_PERS".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub url: String,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            url: "https://gigachat.devices.sberbank.ru/api/v1/chat/completions".to_string(),
            model: "GigaChat".to_string(),
            temperature: 0.3,
            timeout_secs: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub max_chars: usize,
    pub language: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_chars: 3000,
            language: "Russian".to_string(),
        }
    }
}

/// Certificate handling for every outbound call.
///
/// `insecure` turns off certificate validation entirely. It exists for
/// vendors whose chain is not in the public roots; prefer `ca_cert`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TlsConfig {
    pub insecure: bool,
    pub ca_cert: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub auth: AuthConfig,
    pub chat: ChatConfig,
    pub fetch: FetchConfig,
    pub summary: SummaryConfig,
    pub tls: TlsConfig,
    pub audit_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialAppConfig {
    auth: Option<AuthConfig>,
    chat: Option<ChatConfig>,
    fetch: Option<FetchConfig>,
    summary: Option<SummaryConfig>,
    tls: Option<TlsConfig>,
    audit_log: Option<PathBuf>,
}

#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<Self, ConfigError> {
        let client_id = client_id.filter(|v| !v.trim().is_empty());
        let client_secret = client_secret.filter(|v| !v.trim().is_empty());
        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(Self {
                client_id: client_id.trim().to_string(),
                client_secret: client_secret.trim().to_string(),
            }),
            (id, secret) => {
                let mut missing = Vec::new();
                if id.is_none() {
                    missing.push(CLIENT_ID_VAR);
                }
                if secret.is_none() {
                    missing.push(CLIENT_SECRET_VAR);
                }
                Err(ConfigError::MissingCredentials(missing.join(" / ")))
            }
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(env::var(CLIENT_ID_VAR).ok(), env::var(CLIENT_SECRET_VAR).ok())
    }
}

fn env_or_f64(var: &str, fallback: f64) -> f64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<f64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => {
            let trimmed = v.trim();
            match trimmed {
                "1" | "true" | "TRUE" | "yes" | "on" => true,
                "0" | "false" | "FALSE" | "no" | "off" => false,
                _ => fallback,
            }
        }
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v.trim())),
        _ => None,
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::InvalidConfig(msg.to_string())
}

pub fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    if cfg.auth.url.trim().is_empty() {
        return Err(invalid("auth url cannot be empty"));
    }
    if cfg.auth.scope.trim().is_empty() {
        return Err(invalid("auth scope cannot be empty"));
    }
    if cfg.chat.url.trim().is_empty() {
        return Err(invalid("chat url cannot be empty"));
    }
    if cfg.chat.model.trim().is_empty() {
        return Err(invalid("chat model cannot be empty"));
    }
    let t = cfg.chat.temperature;
    if !(0.0..=2.0).contains(&t) {
        return Err(invalid("invalid chat temperature: require 0 <= temperature <= 2"));
    }
    if cfg.auth.timeout_secs == 0 || cfg.chat.timeout_secs == 0 || cfg.fetch.timeout_secs == 0 {
        return Err(invalid("invalid timeout: must be >= 1 second"));
    }
    if cfg.summary.max_chars == 0 {
        return Err(invalid("invalid summary max chars: must be >= 1"));
    }
    if cfg.summary.language.trim().is_empty() {
        return Err(invalid("summary language cannot be empty"));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Some(custom) = env_path("ARXSUM_CONFIG_PATH") {
        return Some(custom);
    }

    let base = dirs::config_dir()?;
    Some(base.join("arxsum").join("config.toml"))
}

fn merge_toml(base: &mut AppConfig, raw: &str) -> Result<(), String> {
    let parsed: PartialAppConfig = toml::from_str(raw).map_err(|err| err.to_string())?;
    if let Some(auth) = parsed.auth {
        base.auth = auth;
    }
    if let Some(chat) = parsed.chat {
        base.chat = chat;
    }
    if let Some(fetch) = parsed.fetch {
        base.fetch = fetch;
    }
    if let Some(summary) = parsed.summary {
        base.summary = summary;
    }
    if let Some(tls) = parsed.tls {
        base.tls = tls;
    }
    if parsed.audit_log.is_some() {
        base.audit_log = parsed.audit_log;
    }
    Ok(())
}

fn merge_file_config(base: &mut AppConfig) -> Result<(), ConfigError> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path).map_err(|err| {
        ConfigError::InvalidConfig(format!("failed to read {}: {err}", path.display()))
    })?;
    merge_toml(base, &raw).map_err(|err| {
        ConfigError::InvalidConfig(format!("failed to parse {}: {err}", path.display()))
    })
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut cfg = AppConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.auth.url = env_or_string("ARXSUM_AUTH_URL", &cfg.auth.url);
    cfg.auth.scope = env_or_string("ARXSUM_AUTH_SCOPE", &cfg.auth.scope);
    cfg.auth.timeout_secs = env_or_u64("ARXSUM_AUTH_TIMEOUT_SECS", cfg.auth.timeout_secs);
    cfg.chat.url = env_or_string("ARXSUM_CHAT_URL", &cfg.chat.url);
    cfg.chat.model = env_or_string("ARXSUM_MODEL", &cfg.chat.model);
    cfg.chat.temperature = env_or_f64("ARXSUM_TEMPERATURE", cfg.chat.temperature);
    cfg.chat.timeout_secs = env_or_u64("ARXSUM_CHAT_TIMEOUT_SECS", cfg.chat.timeout_secs);
    cfg.fetch.timeout_secs = env_or_u64("ARXSUM_FETCH_TIMEOUT_SECS", cfg.fetch.timeout_secs);
    cfg.summary.max_chars = env_or_usize("ARXSUM_MAX_CHARS", cfg.summary.max_chars);
    cfg.summary.language = env_or_string("ARXSUM_LANGUAGE", &cfg.summary.language);
    cfg.tls.insecure = env_or_bool("ARXSUM_INSECURE_TLS", cfg.tls.insecure);
    if let Some(ca_cert) = env_path("ARXSUM_CA_CERT") {
        cfg.tls.ca_cert = Some(ca_cert);
    }
    if let Some(audit_log) = env_path("ARXSUM_AUDIT_LOG") {
        cfg.audit_log = Some(audit_log);
    }

    validate(&cfg)?;
    Ok(cfg)
}
