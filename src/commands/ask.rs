use anyhow::Result;
use std::time::Duration;

use crate::commands::{ConfigOverrides, load_config, record};
use crate::digest::auth::AuthClient;
use crate::digest::chat::ChatClient;
use crate::digest::config::{AppConfig, Credentials};
use crate::digest::http::build_client;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_TEMPERATURE: f64 = 0.4;
const ASK_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AskOptions {
    pub text: String,
    pub system_prompt: String,
    pub temperature: f64,
    pub overrides: ConfigOverrides,
}

fn ask_once(cfg: &AppConfig, credentials: Credentials, opts: &AskOptions) -> Result<String> {
    let http = build_client(&cfg.tls)?;
    let token = AuthClient::new(http.clone(), cfg.auth.clone(), credentials).get_token()?;
    let reply = ChatClient::new(http, &cfg.chat)
        .with_temperature(opts.temperature)
        .with_timeout(Duration::from_secs(ASK_TIMEOUT_SECS))
        .complete(&opts.system_prompt, &opts.text, &token)?;
    Ok(reply)
}

pub fn run(opts: &AskOptions) -> Result<String> {
    if !(0.0..=2.0).contains(&opts.temperature) {
        anyhow::bail!(
            "invalid temperature {}: require 0 <= temperature <= 2",
            opts.temperature
        );
    }
    let cfg = load_config(&opts.overrides)?;
    let credentials = Credentials::from_env()?;

    let outcome = ask_once(&cfg, credentials, opts);

    match &outcome {
        Ok(_) => record(&cfg, "ask", None, "ok", ""),
        Err(err) => record(&cfg, "ask", None, "failed", &format!("{err:#}")),
    }
    outcome
}
