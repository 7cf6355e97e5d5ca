pub mod ask;
pub mod article;
pub mod normalize;
pub mod summarize;

use anyhow::Result;

use crate::digest::audit::{self, AuditEvent};
use crate::digest::config::{self, AppConfig};
use crate::warn::{self, WarnEvent};

/// Command-line adjustments layered over the file and environment config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub insecure: bool,
    pub language: Option<String>,
    pub max_chars: Option<usize>,
}

pub fn load_config(overrides: &ConfigOverrides) -> Result<AppConfig> {
    let mut cfg = config::load_config()?;
    if overrides.insecure {
        cfg.tls.insecure = true;
    }
    if let Some(language) = overrides.language.as_deref() {
        cfg.summary.language = language.trim().to_string();
    }
    if let Some(max_chars) = overrides.max_chars {
        cfg.summary.max_chars = max_chars;
    }
    config::validate(&cfg)?;
    Ok(cfg)
}

/// Append one ledger line when an audit log is configured. Never fails the command.
pub fn record(cfg: &AppConfig, command: &str, link: Option<&str>, status: &str, message: &str) {
    let Some(path) = cfg.audit_log.as_deref() else {
        return;
    };
    let appended =
        AuditEvent::new(command, link, status, message).and_then(|e| audit::append_event(path, &e));
    if let Err(err) = appended {
        warn::emit(WarnEvent {
            code: "AUDIT_WRITE_FAILED",
            stage: "audit",
            action: "append-event",
            target: &path.display().to_string(),
            reason: "audit-log-append-failed",
            err: &format!("{err:#}"),
        });
    }
}
