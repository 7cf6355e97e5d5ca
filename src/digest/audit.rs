use crate::digest::util::{now_epoch_secs, truncate_with_ellipsis};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

const MAX_MESSAGE_CHARS: usize = 512;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub at_epoch_secs: u64,
    pub command: String,
    pub link: Option<String>,
    pub status: String,
    pub message: String,
}

impl AuditEvent {
    pub fn new(command: &str, link: Option<&str>, status: &str, message: &str) -> Result<Self> {
        Ok(Self {
            at_epoch_secs: now_epoch_secs()?,
            command: command.to_string(),
            link: link.map(str::to_string),
            status: status.to_string(),
            message: truncate_with_ellipsis(message, MAX_MESSAGE_CHARS),
        })
    }
}

pub fn append_event(path: &Path, event: &AuditEvent) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let line = format!("{}\n", serde_json::to_string(event)?);
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}
