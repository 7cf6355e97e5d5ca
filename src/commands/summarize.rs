use anyhow::Result;

use crate::commands::{ConfigOverrides, load_config, record};
use crate::digest::config::{AppConfig, Credentials};
use crate::digest::summarizer::{Summarizer, Summary};

#[derive(Debug, Clone)]
pub struct SummarizeOptions {
    pub link: String,
    pub overrides: ConfigOverrides,
}

fn summarize_once(cfg: &AppConfig, credentials: Credentials, link: &str) -> Result<Summary> {
    let summarizer = Summarizer::connect(cfg, credentials)?;
    Ok(summarizer.summarize(link)?)
}

pub fn run(opts: &SummarizeOptions) -> Result<String> {
    let cfg = load_config(&opts.overrides)?;
    let credentials = Credentials::from_env()?;

    let outcome = summarize_once(&cfg, credentials, &opts.link);

    let link = Some(opts.link.as_str());
    match &outcome {
        Ok(Summary::Unavailable(err)) => {
            record(&cfg, "summarize", link, "unavailable", &err.to_string())
        }
        Ok(Summary::Digest(_)) => record(&cfg, "summarize", link, "ok", ""),
        Err(err) => record(&cfg, "summarize", link, "failed", &format!("{err:#}")),
    }
    outcome.map(|summary| summary.to_string())
}
