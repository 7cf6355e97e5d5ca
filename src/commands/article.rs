use anyhow::Result;

use crate::commands::{ConfigOverrides, load_config, record};
use crate::digest::article::ArticleFetcher;
use crate::digest::http::build_client;
use crate::digest::util::truncate_chars;

pub const DEFAULT_PREVIEW_CHARS: usize = 1000;

#[derive(Debug, Clone)]
pub struct ArticleOptions {
    pub link: String,
    pub chars: usize,
    pub overrides: ConfigOverrides,
}

/// Fetch an article and return the first `chars` characters of its text.
pub fn run(opts: &ArticleOptions) -> Result<String> {
    let cfg = load_config(&opts.overrides)?;
    let http = build_client(&cfg.tls)?;
    let fetcher = ArticleFetcher::new(http, &cfg.fetch);

    let link = Some(opts.link.as_str());
    match fetcher.fetch_text(&opts.link) {
        Ok(text) => {
            record(&cfg, "article", link, "ok", "");
            Ok(truncate_chars(&text, opts.chars).to_string())
        }
        Err(err) => {
            record(&cfg, "article", link, "unavailable", &err.to_string());
            Err(err.into())
        }
    }
}
