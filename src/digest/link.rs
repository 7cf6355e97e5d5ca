//! Canonical PDF links for arXiv-style article URLs.
//!
//! Accepted shapes (any host, http or https):
//! - `https://arxiv.org/abs/1804.08875`
//! - `https://arxiv.org/pdf/1804.08875`
//! - `https://arxiv.org/pdf/1804.08875.pdf`
//!
//! All three become `https://arxiv.org/pdf/1804.08875`. Anything else is
//! passed through untouched.

use regex::Regex;
use std::sync::OnceLock;

static ABS_LINK: OnceLock<Option<Regex>> = OnceLock::new();
static PDF_LINK: OnceLock<Option<Regex>> = OnceLock::new();

fn abs_link() -> Option<&'static Regex> {
    ABS_LINK
        .get_or_init(|| Regex::new(r"^(https?://[^/\s]+)/abs/([0-9]+\.[0-9]+)").ok())
        .as_ref()
}

fn pdf_link() -> Option<&'static Regex> {
    PDF_LINK
        .get_or_init(|| Regex::new(r"^(https?://[^/\s]+)/pdf/([0-9]+\.[0-9]+)(?:\.pdf)?$").ok())
        .as_ref()
}

pub fn normalize(link: &str) -> String {
    let link = link.trim();

    if let Some(caps) = abs_link().and_then(|re| re.captures(link)) {
        return format!("{}/pdf/{}", &caps[1], &caps[2]);
    }

    if let Some(caps) = pdf_link().and_then(|re| re.captures(link)) {
        return format!("{}/pdf/{}", &caps[1], &caps[2]);
    }

    link.to_string()
}
