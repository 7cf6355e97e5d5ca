use crate::digest::article::ArticleFetcher;
use crate::digest::auth::{AccessToken, AuthClient};
use crate::digest::chat::ChatClient;
use crate::digest::config::{AppConfig, Credentials, SummaryConfig};
use crate::digest::http::build_client;
use crate::digest::util::truncate_chars;
use crate::error::{ArxsumError, NotAvailable, RequestError};
use std::fmt;

pub const ERROR_MARKER: &str = "Error:";
pub const EDITOR_PERSONA: &str = "You are a careful scientific editor.";

fn summary_instructions(language: &str) -> String {
    format!(
        "Summarize the scientific article below and translate the summary into {language}.\n\
         Requirements:\n\
         1) 7-12 bullet points.\n\
         2) On a separate line: 'Key ideas:' followed by 3-6 items.\n\
         3) No invented facts. If the text does not contain enough information, say so.\n"
    )
}

/// User message for the chat call: instructions plus at most `max_chars` of article text.
pub fn build_user_content(text: &str, settings: &SummaryConfig) -> String {
    let excerpt = truncate_chars(text, settings.max_chars);
    format!(
        "{}\n\nArticle text:\n{excerpt}",
        summary_instructions(&settings.language)
    )
}

/// Result of one summarize call that did not fail outright.
#[derive(Debug)]
pub enum Summary {
    /// The model's reply, verbatim.
    Digest(String),
    /// The article could not be fetched or read; rendered as an `Error: ...` line.
    Unavailable(NotAvailable),
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Digest(text) => f.write_str(text),
            Summary::Unavailable(err) => write!(f, "{ERROR_MARKER} {err}"),
        }
    }
}

/// Link-to-summary pipeline.
///
/// The bearer token is fetched once in [`Summarizer::connect`]; a summarizer
/// is meant to live for a single top-level invocation.
pub struct Summarizer {
    fetcher: ArticleFetcher,
    chat: ChatClient,
    token: AccessToken,
    settings: SummaryConfig,
}

impl Summarizer {
    pub fn connect(cfg: &AppConfig, credentials: Credentials) -> Result<Self, ArxsumError> {
        let http = build_client(&cfg.tls)?;
        let token = AuthClient::new(http.clone(), cfg.auth.clone(), credentials).get_token()?;
        Ok(Self::from_parts(
            ArticleFetcher::new(http.clone(), &cfg.fetch),
            ChatClient::new(http, &cfg.chat),
            token,
            cfg.summary.clone(),
        ))
    }

    pub fn from_parts(
        fetcher: ArticleFetcher,
        chat: ChatClient,
        token: AccessToken,
        settings: SummaryConfig,
    ) -> Self {
        Self {
            fetcher,
            chat,
            token,
            settings,
        }
    }

    /// Summarize the article behind `link`.
    ///
    /// An unavailable article comes back as [`Summary::Unavailable`] in `Ok`;
    /// chat failures are returned as errors.
    pub fn summarize(&self, link: &str) -> Result<Summary, RequestError> {
        let text = match self.fetcher.fetch_text(link) {
            Ok(text) => text,
            Err(err) => return Ok(Summary::Unavailable(err)),
        };

        let user_content = build_user_content(&text, &self.settings);
        self.chat
            .complete(EDITOR_PERSONA, &user_content, &self.token)
            .map(Summary::Digest)
    }
}

#[cfg(test)]
mod tests {
    use super::{EDITOR_PERSONA, ERROR_MARKER, Summarizer, Summary, build_user_content};
    use crate::digest::article::ArticleFetcher;
    use crate::digest::article::tests::FixedText;
    use crate::digest::auth::AccessToken;
    use crate::digest::chat::ChatClient;
    use crate::digest::config::{ChatConfig, FetchConfig, SummaryConfig};
    use crate::error::{NotAvailable, RequestError};
    use mockito::{Matcher, Server};
    use reqwest::blocking::Client;
    use serde_json::json;

    fn summarizer_for(server: &Server, article_text: &str) -> Summarizer {
        let http = Client::new();
        let chat = ChatClient::new(
            http.clone(),
            &ChatConfig {
                url: format!("{}/api/v1/chat/completions", server.url()),
                ..ChatConfig::default()
            },
        );
        let fetcher = ArticleFetcher::with_extractor(
            http,
            &FetchConfig::default(),
            Box::new(FixedText(article_text.to_string())),
        );
        Summarizer::from_parts(
            fetcher,
            chat,
            AccessToken::new("tok-1"),
            SummaryConfig::default(),
        )
    }

    #[test]
    fn user_content_truncates_article_text() {
        let text = format!("{}{}", "a".repeat(3000), "∆".repeat(2000));
        let content = build_user_content(&text, &SummaryConfig::default());
        assert!(content.contains(&"a".repeat(3000)));
        assert!(!content.contains('∆'));
        assert!(content.contains("7-12 bullet points"));
        assert!(content.contains("Key ideas:"));
        assert!(content.contains("Russian"));
        assert!(content.contains("No invented facts"));
    }

    #[test]
    fn summarize_relays_chat_reply_verbatim() {
        let mut server = Server::new();
        let article = server
            .mock("GET", "/pdf/1804.08875")
            .with_status(200)
            .with_body("%PDF-1.4 fake")
            .expect(1)
            .create();
        let excerpt = "x".repeat(3000);
        let chat = server
            .mock("POST", "/api/v1/chat/completions")
            .match_header("authorization", "Bearer tok-1")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({"model": "GigaChat", "temperature": 0.3})),
                Matcher::Regex(regex::escape(&format!(
                    r#"{{"role":"system","content":"{EDITOR_PERSONA}"}},{{"role":"user""#
                ))),
                Matcher::Regex(format!(r#"Article text:\\n{excerpt}""#)),
            ]))
            .with_status(200)
            .with_body(json!({"choices": [{"message": {"content": "- point one\n- point two"}}]}).to_string())
            .expect(1)
            .create();

        let summarizer = summarizer_for(&server, &"x".repeat(5000));
        let summary = summarizer
            .summarize(&format!("{}/abs/1804.08875", server.url()))
            .expect("summary");
        assert!(matches!(&summary, Summary::Digest(text) if text == "- point one\n- point two"));
        assert_eq!(summary.to_string(), "- point one\n- point two");
        article.assert();
        chat.assert();
    }

    #[test]
    fn unavailable_article_becomes_error_line() {
        let mut server = Server::new();
        let _article = server.mock("GET", "/pdf/1804.08875").with_status(503).create();
        let chat = server
            .mock("POST", "/api/v1/chat/completions")
            .expect(0)
            .create();

        let summarizer = summarizer_for(&server, "unused");
        let out = summarizer
            .summarize(&format!("{}/pdf/1804.08875", server.url()))
            .expect("availability errors are not propagated");
        assert!(matches!(
            out,
            Summary::Unavailable(NotAvailable::BadStatus { status: 503, .. })
        ));
        let line = out.to_string();
        assert!(line.starts_with(ERROR_MARKER));
        assert!(line.contains("503"));
        chat.assert();
    }

    #[test]
    fn reply_starting_with_error_marker_is_still_a_digest() {
        let mut server = Server::new();
        let _article = server
            .mock("GET", "/pdf/1804.08875")
            .with_status(200)
            .with_body("%PDF-1.4 fake")
            .create();
        let _chat = server
            .mock("POST", "/api/v1/chat/completions")
            .with_status(200)
            .with_body(
                json!({"choices": [{"message": {"content": "Error: the paper retracts itself"}}]})
                    .to_string(),
            )
            .create();

        let summary = summarizer_for(&server, "some article text")
            .summarize(&format!("{}/pdf/1804.08875", server.url()))
            .expect("summary");
        assert!(matches!(summary, Summary::Digest(_)));
    }

    #[test]
    fn chat_failure_is_propagated() {
        let mut server = Server::new();
        let _article = server
            .mock("GET", "/pdf/1804.08875")
            .with_status(200)
            .with_body("%PDF-1.4 fake")
            .create();
        let _chat = server
            .mock("POST", "/api/v1/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create();

        let summarizer = summarizer_for(&server, "some article text");
        let err = summarizer
            .summarize(&format!("{}/pdf/1804.08875", server.url()))
            .expect_err("chat failure");
        assert!(matches!(err, RequestError::Status { status: 429, .. }));
    }
}
