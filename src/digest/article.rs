use crate::digest::config::FetchConfig;
use crate::digest::link::normalize;
use crate::error::NotAvailable;
use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// `pdf-extract` backed extraction of in-memory PDF bytes.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).context("failed to extract text from PDF bytes")
    }
}

/// Run the extractor, turning a panic into an ordinary error.
///
/// pdf-extract panics instead of erroring on some malformed streams.
fn extract_guarded(extractor: &dyn TextExtractor, bytes: &[u8]) -> Result<String> {
    panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(bytes)))
        .unwrap_or_else(|_| Err(anyhow!("PDF parser panicked on malformed input")))
}

pub struct ArticleFetcher {
    http: Client,
    timeout: Duration,
    extractor: Box<dyn TextExtractor>,
}

impl ArticleFetcher {
    pub fn new(http: Client, config: &FetchConfig) -> Self {
        Self::with_extractor(http, config, Box::new(PdfTextExtractor))
    }

    pub fn with_extractor(
        http: Client,
        config: &FetchConfig,
        extractor: Box<dyn TextExtractor>,
    ) -> Self {
        Self {
            http,
            timeout: Duration::from_secs(config.timeout_secs),
            extractor,
        }
    }

    /// Download the article behind `link` and return its trimmed text.
    ///
    /// Single attempt. No length limit is applied here.
    pub fn fetch_text(&self, link: &str) -> Result<String, NotAvailable> {
        let url = normalize(link);

        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .map_err(|source| NotAvailable::Unreachable {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotAvailable::BadStatus {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|source| NotAvailable::Unreachable {
                url: url.clone(),
                source,
            })?;
        if bytes.is_empty() {
            return Err(NotAvailable::EmptyBody { url });
        }

        let text = extract_guarded(self.extractor.as_ref(), &bytes).map_err(|err| {
            NotAvailable::Corrupted {
                url: url.clone(),
                reason: format!("{err:#}"),
            }
        })?;

        let text = text.trim();
        if text.is_empty() {
            return Err(NotAvailable::EmptyText { url });
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{ArticleFetcher, PdfTextExtractor, TextExtractor};
    use crate::digest::config::FetchConfig;
    use crate::error::NotAvailable;
    use anyhow::Result;
    use mockito::Server;
    use reqwest::blocking::Client;
    use std::net::TcpListener;

    const HELLO_PDF: &[u8] = include_bytes!("../../tests/fixtures/hello.pdf");

    pub(crate) struct FixedText(pub String);

    impl TextExtractor for FixedText {
        fn extract(&self, _bytes: &[u8]) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct Panicking;

    impl TextExtractor for Panicking {
        fn extract(&self, _bytes: &[u8]) -> Result<String> {
            panic!("broken xref table")
        }
    }

    fn fetcher_with(text: &str) -> ArticleFetcher {
        ArticleFetcher::with_extractor(
            Client::new(),
            &FetchConfig::default(),
            Box::new(FixedText(text.to_string())),
        )
    }

    #[test]
    fn fetch_text_normalizes_link_and_trims_text() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/pdf/1804.08875")
            .with_status(200)
            .with_body("%PDF-1.4 fake")
            .expect(1)
            .create();

        let text = fetcher_with("\n  Attention is all you need.  \n")
            .fetch_text(&format!("{}/abs/1804.08875", server.url()))
            .expect("text");
        assert_eq!(text, "Attention is all you need.");
        mock.assert();
    }

    #[test]
    fn non_success_status_is_not_available() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/pdf/1804.08875").with_status(404).create();

        let link = format!("{}/pdf/1804.08875.pdf", server.url());
        let err = fetcher_with("text").fetch_text(&link).expect_err("404");
        match err {
            NotAvailable::BadStatus { url, status } => {
                assert_eq!(status, 404);
                assert_eq!(url, format!("{}/pdf/1804.08875", server.url()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_body_is_not_available() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/pdf/1804.08875")
            .with_status(200)
            .with_body("")
            .create();

        let err = fetcher_with("text")
            .fetch_text(&format!("{}/pdf/1804.08875", server.url()))
            .expect_err("empty");
        assert!(matches!(err, NotAvailable::EmptyBody { .. }));
    }

    #[test]
    fn whitespace_only_text_is_not_available() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/pdf/1804.08875")
            .with_status(200)
            .with_body("%PDF-1.4 fake")
            .create();

        let err = fetcher_with(" \n\t ")
            .fetch_text(&format!("{}/pdf/1804.08875", server.url()))
            .expect_err("blank");
        assert!(matches!(err, NotAvailable::EmptyText { .. }));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn garbage_bytes_are_reported_as_corrupted_pdf() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/pdf/1804.08875")
            .with_status(200)
            .with_body("this is not a pdf")
            .create();

        let fetcher = ArticleFetcher::with_extractor(
            Client::new(),
            &FetchConfig::default(),
            Box::new(PdfTextExtractor),
        );
        let err = fetcher
            .fetch_text(&format!("{}/pdf/1804.08875", server.url()))
            .expect_err("corrupted");
        assert!(matches!(err, NotAvailable::Corrupted { .. }));
    }

    #[test]
    fn extractor_panic_is_reported_as_corrupted_pdf() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/pdf/1804.08875")
            .with_status(200)
            .with_body("%PDF-1.4 fake")
            .create();

        let fetcher = ArticleFetcher::with_extractor(
            Client::new(),
            &FetchConfig::default(),
            Box::new(Panicking),
        );
        let err = fetcher
            .fetch_text(&format!("{}/pdf/1804.08875", server.url()))
            .expect_err("panic");
        match err {
            NotAvailable::Corrupted { reason, .. } => {
                assert_eq!(reason, "PDF parser panicked on malformed input");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pdf_extractor_reads_text_from_real_pdf() {
        let text = PdfTextExtractor.extract(HELLO_PDF).expect("text");
        assert!(text.contains("Hello arxsum"), "got {text:?}");
    }

    #[test]
    fn unreachable_host_is_not_available() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);
        let link = format!("http://127.0.0.1:{port}/pdf/1804.08875");

        let err = fetcher_with("text").fetch_text(&link).expect_err("refused");
        assert!(matches!(err, NotAvailable::Unreachable { .. }));
        assert!(err.to_string().contains("/pdf/1804.08875"));
    }
}
