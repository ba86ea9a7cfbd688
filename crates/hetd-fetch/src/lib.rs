//! Calendar feed retrieval for teaching-hours reports.
//!
//! A [`Source`] is either an HTTP(S) URL, typically a private timetable
//! export link, or a path to a local `.ics` file. Failures are returned as
//! [`FetchError`]; there are no retries.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default request timeout for feed downloads.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("hetd/", env!("CARGO_PKG_VERSION"));

/// Fetch errors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source locator was empty.
    #[error("calendar source cannot be empty")]
    EmptySource,
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed. The URL is stripped, it may carry a token.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    /// Server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: reqwest::StatusCode },
    /// Local calendar file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the calendar comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// Interprets a locator: `http://`/`https://` are URLs, anything else is
    /// a file path (an optional `file://` prefix is stripped).
    ///
    /// # Errors
    ///
    /// Returns an error if the locator is empty or whitespace-only.
    pub fn parse(locator: &str) -> Result<Self, FetchError> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(FetchError::EmptySource);
        }

        let lower = locator.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Self::Url(locator.to_string()));
        }
        let path = locator.strip_prefix("file://").unwrap_or(locator);
        Ok(Self::File(PathBuf::from(path)))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Export links carry access tokens.
        match self {
            Self::Url(_) => f.debug_tuple("Url").field(&"[REDACTED]").finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Calendar feed client.
///
/// Cloning shares the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
}

impl Client {
    /// Creates a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self { http })
    }

    /// Returns the raw calendar text behind `source`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failures, non-2xx responses, or when a
    /// local file cannot be read.
    pub async fn fetch(&self, source: &Source) -> Result<String, FetchError> {
        match source {
            Source::Url(url) => self.fetch_url(url).await,
            Source::File(path) => {
                tracing::debug!(path = %path.display(), "reading calendar file");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| FetchError::Read {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }

    async fn fetch_url(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("downloading calendar feed");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(redacted_request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response.text().await.map_err(redacted_request_error)?;
        tracing::debug!(bytes = body.len(), "downloaded calendar feed");
        Ok(body)
    }
}

fn redacted_request_error(err: reqwest::Error) -> FetchError {
    FetchError::Request(err.without_url())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognizes_urls() {
        assert_eq!(
            Source::parse("https://example.org/cal.ics?token=abc").unwrap(),
            Source::Url("https://example.org/cal.ics?token=abc".to_string())
        );
        assert_eq!(
            Source::parse("  HTTP://example.org/a.ics ").unwrap(),
            Source::Url("HTTP://example.org/a.ics".to_string())
        );
    }

    #[test]
    fn parse_treats_other_locators_as_files() {
        assert_eq!(
            Source::parse("file:///tmp/cal.ics").unwrap(),
            Source::File(PathBuf::from("/tmp/cal.ics"))
        );
        assert_eq!(
            Source::parse("timetable.ics").unwrap(),
            Source::File(PathBuf::from("timetable.ics"))
        );
    }

    #[test]
    fn parse_rejects_empty_locator() {
        assert!(matches!(Source::parse("   "), Err(FetchError::EmptySource)));
    }

    #[test]
    fn debug_redacts_urls() {
        let source = Source::parse("https://example.org/cal.ics?token=secret").unwrap();
        let debug = format!("{source:?}");
        assert!(!debug.contains("secret"));
        assert_eq!(debug, r#"Url("[REDACTED]")"#);
    }

    #[tokio::test]
    async fn fetch_returns_body_on_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cal.ics")
            .with_status(200)
            .with_header("content-type", "text/calendar")
            .with_body("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n")
            .create_async()
            .await;

        let client = Client::new().unwrap();
        let source = Source::parse(&format!("{}/cal.ics", server.url())).unwrap();
        let body = client.fetch(&source).await.unwrap();

        assert_eq!(body, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_fails_on_http_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cal.ics")
            .with_status(404)
            .create_async()
            .await;

        let client = Client::new().unwrap();
        let source = Source::parse(&format!("{}/cal.ics", server.url())).unwrap();
        let err = client.fetch(&source).await.unwrap_err();

        assert!(matches!(
            err,
            FetchError::Status { status } if status == reqwest::StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn transport_errors_do_not_leak_the_url() {
        // Bind then release a port so the connection is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::new().unwrap();
        let source = Source::parse(&format!("http://{addr}/cal.ics?token=secret")).unwrap();
        let err = client.fetch(&source).await.unwrap_err();

        assert!(matches!(err, FetchError::Request(_)));
        assert!(!err.to_string().contains("secret"));
        assert!(!format!("{err:?}").contains("secret"));
    }

    #[tokio::test]
    async fn fetch_reads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.ics");
        std::fs::write(&path, "BEGIN:VCALENDAR\nEND:VCALENDAR\n").unwrap();

        let client = Client::new().unwrap();
        let body = client.fetch(&Source::File(path)).await.unwrap();
        assert_eq!(body, "BEGIN:VCALENDAR\nEND:VCALENDAR\n");
    }

    #[tokio::test]
    async fn fetch_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ics");

        let client = Client::new().unwrap();
        let err = client.fetch(&Source::File(path.clone())).await.unwrap_err();
        assert!(matches!(err, FetchError::Read { path: p, .. } if p == path));
    }
}
