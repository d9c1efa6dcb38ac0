//! HTTP client for the operator's status pages.

use std::time::Duration;

use reqwest::Url;
use tracing::debug;

use super::MarkupSource;
use super::error::FetchError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("metro-server/", env!("CARGO_PKG_VERSION"));

/// Configuration for the status page client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Value sent in the User-Agent header
    pub user_agent: String,
}

impl FetchConfig {
    pub fn new() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client that fetches status pages.
///
/// Each fetch is a single GET with no retry.
#[derive(Debug, Clone)]
pub struct ArrivalClient {
    http: reqwest::Client,
}

impl ArrivalClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { http })
    }

    /// Fetch a page using the client's default timeout.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.get(url, None).await
    }

    /// Fetch a page with a caller-supplied timeout.
    pub async fn fetch_with_timeout(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        self.get(url, Some(timeout)).await
    }

    async fn get(&self, url: &str, timeout: Option<Duration>) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let mut request = self.http.get(parsed);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        debug!(url, bytes = body.len(), "fetched status page");
        Ok(body)
    }
}

impl MarkupSource for ArrivalClient {
    async fn fetch_markup(&self, url: &str) -> Result<String, FetchError> {
        self.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};

    /// Serve `router` on an ephemeral local port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn test_router() -> Router {
        Router::new()
            .route(
                "/stop",
                get(|| async { r#"<div style="padding-left: 5px"><b>Aeroport</b></div>"# }),
            )
            .route("/gone", get(|| async { StatusCode::NOT_FOUND }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "too late"
                }),
            )
    }

    #[test]
    fn config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.user_agent.starts_with("metro-server/"));
    }

    #[test]
    fn config_with_timeout() {
        let config = FetchConfig::new().with_timeout(3);
        assert_eq!(config.timeout_secs, 3);
    }

    #[tokio::test]
    async fn fetch_success_returns_body() {
        let base = serve(test_router()).await;
        let client = ArrivalClient::new(FetchConfig::default()).unwrap();

        let body = client.fetch(&format!("{base}/stop")).await.unwrap();
        assert!(body.contains("Aeroport"));
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let base = serve(test_router()).await;
        let client = ArrivalClient::new(FetchConfig::default()).unwrap();

        let err = client.fetch(&format!("{base}/gone")).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let base = serve(test_router()).await;
        let client = ArrivalClient::new(FetchConfig::default()).unwrap();

        let err = client
            .fetch_with_timeout(&format!("{base}/slow"), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ArrivalClient::new(FetchConfig::default()).unwrap();
        let err = client.fetch(&format!("http://{addr}/stop")).await.unwrap_err();
        assert!(matches!(err, FetchError::Http { .. }));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let client = ArrivalClient::new(FetchConfig::default()).unwrap();
        let err = client.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
