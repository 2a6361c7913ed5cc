//! reqwest-backed upstream client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::UpstreamError;
use crate::upstream::{redacted, JsonFetcher};

/// Hard limit on each upstream call, body included.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the air-quality provider's API key.
pub const AIR_QUALITY_KEY_HEADER: &str = "X-API-Key";

/// A header attached to every request under `base`.
#[derive(Debug, Clone)]
struct HeaderAuth {
    base: Url,
    segments: Vec<String>,
    header: &'static str,
    value: String,
}

impl HeaderAuth {
    fn new(base: &str, header: &'static str, value: String) -> Result<Self, UpstreamError> {
        let base = Url::parse(base)
            .map_err(|e| UpstreamError::Transport(format!("invalid provider URL {base}: {e}")))?;
        let segments = base
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            base,
            segments,
            header,
            value,
        })
    }

    // Same origin, then a whole-segment path prefix so ".../v2" does not
    // cover ".../v2beta"
    fn applies_to(&self, url: &Url) -> bool {
        if url.scheme() != self.base.scheme()
            || url.host_str() != self.base.host_str()
            || url.port_or_known_default() != self.base.port_or_known_default()
        {
            return false;
        }

        let mut path = url.path_segments().into_iter().flatten();
        self.segments
            .iter()
            .all(|segment| path.next() == Some(segment.as_str()))
    }
}

// == Upstream Client ==
/// HTTP client shared by all provider adapters.
///
/// Provider-specific header authentication is attached here, so adapters
/// only ever build URLs.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    auth: Vec<HeaderAuth>,
}

impl UpstreamClient {
    /// Creates a client whose requests abort after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("country_info/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            auth: Vec::new(),
        })
    }

    /// Sends `header: value` on every request whose URL lives under `base_url`.
    ///
    /// `base_url` is compared after URL normalisation, so host case and an
    /// explicit default port do not matter.
    pub fn with_header_auth(
        mut self,
        base_url: &str,
        header: &'static str,
        value: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        self.auth.push(HeaderAuth::new(base_url, header, value.into())?);
        Ok(self)
    }

    /// Builds the production client: default timeout, air-quality key
    /// injected when configured.
    pub fn from_config(config: &Config) -> Result<Self, UpstreamError> {
        let client = Self::new(UPSTREAM_TIMEOUT)?;
        match &config.air_quality_api_key {
            Some(key) => client.with_header_auth(
                config.endpoints.air_quality.as_str(),
                AIR_QUALITY_KEY_HEADER,
                key.as_str(),
            ),
            None => Ok(client),
        }
    }

    fn classify(err: reqwest::Error, url: &Url) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout { url: redacted(url) }
        } else {
            // without_url keeps query-string API keys out of the message
            UpstreamError::Transport(err.without_url().to_string())
        }
    }
}

#[async_trait]
impl JsonFetcher for UpstreamClient {
    async fn get_json(&self, url: Url) -> Result<Value, UpstreamError> {
        let mut request = self.client.get(url.clone());
        for auth in self.auth.iter().filter(|auth| auth.applies_to(&url)) {
            request = request.header(auth.header, auth.value.as_str());
        }

        debug!("Upstream GET {}", redacted(&url));

        let resp = request.send().await.map_err(|e| Self::classify(e, &url))?;

        let status = resp.status();
        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(
                        "Could not read {} error body from {}: {}",
                        status,
                        redacted(&url),
                        e.without_url()
                    );
                    String::new()
                }
            };
            return Err(UpstreamError::http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                &body,
            ));
        }

        let bytes = resp.bytes().await.map_err(|e| Self::classify(e, &url))?;
        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::endpoint;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn url(server: &MockServer, suffix: &str) -> Url {
        Url::parse(&format!("{}{}", server.uri(), suffix)).unwrap()
    }

    #[tokio::test]
    async fn test_returns_parsed_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": 42})))
            .mount(&server)
            .await;

        let client = UpstreamClient::new(UPSTREAM_TIMEOUT).unwrap();
        let value = client.get_json(url(&server, "/ok")).await.unwrap();

        assert_eq!(value, json!({"answer": 42}));
    }

    #[tokio::test]
    async fn test_non_success_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client = UpstreamClient::new(UPSTREAM_TIMEOUT).unwrap();
        let err = client.get_json(url(&server, "/broken")).await.unwrap_err();

        assert_eq!(
            err,
            UpstreamError::Http {
                status: 503,
                status_text: "Service Unavailable".to_string(),
                body: "maintenance".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_truncated_error_body_keeps_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            // Promises 100 bytes, sends 7, then hangs up
            socket
                .write_all(b"HTTP/1.1 502 Bad Gateway\r\ncontent-length: 100\r\n\r\npartial")
                .await
                .unwrap();
        });

        let client = UpstreamClient::new(UPSTREAM_TIMEOUT).unwrap();
        let target = Url::parse(&format!("http://{addr}/broken")).unwrap();
        let err = client.get_json(target).await.unwrap_err();

        assert_eq!(
            err,
            UpstreamError::Http {
                status: 502,
                status_text: "Bad Gateway".to_string(),
                body: String::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = UpstreamClient::new(UPSTREAM_TIMEOUT).unwrap();
        let err = client.get_json(url(&server, "/html")).await.unwrap_err();

        assert!(matches!(err, UpstreamError::InvalidBody(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = UpstreamClient::new(Duration::from_millis(50)).unwrap();
        let err = client
            .get_json(url(&server, "/slow?appid=secret"))
            .await
            .unwrap_err();

        match err {
            UpstreamError::Timeout { url } => {
                assert!(url.ends_with("/slow"));
                assert!(!url.contains("secret"));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_header_auth_only_under_base_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/aq/locations"))
            .and(header(AIR_QUALITY_KEY_HEADER, "aq-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/other"))
            .and(header(AIR_QUALITY_KEY_HEADER, "aq-key"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/other"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = UpstreamClient::new(UPSTREAM_TIMEOUT)
            .unwrap()
            .with_header_auth(&format!("{}/aq", server.uri()), AIR_QUALITY_KEY_HEADER, "aq-key")
            .unwrap();

        assert!(client.get_json(url(&server, "/aq/locations")).await.is_ok());
        assert!(client.get_json(url(&server, "/other")).await.is_ok());
    }

    #[test]
    fn test_header_auth_prefix_boundary() {
        let auth =
            HeaderAuth::new("https://api.openaq.org/v2", AIR_QUALITY_KEY_HEADER, "k".to_string())
                .unwrap();

        assert!(auth.applies_to(&Url::parse("https://api.openaq.org/v2/locations").unwrap()));
        assert!(!auth.applies_to(&Url::parse("https://api.openaq.org/v2beta/x").unwrap()));
        assert!(!auth.applies_to(&Url::parse("https://api.openaq.org/v1/locations").unwrap()));
        assert!(!auth.applies_to(&Url::parse("http://api.openaq.org/v2/locations").unwrap()));
        assert!(!auth.applies_to(&Url::parse("https://example.com/v2/locations").unwrap()));
    }

    #[test]
    fn test_header_auth_matches_normalised_base() {
        let base = "https://API.openaq.org:443/v2/";
        let auth = HeaderAuth::new(base, AIR_QUALITY_KEY_HEADER, "k".to_string()).unwrap();
        let target = endpoint(base, &["locations"], &[("limit", "5")]).unwrap();

        assert_eq!(target.as_str(), "https://api.openaq.org/v2/locations?limit=5");
        assert!(auth.applies_to(&target));
    }

    #[test]
    fn test_header_auth_rejects_invalid_base() {
        let result = UpstreamClient::new(UPSTREAM_TIMEOUT).unwrap().with_header_auth(
            "not a url",
            AIR_QUALITY_KEY_HEADER,
            "k",
        );
        assert!(matches!(result, Err(UpstreamError::Transport(_))));
    }

    #[test]
    fn test_from_config_without_key_has_no_auth() {
        let client = UpstreamClient::from_config(&Config::default()).unwrap();
        assert!(client.auth.is_empty());

        let config = Config {
            air_quality_api_key: Some("k".to_string()),
            ..Config::default()
        };
        let client = UpstreamClient::from_config(&config).unwrap();
        assert_eq!(client.auth.len(), 1);
    }
}
