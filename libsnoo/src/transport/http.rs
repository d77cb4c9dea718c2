//! HTTP transport backed by reqwest

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::{Result, SnooError};
use crate::operation::Verb;
use crate::request::Request;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(SnooError::from)?;
        Ok(Self { http })
    }

    /// Wrap an already configured reqwest client (proxies, TLS roots, ...)
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    fn build_headers(request: &Request) -> Result<HeaderMap> {
        let mut out = HeaderMap::new();
        for (key, value) in &request.headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    SnooError::InvalidInput(format!("invalid header name: {}", key))
                })?,
                HeaderValue::from_str(value).map_err(|_| {
                    SnooError::InvalidInput(format!("invalid header value for {}", key))
                })?,
            );
        }
        Ok(out)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<String> {
        let headers = Self::build_headers(request)?;

        let builder = match request.verb {
            Verb::Get => self.http.get(&request.url),
            Verb::Post => self.http.post(&request.url),
        };
        let builder = match &request.body {
            Some(body) => builder.body(body.clone()),
            None => builder,
        };

        let response = builder.headers(headers).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} {} -> {}", request.verb, request.url, status);
            return Err(SnooError::Transport {
                status: status.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_headers_copies_request_headers() {
        let request = Request::new(Verb::Get, "https://example.test/api/me.json")
            .with_header("User-Agent", "libsnoo-test")
            .with_header("Cookie", "reddit_session=abc");

        let headers = HttpTransport::build_headers(&request).unwrap();
        assert_eq!(headers.get("user-agent").unwrap(), "libsnoo-test");
        assert_eq!(headers.get("cookie").unwrap(), "reddit_session=abc");
    }

    #[test]
    fn test_build_headers_rejects_invalid_value() {
        let request = Request::new(Verb::Get, "https://example.test/")
            .with_header("Cookie", "line\nbreak");

        assert!(matches!(
            HttpTransport::build_headers(&request),
            Err(SnooError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_new_with_timeout() {
        let config = ClientConfig::default().with_timeout(std::time::Duration::from_secs(5));
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let transport = HttpTransport::new(
            &ClientConfig::default().with_timeout(std::time::Duration::from_secs(5)),
        )
        .unwrap();
        let request = Request::new(Verb::Get, format!("http://127.0.0.1:{}/api/me.json", port));

        match transport.send(&request).await {
            Err(SnooError::Transport { status }) => {
                assert!(status.starts_with("network error:"), "status was {}", status)
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }
}
