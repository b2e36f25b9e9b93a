//! Production implementation of HttpTransport using reqwest.

use crate::error::TransportError;
use crate::transport::HttpTransport;
use crate::types::{HttpRequest, HttpResponse, Method};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Production transport backed by a pooled `reqwest::Client`.
///
/// The timeout is client-wide and covers the whole exchange (connect,
/// request, body). Must be used from inside a tokio runtime.
pub struct ReqwestTransport {
    client: reqwest::Client,

    /// Base URL including the API prefix, e.g. `http://localhost:8000/api`
    base_url: Url,

    /// Client-wide request timeout
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a new transport for the given base URL.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Creates an Arc-wrapped transport for sharing across services.
    pub fn shared(base_url: Url, timeout: Duration) -> Result<Arc<Self>, TransportError> {
        Self::new(base_url, timeout).map(Arc::new)
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins the request path onto the base URL and encodes the query.
    ///
    /// `Url::join` would drop the `/api` prefix for absolute paths, so the
    /// path is appended textually.
    fn endpoint(&self, request: &HttpRequest) -> Result<Url, TransportError> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        let mut url =
            Url::parse(&raw).map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Maps a reqwest failure onto the transport error kinds.
    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout.as_millis() as u64)
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_redirect() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Decode(err.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.endpoint(&request)?;
        debug!("{} {}", request.method, url);

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.classify(e))?;
        let response = HttpResponse::from_text(status, &text);

        if !response.is_success() {
            return Err(TransportError::status(status, response.body));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> ReqwestTransport {
        ReqwestTransport::new(Url::parse(base).unwrap(), Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_api_prefix() {
        let t = transport("http://localhost:8000/api");
        let url = t.endpoint(&HttpRequest::get("/absolute")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/absolute");

        let t = transport("http://localhost:8000/api/");
        let url = t.endpoint(&HttpRequest::get("/simulation/results")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/simulation/results");
    }

    #[test]
    fn test_endpoint_encodes_query() {
        let t = transport("http://localhost:8000/api");
        let request = HttpRequest::get("/forces/field").with_query("type", "strong nuclear");
        let url = t.endpoint(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/forces/field?type=strong+nuclear"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Reserve a free port, then release it so nothing is listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let t = transport(&format!("http://127.0.0.1:{}/api", port));
        let err = t.send(HttpRequest::get("/absolute")).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)), "got {err:?}");
    }
}
