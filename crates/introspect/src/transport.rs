//! Schema transport: how raw schema payloads are retrieved.

use crate::{Result, TransportError, INTROSPECTION_QUERY};
use futures::future::BoxFuture;
use graphql_config::RequestMethod;
use std::collections::BTreeMap;
use std::time::Duration;

/// Default timeout for schema requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Request options for one schema fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub method: RequestMethod,
    pub headers: BTreeMap<String, String>,
}

impl FetchOptions {
    #[must_use]
    pub fn new(method: RequestMethod, headers: BTreeMap<String, String>) -> Self {
        Self { method, headers }
    }
}

/// Retrieves the raw schema payload (SDL or introspection JSON) for a URL.
///
/// Injected into the schema cache; the cache never performs I/O itself.
pub trait SchemaTransport: Send + Sync {
    fn fetch_schema_source<'a>(
        &'a self,
        url: &'a str,
        options: &'a FetchOptions,
    ) -> BoxFuture<'a, Result<String>>;
}

/// [`SchemaTransport`] over HTTP(S).
///
/// `GET` returns the response body. `POST` sends the standard introspection
/// query as JSON and returns the response body. Non-2xx responses become
/// [`TransportError::Http`]. Each fetch sends exactly one request; the
/// schema cache decides when a failed fetch is tried again.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport with a 30 second request timeout and a 10 second connect
    /// timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeouts(
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Transport with custom timeouts.
    pub fn with_timeouts(timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    #[tracing::instrument(skip(self, options), fields(method = %options.method))]
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String> {
        let mut request = match options.method {
            RequestMethod::Get => self.client.get(url),
            RequestMethod::Post => self
                .client
                .post(url)
                .json(&serde_json::json!({ "query": INTROSPECTION_QUERY })),
        };

        for (name, value) in &options.headers {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|e| {
            let error = map_reqwest_error(e);
            tracing::warn!(error = %error, "Schema request failed");
            error
        })?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(TransportError::Http(status.as_u16(), error_body));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        tracing::debug!(bytes = body.len(), "Schema payload received");
        Ok(body)
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(error.to_string())
    } else if error.is_builder() || error.is_decode() {
        TransportError::Invalid(error.to_string())
    } else {
        TransportError::Network(error.to_string())
    }
}

impl SchemaTransport for HttpTransport {
    fn fetch_schema_source<'a>(
        &'a self,
        url: &'a str,
        options: &'a FetchOptions,
    ) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.fetch(url, options))
    }
}
