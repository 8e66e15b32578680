//! Scripted [`SchemaTransport`] for cache and adapter tests.
//!
//! Responses are looked up per URL: one-shot responses queued with
//! [`FakeTransport::enqueue`] are consumed first, then the persistent
//! response registered with [`FakeTransport::serve`] or
//! [`FakeTransport::fail`]. Unknown URLs answer with HTTP 404.

use futures::future::BoxFuture;
use graphql_introspect::{FetchOptions, SchemaTransport, TransportError};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

type Response = Result<String, TransportError>;

/// Holds back a queued response until opened.
#[derive(Debug, Clone)]
pub struct Gate {
    notify: Arc<Notify>,
}

impl Gate {
    /// Release the response.
    pub fn open(&self) {
        self.notify.notify_one();
    }
}

struct Scripted {
    response: Response,
    gate: Option<Arc<Notify>>,
}

/// A recorded fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub options: FetchOptions,
}

#[derive(Default)]
pub struct FakeTransport {
    persistent: Mutex<HashMap<String, Response>>,
    queued: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    fetches: AtomicUsize,
    delay: Option<Duration>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer every fetch of `url` with `payload`.
    pub fn serve(&self, url: &str, payload: &str) -> &Self {
        self.persistent
            .lock()
            .insert(url.to_string(), Ok(payload.to_string()));
        self
    }

    /// Fail every fetch of `url` with `error`.
    pub fn fail(&self, url: &str, error: TransportError) -> &Self {
        self.persistent.lock().insert(url.to_string(), Err(error));
        self
    }

    /// Answer the next fetch of `url` with `response`.
    pub fn enqueue(&self, url: &str, response: Response) -> &Self {
        self.push(url, response, None);
        self
    }

    /// Answer the next fetch of `url` with `response` once the returned
    /// gate is opened.
    pub fn enqueue_gated(&self, url: &str, response: Response) -> Gate {
        let notify = Arc::new(Notify::new());
        self.push(url, response, Some(Arc::clone(&notify)));
        Gate { notify }
    }

    /// Number of fetches started so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Every fetch started so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    fn push(&self, url: &str, response: Response, gate: Option<Arc<Notify>>) {
        self.queued
            .lock()
            .entry(url.to_string())
            .or_default()
            .push_back(Scripted { response, gate });
    }

    fn next_response(&self, url: &str) -> Scripted {
        if let Some(scripted) = self.queued.lock().get_mut(url).and_then(VecDeque::pop_front) {
            return scripted;
        }
        let response = self
            .persistent
            .lock()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(TransportError::Http(404, format!("no fixture for {url}"))));
        Scripted {
            response,
            gate: None,
        }
    }
}

impl SchemaTransport for FakeTransport {
    fn fetch_schema_source<'a>(
        &'a self,
        url: &'a str,
        options: &'a FetchOptions,
    ) -> BoxFuture<'a, Result<String, TransportError>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            options: options.clone(),
        });
        let scripted = self.next_response(url);

        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if let Some(gate) = scripted.gate {
                gate.notified().await;
            }
            scripted.response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_before_persistent() {
        let transport = FakeTransport::new();
        transport
            .serve("http://x", "type Query { a: Int }")
            .enqueue("http://x", Err(TransportError::Http(500, String::new())));

        let options = FetchOptions::default();
        assert!(transport.fetch_schema_source("http://x", &options).await.is_err());
        assert_eq!(
            transport.fetch_schema_source("http://x", &options).await.unwrap(),
            "type Query { a: Int }"
        );
        assert_eq!(transport.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_url_is_404() {
        let transport = FakeTransport::new();
        let err = transport
            .fetch_schema_source("http://missing", &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(404, _)));
    }

    #[tokio::test]
    async fn test_gate_holds_response() {
        let transport = Arc::new(FakeTransport::new());
        let gate = transport.enqueue_gated("http://x", Ok("type Query { a: Int }".into()));

        let task = {
            let transport = Arc::clone(&transport);
            tokio::spawn(async move {
                transport
                    .fetch_schema_source("http://x", &FetchOptions::default())
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.open();
        assert!(task.await.unwrap().is_ok());
    }
}
