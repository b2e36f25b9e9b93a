//! Scripted transport and manual clock for deterministic tests.

use crate::context::Clock;
use crate::error::TransportError;
use crate::transport::HttpTransport;
use crate::types::{HttpRequest, HttpResponse, Method};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Clock whose time only moves when told to.
///
/// Clones share the same underlying time, so a clone handed to a
/// `MockTransport` and one handed to the service under test agree.
#[derive(Clone, Default)]
pub struct ManualClock {
    /// Current virtual time
    time: Arc<Mutex<Duration>>,
}

impl ManualClock {
    /// Creates a clock starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
        *time += duration;
    }

    /// Sets the clock to a specific value.
    pub fn set(&self, value: Duration) {
        let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
        *time = value;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.time.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// What a scripted route answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Respond with a status and JSON body
    Json { status: u16, body: Value },

    /// Respond with a status and an empty body
    Empty { status: u16 },

    /// Simulate the client timeout elapsing
    Timeout,

    /// Simulate a connectivity failure
    NetworkFailure,
}

impl MockReply {
    /// A 200 response with the given body.
    pub fn ok(body: Value) -> Self {
        Self::Json { status: 200, body }
    }

    /// An error response with the given status and body.
    pub fn error(status: u16, body: Value) -> Self {
        Self::Json { status, body }
    }
}

/// In-memory transport with scripted replies and request capture.
///
/// Replies are keyed by method and path (the query string is ignored when
/// matching but recorded). Unscripted routes answer 404 with a FastAPI-style
/// `{"detail": "Not Found"}` body.
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), MockReply>>,

    /// Every request seen, in arrival order
    requests: Mutex<Vec<HttpRequest>>,

    /// Optional clock advanced by `latency` per request
    clock: Option<(ManualClock, Duration)>,

    /// Timeout reported by `MockReply::Timeout`
    timeout_ms: u64,
}

impl MockTransport {
    /// Creates a transport with no scripted routes.
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            clock: None,
            timeout_ms: 10_000,
        }
    }

    /// Creates an Arc-wrapped transport.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Advances `clock` by `latency` for every request served.
    pub fn with_latency(mut self, clock: ManualClock, latency: Duration) -> Self {
        self.clock = Some((clock, latency));
        self
    }

    /// Scripts the reply for a method and path, replacing any previous one.
    pub fn on(&self, method: Method, path: &str, reply: MockReply) -> &Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, path.to_string()), reply);
        self
    }

    /// Removes every scripted route and recorded request.
    pub fn reset(&self) {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Returns a copy of every request received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method, request.path.clone());
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if let Some((clock, latency)) = &self.clock {
            clock.advance(*latency);
        }

        let reply = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
            .unwrap_or_else(|| MockReply::error(404, json!({"detail": "Not Found"})));

        let response = match reply {
            MockReply::Json { status, body } => HttpResponse::new(status, body),
            MockReply::Empty { status } => HttpResponse::new(status, Value::Null),
            MockReply::Timeout => return Err(TransportError::Timeout(self.timeout_ms)),
            MockReply::NetworkFailure => {
                return Err(TransportError::network("connection refused"))
            }
        };

        if !response.is_success() {
            return Err(TransportError::status(response.status, response.body));
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_time() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));

        clock.advance(Duration::from_millis(500));
        assert_eq!(clock.now(), Duration::from_millis(1500));

        clock.set(Duration::from_secs(7));
        assert_eq!(clock.now(), Duration::from_secs(7));
    }

    #[test]
    fn test_manual_clock_clone_shares_time() {
        let clock1 = ManualClock::new();
        let clock2 = clock1.clone();

        clock1.advance(Duration::from_secs(5));

        assert_eq!(clock1.now(), clock2.now());
    }

    #[tokio::test]
    async fn test_scripted_reply_and_capture() {
        let transport = MockTransport::new();
        transport.on(Method::Get, "/absolute", MockReply::ok(json!([{"id": "abs-1"}])));

        let response = transport
            .send(HttpRequest::get("/absolute"))
            .await
            .unwrap();

        assert_eq!(response.body, json!([{"id": "abs-1"}]));
        assert_eq!(transport.request_count(), 1);
        assert_eq!(transport.requests()[0].path, "/absolute");
    }

    #[tokio::test]
    async fn test_unscripted_route_is_404() {
        let transport = MockTransport::new();
        let err = transport
            .send(HttpRequest::get("/nowhere"))
            .await
            .unwrap_err();

        assert_eq!(err, TransportError::status(404, json!({"detail": "Not Found"})));
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let transport = MockTransport::new();
        transport
            .on(Method::Post, "/simulation/run", MockReply::Timeout)
            .on(Method::Get, "/absolute", MockReply::NetworkFailure);

        let err = transport
            .send(HttpRequest::post("/simulation/run", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Timeout(10_000));

        let err = transport.send(HttpRequest::get("/absolute")).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }

    #[tokio::test]
    async fn test_latency_advances_clock() {
        let clock = ManualClock::new();
        let transport = MockTransport::new().with_latency(clock.clone(), Duration::from_millis(250));
        transport.on(Method::Get, "/absolute", MockReply::Empty { status: 200 });

        transport.send(HttpRequest::get("/absolute")).await.unwrap();
        transport.send(HttpRequest::get("/absolute")).await.unwrap();

        assert_eq!(clock.now(), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_reset_clears_routes() {
        let transport = MockTransport::new();
        transport.on(Method::Get, "/absolute", MockReply::ok(json!([])));
        transport.send(HttpRequest::get("/absolute")).await.unwrap();

        transport.reset();

        assert_eq!(transport.request_count(), 0);
        assert!(transport.send(HttpRequest::get("/absolute")).await.is_err());
    }
}
