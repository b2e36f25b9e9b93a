//! HTTP transport abstraction for the dashboard client.

use async_trait::async_trait;
use crate::error::TransportError;
use crate::types::{HttpRequest, HttpResponse};

/// Abstraction over the single network boundary of the client.
///
/// # Implementations
///
/// - **Production**: `ReqwestTransport`, a pooled reqwest client with a
///   fixed client-wide timeout
/// - **Tests**: `MockTransport`, scripted replies with fault injection
///
/// # Request Flow
///
/// ```text
/// ApiClient                 Transport                   Backend
///   |                           |                          |
///   |-- send(request) --------->|                          |
///   |                           |-- GET/POST base+path --->|
///   |                           |<------ status + body ----|
///   |<-- Ok(2xx) / Err(...) ----|                          |
/// ```
///
/// # Contract
///
/// One attempt per call, no retries. `Ok` is only returned for 2xx
/// statuses; every other status comes back as `TransportError::Status`
/// carrying the decoded body.
#[async_trait]
pub trait HttpTransport: Send + Sync + 'static {
    /// Sends a request and waits for the response or a failure.
    ///
    /// # Returns
    /// * `Ok(response)` - The backend answered with a 2xx status
    /// * `Err(TransportError::Timeout)` - The client timeout elapsed
    /// * `Err(TransportError::Network)` - The backend could not be reached
    /// * `Err(TransportError::Status)` - The backend answered with an error status
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
