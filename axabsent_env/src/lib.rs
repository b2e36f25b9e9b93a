//! AxAbsEnt Environment Abstraction Layer
//!
//! This crate isolates everything the dashboard client needs from the
//! outside world so the validation and orchestration code in `axabsent_core`
//! runs unchanged against a real backend or a scripted one:
//! - HTTP I/O (`HttpTransport::send()`)
//! - Time (`Clock::now()`)
//!
//! # Implementations
//!
//! - **Production**: `ReqwestTransport` + `SystemClock`
//! - **Tests**: `MockTransport` + `ManualClock` (behind the `test-util` feature)
//!
//! # Example
//!
//! ```ignore
//! use axabsent_env::{HttpRequest, HttpTransport, ReqwestTransport};
//!
//! async fn list<T: HttpTransport>(transport: &T) {
//!     let response = transport.send(HttpRequest::get("/absolute")).await?;
//!     println!("{}", response.body);
//! }
//! ```

mod context;
mod error;
#[cfg(any(test, feature = "test-util"))]
mod mock;
mod reqwest_impl;
mod transport;
mod types;

pub use context::{Clock, SystemClock};
pub use error::TransportError;
#[cfg(any(test, feature = "test-util"))]
pub use mock::{ManualClock, MockReply, MockTransport};
pub use reqwest_impl::ReqwestTransport;
pub use transport::HttpTransport;
pub use types::{HttpRequest, HttpResponse, Method};
