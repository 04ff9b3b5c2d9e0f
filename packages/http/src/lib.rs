//! # restcrud-http
//!
//! HTTP transport adapter for restcrud.
//!
//! One call to [`HttpExecutor::execute`] performs one network round trip and
//! yields a [`RequestOutcome`]: success with the raw body, a connection
//! failure (no route, refused, TLS, timeout), or a protocol failure for any
//! status of 400 and above. Nothing is retried.
//!
//! ```ignore
//! use restcrud_http::{HttpExecutor, HttpRequest, ReqwestExecutor, RequestOutcome};
//!
//! let executor = ReqwestExecutor::with_default_timeout()?;
//!
//! let request = HttpRequest::post("https://api.restful-api.dev/objects")
//!     .with_json_body(r#"{"name":"Widget"}"#);
//!
//! match executor.execute(&request).await {
//!     RequestOutcome::Success(response) => println!("{}", response.text()),
//!     RequestOutcome::ProtocolFailure(response) => eprintln!("HTTP {}", response.status),
//!     RequestOutcome::ConnectionFailure { message } => eprintln!("{}", message),
//! }
//! ```
//!
//! Enable the `mock` feature for [`executor::mock::MockExecutor`], an
//! in-memory executor for tests of code built on top of this crate.

pub mod error;
pub mod executor;
pub mod types;

// Re-export main types
pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor, DEFAULT_TIMEOUT};
pub use types::{HttpRequest, HttpResponse, Method, RequestOutcome};

#[cfg(any(test, feature = "mock"))]
pub use executor::mock::MockExecutor;
