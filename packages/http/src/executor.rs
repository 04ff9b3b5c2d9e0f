//! HTTP execution abstraction.
//!
//! This module provides a trait for HTTP execution that can be mocked in tests,
//! avoiding the need for actual network calls.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::debug;

use crate::error::Error;
use crate::types::{HttpRequest, HttpResponse, RequestOutcome};

/// Default per-request timeout when neither the request nor the executor sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for executing HTTP requests.
///
/// Implementations perform exactly one round trip per call and never retry.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Execute an HTTP request and classify the result.
    async fn execute(&self, request: &HttpRequest) -> RequestOutcome;
}

/// Production HTTP executor using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
    default_timeout: Duration,
}

impl ReqwestExecutor {
    /// Create a new executor whose requests time out after `timeout` unless
    /// the request carries its own.
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!("restcrud/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Create with default timeout of 30 seconds.
    pub fn with_default_timeout() -> Result<Self, Error> {
        Self::new(DEFAULT_TIMEOUT)
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            default_timeout: timeout,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    fn build_request(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder, Error> {
        let url = url::Url::parse(&request.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl {
                message: format!("unsupported scheme '{}' in {}", url.scheme(), url),
            });
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::try_from(name.as_str())?;
            let header_value = HeaderValue::try_from(value.as_str())?;
            headers.insert(header_name, header_value);
        }

        let method: http::Method = request.method.into();
        let mut req_builder = self
            .client
            .request(method, url)
            .headers(headers)
            .timeout(request.timeout.unwrap_or(self.default_timeout));

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        Ok(req_builder)
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn execute(&self, request: &HttpRequest) -> RequestOutcome {
        let req_builder = match self.build_request(request) {
            Ok(builder) => builder,
            Err(e) => {
                return RequestOutcome::connection_failure(format!(
                    "request could not be built: {}",
                    e
                ))
            }
        };

        debug!(method = %request.method, url = %request.url, "sending request");

        let response = match req_builder.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return RequestOutcome::connection_failure(format!("request timeout: {}", e))
            }
            Err(e) if e.is_connect() => {
                return RequestOutcome::connection_failure(format!("connection failed: {}", e))
            }
            Err(e) => {
                return RequestOutcome::connection_failure(format!("request failed: {}", e))
            }
        };

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.to_string(), v.to_string());
            }
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                return RequestOutcome::connection_failure(format!(
                    "failed to read response body: {}",
                    e
                ))
            }
        };

        debug!(method = %request.method, url = %request.url, status, "response received");

        RequestOutcome::from_response(HttpResponse {
            status,
            status_text,
            headers,
            body,
        })
    }
}

/// Mock HTTP executor for testing.
///
/// Returns predefined outcomes based on request matching.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, PoisonError};

    use crate::types::Method;

    type Key = (Method, String);

    /// A mock HTTP executor that returns predefined outcomes.
    ///
    /// Outcomes are keyed by method and URL. A key may hold a sequence: each
    /// call pops the front until one outcome remains, which then repeats.
    #[derive(Clone, Default)]
    pub struct MockExecutor {
        responses: Arc<Mutex<HashMap<Key, VecDeque<RequestOutcome>>>>,
        default_outcome: Arc<Mutex<Option<RequestOutcome>>>,
        recorded_requests: Arc<Mutex<Vec<HttpRequest>>>,
        fail_all: Arc<Mutex<Option<String>>>,
    }

    impl MockExecutor {
        /// Create a new mock executor.
        pub fn new() -> Self {
            Self::default()
        }

        /// Add an outcome for a method and URL. Repeated calls for the same
        /// key queue outcomes in order.
        pub fn with_outcome(
            self,
            method: Method,
            url: impl Into<String>,
            outcome: RequestOutcome,
        ) -> Self {
            self.responses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry((method, url.into()))
                .or_default()
                .push_back(outcome);
            self
        }

        /// Shorthand for a JSON response with the given status.
        pub fn with_json(
            self,
            method: Method,
            url: impl Into<String>,
            status: u16,
            body: impl Into<String>,
        ) -> Self {
            let response = Self::json_response(status, body);
            self.with_outcome(method, url, RequestOutcome::from_response(response))
        }

        /// Set a default outcome when no key matches.
        pub fn with_default_outcome(self, outcome: RequestOutcome) -> Self {
            *self
                .default_outcome
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(outcome);
            self
        }

        /// Configure to fail all requests with a connection failure.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.fail_all.lock().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
            self
        }

        /// Get all recorded requests.
        pub fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.recorded_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of requests executed so far.
        pub fn request_count(&self) -> usize {
            self.recorded_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Clear recorded requests.
        pub fn clear_recorded(&self) {
            self.recorded_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }

        /// Create a JSON response with the given status.
        pub fn json_response(status: u16, body: impl Into<String>) -> HttpResponse {
            let mut response = HttpResponse::new(status, body.into());
            response
                .headers
                .insert("content-type".to_string(), "application/json".to_string());
            response
        }

        /// Create a 404 Not Found outcome.
        pub fn not_found() -> RequestOutcome {
            RequestOutcome::from_response(Self::json_response(404, r#"{"error":"Not Found"}"#))
        }
    }

    #[async_trait]
    impl HttpExecutor for MockExecutor {
        async fn execute(&self, request: &HttpRequest) -> RequestOutcome {
            self.recorded_requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());

            if let Some(message) = self
                .fail_all
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
            {
                return RequestOutcome::connection_failure(message);
            }

            {
                let mut responses = self
                    .responses
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if let Some(queue) = responses.get_mut(&(request.method, request.url.clone())) {
                    let outcome = if queue.len() > 1 {
                        queue.pop_front()
                    } else {
                        queue.front().cloned()
                    };
                    if let Some(outcome) = outcome {
                        return outcome;
                    }
                }
            }

            if let Some(outcome) = self
                .default_outcome
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
            {
                return outcome;
            }

            Self::not_found()
        }
    }
}
