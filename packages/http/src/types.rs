use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// HTTP method for requests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PUT => http::Method::PUT,
            Method::DELETE => http::Method::DELETE,
        }
    }
}

/// A single HTTP request: method, absolute URL, headers and an optional body.
///
/// GET and DELETE carry no body. POST and PUT callers attach a JSON body with
/// [`HttpRequest::with_json_body`], which also sets the content type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,

    /// Absolute URL, e.g. `https://api.restful-api.dev/objects/7`
    pub url: String,

    pub headers: HashMap<String, String>,

    /// Request body as already-encoded text
    pub body: Option<String>,

    /// Per-request timeout; the executor's default applies when unset
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a JSON text body and the matching `Content-Type` header.
    pub fn with_json_body(self, body: impl Into<String>) -> Self {
        self.with_header("Content-Type", "application/json")
            .with_body(body)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP response from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Status text (e.g., "OK", "Not Found")
    pub status_text: String,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Raw response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Build a response with the canonical reason phrase for `status`.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        let status_text = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();

        Self {
            status,
            status_text,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response status indicates a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Result of one transport attempt.
///
/// Exactly one variant is produced per request. Status codes of 400 and above
/// become [`RequestOutcome::ProtocolFailure`], which keeps the full response so
/// the caller can still read whatever body the server sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Success(HttpResponse),
    ConnectionFailure { message: String },
    ProtocolFailure(HttpResponse),
}

impl RequestOutcome {
    /// Classify a completed response by status code.
    pub fn from_response(response: HttpResponse) -> Self {
        if response.status >= 400 {
            RequestOutcome::ProtocolFailure(response)
        } else {
            RequestOutcome::Success(response)
        }
    }

    pub fn connection_failure(message: impl Into<String>) -> Self {
        RequestOutcome::ConnectionFailure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success(_))
    }

    /// Status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestOutcome::Success(response) | RequestOutcome::ProtocolFailure(response) => {
                Some(response.status)
            }
            RequestOutcome::ConnectionFailure { .. } => None,
        }
    }

    /// The response, when the server answered at all.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            RequestOutcome::Success(response) | RequestOutcome::ProtocolFailure(response) => {
                Some(response)
            }
            RequestOutcome::ConnectionFailure { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_body_sets_content_type() {
        let request = HttpRequest::post("https://example.test/objects").with_json_body("{}");

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.as_deref(), Some("{}"));
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn get_and_delete_have_no_body() {
        assert!(HttpRequest::get("https://example.test/objects").body.is_none());
        assert!(HttpRequest::delete("https://example.test/objects/1")
            .body
            .is_none());
    }

    #[test]
    fn response_reason_phrase() {
        assert_eq!(HttpResponse::new(404, "").status_text, "Not Found");
        assert_eq!(HttpResponse::new(200, "").status_text, "OK");
        assert_eq!(HttpResponse::new(799, "").status_text, "Unknown");
    }

    #[test]
    fn outcome_classifies_by_status() {
        let ok = RequestOutcome::from_response(HttpResponse::new(201, "{}"));
        assert!(ok.is_success());
        assert_eq!(ok.status(), Some(201));

        let redirect = RequestOutcome::from_response(HttpResponse::new(304, ""));
        assert!(redirect.is_success());

        let missing = RequestOutcome::from_response(HttpResponse::new(404, "gone"));
        assert!(matches!(missing, RequestOutcome::ProtocolFailure(_)));
        assert_eq!(missing.response().map(|r| r.text().into_owned()), Some("gone".to_string()));

        let down = RequestOutcome::connection_failure("refused");
        assert_eq!(down.status(), None);
        assert!(down.response().is_none());
    }

    #[test]
    fn method_display_and_conversion() {
        assert_eq!(Method::PUT.to_string(), "PUT");
        assert_eq!(http::Method::from(Method::DELETE), http::Method::DELETE);
    }
}
