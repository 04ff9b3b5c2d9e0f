use restcrud_codec::CodecError;
use thiserror::Error;

/// Failures of a CRUD operation.
///
/// Every variant is caught at the operation boundary, reported to the status
/// sink and returned to the caller. None is retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrudError {
    /// Required input missing; raised before any network call.
    #[error("{message}")]
    Validation { message: String },

    /// No route, refused connection, TLS failure or timeout.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// The server answered with a 4xx or 5xx status.
    #[error("server returned HTTP {status}: {excerpt}")]
    Protocol { status: u16, excerpt: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {message} (body: {excerpt})")]
    Decode { message: String, excerpt: String },

    #[error("could not encode request: {message}")]
    Encode { message: String },
}

impl CrudError {
    pub fn validation(message: impl Into<String>) -> Self {
        CrudError::Validation {
            message: message.into(),
        }
    }

    /// HTTP status for protocol failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            CrudError::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CrudError::Validation { .. })
    }
}

impl From<CodecError> for CrudError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Encode { message } => CrudError::Encode { message },
            CodecError::Decode { message, excerpt } => CrudError::Decode { message, excerpt },
        }
    }
}

/// Errors building a manager from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{url}' cannot carry path segments")]
    CannotBeABase { url: String },

    #[error("collection name cannot be empty")]
    EmptyCollection,

    #[error("invalid value for {name}: {message}")]
    InvalidSetting { name: &'static str, message: String },

    #[error(transparent)]
    Transport(#[from] restcrud_http::Error),
}

pub type Result<T> = std::result::Result<T, CrudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_converts_with_excerpt() {
        let err: CrudError = CodecError::Decode {
            message: "expected value".to_string(),
            excerpt: "<html>".to_string(),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "unexpected response: expected value (body: <html>)"
        );
    }

    #[test]
    fn protocol_error_exposes_status() {
        let err = CrudError::Protocol {
            status: 404,
            excerpt: "missing".to_string(),
        };

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "server returned HTTP 404: missing");
        assert_eq!(CrudError::validation("x").status(), None);
    }

    #[test]
    fn validation_displays_message_verbatim() {
        let err = CrudError::validation("name is required");

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "name is required");
    }
}
