use thiserror::Error;

/// Codec failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("encode error: {message}")]
    Encode { message: String },

    /// `excerpt` is a truncated copy of the input that failed to decode.
    #[error("decode error: {message} (input: {excerpt})")]
    Decode { message: String, excerpt: String },
}
