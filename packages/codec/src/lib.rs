//! JSON codec for restcrud.
//!
//! This layer turns typed records into JSON request bodies and response
//! bodies back into typed records. It adds:
//! - `JsonCodec`: encode/decode with truncated excerpts on decode failure
//! - `lenient`: deserializers that accept any JSON scalar where text is expected
//!
//! # Example
//!
//! ```rust,ignore
//! use restcrud_codec::JsonCodec;
//!
//! let codec = JsonCodec::new();
//! let objects: Vec<Resource> = codec.decode(&response.body)?;
//! let body = codec.encode(&draft)?;
//! ```

mod codec;
mod error;
pub mod lenient;

pub use codec::{excerpt, JsonCodec, DEFAULT_EXCERPT_LEN};
pub use error::CodecError;
