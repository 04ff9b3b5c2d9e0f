//! JSON codec implementation.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// Characters of offending input kept in a decode error.
pub const DEFAULT_EXCERPT_LEN: usize = 120;

/// A codec that converts typed records to JSON text and back.
///
/// Decoding ignores unknown fields and lets `#[serde(default)]` fill missing
/// ones; arrays decode straight into `Vec<T>`. Wire names that differ from
/// Rust field names are handled with `#[serde(rename = "...")]` on the record.
///
/// # Example
///
/// ```rust
/// use restcrud_codec::JsonCodec;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, Debug, PartialEq)]
/// struct Laptop {
///     #[serde(rename = "CPU model")]
///     cpu_model: String,
/// }
///
/// let codec = JsonCodec::new();
/// let text = codec.encode(&Laptop { cpu_model: "Intel Core i9".into() }).unwrap();
/// assert_eq!(text, r#"{"CPU model":"Intel Core i9"}"#);
///
/// let decoded: Vec<Laptop> = codec.decode_str(&format!("[{}]", text)).unwrap();
/// assert_eq!(decoded[0].cpu_model, "Intel Core i9");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JsonCodec {
    excerpt_len: usize,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self {
            excerpt_len: DEFAULT_EXCERPT_LEN,
        }
    }

    /// Keep at most `excerpt_len` characters of input in decode errors.
    pub fn with_excerpt_len(mut self, excerpt_len: usize) -> Self {
        self.excerpt_len = excerpt_len;
        self
    }

    pub fn excerpt_len(&self) -> usize {
        self.excerpt_len
    }

    pub fn encode<T: Serialize + ?Sized>(&self, record: &T) -> Result<String, CodecError> {
        serde_json::to_string(record).map_err(|e| CodecError::Encode {
            message: e.to_string(),
        })
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode {
            message: e.to_string(),
            excerpt: excerpt(&String::from_utf8_lossy(bytes), self.excerpt_len),
        })
    }

    pub fn decode_str<T: DeserializeOwned>(&self, text: &str) -> Result<T, CodecError> {
        self.decode(text.as_bytes())
    }

    /// Truncate `text` the same way decode errors do.
    pub fn excerpt(&self, text: &str) -> String {
        excerpt(text, self.excerpt_len)
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim `text` and cut it to `max_chars` characters, marking the cut with `...`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Item {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        id: String,
        name: String,
        #[serde(default)]
        tags: Vec<String>,
    }

    #[test]
    fn decodes_array_directly() {
        let codec = JsonCodec::new();

        let items: Vec<Item> = codec
            .decode_str(r#"[{"id":"1","name":"a"},{"id":"2","name":"b","tags":["x"]}]"#)
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].tags, vec!["x".to_string()]);
    }

    #[test]
    fn ignores_unknown_and_defaults_missing_fields() {
        let codec = JsonCodec::new();

        let item: Item = codec
            .decode_str(r#"{"name":"a","createdAt":"2024-01-01T00:00:00Z"}"#)
            .unwrap();

        assert_eq!(
            item,
            Item {
                id: String::new(),
                name: "a".to_string(),
                tags: vec![],
            }
        );
    }

    #[test]
    fn encode_skips_empty_id() {
        let codec = JsonCodec::new();
        let item = Item {
            id: String::new(),
            name: "a".to_string(),
            tags: vec![],
        };

        assert_eq!(codec.encode(&item).unwrap(), r#"{"name":"a","tags":[]}"#);
    }

    #[test]
    fn malformed_json_reports_excerpt() {
        let codec = JsonCodec::new().with_excerpt_len(10);

        let err = codec
            .decode_str::<Vec<Item>>("<html><body>Bad Gateway</body></html>")
            .unwrap_err();

        match err {
            CodecError::Decode { excerpt, .. } => assert_eq!(excerpt, "<html><bod..."),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let codec = JsonCodec::new();

        let err = codec.decode_str::<Vec<Item>>(r#"{"name":"a"}"#).unwrap_err();

        assert!(matches!(err, CodecError::Decode { .. }));
        assert!(err.to_string().contains(r#"{"name":"a"}"#));
    }

    #[test]
    fn excerpt_keeps_short_text_and_respects_char_boundaries() {
        assert_eq!(excerpt("  short  ", 20), "short");
        assert_eq!(excerpt("héllo wörld", 4), "héll...");
        assert_eq!(excerpt("", 4), "");
    }
}
