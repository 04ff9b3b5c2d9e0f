//! Lenient deserializers for loosely typed payloads.
//!
//! Public test APIs are not strict about scalar types: the same attribute may
//! arrive as `"389.99"`, `389.99` or `null` depending on who created the
//! record. These helpers accept any JSON scalar where a string is expected.
//!
//! ```rust
//! use restcrud_codec::{lenient, JsonCodec};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Data {
//!     #[serde(default, deserialize_with = "lenient::option_string")]
//!     price: Option<String>,
//! }
//!
//! let data: Data = JsonCodec::new().decode_str(r#"{"price": 389.99}"#).unwrap();
//! assert_eq!(data.price.as_deref(), Some("389.99"));
//! ```

use std::collections::BTreeMap;

use serde::de::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Render a JSON value as slot text. `null` has no text.
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Deserialize any JSON value into a `String`; `null` becomes empty.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(value).unwrap_or_default())
}

/// Deserialize any JSON value into an `Option<String>`; `null` becomes `None`.
pub fn option_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(value))
}

/// Deserialize `T`, treating an explicit `null` as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a JSON object into key to text pairs.
///
/// Keys are kept exactly as sent, so differently spelled keys for the same
/// attribute never collide. `null` values are left out and a `null` object
/// yields an empty map.
pub fn text_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let object = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(object
        .into_iter()
        .filter_map(|(key, value)| scalar_text(value).map(|text| (key, text)))
        .collect())
}
