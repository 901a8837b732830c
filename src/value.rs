// Dynamic values flowing through encode/decode.
//
// `Buffer` and `View` both hold `Bytes`, so moving between the two physical
// byte formats never copies. Text/bytes conversion is plain UTF-8 with
// replacement of invalid sequences on decode.

use bytes::Bytes;
use serde_json::{Map, Value as JsonValue};

/// An application-level or physical value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Owned byte buffer (the `buffer` format).
    Buffer(Bytes),
    /// Byte view over shared storage (the `view` format).
    View(Bytes),
    /// UTF-8 text (the `utf8` format).
    Text(String),
    /// Any other structured value.
    Json(JsonValue),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Buffer(_) => "buffer",
            Self::View(_) => "view",
            Self::Text(_) => "text",
            Self::Json(_) => "json",
        }
    }

    /// Returns the bytes of a `Buffer` or `View`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(b) | Self::View(b) => Some(b),
            _ => None,
        }
    }

    /// Stringify the value.
    ///
    /// Text is returned as-is, JSON strings yield their contents, other JSON
    /// values their serialization and bytes are decoded as UTF-8.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Buffer(b) | Self::View(b) => utf8_text(&b),
            Self::Json(JsonValue::String(s)) => s,
            Self::Json(other) => other.to_string(),
        }
    }

    /// Coerce into bytes: byte values are shared, anything else is
    /// stringified and UTF-8 encoded.
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Buffer(b) | Self::View(b) => b,
            other => utf8_bytes(other.into_text()),
        }
    }

    /// JSON representation used by the `json` encoding.
    ///
    /// Byte values serialize like a Node.js `Buffer` does.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::Json(v) => v.clone(),
            Self::Buffer(b) | Self::View(b) => {
                let mut map = Map::new();
                map.insert("type".into(), JsonValue::String("Buffer".into()));
                map.insert(
                    "data".into(),
                    JsonValue::Array(b.iter().map(|&x| JsonValue::from(x)).collect()),
                );
                JsonValue::Object(map)
            }
        }
    }
}

/// Encode text as UTF-8 bytes without copying the string's allocation.
pub fn utf8_bytes(text: String) -> Bytes {
    Bytes::from(text.into_bytes())
}

/// Decode UTF-8, replacing invalid sequences with U+FFFD.
pub fn utf8_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Self::Buffer(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Buffer(Bytes::from(b))
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Buffer(Bytes::copy_from_slice(b))
    }
}

/// JSON strings become `Text`, so text survives a JSON round trip unchanged.
impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Json(JsonValue::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Json(JsonValue::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Json(JsonValue::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Json(JsonValue::Bool(b))
    }
}
