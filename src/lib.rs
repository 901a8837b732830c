//! Transcodec: resolve named or custom encodings and transcode them to the
//! physical formats a storage consumer supports.
//!
//! The crate provides:
//! - The `Encoding` abstraction and its format wrappers (`encoding`)
//! - Built-in encodings: `utf8`, `json`, `buffer`, `view`, `hex`, `base64`, `id` (`builtin`)
//! - A caching resolver per consumer (`transcoder`)
//!
//! # Quick Start
//!
//! ```
//! use transcodec::{Transcoder, Value};
//!
//! // A consumer that stores byte views only.
//! let transcoder = Transcoder::new(["view"]).unwrap();
//!
//! let json = transcoder.encoding("json").unwrap();
//! assert_eq!(json.name(), "json+view");
//!
//! let stored = json.encode(Value::Json(serde_json::json!({ "a": 1 }))).unwrap();
//! assert_eq!(stored.as_bytes(), Some(&br#"{"a":1}"#[..]));
//! assert_eq!(json.decode(stored).unwrap(), Value::Json(serde_json::json!({ "a": 1 })));
//!
//! // Aliases and transcoded names resolve to the same instance.
//! let buffer = transcoder.encoding("buffer").unwrap();
//! assert!(std::sync::Arc::ptr_eq(&buffer, &transcoder.encoding("binary").unwrap()));
//! ```

pub mod builtin;
pub mod encoding;
pub mod error;
pub mod transcoder;
pub mod value;

pub use encoding::{AnonymousNames, Encoding, EncodingOptions, Format, Variant};
pub use error::{Error, ErrorKind, Result};
pub use transcoder::{EncodingRef, Transcoder, TranscoderOptions};
pub use value::Value;
