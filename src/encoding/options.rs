// Encoding descriptors.
//
// A descriptor names an encoding, supplies its codecs and picks a format.
// The format is decided once, by precedence:
//
//   1. explicit `format`
//   2. legacy `buffer` flag (true => buffer, false => utf8)
//   3. legacy integer `code` (multiformats style) => view
//   4. buffer

use std::fmt;
use std::sync::Arc;

use super::base::{Codec, Encoding, TranscoderFactory};
use super::format::Format;
use crate::error::{Error, Result};
use crate::value::Value;

/// Descriptor for a caller-defined encoding.
///
/// Descriptors are resolved by identity: share one behind an `Arc` to hit
/// the same cache entry on repeated lookups.
#[derive(Clone, Default)]
pub struct EncodingOptions {
    pub encode: Option<Codec>,
    pub decode: Option<Codec>,
    /// Logical type. Takes precedence over `type_name`.
    pub name: Option<String>,
    /// Legacy spelling of `name`; ignored when empty.
    pub type_name: Option<String>,
    pub format: Option<String>,
    /// Legacy level-codec flag.
    pub buffer: Option<bool>,
    /// Legacy multiformats codec code.
    pub code: Option<i64>,
    pub idempotent: Option<bool>,
    pub create_view_transcoder: Option<TranscoderFactory>,
    pub create_buffer_transcoder: Option<TranscoderFactory>,
}

impl EncodingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn buffer(mut self, buffer: bool) -> Self {
        self.buffer = Some(buffer);
        self
    }

    pub fn code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = Some(idempotent);
        self
    }

    pub fn encode<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.encode = Some(Arc::new(f));
        self
    }

    pub fn decode<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.decode = Some(Arc::new(f));
        self
    }

    pub fn view_transcoder<F>(mut self, f: F) -> Self
    where
        F: Fn(&Arc<Encoding>) -> Result<Arc<Encoding>> + Send + Sync + 'static,
    {
        self.create_view_transcoder = Some(Arc::new(f));
        self
    }

    pub fn buffer_transcoder<F>(mut self, f: F) -> Self
    where
        F: Fn(&Arc<Encoding>) -> Result<Arc<Encoding>> + Send + Sync + 'static,
    {
        self.create_buffer_transcoder = Some(Arc::new(f));
        self
    }

    /// Pick the format using the precedence in the module header.
    pub fn detect_format(&self) -> Result<Format> {
        if let Some(format) = &self.format {
            return format.parse().map_err(|_| Error::InvalidOption {
                option: "format",
                expected: "a non-empty string",
            });
        }
        Ok(match (self.buffer, self.code) {
            (Some(true), _) => Format::Buffer,
            (Some(false), _) => Format::Utf8,
            (None, Some(_)) => Format::View,
            (None, None) => Format::Buffer,
        })
    }

    /// The declared name, if any. `None` means an anonymous name is due.
    pub fn resolved_name(&self) -> Result<Option<&str>> {
        match self.name.as_deref() {
            Some("") => Err(Error::InvalidOption {
                option: "name",
                expected: "a non-empty string or absent",
            }),
            Some(name) => Ok(Some(name)),
            None => Ok(self.type_name.as_deref().filter(|t| !t.is_empty())),
        }
    }
}

impl fmt::Debug for EncodingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingOptions")
            .field("encode", &self.encode.is_some())
            .field("decode", &self.decode.is_some())
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("format", &self.format)
            .field("buffer", &self.buffer)
            .field("code", &self.code)
            .field("idempotent", &self.idempotent)
            .finish_non_exhaustive()
    }
}
