// The `Encoding` type: a named encode/decode pair producing one physical
// format, plus the dispatch that asks an encoding to transcode itself.
//
// Variants form a closed set. Transcoding to `view` or `buffer` is decided
// by the variant unless the encoding carries its own factory for that
// target; nothing transcodes to `utf8`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::format::Format;
use super::formats;
use super::options::EncodingOptions;
use crate::error::{Error, Result};
use crate::value::Value;

/// Encode or decode function.
pub type Codec = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Builds a transcoded counterpart of the given encoding.
pub type TranscoderFactory = Arc<dyn Fn(&Arc<Encoding>) -> Result<Arc<Encoding>> + Send + Sync>;

/// The physical wrapper an encoding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Buffer,
    View,
    Utf8,
    /// Passthrough with format `id`; cannot be transcoded.
    Identity,
    /// Passthrough for a type the consumer implements itself.
    Native,
    /// Caller-defined format outside the wrapper set.
    Opaque,
}

impl Variant {
    pub(crate) fn for_format(format: &Format) -> Self {
        match format {
            Format::Buffer => Self::Buffer,
            Format::View => Self::View,
            Format::Utf8 => Self::Utf8,
            Format::Id => Self::Identity,
            Format::Other(_) => Self::Opaque,
        }
    }
}

pub(crate) fn identity() -> Codec {
    Arc::new(|value: Value| -> Result<Value> { Ok(value) })
}

/// Generator for `anonymous-<n>` names, owned by a registry.
#[derive(Debug, Default)]
pub struct AnonymousNames {
    next: AtomicU64,
}

impl AnonymousNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("anonymous-{n}")
    }
}

/// A bidirectional transformation between application values and one
/// physical format.
///
/// Encodings are immutable and shared as `Arc<Encoding>`; identity is
/// pointer identity.
pub struct Encoding {
    name: String,
    format: Format,
    idempotent: bool,
    variant: Variant,
    encode: Codec,
    decode: Codec,
    view_transcoder: Option<TranscoderFactory>,
    buffer_transcoder: Option<TranscoderFactory>,
}

impl Encoding {
    /// Assemble an encoding. `idempotent` defaults to `name == format`.
    pub(crate) fn assemble(
        variant: Variant,
        format: Format,
        name: String,
        encode: Codec,
        decode: Codec,
    ) -> Self {
        let idempotent = name == format.as_str();
        Self {
            name,
            format,
            idempotent,
            variant,
            encode,
            decode,
            view_transcoder: None,
            buffer_transcoder: None,
        }
    }

    pub(crate) fn with_idempotent(mut self, idempotent: bool) -> Self {
        self.idempotent = idempotent;
        self
    }

    pub(crate) fn with_view_transcoder(mut self, factory: Option<TranscoderFactory>) -> Self {
        self.view_transcoder = factory;
        self
    }

    pub(crate) fn with_buffer_transcoder(mut self, factory: Option<TranscoderFactory>) -> Self {
        self.buffer_transcoder = factory;
        self
    }

    /// Build an encoding from a descriptor.
    ///
    /// The format comes from [`EncodingOptions::detect_format`] and selects
    /// the wrapper variant. Unnamed descriptors draw a name from `names`.
    pub fn from_options(options: &EncodingOptions, names: &AnonymousNames) -> Result<Self> {
        let format = options.detect_format()?;
        let name = match options.resolved_name()? {
            Some(name) => name.to_owned(),
            None => names.next_name(),
        };
        let variant = Variant::for_format(&format);

        let mut encoding = Self::assemble(
            variant,
            format,
            name,
            options.encode.clone().unwrap_or_else(identity),
            options.decode.clone().unwrap_or_else(identity),
        )
        .with_view_transcoder(options.create_view_transcoder.clone())
        .with_buffer_transcoder(options.create_buffer_transcoder.clone());

        if let Some(idempotent) = options.idempotent {
            encoding.idempotent = idempotent;
        }
        Ok(encoding)
    }

    /// Passthrough encoding for a type the consumer supports natively.
    pub fn native(native_type: &str) -> Result<Self> {
        formats::native(native_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The logical type: the name without any `+format` suffix.
    pub fn common_name(&self) -> &str {
        self.name.split('+').next().unwrap_or(&self.name)
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub fn is_idempotent(&self) -> bool {
        self.idempotent
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn encode(&self, value: impl Into<Value>) -> Result<Value> {
        (self.encode)(value.into())
    }

    pub fn decode(&self, value: impl Into<Value>) -> Result<Value> {
        (self.decode)(value.into())
    }

    pub(crate) fn encoder(&self) -> Codec {
        Arc::clone(&self.encode)
    }

    pub(crate) fn decoder(&self) -> Codec {
        Arc::clone(&self.decode)
    }

    /// Return an encoding of the same type whose format is `target`.
    ///
    /// Only `view` and `buffer` are reachable targets.
    pub fn transcode(self: &Arc<Self>, target: &Format) -> Result<Arc<Encoding>> {
        match target {
            Format::View => self.create_view_transcoder(),
            Format::Buffer => self.create_buffer_transcoder(),
            other => Err(self.cannot_transcode(other.clone())),
        }
    }

    /// Counterpart producing byte views. A `view` encoding returns itself.
    pub fn create_view_transcoder(self: &Arc<Self>) -> Result<Arc<Encoding>> {
        if let Some(factory) = &self.view_transcoder {
            return factory(self);
        }
        match self.variant {
            Variant::View => Ok(Arc::clone(self)),
            Variant::Buffer => Ok(Arc::new(formats::buffer_as_view(self))),
            Variant::Utf8 => Ok(Arc::new(formats::utf8_as_view(self))),
            Variant::Identity | Variant::Native | Variant::Opaque => {
                Err(self.cannot_transcode(Format::View))
            }
        }
    }

    /// Counterpart producing buffers. A `buffer` encoding returns itself.
    pub fn create_buffer_transcoder(self: &Arc<Self>) -> Result<Arc<Encoding>> {
        if let Some(factory) = &self.buffer_transcoder {
            return factory(self);
        }
        match self.variant {
            Variant::Buffer => Ok(Arc::clone(self)),
            Variant::View => Ok(Arc::new(formats::view_as_buffer(self))),
            Variant::Utf8 => Ok(Arc::new(formats::utf8_as_buffer(self))),
            Variant::Identity | Variant::Native | Variant::Opaque => {
                Err(self.cannot_transcode(Format::Buffer))
            }
        }
    }

    fn cannot_transcode(&self, target: Format) -> Error {
        Error::CannotTranscode {
            name: self.name.clone(),
            target,
        }
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoding")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("idempotent", &self.idempotent)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}
