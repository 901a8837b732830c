// Built-in encodings and compatibility aliases.
//
// The catalog is built per registry; each entry is immutable once built.
// `utf8`, `buffer` and `view` carry their own transcoders because they
// accept more input shapes than the generic wrappers pass through.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::encoding::base::{Codec, identity};
use crate::encoding::{Encoding, Format, TranscoderFactory, Variant};
use crate::error::Result;
use crate::value::Value;

/// Canonical built-in names, in registration order.
pub const NAMES: &[&str] = &[
    "utf8",
    "json",
    "buffer",
    "view",
    #[cfg(feature = "hex")]
    "hex",
    #[cfg(feature = "base64")]
    "base64",
    "id",
];

/// Legacy names accepted as references only.
pub const ALIASES: &[(&str, &str)] = &[("binary", "buffer"), ("utf-8", "utf8"), ("none", "id")];

/// Canonical name for an alias.
pub fn canonical(alias: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(a, _)| *a == alias)
        .map(|&(_, canonical)| canonical)
}

fn codec<F>(f: F) -> Codec
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn factory<F>(f: F) -> Option<TranscoderFactory>
where
    F: Fn(&Arc<Encoding>) -> Result<Arc<Encoding>> + Send + Sync + 'static,
{
    Some(Arc::new(f))
}

fn utf8() -> Encoding {
    Encoding::assemble(
        Variant::Utf8,
        Format::Utf8,
        "utf8".into(),
        codec(|v| Ok(Value::Text(v.into_text()))),
        identity(),
    )
    .with_view_transcoder(factory(|enc| {
        Ok(Arc::new(Encoding::assemble(
            Variant::View,
            Format::View,
            format!("{}+view", enc.name()),
            codec(|v| Ok(Value::View(v.into_bytes()))),
            codec(|v| Ok(Value::Text(v.into_text()))),
        )))
    }))
    .with_buffer_transcoder(factory(|enc| {
        Ok(Arc::new(Encoding::assemble(
            Variant::Buffer,
            Format::Buffer,
            format!("{}+buffer", enc.name()),
            codec(|v| Ok(Value::Buffer(v.into_bytes()))),
            codec(|v| Ok(Value::Text(v.into_text()))),
        )))
    }))
}

fn json() -> Encoding {
    Encoding::assemble(
        Variant::Utf8,
        Format::Utf8,
        "json".into(),
        codec(|v| Ok(Value::Text(serde_json::to_string(&v.to_json())?))),
        codec(|v| {
            let parsed: JsonValue = serde_json::from_str(&v.into_text())?;
            Ok(Value::from(parsed))
        }),
    )
}

fn buffer() -> Encoding {
    Encoding::assemble(
        Variant::Buffer,
        Format::Buffer,
        "buffer".into(),
        codec(|v| Ok(Value::Buffer(v.into_bytes()))),
        identity(),
    )
    .with_view_transcoder(factory(|enc| {
        Ok(Arc::new(Encoding::assemble(
            Variant::View,
            Format::View,
            format!("{}+view", enc.name()),
            codec(|v| Ok(Value::View(v.into_bytes()))),
            codec(|v| Ok(Value::Buffer(v.into_bytes()))),
        )))
    }))
}

fn view() -> Encoding {
    Encoding::assemble(
        Variant::View,
        Format::View,
        "view".into(),
        codec(|v| Ok(Value::View(v.into_bytes()))),
        identity(),
    )
    .with_buffer_transcoder(factory(|enc| {
        Ok(Arc::new(Encoding::assemble(
            Variant::Buffer,
            Format::Buffer,
            format!("{}+buffer", enc.name()),
            codec(|v| Ok(Value::Buffer(v.into_bytes()))),
            codec(|v| Ok(Value::View(v.into_bytes()))),
        )))
    }))
}

#[cfg(feature = "hex")]
fn hex_text() -> Encoding {
    Encoding::assemble(
        Variant::Buffer,
        Format::Buffer,
        "hex".into(),
        codec(|v| match v {
            Value::Buffer(b) | Value::View(b) => Ok(Value::Buffer(b)),
            other => Ok(Value::Buffer(hex::decode(other.into_text())?.into())),
        }),
        codec(|v| Ok(Value::Text(hex::encode(v.into_bytes())))),
    )
}

#[cfg(feature = "base64")]
fn base64_text() -> Encoding {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    Encoding::assemble(
        Variant::Buffer,
        Format::Buffer,
        "base64".into(),
        codec(|v| match v {
            Value::Buffer(b) | Value::View(b) => Ok(Value::Buffer(b)),
            other => Ok(Value::Buffer(STANDARD.decode(other.into_text())?.into())),
        }),
        codec(|v| Ok(Value::Text(STANDARD.encode(v.into_bytes())))),
    )
}

fn id() -> Encoding {
    Encoding::assemble(
        Variant::Identity,
        Format::Id,
        "id".into(),
        identity(),
        identity(),
    )
}

fn build(name: &str) -> Option<Encoding> {
    Some(match name {
        "utf8" => utf8(),
        "json" => json(),
        "buffer" => buffer(),
        "view" => view(),
        #[cfg(feature = "hex")]
        "hex" => hex_text(),
        #[cfg(feature = "base64")]
        "base64" => base64_text(),
        "id" => id(),
        _ => return None,
    })
}

/// Built-in catalog in registration order. `identity` controls whether the
/// optional `id` encoding is included.
pub fn catalog(identity: bool) -> Vec<(&'static str, Arc<Encoding>)> {
    NAMES
        .iter()
        .filter(|&&name| identity || name != "id")
        .filter_map(|&name| build(name).map(|enc| (name, Arc::new(enc))))
        .collect()
}
