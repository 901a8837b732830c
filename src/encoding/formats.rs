// Format wrappers: how an encoding of one physical format is re-expressed
// in another.
//
//   buffer -> view    encode output shared as a view, view re-wrapped as a
//                     buffer before decode
//   view   -> buffer  the mirror image
//   utf8   -> buffer  encoded text as UTF-8 bytes, bytes decoded to text
//   utf8   -> view    same, producing views
//
// Every wrapper keeps the source's logical type and appends `+<format>` to
// its name. Conversions between buffer and view never copy.

use std::sync::Arc;

use bytes::Bytes;

use super::base::{Encoding, Variant, identity};
use super::format::Format;
use crate::error::{Error, Result};
use crate::value::{Value, utf8_bytes, utf8_text};

fn binary(encoding: &str, expected: Format, value: Value) -> Result<Bytes> {
    match value {
        Value::Buffer(b) | Value::View(b) => Ok(b),
        other => Err(Error::UnexpectedValue {
            encoding: encoding.to_owned(),
            expected,
            found: other.kind_name(),
        }),
    }
}

fn text(encoding: &str, value: Value) -> Result<String> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(Error::UnexpectedValue {
            encoding: encoding.to_owned(),
            expected: Format::Utf8,
            found: other.kind_name(),
        }),
    }
}

fn wrapped_name(source: &Encoding, target: &Format) -> String {
    format!("{}+{}", source.name(), target)
}

pub(crate) fn buffer_as_view(source: &Arc<Encoding>) -> Encoding {
    let (enc, dec) = (source.encoder(), source.decoder());
    let name = source.name().to_owned();
    let decode_name = name.clone();

    Encoding::assemble(
        Variant::View,
        Format::View,
        wrapped_name(source, &Format::View),
        Arc::new(move |value: Value| -> Result<Value> {
            Ok(Value::View(binary(&name, Format::Buffer, enc(value)?)?))
        }),
        Arc::new(move |data: Value| -> Result<Value> {
            dec(Value::Buffer(binary(&decode_name, Format::View, data)?))
        }),
    )
}

pub(crate) fn view_as_buffer(source: &Arc<Encoding>) -> Encoding {
    let (enc, dec) = (source.encoder(), source.decoder());
    let name = source.name().to_owned();
    let decode_name = name.clone();

    Encoding::assemble(
        Variant::Buffer,
        Format::Buffer,
        wrapped_name(source, &Format::Buffer),
        Arc::new(move |value: Value| -> Result<Value> {
            Ok(Value::Buffer(binary(&name, Format::View, enc(value)?)?))
        }),
        Arc::new(move |data: Value| -> Result<Value> {
            dec(Value::View(binary(&decode_name, Format::Buffer, data)?))
        }),
    )
}

pub(crate) fn utf8_as_buffer(source: &Arc<Encoding>) -> Encoding {
    utf8_as_bytes(source, Variant::Buffer, Format::Buffer, Value::Buffer)
}

pub(crate) fn utf8_as_view(source: &Arc<Encoding>) -> Encoding {
    utf8_as_bytes(source, Variant::View, Format::View, Value::View)
}

fn utf8_as_bytes(
    source: &Arc<Encoding>,
    variant: Variant,
    target: Format,
    wrap: fn(Bytes) -> Value,
) -> Encoding {
    let (enc, dec) = (source.encoder(), source.decoder());
    let name = source.name().to_owned();
    let decode_name = name.clone();
    let expected = target.clone();

    Encoding::assemble(
        variant,
        target.clone(),
        wrapped_name(source, &target),
        Arc::new(move |value: Value| -> Result<Value> {
            Ok(wrap(utf8_bytes(text(&name, enc(value)?)?)))
        }),
        Arc::new(move |data: Value| -> Result<Value> {
            let bytes = binary(&decode_name, expected.clone(), data)?;
            dec(Value::Text(utf8_text(&bytes)))
        }),
    )
}

/// Passthrough for a type the consumer implements itself: format is the
/// type, the name is `<type>+native`.
pub(crate) fn native(native_type: &str) -> Result<Encoding> {
    let format: Format = native_type.parse()?;
    Ok(Encoding::assemble(
        Variant::Native,
        format,
        format!("{native_type}+native"),
        identity(),
        identity(),
    )
    .with_idempotent(true))
}
