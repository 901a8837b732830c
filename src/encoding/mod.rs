// Encodings and their physical formats.
//
// # Modules
//
// - `format`  — Physical format tags (`buffer`, `view`, `utf8`, `id`, others)
// - `options` — Caller-supplied descriptors and legacy format detection
// - `base`    — The `Encoding` type and transcode dispatch
// - `formats` — Wrappers re-expressing one format in another, plus Native

pub mod base;
pub mod format;
pub mod formats;
pub mod options;

pub use base::{AnonymousNames, Codec, Encoding, TranscoderFactory, Variant};
pub use format::Format;
pub use options::EncodingOptions;
