// Encoding registry for one consumer.
//
// A `Transcoder` knows which physical formats its consumer stores and turns
// any encoding reference into an encoding producing one of them:
//
//   1. cache hit by name, descriptor identity or encoding identity
//   2. resolve: built-in/alias table, encoding as-is, or descriptor; a
//      source resolved before returns its earlier result
//   3. native passthrough when the consumer declares the type itself
//   4. keep when the format is declared, else transcode to view, then buffer
//   5. cache the result under every name it is reachable by
//
// Misses resolve one at a time under a re-entrant guard, so concurrent first
// lookups of one key produce a single instance while a transcoder factory
// may still look up other encodings on the same thread. The cache lock is
// only held for map reads and writes, never while caller code runs.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use log::{debug, trace};
use parking_lot::{Mutex, ReentrantMutex};

use crate::builtin;
use crate::encoding::{AnonymousNames, Encoding, EncodingOptions, Format};
use crate::error::{Error, ErrorKind, Result};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for a [`Transcoder`].
#[derive(Debug, Clone)]
pub struct TranscoderOptions {
    /// Register the `id` encoding, which also makes the `none` alias
    /// resolvable.
    pub identity: bool,
    /// Hand out a native passthrough for encodings whose type is itself a
    /// declared format.
    pub native_types: bool,
    /// Only accept `buffer`, `view` and `utf8` as declared formats.
    pub strict_formats: bool,
}

impl Default for TranscoderOptions {
    fn default() -> Self {
        Self {
            identity: true,
            native_types: true,
            strict_formats: false,
        }
    }
}

// ---------------------------------------------------------------------------
// References and cache keys
// ---------------------------------------------------------------------------

/// Anything [`Transcoder::encoding`] accepts.
#[derive(Debug, Clone)]
pub enum EncodingRef {
    /// Built-in name, alias or the name of an encoding resolved earlier.
    Name(String),
    /// Descriptor, keyed by identity.
    Options(Arc<EncodingOptions>),
    /// Existing encoding, keyed by identity.
    Encoding(Arc<Encoding>),
}

impl From<&str> for EncodingRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for EncodingRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for EncodingRef {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<Arc<EncodingOptions>> for EncodingRef {
    fn from(options: Arc<EncodingOptions>) -> Self {
        Self::Options(options)
    }
}

impl From<&Arc<EncodingOptions>> for EncodingRef {
    fn from(options: &Arc<EncodingOptions>) -> Self {
        Self::Options(Arc::clone(options))
    }
}

/// A bare descriptor gets a fresh identity, so it never hits the cache by
/// reference; it is still reachable by its name afterwards.
impl From<EncodingOptions> for EncodingRef {
    fn from(options: EncodingOptions) -> Self {
        Self::Options(Arc::new(options))
    }
}

impl From<Arc<Encoding>> for EncodingRef {
    fn from(encoding: Arc<Encoding>) -> Self {
        Self::Encoding(encoding)
    }
}

impl From<&Arc<Encoding>> for EncodingRef {
    fn from(encoding: &Arc<Encoding>) -> Self {
        Self::Encoding(Arc::clone(encoding))
    }
}

/// Pointer-identity key. Holding the `Arc` keeps the address from being
/// reused while the entry exists.
struct ByAddress<T>(Arc<T>);

impl<T> Clone for ByAddress<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> PartialEq for ByAddress<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for ByAddress<T> {}

impl<T> Hash for ByAddress<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Name(String),
    Options(ByAddress<EncodingOptions>),
    Encoding(ByAddress<Encoding>),
}

impl CacheKey {
    fn of(reference: &EncodingRef) -> Result<Self> {
        Ok(match reference {
            EncodingRef::Name(name) if name.is_empty() => return Err(Error::InvalidReference),
            EncodingRef::Name(name) => Self::Name(name.clone()),
            EncodingRef::Options(options) => Self::Options(ByAddress(Arc::clone(options))),
            EncodingRef::Encoding(encoding) => Self::Encoding(ByAddress(Arc::clone(encoding))),
        })
    }
}

#[derive(Default)]
struct Cache {
    entries: HashMap<CacheKey, Arc<Encoding>>,
    /// Distinct encodings in first-registration order.
    order: Vec<Arc<Encoding>>,
}

impl Cache {
    fn get(&self, key: &CacheKey) -> Option<Arc<Encoding>> {
        let hit = self.entries.get(key).cloned()?;
        trace!("cache hit for encoding '{}'", hit.name());
        Some(hit)
    }

    /// Point `keys` at `encoding`. Encodings no name reaches any more drop
    /// out of the enumeration order; identity keys still find them.
    fn insert(&mut self, keys: impl IntoIterator<Item = CacheKey>, encoding: &Arc<Encoding>) {
        for key in keys {
            self.entries.insert(key, Arc::clone(encoding));
        }
        if !self.order.iter().any(|e| Arc::ptr_eq(e, encoding)) {
            trace!("registered encoding '{}'", encoding.name());
            self.order.push(Arc::clone(encoding));
        }

        let entries = &self.entries;
        self.order.retain(|e| {
            let named = entries
                .iter()
                .any(|(key, value)| matches!(key, CacheKey::Name(_)) && Arc::ptr_eq(value, e));
            if !named {
                trace!("encoding '{}' is shadowed", e.name());
            }
            named
        });
    }
}

// ---------------------------------------------------------------------------
// Transcoder
// ---------------------------------------------------------------------------

/// Resolves encoding references to encodings whose format the consumer
/// supports, caching every result.
///
/// # Example
/// ```
/// use transcodec::Transcoder;
///
/// let transcoder = Transcoder::new(["view"]).unwrap();
/// let utf8 = transcoder.encoding("utf8").unwrap();
/// assert_eq!(utf8.name(), "utf8+view");
/// assert_eq!(utf8.encode("a").unwrap().as_bytes(), Some(&b"a"[..]));
/// ```
pub struct Transcoder {
    formats: Vec<Format>,
    options: TranscoderOptions,
    names: AnonymousNames,
    /// Built-ins and aliases.
    table: HashMap<&'static str, Arc<Encoding>>,
    cache: Mutex<Cache>,
    resolving: ReentrantMutex<()>,
}

impl Transcoder {
    /// Create a transcoder for a consumer storing `formats`.
    pub fn new<I, S>(formats: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_options(formats, TranscoderOptions::default())
    }

    /// Create a transcoder with explicit options.
    ///
    /// Fails if a declared format is an alias, is empty, or falls outside
    /// the canonical set under `strict_formats`. Every built-in the
    /// consumer can reach is registered before returning.
    pub fn with_options<I, S>(formats: I, options: TranscoderOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut declared: Vec<Format> = Vec::new();
        for format in formats {
            let format = format.as_ref();
            if let Some(canonical) = builtin::canonical(format) {
                return Err(Error::AliasFormat {
                    alias: format.to_owned(),
                    canonical,
                });
            }
            let parsed: Format = format.parse()?;
            if options.strict_formats && !parsed.is_canonical() {
                return Err(Error::StrictFormat(format.to_owned()));
            }
            if !declared.contains(&parsed) {
                declared.push(parsed);
            }
        }

        let catalog = builtin::catalog(options.identity);
        let mut table: HashMap<&'static str, Arc<Encoding>> = catalog.iter().cloned().collect();
        for &(alias, canonical) in builtin::ALIASES {
            if let Some(encoding) = table.get(canonical).cloned() {
                table.insert(alias, encoding);
            }
        }

        let transcoder = Self {
            formats: declared,
            options,
            names: AnonymousNames::new(),
            table,
            cache: Mutex::new(Cache::default()),
            resolving: ReentrantMutex::new(()),
        };
        transcoder.register_builtins(catalog.iter().map(|&(name, _)| name))?;
        Ok(transcoder)
    }

    fn register_builtins<'a>(&self, names: impl Iterator<Item = &'a str>) -> Result<()> {
        for name in names {
            match self.encoding(name) {
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::NotSupported => {
                    debug!("skipping built-in encoding '{name}': {err}");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Declared formats, in declaration order.
    pub fn formats(&self) -> &[Format] {
        &self.formats
    }

    pub fn options(&self) -> &TranscoderOptions {
        &self.options
    }

    /// Whether the consumer declared `format`.
    pub fn supports(&self, format: &Format) -> bool {
        self.formats.contains(format)
    }

    /// Resolve `reference` to an encoding whose format is declared.
    ///
    /// Repeated lookups by the same reference, or by any name the result is
    /// reachable under, return the identical `Arc`.
    ///
    /// Descriptor factories run without the cache locked and may call back
    /// into this transcoder from the same thread. Another thread resolving
    /// a new reference waits for them to return.
    pub fn encoding(&self, reference: impl Into<EncodingRef>) -> Result<Arc<Encoding>> {
        let reference = reference.into();
        let key = CacheKey::of(&reference)?;
        if let Some(hit) = self.cache.lock().get(&key) {
            return Ok(hit);
        }

        let _resolving = self.resolving.lock();
        // Another thread may have resolved the key while this one waited.
        if let Some(hit) = self.cache.lock().get(&key) {
            return Ok(hit);
        }
        self.resolve(key, reference)
    }

    /// Distinct registered encodings in registration order.
    pub fn encodings(&self) -> Vec<Arc<Encoding>> {
        self.cache.lock().order.clone()
    }

    /// Names of the registered encodings. With `full`, transcoded variants
    /// keep their `+format` suffix.
    pub fn types(&self, full: bool) -> Vec<String> {
        self.cache
            .lock()
            .order
            .iter()
            .map(|e| {
                if full {
                    e.name().to_owned()
                } else {
                    e.common_name().to_owned()
                }
            })
            .collect()
    }

    fn resolve(&self, key: CacheKey, reference: EncodingRef) -> Result<Arc<Encoding>> {
        let source = match &reference {
            EncodingRef::Name(name) => self
                .table
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| Error::NotFound(name.clone()))?,
            EncodingRef::Encoding(encoding) => Arc::clone(encoding),
            EncodingRef::Options(options) => {
                Arc::new(Encoding::from_options(options, &self.names)?)
            }
        };

        // An alias and its canonical name share one source instance. The
        // names are pointed back at it in case a custom encoding took them.
        let source_key = CacheKey::Encoding(ByAddress(Arc::clone(&source)));
        let mut cache = self.cache.lock();
        if let Some(hit) = cache.get(&source_key) {
            let keys = [
                key,
                CacheKey::Name(source.name().to_owned()),
                CacheKey::Name(hit.name().to_owned()),
                CacheKey::Name(hit.common_name().to_owned()),
            ];
            cache.insert(keys, &hit);
            return Ok(hit);
        }
        drop(cache);

        let resolved = self.adapt(&source)?;
        let keys = [
            key,
            source_key,
            CacheKey::Encoding(ByAddress(Arc::clone(&resolved))),
            CacheKey::Name(source.name().to_owned()),
            CacheKey::Name(resolved.name().to_owned()),
            CacheKey::Name(resolved.common_name().to_owned()),
        ];
        self.cache.lock().insert(keys, &resolved);
        Ok(resolved)
    }

    /// Fit `source` to the declared formats.
    fn adapt(&self, source: &Arc<Encoding>) -> Result<Arc<Encoding>> {
        if self.options.native_types
            && !source.is_idempotent()
            && self.formats.iter().any(|f| f.as_str() == source.name())
        {
            debug!("using native passthrough for encoding '{}'", source.name());
            return Ok(Arc::new(Encoding::native(source.name())?));
        }

        if self.supports(source.format()) {
            return Ok(Arc::clone(source));
        }

        let target = if self.supports(&Format::View) {
            Format::View
        } else if self.supports(&Format::Buffer) {
            Format::Buffer
        } else {
            return Err(Error::Unsupported(source.name().to_owned()));
        };

        debug!(
            "transcoding encoding '{}' from '{}' to '{}'",
            source.name(),
            source.format(),
            target
        );
        source.transcode(&target)
    }
}

impl fmt::Debug for Transcoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcoder")
            .field("formats", &self.formats)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
