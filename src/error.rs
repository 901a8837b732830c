// Error taxonomy for encoding resolution and transcoding.
//
// Every failure is a deterministic function of its inputs, so nothing here
// is retryable. Callers branch on `Error::kind()` rather than on messages.

use thiserror::Error;

use crate::encoding::Format;

pub type Result<T> = std::result::Result<T, Error>;

/// Stable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed construction arguments, descriptor fields or references.
    InvalidArgument,
    /// A string reference does not name any known encoding.
    NotFound,
    /// An encoding's format cannot be reached with the declared formats.
    NotSupported,
    /// An encode or decode step rejected its input.
    InvalidValue,
}

impl ErrorKind {
    /// Machine-readable code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidArgument => "ENCODING_INVALID_ARGUMENT",
            Self::NotFound => "ENCODING_NOT_FOUND",
            Self::NotSupported => "ENCODING_NOT_SUPPORTED",
            Self::InvalidValue => "ENCODING_INVALID_VALUE",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("The '{option}' option must be {expected}")]
    InvalidOption {
        option: &'static str,
        expected: &'static str,
    },

    #[error("First argument 'encoding' must be a non-empty name, options or an encoding")]
    InvalidReference,

    #[error("Declared formats must be non-empty strings")]
    EmptyFormat,

    #[error("Encoding '{0}' is not found")]
    NotFound(String),

    #[error("Encoding '{0}' is not supported")]
    Unsupported(String),

    #[error("Encoding '{name}' cannot be transcoded to '{target}'")]
    CannotTranscode { name: String, target: Format },

    #[error("The '{alias}' alias is not supported here; use '{canonical}' instead")]
    AliasFormat {
        alias: String,
        canonical: &'static str,
    },

    #[error("Format '{0}' is not supported here; use 'buffer', 'view' or 'utf8'")]
    StrictFormat(String),

    #[error("Encoding '{encoding}' expected a {expected} value, got {found}")]
    UnexpectedValue {
        encoding: String,
        expected: Format,
        found: &'static str,
    },

    #[error("JSON codec failed: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "hex")]
    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    #[cfg(feature = "base64")]
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("{0}")]
    Codec(String),
}

impl Error {
    /// Failure raised by a caller-supplied encode or decode function.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOption { .. } | Self::InvalidReference | Self::EmptyFormat => {
                ErrorKind::InvalidArgument
            }
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unsupported(_)
            | Self::CannotTranscode { .. }
            | Self::AliasFormat { .. }
            | Self::StrictFormat(_) => ErrorKind::NotSupported,
            Self::UnexpectedValue { .. } | Self::Json(_) | Self::Codec(_) => {
                ErrorKind::InvalidValue
            }
            #[cfg(feature = "hex")]
            Self::Hex(_) => ErrorKind::InvalidValue,
            #[cfg(feature = "base64")]
            Self::Base64(_) => ErrorKind::InvalidValue,
        }
    }

    /// Shorthand for `self.kind().code()`.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
