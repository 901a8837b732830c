// Physical format tags.
//
// The canonical formats are `buffer`, `view` and `utf8`; `id` is the
// passthrough format of the identity encoding. Consumers may declare any
// other name, which becomes `Format::Other`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    Buffer,
    View,
    Utf8,
    Id,
    Other(Arc<str>),
}

impl Format {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Buffer => "buffer",
            Self::View => "view",
            Self::Utf8 => "utf8",
            Self::Id => "id",
            Self::Other(name) => name,
        }
    }

    /// Whether this is one of `buffer`, `view` or `utf8`.
    pub fn is_canonical(&self) -> bool {
        matches!(self, Self::Buffer | Self::View | Self::Utf8)
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => return Err(Error::EmptyFormat),
            "buffer" => Self::Buffer,
            "view" => Self::View,
            "utf8" => Self::Utf8,
            "id" => Self::Id,
            other => Self::Other(Arc::from(other)),
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
