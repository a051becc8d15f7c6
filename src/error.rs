//! Library-wide error and result types.

use std::io;

use thiserror::Error;

/// Result alias used throughout nspkit.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the library can produce.
///
/// Every malformed-input path maps onto one of these variants; nothing in
/// the library panics on bad data.
#[derive(Debug, Error)]
pub enum Error {
    /// An underlying open/seek/read failed. Premature end of an entry's
    /// data surfaces here with [`io::ErrorKind::UnexpectedEof`].
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The container does not follow the PFS0 layout.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    /// A name-suffix lookup matched no entry.
    #[error("no entry name ends with '{suffix}'")]
    NotFound { suffix: String },
    /// An index-based accessor was given an index past the entry table.
    #[error("entry index {index} out of range (container holds {len} entries)")]
    Index { index: usize, len: usize },
    /// A read was attempted before [`crate::Container::load_metadata`]
    /// succeeded.
    #[error("container metadata has not been loaded")]
    NotLoaded,
}

/// Structural violations of the PFS0 layout.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The first four bytes were not `PFS0`.
    #[error("invalid PFS0 header: expected 'PFS0', got '{}'", String::from_utf8_lossy(found))]
    BadMagic { found: [u8; 4] },
    /// A header, entry record or string table read came up short.
    #[error("truncated {region}: expected {expected} bytes, got {actual}")]
    Truncated {
        region: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An entry's name offset points past the end of the string table.
    #[error("entry {index}: name offset {offset} outside string table of {table_len} bytes")]
    NameOutOfRange {
        index: usize,
        offset: usize,
        table_len: usize,
    },
    /// An entry's data range runs past the end of the file.
    #[error("entry {index}: data ends at {end} but file is {total_size} bytes")]
    EntryOutOfBounds {
        index: usize,
        end: EndOffset,
        total_size: u64,
    },
}

/// End offset of an entry, which may not fit in a `u64` for hostile tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOffset {
    At(u64),
    Overflow,
}

impl std::fmt::Display for EndOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndOffset::At(v) => write!(f, "{v}"),
            EndOffset::Overflow => write!(f, "<overflow>"),
        }
    }
}

impl Error {
    /// Returns the [`FormatError`] if this is a format error.
    pub fn as_format(&self) -> Option<&FormatError> {
        match self {
            Error::Format(e) => Some(e),
            _ => None,
        }
    }
}
