//! Path-backed PFS0 container.
//!
//! A [`Container`] remembers only the path and the decoded metadata. Every
//! read opens its own file handle, so reads never share a seek position and
//! a loaded container can be used from several threads at once.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Take, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FormatError;
use crate::options::ReadOptions;
use crate::pfs0::{Entry, Pfs0};
use crate::stream::EntryStream;
use crate::{Error, Result};

/// Suffix identifying the ticket entry of an NSP.
pub const TICKET_SUFFIX: &str = "tik";

/// Metadata captured by a successful load.
#[derive(Debug, Clone)]
struct Loaded {
    pfs0: Pfs0,
    total_size: u64,
}

/// One PFS0 file on disk.
#[derive(Debug, Clone)]
pub struct Container {
    path: PathBuf,
    options: ReadOptions,
    loaded: Option<Loaded>,
}

impl Container {
    /// Describe the container at `path`. Nothing is read until
    /// [`load_metadata`](Self::load_metadata).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, ReadOptions::default())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: ReadOptions) -> Self {
        Self {
            path: path.into(),
            options,
            loaded: None,
        }
    }

    /// Create and load in one step.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut container = Self::new(path);
        container.load_metadata()?;
        Ok(container)
    }

    /// Read the header, entry table and string table.
    ///
    /// Calling this again re-reads the file and replaces the previous
    /// metadata. On failure the previous state is kept as it was.
    pub fn load_metadata(&mut self) -> Result<()> {
        let mut file = File::open(&self.path)?;
        let total_size = file.metadata()?.len();
        file.seek(SeekFrom::Start(0))?;

        let pfs0 = Pfs0::parse(&mut file)?;
        if self.options.verify_bounds {
            pfs0.verify_bounds(self.options.data_origin, total_size)?;
        }

        debug!(
            path = %self.path.display(),
            entries = pfs0.entries.len(),
            header_length = pfs0.header_length(),
            total_size,
            "loaded PFS0 metadata"
        );
        self.loaded = Some(Loaded { pfs0, total_size });
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// File name up to its first `.`, e.g. `"Game"` for `"Game.v0.nsp"`.
    pub fn basename(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('.').next())
            .unwrap_or_default()
    }

    fn loaded(&self) -> Result<&Loaded> {
        self.loaded.as_ref().ok_or(Error::NotLoaded)
    }

    /// File length recorded at load time.
    pub fn total_size(&self) -> Result<u64> {
        Ok(self.loaded()?.total_size)
    }

    /// `16 + 24 * entry_count`.
    pub fn header_length(&self) -> Result<u64> {
        Ok(self.loaded()?.pfs0.header_length())
    }

    /// Absolute offset entry offsets are measured from.
    pub fn data_offset(&self) -> Result<u64> {
        Ok(self.loaded()?.pfs0.data_offset(self.options.data_origin))
    }

    /// All entries in table order; empty before load.
    pub fn entries(&self) -> &[Entry] {
        self.loaded
            .as_ref()
            .map(|l| l.pfs0.entries.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Look up an entry by table index.
    pub fn entry(&self, index: usize) -> Result<&Entry> {
        let entries = &self.loaded()?.pfs0.entries;
        entries.get(index).ok_or(Error::Index {
            index,
            len: entries.len(),
        })
    }

    /// Index of the first entry, in table order, whose name ends with
    /// `suffix`.
    pub fn find_entry_by_suffix(&self, suffix: &str) -> Result<usize> {
        self.loaded()?
            .pfs0
            .entries
            .iter()
            .position(|e| e.has_suffix(suffix))
            .ok_or_else(|| Error::NotFound {
                suffix: suffix.to_owned(),
            })
    }

    /// Find an entry by its exact name. Returns [`None`] if not found.
    pub fn find_entry_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries().iter().find(|e| e.name == name)
    }

    /// Check that every entry lies within the file.
    pub fn verify_layout(&self) -> Result<()> {
        let loaded = self.loaded()?;
        loaded
            .pfs0
            .verify_bounds(self.options.data_origin, loaded.total_size)
    }

    /// Open a fresh handle positioned at the start of entry `index`.
    fn open_at(&self, index: usize) -> Result<(File, &Entry)> {
        let entry = self.entry(index)?;
        let data_offset = self.data_offset()?;
        let start = entry
            .absolute_offset(data_offset)
            .ok_or(FormatError::EntryOutOfBounds {
                index,
                end: entry.end(data_offset),
                total_size: self.loaded()?.total_size,
            })?;

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(start))?;
        Ok((file, entry))
    }

    /// Read the whole of entry `index` into memory.
    ///
    /// Intended for small entries such as tickets. If the file ends before
    /// the entry does, fails with an [`Error::Io`] of kind
    /// [`io::ErrorKind::UnexpectedEof`].
    pub fn read_entry_fully(&self, index: usize) -> Result<Vec<u8>> {
        let (file, entry) = self.open_at(index)?;
        let size = entry.size;

        let mut data = Vec::new();
        file.take(size).read_to_end(&mut data)?;
        if (data.len() as u64) < size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "entry {index} truncated: expected {size} bytes, got {}",
                    data.len()
                ),
            )
            .into());
        }
        Ok(data)
    }

    /// Read the first ticket entry.
    pub fn read_ticket(&self) -> Result<Vec<u8>> {
        let index = self.find_entry_by_suffix(TICKET_SUFFIX)?;
        self.read_entry_fully(index)
    }

    /// Stream entry `index` in chunks of the configured size (2048 bytes by
    /// default).
    pub fn open_entry_stream(&self, index: usize) -> Result<EntryStream> {
        self.open_entry_stream_with(index, self.options.chunk_size)
    }

    /// Stream entry `index` in chunks of `chunk_size` bytes.
    pub fn open_entry_stream_with(
        &self,
        index: usize,
        chunk_size: NonZeroUsize,
    ) -> Result<EntryStream> {
        let (file, entry) = self.open_at(index)?;
        Ok(EntryStream::new(file, entry.size, chunk_size))
    }

    /// Bounded reader over entry `index` with its own file handle.
    pub fn entry_reader(&self, index: usize) -> Result<Take<File>> {
        let (file, entry) = self.open_at(index)?;
        Ok(file.take(entry.size))
    }

    /// Copy entry `index` into `w` chunk by chunk, returning the number of
    /// bytes written.
    pub fn extract_to<W: Write>(&self, index: usize, w: &mut W) -> Result<u64> {
        let mut written = 0u64;
        for chunk in self.open_entry_stream(index)? {
            let chunk = chunk?;
            w.write_all(chunk.data())?;
            written += chunk.len() as u64;
        }
        w.flush()?;
        debug!(index, written, "extracted entry");
        Ok(written)
    }
}
