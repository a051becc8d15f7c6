//! PFS0 (PartitionFS) - flat archive container, as used by NSP packages.
//!
//! ## Layout
//! ```text
//! [0x00] Magic "PFS0"              (4 bytes)
//! [0x04] EntryCount                (u16 LE)
//! [0x06] (unused)                  (2 bytes)
//! [0x08] StringTableSize           (u16 LE)
//! [0x0A] (unused)                  (2 bytes)
//! [0x0C] Reserved                  (4 bytes)
//! [0x10] EntryTable                (EntryCount × 0x18 bytes)
//! [0x10 + EntryCount×0x18]         = header_length
//!        StringTable               (StringTableSize bytes)
//! [header_length + entry.offset]
//!        Entry data                (entry.size bytes)
//! ```
//!
//! ## Entry record (0x18 bytes)
//! ```text
//! [0x00] Offset     - relative to the data origin (u64 LE)
//! [0x08] Size       - in bytes (u64 LE)
//! [0x10] NameOffset - byte offset into the string table (u32 LE)
//! [0x14] Reserved   (u32)
//! ```
//!
//! Entry offsets are measured from `header_length` by default. Containers
//! produced by the console's own tooling measure them from the end of the
//! string table instead; select [`DataOrigin::AfterStringTable`] for those.

use std::io::{Read, Seek, SeekFrom};

use tracing::warn;

use crate::Result;
use crate::error::{EndOffset, FormatError};
use crate::utils::{bytesa, bytesv, le_u16, le_u32, le_u64, null_string};

/// Container signature.
pub const MAGIC: [u8; 4] = *b"PFS0";
/// Size of the fixed header preceding the entry table.
pub const HEADER_SIZE: u64 = 0x10;
/// Size of one entry record.
pub const ENTRY_RECORD_SIZE: u64 = 0x18;

/// Where entry offsets are measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataOrigin {
    /// Offsets are relative to `header_length` (end of the entry table).
    #[default]
    AfterEntryTable,
    /// Offsets are relative to the end of the string table.
    AfterStringTable,
}

/// Fixed 16-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pfs0Header {
    pub entry_count: u16,
    pub string_table_len: u16,
}

impl Pfs0Header {
    /// Decode the fixed header, checking the magic.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE as usize]) -> Result<Self> {
        let mut found = [0u8; 4];
        found.copy_from_slice(&buf[..4]);
        if found != MAGIC {
            return Err(FormatError::BadMagic { found }.into());
        }
        Ok(Self {
            entry_count: le_u16(buf, 0x04),
            string_table_len: le_u16(buf, 0x08),
        })
    }

    /// Byte offset of the end of the entry table: `16 + 24 * entry_count`.
    pub fn header_length(&self) -> u64 {
        HEADER_SIZE + ENTRY_RECORD_SIZE * self.entry_count as u64
    }
}

/// One named blob inside a PFS0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Position in the entry table.
    pub index: usize,
    /// Name decoded from the string table.
    pub name: String,
    /// Offset of the data relative to the data origin.
    pub start_offset: u64,
    /// Data size in bytes.
    pub size: u64,
}

impl Entry {
    /// Absolute file offset of the first data byte, given the container's
    /// data origin. [`None`] on overflow.
    pub fn absolute_offset(&self, data_offset: u64) -> Option<u64> {
        data_offset.checked_add(self.start_offset)
    }

    /// Absolute file offset one past the last data byte.
    pub fn end(&self, data_offset: u64) -> EndOffset {
        match self
            .absolute_offset(data_offset)
            .and_then(|start| start.checked_add(self.size))
        {
            Some(end) => EndOffset::At(end),
            None => EndOffset::Overflow,
        }
    }

    /// Whether the name ends with `suffix` (byte-wise, case-sensitive).
    pub fn has_suffix(&self, suffix: &str) -> bool {
        !suffix.is_empty() && self.name.as_bytes().ends_with(suffix.as_bytes())
    }
}

/// Parsed PFS0 metadata. File data is never loaded here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pfs0 {
    pub header: Pfs0Header,
    /// All entries in declaration order.
    pub entries: Vec<Entry>,
}

impl Pfs0 {
    /// Decode a PFS0 header, entry table and string table from `r`.
    ///
    /// `r` must be positioned at the magic; every offset is taken relative
    /// to that position. Short reads are [`FormatError::Truncated`].
    pub fn parse<R: Read + Seek>(r: &mut R) -> Result<Self> {
        let base = r.stream_position()?;

        let raw = bytesa::<{ HEADER_SIZE as usize }>(r, "header")?;
        let header = Pfs0Header::from_bytes(&raw)?;
        let header_length = header.header_length();

        r.seek(SeekFrom::Start(base + header_length))?;
        let string_table = bytesv(r, header.string_table_len as usize, "string table")?;

        let mut entries = Vec::with_capacity(header.entry_count as usize);
        for index in 0..header.entry_count as usize {
            r.seek(SeekFrom::Start(
                base + HEADER_SIZE + ENTRY_RECORD_SIZE * index as u64,
            ))?;
            let record = bytesa::<{ ENTRY_RECORD_SIZE as usize }>(r, "entry record")?;
            let start_offset = le_u64(&record, 0x00);
            let size = le_u64(&record, 0x08);
            let name_offset = le_u32(&record, 0x10) as usize;

            let name = null_string(&string_table, name_offset).ok_or(
                FormatError::NameOutOfRange {
                    index,
                    offset: name_offset,
                    table_len: string_table.len(),
                },
            )?;

            entries.push(Entry {
                index,
                name,
                start_offset,
                size,
            });
        }

        Ok(Self { header, entries })
    }

    /// End of the entry table; the default data origin.
    pub fn header_length(&self) -> u64 {
        self.header.header_length()
    }

    /// Offset entry data is measured from under `origin`.
    pub fn data_offset(&self, origin: DataOrigin) -> u64 {
        match origin {
            DataOrigin::AfterEntryTable => self.header_length(),
            DataOrigin::AfterStringTable => {
                self.header_length() + self.header.string_table_len as u64
            }
        }
    }

    /// Check that every entry lies within a file of `total_size` bytes.
    ///
    /// Returns the first offending entry as
    /// [`FormatError::EntryOutOfBounds`].
    pub fn verify_bounds(&self, origin: DataOrigin, total_size: u64) -> Result<()> {
        let data_offset = self.data_offset(origin);
        for entry in &self.entries {
            let end = entry.end(data_offset);
            let fits = matches!(end, EndOffset::At(e) if e <= total_size);
            if !fits {
                warn!(index = entry.index, name = %entry.name, %end, total_size, "entry crosses end of file");
                return Err(FormatError::EntryOutOfBounds {
                    index: entry.index,
                    end,
                    total_size,
                }
                .into());
            }
        }
        Ok(())
    }
}
