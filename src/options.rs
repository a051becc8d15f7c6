//! Read configuration for a [`crate::Container`].

use std::num::NonZeroUsize;

use crate::pfs0::DataOrigin;

/// Native alignment unit of the format, used as the default chunk size.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(0x800) {
    Some(n) => n,
    None => unreachable!(),
};

/// Knobs applied to every read made through a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Chunk length used by [`crate::Container::open_entry_stream`].
    pub chunk_size: NonZeroUsize,
    /// Reject containers whose entries run past the end of the file while
    /// loading metadata.
    pub verify_bounds: bool,
    /// Where entry offsets are measured from.
    pub data_origin: DataOrigin,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            verify_bounds: false,
            data_origin: DataOrigin::AfterEntryTable,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn verify_bounds(mut self, verify: bool) -> Self {
        self.verify_bounds = verify;
        self
    }

    pub fn data_origin(mut self, origin: DataOrigin) -> Self {
        self.data_origin = origin;
        self
    }
}
