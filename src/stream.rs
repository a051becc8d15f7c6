//! Chunked, forward-only reading of one entry.
//!
//! [`EntryStream`] is a plain [`Iterator`]: each call to `next` performs one
//! blocking read of at most `chunk_size` bytes. It owns its reader, so the
//! file handle lives exactly as long as the stream does and is released on
//! exhaustion or on drop, whichever comes first.
//!
//! [`EntryStream::spawn`] moves production onto a background thread and
//! hands chunks over a bounded channel, letting the consumer process one
//! chunk while the next is being read.

use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::num::NonZeroUsize;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use tracing::trace;

use crate::Result;

/// One bounded slice of an entry's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Offset of the first byte relative to the start of the entry.
    pub offset: u64,
    /// Bytes still to come after this chunk.
    pub remaining: u64,
    data: Vec<u8>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Lazy sequence of [`Chunk`]s covering one entry.
///
/// Every chunk but the last is exactly `chunk_size` bytes; the last holds
/// whatever is left. A failed read is yielded once as `Err`, after which the
/// stream ends.
#[derive(Debug)]
pub struct EntryStream<R = File> {
    inner: R,
    chunk_size: usize,
    offset: u64,
    remaining: u64,
    failed: bool,
}

impl<R: Read> EntryStream<R> {
    /// Wrap a reader already positioned at the first byte of an entry of
    /// `size` bytes.
    pub fn new(inner: R, size: u64, chunk_size: NonZeroUsize) -> Self {
        Self {
            inner,
            chunk_size: chunk_size.get(),
            offset: 0,
            remaining: size,
            failed: false,
        }
    }

    /// Bytes not yet yielded.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Number of chunks still to be produced if no read fails.
    pub fn chunks_left(&self) -> u64 {
        if self.failed {
            return 0;
        }
        self.remaining.div_ceil(self.chunk_size as u64)
    }
}

impl<R: Read + Send + 'static> EntryStream<R> {
    /// Produce chunks on a background thread.
    ///
    /// At most one finished chunk waits in the channel while the producer
    /// reads the next. Dropping the returned [`ChunkReceiver`] stops the
    /// producer at its next hand-off and releases the reader.
    pub fn spawn(self) -> ChunkReceiver {
        let (tx, rx) = mpsc::sync_channel(1);
        thread::spawn(move || produce(self, tx));
        ChunkReceiver { rx }
    }
}

fn produce<R: Read>(stream: EntryStream<R>, tx: SyncSender<Result<Chunk>>) {
    for item in stream {
        if tx.send(item).is_err() {
            trace!("chunk consumer went away");
            return;
        }
    }
}

impl<R: Read> Iterator for EntryStream<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }

        let len = self.remaining.min(self.chunk_size as u64) as usize;
        let mut data = vec![0u8; len];
        if let Err(e) = self.inner.read_exact(&mut data) {
            self.failed = true;
            return Some(Err(e.into()));
        }

        let offset = self.offset;
        self.offset += len as u64;
        self.remaining -= len as u64;
        trace!(offset, len, remaining = self.remaining, "read chunk");

        Some(Ok(Chunk {
            offset,
            remaining: self.remaining,
            data,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.chunks_left()).unwrap_or(usize::MAX);
        (left.min(1), Some(left))
    }
}

impl<R: Read> FusedIterator for EntryStream<R> {}

/// Receiving end of a stream started with [`EntryStream::spawn`].
#[derive(Debug)]
pub struct ChunkReceiver {
    rx: Receiver<Result<Chunk>>,
}

impl Iterator for ChunkReceiver {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rx.recv().ok()
    }
}
