//! **nspkit** - reader for PFS0 containers (the flat archive inside NSP
//! packages).
//!
//! ```no_run
//! use nspkit::Container;
//!
//! # fn main() -> nspkit::Result<()> {
//! let nsp = Container::open("game.nsp")?;
//! let ticket = nsp.read_ticket()?;
//!
//! let nca = nsp.find_entry_by_suffix(".nca")?;
//! for chunk in nsp.open_entry_stream(nca)? {
//!     let chunk = chunk?;
//!     // forward chunk.data() to disk, a hasher, a decryptor...
//! #   let _ = (chunk, &ticket);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`pfs0`]      | Header and table decoding over any `Read + Seek` |
//! | [`container`] | Path-backed [`Container`]: lookups, full reads, extraction |
//! | [`stream`]    | [`EntryStream`] chunk iterator and its threaded hand-off |
//! | [`options`]   | [`ReadOptions`] |

pub mod container;
pub mod error;
pub mod options;
pub mod pfs0;
pub mod stream;
pub(crate) mod utils;

pub use container::Container;
pub use error::{Error, FormatError, Result};
pub use options::{DEFAULT_CHUNK_SIZE, ReadOptions};
pub use pfs0::{DataOrigin, Entry};
pub use stream::{Chunk, ChunkReceiver, EntryStream};
