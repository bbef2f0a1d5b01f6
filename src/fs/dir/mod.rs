//! Types for reading the directories of a file system, primarily [`Directory`] and the
//! [`DirEntries`] iterator over its contents.
//!
//! # Reading
//! Entries are read in batches with the `getdents64` syscall, in whatever order the file system
//! stores them. The `.` and `..` entries are never yielded.
//!
//! # Ownership
//! [`Directory::entries`] consumes the `Directory`, so the stream is closed when the iterator is
//! dropped. Callers that need to release the descriptor early (see the tree walker's descriptor
//! budget) can collect the remaining entries first.

mod dir;
mod dir_entry;

pub use dir::*;
pub use dir_entry::*;

pub(crate) const BUFFER_SIZE: usize = 8192;
