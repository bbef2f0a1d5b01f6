#![cfg(target_os = "linux")]
//! Thin, typed wrappers over the Linux file system syscalls used by the shredder.
//!
//! Everything here reports failures as raw OS error numbers ([`RawOsError`]); giving those
//! numbers meaning is left to the callers, which know which path and operation they belong to.

pub mod dir;

mod error;
mod fd;
mod file_type;
mod fs;
mod metadata;
mod syscall;

pub use dir::Directory;
pub use error::*;
pub use fd::*;
pub use file_type::*;
pub use fs::*;
pub use metadata::*;
pub(crate) use syscall::*;
pub use syscall::RawOsError;

#[cfg(test)]
mod tests;
