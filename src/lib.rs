//! `fshred` overwrites the contents of files, devices and whole directory trees with bytes from
//! an entropy source, then optionally removes what it overwrote.
//!
//! # Purpose
//! The point is best-effort destruction of data before deleting it or handing a device on. It is
//! not a guarantee: journaling and copy-on-write file systems, flash wear-levelling and the like
//! can all keep old copies of a block around, and nothing here can reach those.
//!
//! # Layout
//! - [`fs`] holds thin `libc` wrappers: descriptors, directory streams read with `getdents64`,
//!   `stat` and friends. Errors there are plain `errno` values.
//! - [`walk`] traverses directory trees depth-first, handing entries to a
//!   [`Visitor`](walk::Visitor) and directories only once their contents are done.
//! - [`shred`] is the engine: the working buffer, the entropy source, single overwrite passes and
//!   the [`Shredder`](shred::Shredder) running all of it over a list of roots.
//! - [`cancel`] lets a signal handler stop a run between entries.
//! - [`cli`] is the argument surface of the `fshred` binary.
//!
//! # Error Handling
//! Errors are strongly typed, using enums for static dispatch with small structs (mostly ZSTs)
//! implementing [`Error`](std::error::Error) as their variants. Each operation gets an enum
//! holding only the errors it can actually produce, and a whole run reports a single
//! [`ShredError`](shred::ShredError) naming the path that failed.
//!
//! # Dependencies
//! `libc` for syscalls, `zeroize` for wiping the working buffer in a way the compiler can't
//! optimise out, `tracing` for logging and `derive_more` to avoid writing the same error
//! boilerplate over and over. The binary adds `clap`, `ctrlc` and `tracing-subscriber`.
//!
//! Linux only, for now.

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod cancel;
pub mod cli;
pub mod fs;
pub mod shred;
pub mod walk;
