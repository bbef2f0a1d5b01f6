//! The shred engine: overwriting targets with bytes from an entropy source, and the run that
//! applies it to whole trees.
//!
//! The pieces, from the bottom up:
//! - [`ShredBuffer`] carries bytes from the source to a target and is zeroed after every pass.
//! - [`EntropySource`] supplies those bytes, rewinding when a finite source runs out.
//! - [`overwrite`] performs a single pass over part of a target.
//! - [`compute_extent`] decides which part that is.
//! - [`Shredder`] runs all of the above for every target of a run, walking directories with a
//!   [`TreeWalker`](crate::walk::TreeWalker) and removing entries as configured.
//!
//! # Failure
//! A run stops at the first failure, reported as a [`ShredError`] naming the path involved.
//! Nothing is rolled back: entries handled before the failure stay overwritten and removed.

mod buffer;
mod config;
mod entropy;
mod error;
mod extent;
mod filter;
mod pass;
mod shredder;

pub use buffer::*;
pub use config::*;
pub use entropy::*;
pub use error::*;
pub use extent::*;
pub use filter::*;
pub use pass::*;
pub use shredder::*;

#[cfg(test)]
mod tests;
