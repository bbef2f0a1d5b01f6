//! Depth-first traversal of directory trees for the shredder.
//!
//! A [`TreeWalker`] reports every node beneath a root to a [`Visitor`] in two phases: non-directory
//! entries through [`Visitor::enter_file`] as they are found, and directories through
//! [`Visitor::leave_directory`] once everything beneath them has been visited. This post-order is
//! what allows a directory to be removed after its contents have been.
//!
//! Entries that policy excludes (another file system, a directory already reached through a link)
//! are reported through [`Visitor::skip`] and left alone. Failures to read part of the tree are
//! handed to [`Visitor::walk_error`], which decides whether the walk goes on.

mod error;
mod target;
mod visitor;
mod walker;

pub use error::*;
pub use target::*;
pub use visitor::*;
pub use walker::*;
