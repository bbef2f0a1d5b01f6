use std::path::Path;

use derive_more::Display;

use crate::walk::{Target, WalkError};

/// Why the walker passed over an entry without visiting it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry lives on another file system than the walk's root.
    #[display("on another file system")]
    MountBoundary,
    /// The directory was already visited through another path, via a symlink.
    #[display("already visited")]
    AlreadyVisited,
}

/// Receives the nodes of a walk. Returning an error from any method stops the walk, which then
/// returns that error.
pub trait Visitor {
    type Error;

    /// Called for every entry that isn't a directory, before any later sibling.
    fn enter_file(&mut self, target: &Target) -> Result<(), Self::Error>;

    /// Called for every directory, including the root, once all of its entries have been visited.
    fn leave_directory(&mut self, target: &Target) -> Result<(), Self::Error>;

    fn skip(&mut self, target: &Target, reason: SkipReason) -> Result<(), Self::Error> {
        let _ = (target, reason);
        Ok(())
    }

    /// Called when part of the tree can't be read. Returning `Ok` carries on with the rest.
    fn walk_error(&mut self, path: &Path, error: WalkError) -> Result<(), Self::Error>;
}
