use std::collections::HashSet;
use std::mem;
use std::path::PathBuf;
use std::vec;

use tracing::{debug, trace};

use crate::fs::dir::{DirEntries, DirEntry};
use crate::fs::{Directory, FileType, OsError, RawOsError};
use crate::shred::ShredConfig;
use crate::walk::{SkipReason, Target, Visitor, WalkError};

/// The policy of a [`TreeWalker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    pub follow_symlinks: bool,
    pub cross_mounts: bool,
    /// The most directory streams held open at once, at least 1.
    pub fd_limit: usize,
}

impl From<&ShredConfig> for WalkOptions {
    fn from(config: &ShredConfig) -> Self {
        WalkOptions {
            follow_symlinks: config.follow_symlinks,
            cross_mounts: config.cross_mounts,
            fd_limit: config.fd_limit,
        }
    }
}

/// Counts of what a walk reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub files: u64,
    pub directories: u64,
    pub skipped: u64,
    /// The most directory streams that were open at the same time.
    pub peak_open: usize,
}

enum Pending {
    Streaming(DirEntries),
    Buffered(vec::IntoIter<Result<DirEntry, RawOsError>>),
}

impl Pending {
    fn next(&mut self) -> Option<Result<DirEntry, RawOsError>> {
        match self {
            Pending::Streaming(entries) => entries.next(),
            Pending::Buffered(entries) => entries.next(),
        }
    }

    const fn is_streaming(&self) -> bool {
        matches!(self, Pending::Streaming(_))
    }

    /// Reads the remaining entries into memory and closes the stream.
    fn buffer(&mut self) {
        if let Pending::Streaming(entries) = mem::replace(self, Pending::Buffered(Vec::new().into_iter())) {
            let rest: Vec<_> = entries.collect();
            *self = Pending::Buffered(rest.into_iter());
        }
    }
}

struct Frame {
    target: Target,
    pending: Pending,
}

enum Step {
    Entry(Target),
    StatFailed(PathBuf, RawOsError),
    ReadFailed(PathBuf, RawOsError),
    Finished,
}

/// Walks directory trees depth-first, reporting directories after their contents.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    options: WalkOptions,
}

impl TreeWalker {
    pub fn new(options: WalkOptions) -> TreeWalker {
        TreeWalker {
            options: WalkOptions {
                fd_limit: options.fd_limit.max(1),
                ..options
            },
        }
    }

    /// Walks the tree below `root`, which should describe a directory.
    pub fn walk<V: Visitor>(&self, root: Target, visitor: &mut V) -> Result<WalkStats, V::Error> {
        let mut stats = WalkStats::default();
        let mut visited: HashSet<(u64, u64)> = HashSet::new();
        let root_device = root.device_id;

        if root.kind != FileType::Directory {
            stats.files += 1;
            visitor.enter_file(&root)?;
            return Ok(stats);
        }

        let mut stack = match Directory::open(&root.path) {
            Ok(dir) => vec![Frame {
                target: root,
                pending: Pending::Streaming(dir.entries()),
            }],
            Err(e) => {
                visitor.walk_error(&root.path, WalkError::OpenDirectory(OsError(e)))?;
                return Ok(stats);
            },
        };
        let mut open = 1;
        stats.peak_open = 1;
        visited.insert((stack[0].target.device_id, stack[0].target.inode_num));

        loop {
            let step = match stack.last_mut() {
                None => break,
                Some(frame) => match frame.pending.next() {
                    Some(Ok(entry)) => {
                        let path = frame.target.path.join(&entry.name);
                        match Target::probe(&path, self.options.follow_symlinks) {
                            Ok(target) => Step::Entry(target),
                            Err(e) => Step::StatFailed(path, e),
                        }
                    },
                    Some(Err(e)) => Step::ReadFailed(frame.target.path.clone(), e),
                    None => Step::Finished,
                },
            };

            let child = match step {
                Step::Finished => {
                    if let Some(frame) = stack.pop() {
                        if frame.pending.is_streaming() {
                            open -= 1;
                        }
                        // Close the stream before the visitor gets to remove the directory.
                        drop(frame.pending);
                        stats.directories += 1;
                        visitor.leave_directory(&frame.target)?;
                    }
                    continue;
                },
                Step::StatFailed(path, e) => {
                    visitor.walk_error(&path, WalkError::Stat(OsError(e)))?;
                    continue;
                },
                Step::ReadFailed(path, e) => {
                    visitor.walk_error(&path, WalkError::ReadDirectory(OsError(e)))?;
                    continue;
                },
                Step::Entry(child) => child,
            };

            if !self.options.cross_mounts && child.device_id != root_device {
                debug!(path = %child.path.display(), "skipping entry on another file system");
                stats.skipped += 1;
                visitor.skip(&child, SkipReason::MountBoundary)?;
                continue;
            }

            if child.kind != FileType::Directory {
                stats.files += 1;
                visitor.enter_file(&child)?;
                continue;
            }

            if !visited.insert((child.device_id, child.inode_num)) {
                debug!(path = %child.path.display(), "skipping directory visited before");
                stats.skipped += 1;
                visitor.skip(&child, SkipReason::AlreadyVisited)?;
                continue;
            }

            if open >= self.options.fd_limit {
                if let Some(frame) = stack.iter_mut().rev().find(|frame| frame.pending.is_streaming()) {
                    trace!(path = %frame.target.path.display(), "descriptor limit reached, buffering entries");
                    frame.pending.buffer();
                    open -= 1;
                }
            }

            match Directory::open(&child.path) {
                Ok(dir) => {
                    stack.push(Frame {
                        target: child,
                        pending: Pending::Streaming(dir.entries()),
                    });
                    open += 1;
                    stats.peak_open = stats.peak_open.max(open);
                },
                Err(e) => visitor.walk_error(&child.path, WalkError::OpenDirectory(OsError(e)))?,
            }
        }

        Ok(stats)
    }
}
