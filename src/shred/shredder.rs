use std::path::{Path, PathBuf};

use libc::{O_CREAT, O_EXCL, O_NOFOLLOW, O_WRONLY};
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::fs::{self, Fd, FileType, OsError, RawOsError};
use crate::shred::{
    AcceptAll, ArgumentError, EntropySource, InterruptError, ShredBuffer, ShredConfig, ShredError,
    ShredErrorKind, TargetFilter, UnlinkLevel, compute_extent, overwrite,
};
use crate::walk::{SkipReason, Target, TreeWalker, Visitor, WalkError, WalkOptions};

/// Counters for everything a [`Shredder`] has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub shredded: u64,
    pub bytes_written: u64,
    pub unlinked: u64,
    pub directories_removed: u64,
    pub skipped: u64,
}

/// The result of handling a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShredOutcome {
    pub path: PathBuf,
    /// Bytes written by the rounds that completed.
    pub bytes_written: u64,
    pub unlinked: bool,
    pub error: Option<ShredErrorKind>,
}

impl ShredOutcome {
    fn new(path: &Path) -> ShredOutcome {
        ShredOutcome {
            path: path.to_owned(),
            bytes_written: 0,
            unlinked: false,
            error: None,
        }
    }

    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<ShredOutcome, ShredError> {
        match self.error {
            Some(kind) => Err(ShredError::new(self.path, kind)),
            None => Ok(self),
        }
    }
}

/// Runs a configured shred over any number of roots.
///
/// The entropy source is opened once, when the shredder is created, and shared by every pass of
/// the run. Roots are handled in order and the run stops at the first failure.
///
/// ```no_run
/// use fshred::shred::{ShredConfig, Shredder, UnlinkLevel};
///
/// let mut config = ShredConfig::new();
/// config.rounds(3).unlink(UnlinkLevel::SkipSpecial);
///
/// let mut shredder = Shredder::new(config)?;
/// let summary = shredder.run(["secrets/"])?;
/// println!("{} entries shredded", summary.shredded);
/// # Ok::<(), fshred::shred::ShredError>(())
/// ```
#[derive(Debug)]
pub struct Shredder<F = AcceptAll> {
    config: ShredConfig,
    source: EntropySource,
    buffer: ShredBuffer,
    filter: F,
    cancel: CancelToken,
    summary: RunSummary,
}

impl Shredder<AcceptAll> {
    pub fn new(config: ShredConfig) -> Result<Shredder<AcceptAll>, ShredError> {
        config.validate().map_err(|e| ShredError::new("", e))?;

        let mut source =
            EntropySource::open(&config.source).map_err(|e| ShredError::from_raw(&config.source, e))?;
        // Seeking a pipe fails, so only seek when asked to.
        if config.input_offset != 0 {
            source
                .seek(config.input_offset)
                .map_err(|e| ShredError::new(&config.source, e))?;
        }

        let buffer = ShredBuffer::new(config.buffer_length)
            .map_err(|_| ShredError::new("", ArgumentError::new("buffer length must be positive")))?;

        Ok(Shredder {
            config,
            source,
            buffer,
            filter: AcceptAll,
            cancel: CancelToken::new(),
            summary: RunSummary::default(),
        })
    }
}

impl<F: TargetFilter> Shredder<F> {
    /// Replaces the filter deciding which entries are shredded at all.
    pub fn with_filter<G: TargetFilter>(self, filter: G) -> Shredder<G> {
        Shredder {
            config: self.config,
            source: self.source,
            buffer: self.buffer,
            filter,
            cancel: self.cancel,
            summary: self.summary,
        }
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Shredder<F> {
        self.cancel = cancel;
        self
    }

    pub const fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Shreds every root in turn, stopping at the first failure.
    pub fn run<I>(&mut self, roots: I) -> Result<RunSummary, ShredError>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        for root in roots {
            self.shred_root(root.as_ref())?;
        }
        Ok(self.summary)
    }

    /// Shreds a single root: a whole tree for a directory, the entry itself for anything else.
    /// A root that doesn't exist is created empty first.
    pub fn shred_root(&mut self, path: &Path) -> Result<(), ShredError> {
        self.check_cancelled(path)?;

        let target = match Target::probe(path, true) {
            Ok(target) => target,
            Err(libc::ENOENT) => return self.shred_created(path),
            Err(e) => Err(ShredError::new(path, WalkError::Stat(OsError(e))))?,
        };

        if target.kind == FileType::Directory {
            let walker = TreeWalker::new(WalkOptions::from(&self.config));
            let stats = walker.walk(target, self)?;
            debug!(
                path = %path.display(),
                files = stats.files,
                directories = stats.directories,
                skipped = stats.skipped,
                "tree walked"
            );
            Ok(())
        } else {
            self.enter_file(&target)
        }
    }

    fn shred_created(&mut self, path: &Path) -> Result<(), ShredError> {
        debug!(path = %path.display(), "creating missing target");
        let fd = Fd::open(path, O_WRONLY | O_CREAT | O_EXCL | O_NOFOLLOW, 0o600)
            .map_err(|e| ShredError::from_raw(path, e))?;
        let meta = fd.metadata().map_err(|e| ShredError::from_raw(path, e))?;
        let target = Target::from_metadata(path, &meta, false);

        if !self.filter.accepts(&target) {
            self.summary.skipped += 1;
            return Ok(());
        }
        let outcome = self.shred_opened(&target, Some(fd));
        self.finish(outcome)
    }

    /// Overwrites `target` for every configured round and applies the unlink policy, without
    /// consulting the filter.
    ///
    /// A symlink is never opened, so its target is left untouched; only the unlink policy applies
    /// to it. Anything else is opened write-only, without following a final symlink unless the
    /// target was reached through one.
    pub fn shred(&mut self, target: &Target) -> ShredOutcome {
        self.shred_opened(target, None)
    }

    fn shred_opened(&mut self, target: &Target, opened: Option<Fd>) -> ShredOutcome {
        let mut outcome = ShredOutcome::new(&target.path);

        if target.kind != FileType::Symlink {
            let fd = match opened {
                Some(fd) => Ok(fd),
                None => open_target(target),
            };
            let result = match fd {
                Ok(fd) => {
                    let rounds = self.run_rounds(target, &fd, &mut outcome.bytes_written);
                    let closed = fd.close().map_err(ShredErrorKind::from);
                    rounds.and(closed)
                },
                Err(e) => Err(ShredErrorKind::interpret_raw_error(e)),
            };
            if let Err(kind) = result {
                outcome.error = Some(kind);
                return outcome;
            }
        }

        if self.config.unlink.applies_to(target.kind) {
            info!("Unlinking \"{}\"", target.path.display());
            match fs::remove_file(&target.path) {
                Ok(()) => outcome.unlinked = true,
                Err(e) => outcome.error = Some(ShredErrorKind::interpret_raw_error(e)),
            }
        }
        outcome
    }

    fn run_rounds(&mut self, target: &Target, fd: &Fd, written: &mut u64) -> Result<(), ShredErrorKind> {
        let rounds = self.config.rounds;
        if rounds == 0 {
            return Ok(());
        }

        let extent = compute_extent(target, fd, &self.config).map_err(ShredErrorKind::interpret_raw_error)?;
        debug!(path = %target.path.display(), offset = extent.offset, count = extent.count, "extent");

        for round in 1..=rounds {
            if round > 1 && self.cancel.is_cancelled() {
                Err(InterruptError)?
            }
            let limit = extent.seek_start(fd).map_err(ShredErrorKind::interpret_raw_error)?;
            info!("Shredding \"{}\" (round {round}/{rounds})", target.path.display());
            *written += overwrite(fd, &mut self.source, &mut self.buffer, limit)?;
        }
        Ok(())
    }

    /// Folds an outcome into the summary, turning a failure into the error that ends the run.
    fn finish(&mut self, outcome: ShredOutcome) -> Result<(), ShredError> {
        self.summary.bytes_written += outcome.bytes_written;
        if outcome.unlinked {
            self.summary.unlinked += 1;
        }
        let outcome = outcome.into_result()?;
        self.summary.shredded += 1;
        debug!(path = %outcome.path.display(), bytes = outcome.bytes_written, "done");
        Ok(())
    }

    fn check_cancelled(&self, path: &Path) -> Result<(), ShredError> {
        if self.cancel.is_cancelled() {
            Err(ShredError::new(path, InterruptError))?
        }
        Ok(())
    }
}

fn open_target(target: &Target) -> Result<Fd, RawOsError> {
    let flags = if target.via_link { O_WRONLY } else { O_WRONLY | O_NOFOLLOW };
    Fd::open(&target.path, flags, 0)
}

impl<F: TargetFilter> Visitor for Shredder<F> {
    type Error = ShredError;

    fn enter_file(&mut self, target: &Target) -> Result<(), ShredError> {
        self.check_cancelled(&target.path)?;

        if !self.filter.accepts(target) {
            debug!(path = %target.path.display(), kind = %target.kind, "filtered out");
            self.summary.skipped += 1;
            return Ok(());
        }

        let outcome = self.shred(target);
        self.finish(outcome)
    }

    fn leave_directory(&mut self, target: &Target) -> Result<(), ShredError> {
        self.check_cancelled(&target.path)?;

        if self.config.unlink == UnlinkLevel::None {
            return Ok(());
        }

        info!("Unlinking \"{}\"", target.path.display());
        let removed = if target.via_link {
            fs::remove_file(&target.path)
        } else {
            fs::remove_dir(&target.path)
        };
        removed.map_err(|e| ShredError::from_raw(&target.path, e))?;
        self.summary.directories_removed += 1;
        Ok(())
    }

    fn skip(&mut self, target: &Target, reason: SkipReason) -> Result<(), ShredError> {
        debug!(path = %target.path.display(), %reason, "skipped");
        self.summary.skipped += 1;
        Ok(())
    }

    fn walk_error(&mut self, path: &Path, error: WalkError) -> Result<(), ShredError> {
        Err(ShredError::new(path, error))
    }
}
