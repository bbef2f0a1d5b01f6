use std::fmt::{self, Formatter};
use std::path::{Path, PathBuf};

use derive_more::{Display, Error, From, IsVariant};

use crate::fs::{BadFdError, OsError, RawOsError};
use crate::walk::WalkError;

#[derive(Debug, Display, Clone, PartialEq, Eq, Error)]
#[display("invalid argument: {reason}")]
pub struct ArgumentError {
    pub reason: &'static str,
}

impl ArgumentError {
    pub const fn new(reason: &'static str) -> ArgumentError {
        ArgumentError { reason }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("entropy source exhausted")]
pub struct EarlyEofError;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("buffer length is 0")]
pub struct ZeroBufferError;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("interrupted by signal")]
pub struct InterruptError;

/// Failures of [`EntropySource`](crate::shred::EntropySource) operations.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum FillError {
    BadFd(BadFdError),
    EarlyEof(EarlyEofError),
    Os(OsError),
}

impl FillError {
    pub(crate) const fn interpret_raw_error(errno: RawOsError) -> FillError {
        match errno {
            libc::EBADF => FillError::BadFd(BadFdError),
            e => FillError::Os(OsError(e)),
        }
    }
}

/// Failures of a single overwrite pass.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, From, Error, IsVariant)]
pub enum OverwriteError {
    ZeroBuffer(ZeroBufferError),
    BadFd(BadFdError),
    EarlyEof(EarlyEofError),
    Os(OsError),
}

impl OverwriteError {
    pub(crate) const fn interpret_raw_error(errno: RawOsError) -> OverwriteError {
        match errno {
            libc::EBADF => OverwriteError::BadFd(BadFdError),
            e => OverwriteError::Os(OsError(e)),
        }
    }
}

impl From<FillError> for OverwriteError {
    fn from(value: FillError) -> Self {
        match value {
            FillError::BadFd(e) => e.into(),
            FillError::EarlyEof(e) => e.into(),
            FillError::Os(e) => e.into(),
        }
    }
}

/// The reason a run stopped.
#[derive(Debug, Display, Clone, PartialEq, Eq, From, Error, IsVariant)]
pub enum ShredErrorKind {
    Argument(ArgumentError),
    BadDescriptor(BadFdError),
    Io(OsError),
    EarlyEof(EarlyEofError),
    Walk(WalkError),
    Interrupted(InterruptError),
}

impl ShredErrorKind {
    pub(crate) const fn interpret_raw_error(errno: RawOsError) -> ShredErrorKind {
        match errno {
            libc::EBADF => ShredErrorKind::BadDescriptor(BadFdError),
            e => ShredErrorKind::Io(OsError(e)),
        }
    }
}

impl From<FillError> for ShredErrorKind {
    fn from(value: FillError) -> Self {
        match value {
            FillError::BadFd(e) => e.into(),
            FillError::EarlyEof(e) => e.into(),
            FillError::Os(e) => e.into(),
        }
    }
}

impl From<OverwriteError> for ShredErrorKind {
    fn from(value: OverwriteError) -> Self {
        match value {
            OverwriteError::ZeroBuffer(_) => {
                ArgumentError::new("buffer length must be positive").into()
            },
            OverwriteError::BadFd(e) => e.into(),
            OverwriteError::EarlyEof(e) => e.into(),
            OverwriteError::Os(e) => e.into(),
        }
    }
}

/// The first failure of a run, along with the path it happened on. The path is empty for failures
/// that don't belong to any one path, like an invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ShredError {
    pub path: PathBuf,
    #[error(source)]
    pub kind: ShredErrorKind,
}

impl ShredError {
    pub fn new<P: Into<PathBuf>, K: Into<ShredErrorKind>>(path: P, kind: K) -> ShredError {
        ShredError {
            path: path.into(),
            kind: kind.into(),
        }
    }

    pub(crate) fn from_raw<P: AsRef<Path>>(path: P, errno: RawOsError) -> ShredError {
        ShredError::new(path.as_ref(), ShredErrorKind::interpret_raw_error(errno))
    }
}

impl fmt::Display for ShredError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.path.as_os_str().is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path.display(), self.kind)
        }
    }
}
