use std::io;

use derive_more::{Display, Error};

use super::RawOsError;

/// An error reported by the OS, identified by its `errno` value.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("{}", io::Error::from_raw_os_error(*_0))]
pub struct OsError(#[error(not(source))] pub RawOsError);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("bad file descriptor")]
pub struct BadFdError;
