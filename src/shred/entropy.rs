use std::path::Path;

use libc::O_RDONLY;

use crate::fs::{BadFdError, Fd, RawOsError, Whence};
use crate::shred::{EarlyEofError, FillError};

/// How many empty reads in a row are tolerated before the source counts as exhausted. Each empty
/// read rewinds the source to its start.
pub const REWIND_ATTEMPTS: u32 = 2;

/// A sequential supplier of overwrite bytes, usually a random device but possibly any readable
/// file. A finite file is consumed cyclically.
#[derive(Debug)]
pub struct EntropySource {
    fd: Fd,
}

impl EntropySource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<EntropySource, RawOsError> {
        Ok(EntropySource {
            fd: Fd::open(path, O_RDONLY, 0)?,
        })
    }

    pub(crate) fn fd(&self) -> &Fd {
        &self.fd
    }

    /// Moves the read position to `offset` bytes from the start of the source.
    pub fn seek(&mut self, offset: i64) -> Result<u64, FillError> {
        self.fd
            .seek(offset, Whence::Start)
            .map_err(FillError::interpret_raw_error)
    }

    /// Fills all of `buf`, rewinding to the start of the source whenever it runs dry.
    pub fn fill(&mut self, buf: &mut [u8]) -> Result<(), FillError> {
        if *self.fd < 0 {
            Err(BadFdError)?
        }

        let mut filled = 0;
        let mut attempts = 0;

        while filled < buf.len() {
            match self.fd.read(&mut buf[filled..]).map_err(FillError::interpret_raw_error)? {
                0 => {
                    attempts += 1;
                    if attempts >= REWIND_ATTEMPTS {
                        Err(EarlyEofError)?
                    }
                    self.seek(0)?;
                },
                count => {
                    attempts = 0;
                    filled += count;
                },
            }
        }
        Ok(())
    }
}
