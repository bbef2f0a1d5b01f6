use std::fmt::{self, Debug, Formatter};
use std::mem::{self, MaybeUninit};
use std::ops::Deref;
use std::path::Path;

use libc::{EINTR, c_int, off_t, stat as Stat};
use tracing::warn;

use super::{Metadata, OsError, RawOsError, err_no, path_to_cstring};

/// Where a [`Fd::seek`] offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    End,
}

impl Whence {
    const fn raw(self) -> c_int {
        match self {
            Whence::Start => libc::SEEK_SET,
            Whence::End => libc::SEEK_END,
        }
    }
}

/// An owned file descriptor, closed on drop.
pub struct Fd(pub(crate) c_int);

impl Fd {
    pub fn open<P: AsRef<Path>>(file_path: P, flags: c_int, mode: u32) -> Result<Fd, RawOsError> {
        let pathname = path_to_cstring(file_path.as_ref())?;

        // SAFETY: pathname is nul-terminated and outlives the call.
        match unsafe { libc::open(pathname.as_ptr(), flags | libc::O_CLOEXEC, mode) } {
            -1 => Err(err_no()),
            fd => Ok(Fd(fd)),
        }
    }

    /// Reads at most `buf.len()` bytes, returning how many were read. Zero means end of file.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, RawOsError> {
        loop {
            // SAFETY: buf is valid for writes of buf.len() bytes.
            match unsafe { libc::read(self.0, buf.as_mut_ptr().cast(), buf.len()) } {
                -1 => match err_no() {
                    EINTR => continue,
                    e => return Err(e),
                },
                count => return Ok(count as usize),
            }
        }
    }

    /// Writes at most `buf.len()` bytes, returning how many were written.
    pub fn write(&self, buf: &[u8]) -> Result<usize, RawOsError> {
        loop {
            // SAFETY: buf is valid for reads of buf.len() bytes.
            match unsafe { libc::write(self.0, buf.as_ptr().cast(), buf.len()) } {
                -1 => match err_no() {
                    EINTR => continue,
                    e => return Err(e),
                },
                count => return Ok(count as usize),
            }
        }
    }

    /// Repositions the file offset, returning the resulting offset from the start of the file.
    pub fn seek(&self, offset: i64, whence: Whence) -> Result<u64, RawOsError> {
        // SAFETY: lseek has no memory effects.
        match unsafe { libc::lseek(self.0, offset as off_t, whence.raw()) } {
            -1 => Err(err_no()),
            pos => Ok(pos as u64),
        }
    }

    /// Flushes written data (but not necessarily metadata) to the underlying device.
    pub fn sync_data(&self) -> Result<(), RawOsError> {
        // SAFETY: There is no memory management here and any returned errors are handled.
        loop {
            if unsafe { libc::fdatasync(self.0) } == -1 {
                match err_no() {
                    EINTR => continue,
                    e => return Err(e),
                }
            }
            return Ok(());
        }
    }

    pub fn metadata(&self) -> Result<Metadata, RawOsError> {
        let mut raw_meta: MaybeUninit<Stat> = MaybeUninit::uninit();
        // SAFETY: raw_meta is valid for writes.
        if unsafe { libc::fstat(self.0, raw_meta.as_mut_ptr()) } == -1 {
            return Err(err_no());
        }
        // SAFETY: fstat initializes raw_meta when it succeeds.
        let raw = unsafe { raw_meta.assume_init() };

        Ok(Metadata::from_stat(raw))
    }

    pub fn close(self) -> Result<(), OsError> {
        let fd = self.0;
        // close invalidates the descriptor regardless of the outcome, so drop must not close it
        // again.
        mem::forget(self);
        // SAFETY: fd was owned by self, which has been consumed.
        if unsafe { libc::close(fd) } == -1 {
            // EINTR still releases the descriptor on Linux, retrying could close a reused one.
            return Err(OsError(err_no()));
        }
        Ok(())
    }
}

impl Deref for Fd {
    type Target = c_int;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        // SAFETY: After this, the file descriptor is invalidated but we are dropping self so it
        // doesn't matter.
        if unsafe { libc::close(self.0) } == -1 {
            warn!(fd = self.0, error = %OsError(err_no()), "error while dropping file descriptor");
        }
    }
}

impl Debug for Fd {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Fd({})", self.0)
    }
}
