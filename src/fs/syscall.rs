use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use libc::{c_int, c_void};

/// An OS error number, as found in `errno`.
pub type RawOsError = c_int;

pub fn err_no() -> RawOsError {
    // last_os_error is always constructed from errno, so the code is present.
    io::Error::last_os_error().raw_os_error().unwrap_or(libc::EIO)
}

pub fn path_to_cstring(path: &Path) -> Result<CString, RawOsError> {
    // An interior nul can't be passed to the OS, treat it like any other invalid argument.
    CString::new(path.as_os_str().as_bytes()).map_err(|_| libc::EINVAL)
}

/// # Safety
/// `dirp` must be valid for writes of `bytes` bytes.
pub unsafe fn getdents(fd: c_int, dirp: *mut c_void, bytes: usize) -> isize {
    unsafe { libc::syscall(libc::SYS_getdents64, fd, dirp, bytes) as isize }
}
