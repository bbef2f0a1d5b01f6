use std::path::Path;

use super::{RawOsError, err_no, path_to_cstring};

/// Removes a non-directory entry. A symlink is removed itself, its target is left alone.
pub fn remove_file<P: AsRef<Path>>(path: P) -> Result<(), RawOsError> {
    let pathname = path_to_cstring(path.as_ref())?;
    // SAFETY: pathname is nul-terminated and outlives the call.
    match unsafe { libc::unlink(pathname.as_ptr()) } {
        -1 => Err(err_no()),
        _ => Ok(()),
    }
}

/// Removes an empty directory.
pub fn remove_dir<P: AsRef<Path>>(path: P) -> Result<(), RawOsError> {
    let pathname = path_to_cstring(path.as_ref())?;
    // SAFETY: pathname is nul-terminated and outlives the call.
    match unsafe { libc::rmdir(pathname.as_ptr()) } {
        -1 => Err(err_no()),
        _ => Ok(()),
    }
}
