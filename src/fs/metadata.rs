use std::mem::MaybeUninit;
use std::path::Path;

use libc::stat as Stat;

use super::{FileType, RawOsError, err_no, path_to_cstring};

#[derive(Debug, Clone)]
pub struct Metadata {
    pub size: i64,           // st_size
    pub file_type: FileType, // st_mode
    pub device_id: u64,      // st_dev
    pub inode_num: u64,      // st_ino
}

impl Metadata {
    #[allow(clippy::unnecessary_cast)]
    pub(crate) const fn from_stat(raw: Stat) -> Metadata {
        Metadata {
            size: raw.st_size as i64,
            file_type: FileType::from_stat_mode(raw.st_mode),
            device_id: raw.st_dev as u64,
            inode_num: raw.st_ino as u64,
        }
    }
}

/// Queries the metadata of the entry at `path`. With `follow_links`, a symlink is resolved and the
/// metadata of its target is returned (`stat`), otherwise the link itself is described (`lstat`).
pub fn metadata<P: AsRef<Path>>(path: P, follow_links: bool) -> Result<Metadata, RawOsError> {
    let pathname = path_to_cstring(path.as_ref())?;
    let mut raw_meta: MaybeUninit<Stat> = MaybeUninit::uninit();

    // SAFETY: pathname is a valid nul-terminated string and raw_meta is valid for writes.
    let ret = unsafe {
        if follow_links {
            libc::stat(pathname.as_ptr(), raw_meta.as_mut_ptr())
        } else {
            libc::lstat(pathname.as_ptr(), raw_meta.as_mut_ptr())
        }
    };
    if ret == -1 {
        return Err(err_no());
    }
    // SAFETY: (l)stat initializes raw_meta when it succeeds.
    let raw = unsafe { raw_meta.assume_init() };

    Ok(Metadata::from_stat(raw))
}
