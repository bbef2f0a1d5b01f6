use std::path::Path;

use libc::{O_DIRECTORY, O_RDONLY, c_int};

use crate::fs::dir::{BUFFER_SIZE, DirEntries};
use crate::fs::{Fd, RawOsError};

#[derive(Debug)]
pub struct Directory {
    pub(crate) fd: Fd,
}

impl Directory {
    pub fn open<P: AsRef<Path>>(dir_path: P) -> Result<Directory, RawOsError> {
        // Can't open as O_PATH because we need to read entries.
        let flags: c_int = O_RDONLY | O_DIRECTORY;

        Ok(Directory {
            fd: Fd::open(dir_path, flags, 0)?,
        })
    }

    pub fn entries(self) -> DirEntries {
        DirEntries {
            dir: self,
            buf: vec![0; BUFFER_SIZE].into_boxed_slice(),
            head: 0,
            len: 0,
            finished: false,
        }
    }
}
