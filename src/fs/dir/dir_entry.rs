use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;

use libc::{EINTR, EIO};

use crate::fs::{Directory, FileType, RawOsError, err_no, syscall};

// Layout of linux_dirent64: d_ino (8), d_off (8), d_reclen (2), d_type (1), then the nul-terminated
// name padded up to d_reclen.
const RECLEN_OFFSET: usize = 16;
const TYPE_OFFSET: usize = 18;
const NAME_OFFSET: usize = 19;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// The type reported by the file system, if it reports one at all.
    pub file_type: Option<FileType>,
    pub name: OsString,
}

/// An iterator over the entries of a [`Directory`], closing it when dropped.
pub struct DirEntries {
    pub(crate) dir: Directory,
    pub(crate) buf: Box<[u8]>,
    pub(crate) head: usize,
    pub(crate) len: usize,
    pub(crate) finished: bool,
}

impl DirEntries {
    fn refill(&mut self) -> Result<bool, RawOsError> {
        loop {
            // SAFETY: buf is valid for writes of buf.len() bytes and the kernel writes no more.
            let count = unsafe {
                syscall::getdents(*self.dir.fd, self.buf.as_mut_ptr().cast(), self.buf.len())
            };
            match count {
                -1 => match err_no() {
                    EINTR => continue,
                    e => return Err(e),
                },
                0 => return Ok(false),
                count => {
                    self.head = 0;
                    self.len = count as usize;
                    return Ok(true);
                },
            }
        }
    }

    fn parse_next(&mut self) -> Result<DirEntry, RawOsError> {
        let record = &self.buf[self.head..self.len];
        if record.len() < NAME_OFFSET {
            Err(EIO)?
        }

        let reclen = u16::from_ne_bytes([record[RECLEN_OFFSET], record[RECLEN_OFFSET + 1]]) as usize;
        if reclen < NAME_OFFSET || reclen > record.len() {
            Err(EIO)?
        }

        let name = &record[NAME_OFFSET..reclen];
        let name = match name.iter().position(|b| *b == 0) {
            Some(end) => &name[..end],
            None => name,
        };

        let entry = DirEntry {
            file_type: FileType::from_dirent_type(record[TYPE_OFFSET]),
            name: OsString::from_vec(name.to_vec()),
        };
        self.head += reclen;
        Ok(entry)
    }
}

impl Iterator for DirEntries {
    type Item = Result<DirEntry, RawOsError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self.head >= self.len {
                match self.refill() {
                    Ok(true) => (),
                    Ok(false) => {
                        self.finished = true;
                        return None;
                    },
                    Err(e) => {
                        self.finished = true;
                        return Some(Err(e));
                    },
                }
            }

            match self.parse_next() {
                Ok(entry) if entry.name == "." || entry.name == ".." => continue,
                Ok(entry) => return Some(Ok(entry)),
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                },
            }
        }
    }
}
