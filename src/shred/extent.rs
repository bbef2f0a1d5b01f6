use crate::fs::{Fd, FileType, RawOsError, Whence};
use crate::shred::ShredConfig;
use crate::walk::Target;

/// The part of a target a round overwrites: everything from `offset` up to `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub offset: i64,
    pub count: u64,
}

impl Extent {
    /// Seeks `fd` to the start of the extent, returning how many bytes the round should write.
    /// An offset at or beyond `count` leaves nothing to write.
    pub fn seek_start(&self, fd: &Fd) -> Result<u64, RawOsError> {
        let pos = fd.seek(self.offset, Whence::Start)?;
        Ok(self.count.saturating_sub(pos))
    }
}

/// Works out the extent of `target`, opened as `fd`.
///
/// An explicit output count always wins. Otherwise regular files use their size, while block
/// devices and directories, whose recorded size says nothing about their capacity, are measured by
/// seeking to their end.
pub fn compute_extent(target: &Target, fd: &Fd, config: &ShredConfig) -> Result<Extent, RawOsError> {
    let count = match config.output_count {
        Some(count) => count,
        None => match target.kind {
            FileType::BlockDevice | FileType::Directory => fd.seek(0, Whence::End)?,
            _ => target.size,
        },
    };

    Ok(Extent {
        offset: config.output_offset,
        count,
    })
}
