use std::path::{Path, PathBuf};

use crate::fs::{self, FileType, Metadata, RawOsError};

/// A single node of the file system, as seen by the walker and the shredder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub kind: FileType,
    /// The recorded size, clamped to zero.
    pub size: u64,
    pub device_id: u64,
    pub inode_num: u64,
    /// Whether the node was reached by following a symlink at `path`.
    pub via_link: bool,
}

impl Target {
    pub fn from_metadata<P: Into<PathBuf>>(path: P, meta: &Metadata, via_link: bool) -> Target {
        Target {
            path: path.into(),
            kind: meta.file_type,
            size: meta.size.max(0) as u64,
            device_id: meta.device_id,
            inode_num: meta.inode_num,
            via_link,
        }
    }

    /// Describes the node at `path`. With `follow_links`, a symlink is resolved to its target,
    /// unless it dangles or loops, in which case the link itself is described.
    pub fn probe<P: AsRef<Path>>(path: P, follow_links: bool) -> Result<Target, RawOsError> {
        let path = path.as_ref();
        let link_meta = fs::metadata(path, false)?;

        if follow_links && link_meta.file_type == FileType::Symlink {
            match fs::metadata(path, true) {
                Ok(meta) => return Ok(Target::from_metadata(path, &meta, true)),
                Err(libc::ENOENT | libc::ELOOP) => (),
                Err(e) => return Err(e),
            }
        }

        Ok(Target::from_metadata(path, &link_meta, false))
    }
}
