use derive_more::{Display, IsVariant};

/// The kind of a file system node, as far as the shredder cares about it.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum FileType {
    #[display("regular file")]
    Regular,
    #[display("directory")]
    Directory,
    #[display("symbolic link")]
    Symlink,
    #[display("block device")]
    BlockDevice,
    #[display("character device")]
    CharDevice,
    #[display("fifo")]
    Fifo,
    #[display("socket")]
    Socket,
    #[display("unknown file type")]
    Other,
}

impl FileType {
    pub(crate) const fn from_stat_mode(st_mode: u32) -> FileType {
        match st_mode & libc::S_IFMT {
            libc::S_IFREG => FileType::Regular,
            libc::S_IFDIR => FileType::Directory,
            libc::S_IFLNK => FileType::Symlink,
            libc::S_IFBLK => FileType::BlockDevice,
            libc::S_IFCHR => FileType::CharDevice,
            libc::S_IFIFO => FileType::Fifo,
            libc::S_IFSOCK => FileType::Socket,
            _ => FileType::Other,
        }
    }

    /// Decodes the `d_type` byte of a directory entry. File systems that don't record types report
    /// `DT_UNKNOWN`, which gives `None`.
    pub(crate) const fn from_dirent_type(d_type: u8) -> Option<FileType> {
        let file_type = match d_type {
            libc::DT_UNKNOWN => return None,
            libc::DT_REG => FileType::Regular,
            libc::DT_DIR => FileType::Directory,
            libc::DT_LNK => FileType::Symlink,
            libc::DT_BLK => FileType::BlockDevice,
            libc::DT_CHR => FileType::CharDevice,
            libc::DT_FIFO => FileType::Fifo,
            libc::DT_SOCK => FileType::Socket,
            _ => FileType::Other,
        };
        Some(file_type)
    }

    /// Block and character devices, the entries protected by
    /// [`UnlinkLevel::SkipSpecial`](crate::shred::UnlinkLevel::SkipSpecial).
    pub const fn is_device(&self) -> bool {
        matches!(self, FileType::BlockDevice | FileType::CharDevice)
    }
}
