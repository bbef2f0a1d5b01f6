#![cfg(test)]

use std::collections::HashSet;
use std::ffi::OsString;
use std::os::unix::fs::symlink;

use libc::{O_RDONLY, O_WRONLY};
use tempfile::tempdir;

use super::*;

#[test]
fn test_dir_entries_skip_dot_entries() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a"), b"a").unwrap();
    std::fs::create_dir(dir.path().join("b")).unwrap();
    symlink("a", dir.path().join("c")).unwrap();

    let names: HashSet<OsString> = Directory::open(dir.path())
        .unwrap()
        .entries()
        .map(|entry| entry.unwrap().name)
        .collect();

    assert_eq!(names, HashSet::from(["a".into(), "b".into(), "c".into()]));
}

#[test]
fn test_dir_entries_report_types() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("file"), b"").unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();

    for entry in Directory::open(dir.path()).unwrap().entries() {
        let entry = entry.unwrap();
        // Some file systems don't report types at all, which is allowed.
        if let Some(file_type) = entry.file_type {
            let expected = if entry.name == "sub" { FileType::Directory } else { FileType::Regular };
            assert_eq!(file_type, expected);
        }
    }
}

#[test]
fn test_dir_entries_many() {
    let dir = tempdir().unwrap();
    // Enough long names to need several getdents calls.
    for i in 0..500 {
        std::fs::write(dir.path().join(format!("{i:0>120}")), b"").unwrap();
    }

    let count = Directory::open(dir.path()).unwrap().entries().count();
    assert_eq!(count, 500);
}

#[test]
fn test_open_dir_on_file_fails() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file");
    std::fs::write(&file, b"x").unwrap();

    assert_eq!(Directory::open(&file).unwrap_err(), libc::ENOTDIR);
}

#[test]
fn test_metadata_follow_links() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("target"), b"12345").unwrap();
    symlink("target", dir.path().join("link")).unwrap();

    let link = metadata(dir.path().join("link"), false).unwrap();
    let target = metadata(dir.path().join("link"), true).unwrap();

    assert_eq!(link.file_type, FileType::Symlink);
    assert_eq!(target.file_type, FileType::Regular);
    assert_eq!(target.size, 5);
}

#[test]
fn test_fd_seek_write_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("file");
    std::fs::write(&path, b"hello world").unwrap();

    let fd = Fd::open(&path, O_WRONLY, 0).unwrap();
    assert_eq!(fd.seek(0, Whence::End).unwrap(), 11);
    assert_eq!(fd.seek(6, Whence::Start).unwrap(), 6);
    assert_eq!(fd.write(b"there").unwrap(), 5);
    fd.sync_data().unwrap();
    assert_eq!(fd.metadata().unwrap().size, 11);
    fd.close().unwrap();

    let fd = Fd::open(&path, O_RDONLY, 0).unwrap();
    let mut buf = [0_u8; 16];
    assert_eq!(fd.read(&mut buf).unwrap(), 11);
    assert_eq!(&buf[..11], b"hello there");
    assert_eq!(fd.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_remove_symlink_keeps_target() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("target");
    std::fs::write(&target, b"keep").unwrap();
    symlink(&target, dir.path().join("link")).unwrap();

    remove_file(dir.path().join("link")).unwrap();

    assert!(dir.path().join("link").symlink_metadata().is_err());
    assert_eq!(std::fs::read(&target).unwrap(), b"keep");
}

#[test]
fn test_remove_dir_requires_empty() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("file"), b"").unwrap();

    assert_eq!(remove_dir(&sub).unwrap_err(), libc::ENOTEMPTY);
    remove_file(sub.join("file")).unwrap();
    remove_dir(&sub).unwrap();
    assert!(!sub.exists());
}

#[test]
fn test_os_error_display() {
    let message = OsError(libc::ENOENT).to_string();
    assert!(message.contains("No such file or directory"), "{message}");
}

#[test]
fn test_file_type_decoding() {
    assert_eq!(FileType::from_stat_mode(libc::S_IFCHR | 0o666), FileType::CharDevice);
    assert_eq!(FileType::from_stat_mode(libc::S_IFREG | 0o644), FileType::Regular);
    assert_eq!(FileType::from_dirent_type(libc::DT_BLK), Some(FileType::BlockDevice));
    assert_eq!(FileType::from_dirent_type(libc::DT_UNKNOWN), None);

    assert!(FileType::BlockDevice.is_device());
    assert!(!FileType::Fifo.is_device());
    assert_eq!(FileType::CharDevice.to_string(), "character device");
}
