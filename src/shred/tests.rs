#![cfg(test)]

use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::{Path, PathBuf};

use libc::{O_RDONLY, O_WRONLY};
use tempfile::{TempDir, tempdir};

use super::*;
use crate::cancel::CancelToken;
use crate::fs::{Fd, FileType, OsError};
use crate::walk::Target;

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// A directory holding a seed file of `len` patterned bytes, used in place of a random device.
fn seeded(len: usize) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let seed = dir.path().join("seed");
    std::fs::write(&seed, pattern(len)).unwrap();
    (dir, seed)
}

fn config(source: &Path) -> ShredConfig {
    let mut config = ShredConfig::new();
    config.source(source).buffer_length(64);
    config
}

#[test]
fn test_buffer_rejects_zero_length() {
    assert_eq!(ShredBuffer::new(0).unwrap_err(), ZeroBufferError);
}

#[test]
fn test_buffer_scrub() {
    let mut buffer = ShredBuffer::new(16).unwrap();
    assert!(buffer.is_scrubbed());

    buffer.chunk(100).fill(0xff);
    assert!(!buffer.is_scrubbed());
    assert_eq!(buffer.chunk(4).len(), 4);

    buffer.scrub();
    assert!(buffer.is_scrubbed());
}

#[test]
fn test_entropy_fill_cycles() {
    let (_dir, seed) = seeded(3);
    let mut source = EntropySource::open(&seed).unwrap();

    let mut buf = [0; 8];
    source.fill(&mut buf).unwrap();
    assert_eq!(buf, [0, 1, 2, 0, 1, 2, 0, 1]);

    source.fill(&mut buf).unwrap();
    assert_eq!(buf, [2, 0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn test_entropy_empty_source() {
    let (_dir, seed) = seeded(0);
    let mut source = EntropySource::open(&seed).unwrap();

    let mut buf = [0; 4];
    assert_eq!(source.fill(&mut buf), Err(FillError::EarlyEof(EarlyEofError)));
    // Nothing to fill is never an error.
    assert_eq!(source.fill(&mut []), Ok(()));
}

#[test]
fn test_entropy_seek() {
    let (_dir, seed) = seeded(10);
    let mut source = EntropySource::open(&seed).unwrap();

    assert_eq!(source.seek(7), Ok(7));
    let mut buf = [0; 5];
    source.fill(&mut buf).unwrap();
    assert_eq!(buf, [7, 8, 9, 0, 1]);

    assert!(source.seek(-1).unwrap_err().is_os());
}

#[test]
fn test_entropy_open_missing() {
    let dir = tempdir().unwrap();
    assert_eq!(EntropySource::open(dir.path().join("nope")).unwrap_err(), libc::ENOENT);
}

#[test]
fn test_overwrite_uneven_chunks() {
    let (dir, seed) = seeded(1000);
    let file = dir.path().join("file");
    std::fs::write(&file, [0xaa; 100]).unwrap();

    let target = Fd::open(&file, O_WRONLY, 0).unwrap();
    let mut source = EntropySource::open(&seed).unwrap();
    // 100 bytes in chunks of 7 leaves a final chunk of 2.
    let mut buffer = ShredBuffer::new(7).unwrap();

    assert_eq!(overwrite(&target, &mut source, &mut buffer, 100), Ok(100));
    assert!(buffer.is_scrubbed());
    assert_eq!(std::fs::read(&file).unwrap(), pattern(100));
}

#[test]
fn test_overwrite_limit_below_size() {
    let (dir, seed) = seeded(1000);
    let file = dir.path().join("file");
    std::fs::write(&file, [0xaa; 100]).unwrap();

    let target = Fd::open(&file, O_WRONLY, 0).unwrap();
    let mut source = EntropySource::open(&seed).unwrap();
    let mut buffer = ShredBuffer::new(64).unwrap();

    assert_eq!(overwrite(&target, &mut source, &mut buffer, 10), Ok(10));
    let content = std::fs::read(&file).unwrap();
    assert_eq!(content[..10], pattern(10)[..]);
    assert!(content[10..].iter().all(|b| *b == 0xaa));
}

#[test]
fn test_overwrite_failure_scrubs_buffer() {
    let (dir, seed) = seeded(1000);
    let file = dir.path().join("file");
    std::fs::write(&file, [0xaa; 100]).unwrap();

    // Writing to a descriptor opened for reading fails with EBADF.
    let target = Fd::open(&file, O_RDONLY, 0).unwrap();
    let mut source = EntropySource::open(&seed).unwrap();
    let mut buffer = ShredBuffer::new(64).unwrap();

    let result = overwrite(&target, &mut source, &mut buffer, 100);
    assert_eq!(result, Err(OverwriteError::BadFd(crate::fs::BadFdError)));
    assert!(buffer.is_scrubbed());
    assert_eq!(std::fs::read(&file).unwrap(), [0xaa; 100]);
}

#[test]
fn test_overwrite_unsyncable_device() {
    let (_dir, seed) = seeded(1000);
    let target = Fd::open("/dev/null", O_WRONLY, 0).unwrap();
    let mut source = EntropySource::open(&seed).unwrap();
    let mut buffer = ShredBuffer::new(64).unwrap();

    assert_eq!(overwrite(&target, &mut source, &mut buffer, 100), Ok(100));
    assert!(buffer.is_scrubbed());
}

#[test]
fn test_overwrite_exhausted_source() {
    let (dir, seed) = seeded(0);
    let file = dir.path().join("file");
    std::fs::write(&file, [0xaa; 10]).unwrap();

    let target = Fd::open(&file, O_WRONLY, 0).unwrap();
    let mut source = EntropySource::open(&seed).unwrap();
    let mut buffer = ShredBuffer::new(64).unwrap();

    let result = overwrite(&target, &mut source, &mut buffer, 10);
    assert_eq!(result, Err(OverwriteError::EarlyEof(EarlyEofError)));
    assert!(buffer.is_scrubbed());
}

#[test]
fn test_extent() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file");
    std::fs::write(&file, [0; 100]).unwrap();

    let target = Target::probe(&file, false).unwrap();
    let fd = Fd::open(&file, O_WRONLY, 0).unwrap();
    let mut config = ShredConfig::new();

    let extent = compute_extent(&target, &fd, &config).unwrap();
    assert_eq!(extent, Extent { offset: 0, count: 100 });
    assert_eq!(extent.seek_start(&fd), Ok(100));

    config.output_count(Some(40)).output_offset(30);
    let extent = compute_extent(&target, &fd, &config).unwrap();
    assert_eq!(extent, Extent { offset: 30, count: 40 });
    assert_eq!(extent.seek_start(&fd), Ok(10));

    config.output_offset(150);
    let extent = compute_extent(&target, &fd, &config).unwrap();
    assert_eq!(extent.seek_start(&fd), Ok(0));

    config.output_offset(-1);
    let extent = compute_extent(&target, &fd, &config).unwrap();
    assert_eq!(extent.seek_start(&fd), Err(libc::EINVAL));
}

#[test]
fn test_unlink_levels() {
    assert_eq!(UnlinkLevel::from_count(0), UnlinkLevel::None);
    assert_eq!(UnlinkLevel::from_count(1), UnlinkLevel::SkipSpecial);
    assert_eq!(UnlinkLevel::from_count(5), UnlinkLevel::All);

    for kind in [FileType::Regular, FileType::Symlink, FileType::Fifo, FileType::Directory] {
        assert!(!UnlinkLevel::None.applies_to(kind));
        assert!(UnlinkLevel::SkipSpecial.applies_to(kind));
        assert!(UnlinkLevel::All.applies_to(kind));
    }
    for kind in [FileType::BlockDevice, FileType::CharDevice] {
        assert!(!UnlinkLevel::None.applies_to(kind));
        assert!(!UnlinkLevel::SkipSpecial.applies_to(kind));
        assert!(UnlinkLevel::All.applies_to(kind));
    }
}

#[test]
fn test_config_validate() {
    assert_eq!(ShredConfig::new().validate(), Ok(()));
    assert!(ShredConfig::new().buffer_length(0).validate().is_err());
    assert!(ShredConfig::new().fd_limit(0).validate().is_err());
}

#[test]
fn test_invalid_config_rejected() {
    let (_dir, seed) = seeded(10);
    let mut config = config(&seed);
    config.buffer_length(0);

    let error = Shredder::new(config).unwrap_err();
    assert!(error.kind.is_argument());
    assert_eq!(error.to_string(), "invalid argument: buffer length must be positive");
}

#[test]
fn test_missing_source_rejected() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("nope");

    let error = Shredder::new(config(&source)).unwrap_err();
    assert_eq!(error.path, source);
    assert_eq!(error.kind, ShredErrorKind::Io(OsError(libc::ENOENT)));
}

#[test]
fn test_input_offset_applied_once() {
    let (dir, seed) = seeded(1000);
    let file = dir.path().join("file");
    std::fs::write(&file, [0; 10]).unwrap();

    let mut config = config(&seed);
    config.input_offset(100).rounds(2);
    Shredder::new(config).unwrap().run([&file]).unwrap();

    // The second round carries on from where the first left the source.
    assert_eq!(std::fs::read(&file).unwrap(), pattern(120)[110..]);
}

#[test]
fn test_every_round_covers_whole_file() {
    let (dir, seed) = seeded(1500);
    let file = dir.path().join("file");
    std::fs::write(&file, [0xaa; 1000]).unwrap();

    let mut config = config(&seed);
    config.rounds(2);
    let summary = Shredder::new(config).unwrap().run([&file]).unwrap();

    assert_eq!(summary.shredded, 1);
    assert_eq!(summary.bytes_written, 2000);
    let seed = pattern(1500);
    let expected: Vec<u8> = seed[1000..].iter().chain(&seed[..500]).copied().collect();
    assert_eq!(std::fs::read(&file).unwrap(), expected);
}

#[test]
fn test_output_offset_and_count() {
    let (dir, seed) = seeded(1000);
    let file = dir.path().join("file");
    std::fs::write(&file, [0xaa; 100]).unwrap();

    let mut config = config(&seed);
    config.output_offset(10).output_count(Some(150));
    Shredder::new(config).unwrap().run([&file]).unwrap();

    let content = std::fs::read(&file).unwrap();
    assert_eq!(content.len(), 150);
    assert_eq!(content[..10], [0xaa; 10]);
    assert_eq!(content[10..], pattern(140)[..]);
}

#[test]
fn test_zero_rounds() {
    let (dir, seed) = seeded(100);
    let kept = dir.path().join("kept");
    let removed = dir.path().join("removed");
    std::fs::write(&kept, b"secret").unwrap();
    std::fs::write(&removed, b"secret").unwrap();

    let mut config = config(&seed);
    config.rounds(0);
    Shredder::new(config.clone()).unwrap().run([&kept]).unwrap();
    assert_eq!(std::fs::read(&kept).unwrap(), b"secret");

    config.unlink(UnlinkLevel::SkipSpecial);
    let summary = Shredder::new(config).unwrap().run([&removed]).unwrap();
    assert_eq!(summary.bytes_written, 0);
    assert_eq!(summary.unlinked, 1);
    assert!(!removed.exists());
}

#[test]
fn test_tree_unlinked_bottom_up() {
    let (dir, seed) = seeded(1000);
    let root = dir.path().join("root");
    std::fs::create_dir_all(root.join("a/b")).unwrap();
    std::fs::write(root.join("top"), [1; 10]).unwrap();
    std::fs::write(root.join("a/one"), [1; 20]).unwrap();
    std::fs::write(root.join("a/b/two"), [1; 30]).unwrap();

    let mut config = config(&seed);
    config.unlink(UnlinkLevel::SkipSpecial);
    let summary = Shredder::new(config).unwrap().run([&root]).unwrap();

    assert!(!root.exists());
    assert_eq!(summary.shredded, 3);
    assert_eq!(summary.bytes_written, 60);
    assert_eq!(summary.unlinked, 3);
    assert_eq!(summary.directories_removed, 3);
}

#[test]
fn test_unfollowed_symlink_not_opened() {
    let (dir, seed) = seeded(1000);
    let root = dir.path().join("root");
    let outside = dir.path().join("outside");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(&outside, b"keep me").unwrap();
    symlink(&outside, root.join("link")).unwrap();

    Shredder::new(config(&seed)).unwrap().run([&root]).unwrap();
    assert_eq!(std::fs::read(&outside).unwrap(), b"keep me");

    let mut config = config(&seed);
    config.unlink(UnlinkLevel::SkipSpecial);
    Shredder::new(config).unwrap().run([&root]).unwrap();
    assert!(!root.exists());
    assert_eq!(std::fs::read(&outside).unwrap(), b"keep me");
}

#[test]
fn test_followed_directory_link_unlinked() {
    let (dir, seed) = seeded(1000);
    let root = dir.path().join("root");
    let outside = dir.path().join("outside");
    std::fs::create_dir(&root).unwrap();
    std::fs::create_dir(&outside).unwrap();
    std::fs::write(outside.join("file"), [1; 16]).unwrap();
    symlink(&outside, root.join("link")).unwrap();

    let mut config = config(&seed);
    config.follow_symlinks(true).unlink(UnlinkLevel::SkipSpecial);
    let summary = Shredder::new(config).unwrap().run([&root]).unwrap();

    assert!(!root.exists());
    assert!(outside.is_dir());
    assert!(!outside.join("file").exists());
    assert_eq!(summary.bytes_written, 16);
}

#[test]
fn test_missing_root_created() {
    let (dir, seed) = seeded(1000);
    let file = dir.path().join("new");

    let mut config = config(&seed);
    config.output_count(Some(100));
    let summary = Shredder::new(config).unwrap().run([&file]).unwrap();

    assert_eq!(summary.shredded, 1);
    assert_eq!(std::fs::read(&file).unwrap(), pattern(100));
    let mode = std::fs::metadata(&file).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_first_failure_stops_run() {
    let (dir, seed) = seeded(1000);
    let first = dir.path().join("first");
    let last = dir.path().join("last");
    let unreachable = dir.path().join("missing/file");
    std::fs::write(&first, [0xaa; 10]).unwrap();
    std::fs::write(&last, [0xaa; 10]).unwrap();

    let mut shredder = Shredder::new(config(&seed)).unwrap();
    let error = shredder.run([&first, &unreachable, &last]).unwrap_err();

    assert_eq!(error.path, unreachable);
    assert_eq!(error.kind, ShredErrorKind::Io(OsError(libc::ENOENT)));
    assert_eq!(std::fs::read(&first).unwrap(), pattern(10));
    assert_eq!(std::fs::read(&last).unwrap(), [0xaa; 10]);
    assert_eq!(shredder.summary().shredded, 1);
}

#[test]
fn test_cancelled_before_start() {
    let (dir, seed) = seeded(1000);
    let file = dir.path().join("file");
    std::fs::write(&file, [0xaa; 10]).unwrap();

    let token = CancelToken::new();
    token.cancel();
    let error = Shredder::new(config(&seed))
        .unwrap()
        .with_cancel_token(token)
        .run([&file])
        .unwrap_err();

    assert!(error.kind.is_interrupted());
    assert_eq!(std::fs::read(&file).unwrap(), [0xaa; 10]);
}

#[test]
fn test_cancelled_between_entries() {
    let (dir, seed) = seeded(1000);
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    std::fs::write(&first, [0xaa; 10]).unwrap();
    std::fs::write(&second, [0xaa; 10]).unwrap();

    let token = CancelToken::new();
    let trigger = token.clone();
    let mut shredder = Shredder::new(config(&seed))
        .unwrap()
        .with_cancel_token(token)
        .with_filter(move |target: &Target| {
            trigger.cancel();
            target.kind == FileType::Regular
        });
    let error = shredder.run([&first, &second]).unwrap_err();

    assert_eq!(error.path, second);
    assert!(error.kind.is_interrupted());
    assert_eq!(std::fs::read(&first).unwrap(), pattern(10));
    assert_eq!(std::fs::read(&second).unwrap(), [0xaa; 10]);
}

#[test]
fn test_filter_skips_fifo() {
    let (dir, seed) = seeded(1000);
    let root = dir.path().join("root");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("file"), [0xaa; 10]).unwrap();
    let fifo = std::ffi::CString::new(root.join("fifo").into_os_string().into_encoded_bytes()).unwrap();
    // SAFETY: fifo is nul-terminated and outlives the call.
    assert_eq!(unsafe { libc::mkfifo(fifo.as_ptr(), 0o600) }, 0);

    let summary = Shredder::new(config(&seed))
        .unwrap()
        .with_filter(SkipUnwritable)
        .run([&root])
        .unwrap();

    assert_eq!(summary.shredded, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(std::fs::read(root.join("file")).unwrap(), pattern(10));
}

#[test]
fn test_shred_outcome() {
    let (dir, seed) = seeded(1000);
    let file = dir.path().join("file");
    std::fs::write(&file, [0xaa; 10]).unwrap();
    let target = Target::probe(&file, false).unwrap();

    let mut shredder = Shredder::new(config(&seed)).unwrap();
    let outcome = shredder.shred(&target);
    assert!(outcome.is_success());
    assert_eq!(outcome.bytes_written, 10);
    assert!(!outcome.unlinked);

    std::fs::remove_file(&file).unwrap();
    let outcome = shredder.shred(&target);
    assert_eq!(outcome.error, Some(ShredErrorKind::Io(OsError(libc::ENOENT))));
    let error = outcome.into_result().unwrap_err();
    assert_eq!(error.to_string(), format!("{}: No such file or directory (os error 2)", file.display()));
}

#[test]
fn test_extent_measured_by_seek() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file");
    std::fs::write(&file, [0; 100]).unwrap();

    let fd = Fd::open(&file, O_WRONLY, 0).unwrap();
    let mut target = Target::probe(&file, false).unwrap();
    target.size = 0;

    // Block devices and directories report nothing useful in st_size.
    for kind in [FileType::BlockDevice, FileType::Directory] {
        target.kind = kind;
        let extent = compute_extent(&target, &fd, &ShredConfig::new()).unwrap();
        assert_eq!(extent, Extent { offset: 0, count: 100 });
    }

    target.kind = FileType::CharDevice;
    let extent = compute_extent(&target, &fd, &ShredConfig::new()).unwrap();
    assert_eq!(extent.count, 0);
}

/// Creates a character device with the numbers of `/dev/null` at `path`, or returns `false` when
/// that isn't possible here (not root, no CAP_MKNOD, or a nodev mount).
fn make_null_device(path: &Path) -> bool {
    // SAFETY: geteuid has no preconditions.
    if unsafe { libc::geteuid() } != 0 {
        return false;
    }
    let pathname = std::ffi::CString::new(path.as_os_str().as_encoded_bytes()).unwrap();
    // SAFETY: pathname is nul-terminated and outlives the call.
    let made = unsafe { libc::mknod(pathname.as_ptr(), libc::S_IFCHR | 0o600, libc::makedev(1, 3)) };
    made == 0 && Fd::open(path, O_WRONLY, 0).is_ok()
}

#[test]
fn test_unlink_levels_on_devices() {
    let (dir, seed) = seeded(1000);
    let device = dir.path().join("null");
    if !make_null_device(&device) {
        return;
    }

    let mut config = config(&seed);
    config.unlink(UnlinkLevel::SkipSpecial);
    let summary = Shredder::new(config.clone()).unwrap().run([&device]).unwrap();
    assert_eq!(summary.shredded, 1);
    assert_eq!(summary.unlinked, 0);
    let kept = Target::probe(&device, false).unwrap();
    assert_eq!(kept.kind, FileType::CharDevice);

    config.unlink(UnlinkLevel::All);
    let summary = Shredder::new(config).unwrap().run([&device]).unwrap();
    assert_eq!(summary.unlinked, 1);
    assert_eq!(Target::probe(&device, false).unwrap_err(), libc::ENOENT);
}
