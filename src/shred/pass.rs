use tracing::trace;

use crate::fs::{BadFdError, Fd};
use crate::shred::{EntropySource, OverwriteError, ShredBuffer, ZeroBufferError};

/// Overwrites `limit` bytes of `target`, starting at its current offset, with bytes from `source`.
///
/// The bytes are moved in chunks of at most `buffer.len()`, each written out in full before the
/// next is read. The target is synced afterwards even when the loop fails, although a sync error
/// is only reported when nothing failed before it. The buffer is scrubbed before returning, on
/// every path.
///
/// Returns the number of bytes written, which equals `limit` on success.
pub fn overwrite(
    target: &Fd,
    source: &mut EntropySource,
    buffer: &mut ShredBuffer,
    limit: u64,
) -> Result<u64, OverwriteError> {
    if buffer.is_empty() {
        Err(ZeroBufferError)?
    }
    if **target < 0 || **source.fd() < 0 {
        Err(BadFdError)?
    }

    let mut written = 0;
    let result = write_chunks(target, source, buffer, limit, &mut written);

    let synced = match target.sync_data() {
        // Special files that can't be synchronised, like most character devices.
        Err(libc::EINVAL) => Ok(()),
        synced => synced.map_err(OverwriteError::interpret_raw_error),
    };
    buffer.scrub();

    result.and(synced).map(|()| written)
}

fn write_chunks(
    target: &Fd,
    source: &mut EntropySource,
    buffer: &mut ShredBuffer,
    limit: u64,
    written: &mut u64,
) -> Result<(), OverwriteError> {
    let mut remaining = limit;

    while remaining > 0 {
        let len = usize::try_from(remaining).unwrap_or(usize::MAX).min(buffer.len());
        let chunk = buffer.chunk(len);
        source.fill(chunk)?;

        let mut tail: &[u8] = chunk;
        while !tail.is_empty() {
            let count = target.write(tail).map_err(OverwriteError::interpret_raw_error)?;
            if count == 0 {
                // A zero-length write for a non-empty buffer means no progress can be made.
                Err(OverwriteError::interpret_raw_error(libc::EIO))?
            }
            tail = &tail[count..];
            *written += count as u64;
        }

        trace!(chunk = len, remaining, "chunk written");
        remaining -= len as u64;
    }
    Ok(())
}
