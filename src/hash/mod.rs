//! Content hashing for change detection
//!
//! XXH64 is used purely to tell same-size files apart. It is fast and
//! non-cryptographic, so it says nothing about integrity or tampering.

use crate::types::SyncError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use xxhash_rust::xxh64::Xxh64;

const HASH_SEED: u64 = 0;
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Compute the XXH64 hash of a file
///
/// The file is streamed in 64KB chunks.
///
/// # Errors
/// Any open or read failure is returned as [`SyncError::Hash`] for `file_path`.
///
/// # Example
/// ```no_run
/// use treesync::hash::compute_hash;
/// use std::path::Path;
///
/// let hash = compute_hash(Path::new("file.txt"))?;
/// # Ok::<(), treesync::SyncError>(())
/// ```
pub fn compute_hash(file_path: &Path) -> Result<u64, SyncError> {
    let to_error = |source| SyncError::Hash {
        path: file_path.to_path_buf(),
        source,
    };

    let file = File::open(file_path).map_err(to_error)?;
    hash_reader(file).map_err(to_error)
}

/// Hash everything a reader yields until EOF
///
/// The digest depends only on the bytes, not on how reads are split.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<u64> {
    let mut hasher = Xxh64::new(HASH_SEED);
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.digest())
}
