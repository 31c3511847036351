//! Whole-file copy that carries permissions and timestamps along

use crate::types::{DirEntry, SyncError};
use filetime::FileTime;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copy `src` over `dest`, then give `dest` the mode and mtime recorded in `entry`
///
/// The destination is created or truncated in place; there is no temporary
/// file, so an interrupted copy leaves a partial destination behind that the
/// next run will detect by size or hash.
///
/// 1. Stream the bytes through a 128KB buffer
/// 2. Apply the source permission bits (Unix only)
/// 3. Set atime and mtime to the source mtime
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(SyncError::Copy)` - open, create, stream or chmod failed
/// * `Err(SyncError::Timestamp)` - content is in place but the times could not be set
///
/// # Example
/// ```no_run
/// use treesync::executor::copy_file;
/// use treesync::types::DirEntry;
/// use std::path::Path;
///
/// let src = Path::new("source.txt");
/// let entry = DirEntry::from_metadata("source.txt", &std::fs::metadata(src)?)?;
/// let bytes = copy_file(src, Path::new("dest.txt"), &entry)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn copy_file(src: &Path, dest: &Path, entry: &DirEntry) -> Result<u64, SyncError> {
    let copied = stream_contents(src, dest, entry.permissions).map_err(|source| SyncError::Copy {
        path: dest.to_path_buf(),
        source,
    })?;

    let mtime = FileTime::from_system_time(entry.mtime);
    filetime::set_file_times(dest, mtime, mtime).map_err(|source| SyncError::Timestamp {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(copied)
}

fn stream_contents(src: &Path, dest: &Path, mode: u32) -> io::Result<u64> {
    let mut src_file = File::open(src)?;
    let mut dest_file = File::create(dest)?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match src_file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        dest_file.write_all(&buffer[..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    dest_file.flush()?;
    apply_mode(&dest_file, mode)?;

    Ok(total_bytes)
}

#[cfg(unix)]
fn apply_mode(dest_file: &File, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    dest_file.set_permissions(std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(_dest_file: &File, _mode: u32) -> io::Result<()> {
    Ok(())
}
