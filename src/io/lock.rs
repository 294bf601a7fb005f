use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

/// Advisory lock serializing read-modify-write cycles on a todo file.
///
/// Uses flock (Unix) on a `<file>.lock` sibling so two `todo add` runs
/// against the same file cannot interleave their load and rewrite. The
/// lock is released when the guard is dropped; the lock file stays on
/// disk so every process contends on the same inode.
pub struct FileLock {
    _file: File,
    path: PathBuf,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not lock {path}: {source}")]
    LockFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not acquire lock on {path}: another todo process may be writing")]
    Timeout { path: PathBuf },
}

/// Poll interval while another process holds the lock
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

impl FileLock {
    /// Lock the todo file at `target`, waiting up to `timeout` for a
    /// concurrent writer to finish.
    pub fn acquire(target: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path_for(target);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| LockError::CreateError {
                path: path.clone(),
                source: e,
            })?;

        let deadline = Instant::now() + timeout;
        while !try_lock(&file).map_err(|e| LockError::LockFailed {
            path: path.clone(),
            source: e,
        })? {
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            debug!(path = %path.display(), "waiting for lock");
            std::thread::sleep(RETRY_INTERVAL);
        }
        Ok(FileLock { _file: file, path })
    }

    pub fn acquire_default(target: &Path) -> Result<Self, LockError> {
        Self::acquire(target, Duration::from_secs(5))
    }

    /// The `.lock` file this guard holds
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `todo.txt` -> `todo.txt.lock`
fn lock_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("todo"));
    name.push(".lock");
    target.with_file_name(name)
}

/// Non-blocking exclusive flock. `Ok(false)` means another process holds it.
#[cfg(unix)]
fn try_lock(file: &File) -> std::io::Result<bool> {
    use std::os::unix::io::AsRawFd;
    if unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) } == 0 {
        return Ok(true);
    }
    let err = std::io::Error::last_os_error();
    if err.kind() == std::io::ErrorKind::WouldBlock {
        Ok(false)
    } else {
        Err(err)
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> std::io::Result<bool> {
    Ok(true)
}
