use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::ops::store::TaskStore;
use crate::parse::{ParseContext, SerializeError};

/// Error type for todo file I/O
#[derive(Debug, thiserror::Error)]
pub enum TodoFileError {
    #[error("could not create {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    SerializeError(#[from] SerializeError),
}

/// Make sure the todo file exists, creating missing parent directories and
/// an empty file.
pub fn ensure_todo_file(path: &Path) -> Result<(), TodoFileError> {
    if path.is_file() {
        return Ok(());
    }
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
        && !dir.is_dir()
    {
        fs::create_dir_all(dir).map_err(|e| TodoFileError::CreateError {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    // append: never truncate a file that appeared in the meantime
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TodoFileError::CreateError {
            path: path.to_path_buf(),
            source: e,
        })?;
    debug!(path = %path.display(), "created todo file");
    Ok(())
}

/// Read and parse the whole todo file
pub fn load_store(path: &Path, ctx: &ParseContext) -> Result<TaskStore, TodoFileError> {
    let text = fs::read_to_string(path).map_err(|e| TodoFileError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let store = TaskStore::from_text(&text, ctx);
    debug!(path = %path.display(), entries = store.len(), "loaded todo file");
    Ok(store)
}

/// Rewrite the todo file with the store's canonical, sorted contents
pub fn save_store(path: &Path, store: &TaskStore) -> Result<(), TodoFileError> {
    let content = store.to_text()?;
    atomic_write(path, content.as_bytes()).map_err(|e| TodoFileError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), entries = store.len(), "saved todo file");
    Ok(())
}

/// Write via a temp file in the same directory renamed over `path`, so
/// readers see either the old or the new contents. Existing permissions
/// are carried over.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ctx() -> ParseContext {
        ParseContext::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn test_ensure_creates_parent_dirs_and_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Documents/nested/todo.txt");
        ensure_todo_file(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_ensure_leaves_existing_file_alone() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("todo.txt");
        fs::write(&path, "24-03-01 Keep me\n").unwrap();
        ensure_todo_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "24-03-01 Keep me\n");
    }

    #[test]
    fn test_ensure_fails_on_directory() {
        let tmp = TempDir::new().unwrap();
        let err = ensure_todo_file(tmp.path()).unwrap_err();
        assert!(matches!(err, TodoFileError::CreateError { .. }));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_store(&tmp.path().join("absent.txt"), &ctx()).unwrap_err();
        assert!(matches!(err, TodoFileError::ReadError { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("todo.txt");
        fs::write(&path, "water plants\nMeeting at 10:30\n(A) pay rent\n").unwrap();

        let store = load_store(&path, &ctx()).unwrap();
        save_store(&path, &store).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "(A) 24-03-15 Pay rent\n24-03-15 Water plants\n;; Meeting at 10:30\n"
        );

        let reloaded = load_store(&path, &ctx()).unwrap();
        assert_eq!(reloaded.len(), 3);
    }

    #[test]
    fn test_atomic_write_replaces_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("todo.txt");
        fs::write(&path, "old contents that are longer\n").unwrap();
        atomic_write(&path, b"new\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        // no temp files left behind
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("todo.txt");
        fs::write(&path, "x\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        atomic_write(&path, b"y\n").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
