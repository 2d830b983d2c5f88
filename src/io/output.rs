use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Removes a backend output unless the write that produced it completed.
///
/// Created before the storage library touches the path and committed once the
/// file (or `.bp` directory) is fully written and closed. Dropping an
/// uncommitted guard deletes whatever the failed write left behind.
#[derive(Debug)]
pub struct OutputGuard {
    path: PathBuf,
    cleanup_on_drop: bool,
}

impl OutputGuard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cleanup_on_drop: true,
        }
    }

    /// Keep the output; the write succeeded.
    pub fn commit(mut self) {
        self.cleanup_on_drop = false;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if self.cleanup_on_drop {
            match remove_output(&self.path) {
                Ok(()) => tracing::debug!(path = %self.path.display(), "removed partial output"),
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove partial output"
                ),
            }
        }
    }
}

/// Remove a file or directory output. A missing path is not an error.
pub fn remove_output(path: &Path) -> io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_uncommitted_guard_removes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.h5");
        {
            let guard = OutputGuard::new(&path);
            fs::write(guard.path(), b"half").unwrap();
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_uncommitted_guard_removes_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.bp");
        {
            let _guard = OutputGuard::new(&path);
            fs::create_dir(&path).unwrap();
            fs::write(path.join("data.0"), b"half").unwrap();
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_committed_guard_keeps_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("done.h5");
        let guard = OutputGuard::new(&path);
        fs::write(&path, b"complete").unwrap();
        guard.commit();
        assert!(path.exists());
    }

    #[test]
    fn test_remove_missing_output_is_ok() {
        let dir = tempdir().unwrap();
        assert!(remove_output(&dir.path().join("never-written")).is_ok());
    }
}
