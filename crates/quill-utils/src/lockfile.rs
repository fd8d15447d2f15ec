use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{LockError, UtilError};
use crate::Result;

/// RAII lock file guard. Creates a `.lock` file on construction,
/// atomically renames on commit, removes on drop if not committed.
///
/// This matches C git's lock file protocol:
/// - Create `<path>.lock` with O_CREAT|O_EXCL
/// - Write new contents to the lock file
/// - Atomically rename `.lock` to target on commit
/// - Remove `.lock` on drop if not committed (rollback)
pub struct LockFile {
    /// The target file path (without .lock suffix).
    path: PathBuf,
    /// The lock file path (with .lock suffix).
    lock_path: PathBuf,
    /// The open file handle for writing.
    file: Option<File>,
    /// Whether commit() has been called.
    committed: bool,
}

const LOCK_SUFFIX: &str = ".lock";

impl LockFile {
    /// Acquire a lock on the given path. Creates `path.lock` using O_CREAT|O_EXCL.
    ///
    /// Returns an error if the lock file already exists (another writer holds it).
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_path = PathBuf::from(format!("{}{}", path.display(), LOCK_SUFFIX));

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    UtilError::Lock(LockError::AlreadyLocked {
                        path: lock_path.clone(),
                    })
                } else {
                    UtilError::Lock(LockError::Create {
                        path: lock_path.clone(),
                        source: e,
                    })
                }
            })?;

        Ok(Self {
            path,
            lock_path,
            file: Some(file),
            committed: false,
        })
    }

    /// Get the path of the target file (without .lock).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commit: close the file and atomically rename .lock to target.
    pub fn commit(mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush().map_err(|e| {
                UtilError::Lock(LockError::Commit {
                    path: self.lock_path.clone(),
                    source: e,
                })
            })?;
            file.sync_all().map_err(|e| {
                UtilError::Lock(LockError::Commit {
                    path: self.lock_path.clone(),
                    source: e,
                })
            })?;
        }
        // Drop the file handle before rename
        self.file.take();

        fs::rename(&self.lock_path, &self.path).map_err(|e| {
            UtilError::Lock(LockError::Commit {
                path: self.lock_path.clone(),
                source: e,
            })
        })?;

        self.committed = true;
        Ok(())
    }

    /// Rollback: remove the .lock file (also happens on Drop).
    pub fn rollback(mut self) {
        self.file.take();
        let _ = fs::remove_file(&self.lock_path);
        self.committed = true; // suppress Drop cleanup
    }
}

impl Write for LockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file {
            Some(ref mut f) => f.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "lock file closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file {
            Some(ref mut f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}
