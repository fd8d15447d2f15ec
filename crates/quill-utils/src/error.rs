use std::path::PathBuf;

/// Errors from the foundation utilities.
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    #[error("date parse error: {0}")]
    DateParse(String),

    #[error("invalid repository path: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors from lock file operations.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("lock file already held: {path}")]
    AlreadyLocked { path: PathBuf },

    #[error("cannot create lock file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot commit lock file {path}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
