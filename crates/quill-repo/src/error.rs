use std::path::PathBuf;

use quill_index::IndexError;
use quill_odb::StoreError;
use quill_ref::RefError;

/// The engine-level error taxonomy.
///
/// Every subsystem error converges here without losing its kind: missing
/// things are `NotFound`, malformed on-disk data is `InvalidFormat`, and the
/// unborn-branch state keeps its own variant because callers branch on it.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("not a repository: {0}")]
    NotARepository(PathBuf),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("branch not born yet: {0}")]
    Unborn(String),

    #[error("branch already exists: {0}")]
    BranchExists(String),

    #[error("branch does not exist: {0}")]
    BranchMissing(String),

    #[error("checkout left residual paths: {residual:?}")]
    CheckoutIncomplete { residual: Vec<String> },

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// A stable identifier for the error kind, used in façade envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::NotARepository(_) => "NotARepository",
            Self::InvalidFormat(_) => "InvalidFormat",
            Self::Unborn(_) => "Unborn",
            Self::BranchExists(_) => "BranchExists",
            Self::BranchMissing(_) => "BranchMissing",
            Self::CheckoutIncomplete { .. } => "CheckoutIncomplete",
            Self::PreconditionFailed(_) => "PreconditionFailed",
            Self::Io(_) => "IOError",
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(oid) => Self::NotFound(format!("object {oid}")),
            StoreError::Io(io) => Self::Io(io),
            other => Self::InvalidFormat(other.to_string()),
        }
    }
}

impl From<RefError> for EngineError {
    fn from(e: RefError) -> Self {
        match e {
            RefError::NotFound(name) => Self::NotFound(format!("ref {name}")),
            RefError::Unborn(branch) => Self::Unborn(branch),
            RefError::AlreadyExists(name) => Self::BranchExists(name),
            RefError::Io(io) => Self::Io(io),
            RefError::IoPath { source, .. } => Self::Io(source),
            other => Self::InvalidFormat(other.to_string()),
        }
    }
}

impl From<IndexError> for EngineError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::Io(io) => Self::Io(io),
            IndexError::Store(store) => store.into(),
            IndexError::NotAFile(path) => Self::PreconditionFailed(format!("not a file: {path}")),
            other => Self::InvalidFormat(other.to_string()),
        }
    }
}

impl From<quill_object::ObjectError> for EngineError {
    fn from(e: quill_object::ObjectError) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

impl From<quill_hash::HashError> for EngineError {
    fn from(e: quill_hash::HashError) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

impl From<quill_utils::UtilError> for EngineError {
    fn from(e: quill_utils::UtilError) -> Self {
        match e {
            quill_utils::UtilError::Io(io) => Self::Io(io),
            other => Self::InvalidFormat(other.to_string()),
        }
    }
}
