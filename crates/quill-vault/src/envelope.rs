//! Result envelopes for the file-level API.
//!
//! Every façade call answers with `(success, message, data)` plus the branch
//! it operated on; engine errors are carried as their stable kind string so
//! callers can dispatch without parsing prose.

use serde::Serialize;

use quill_repo::EngineError;

/// The uniform façade result.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub branch: String,
    /// Stable error kind (`NotFound`, `Unborn`, …) when `success` is false.
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub(crate) fn ok(branch: impl Into<String>, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            branch: branch.into(),
            error: None,
            data: Some(data),
        }
    }

    pub(crate) fn fail(branch: impl Into<String>, err: &EngineError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            branch: branch.into(),
            error: Some(err.kind().to_string()),
            data: None,
        }
    }
}

/// Payload of `write`.
#[derive(Debug, Clone, Serialize)]
pub struct WriteData {
    pub path: String,
    /// `None` when the content was already up to date.
    pub commit: Option<String>,
    pub created: bool,
}

/// Payload of `read`.
#[derive(Debug, Clone, Serialize)]
pub struct ReadData {
    pub path: String,
    pub commit: String,
    #[serde(serialize_with = "serialize_lossy")]
    pub content: Vec<u8>,
}

impl ReadData {
    /// The content as UTF-8 text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

/// Payload of `delete`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteData {
    pub path: String,
    pub commit: Option<String>,
    pub branch_deleted: bool,
}

/// Payload of `rename`.
#[derive(Debug, Clone, Serialize)]
pub struct RenameData {
    pub from: String,
    pub to: String,
    pub commit: Option<String>,
}

/// One name in an `ls` listing.
#[derive(Debug, Clone, Serialize)]
pub struct LsEntry {
    pub name: String,
    pub is_dir: bool,
    /// The last commit that touched this entry, with its summary.
    pub last_commit: Option<String>,
    pub last_message: Option<String>,
}

/// Payload of `ls`.
#[derive(Debug, Clone, Serialize)]
pub struct LsData {
    pub path: String,
    pub entries: Vec<LsEntry>,
}

/// Payload of `branches`.
#[derive(Debug, Clone, Serialize)]
pub struct BranchesData {
    pub branches: Vec<String>,
}

/// One commit in a `history` listing.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: String,
    pub message: String,
    pub author: String,
    pub timestamp: i64,
}

/// Payload of `history`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryData {
    pub entries: Vec<HistoryEntry>,
}

/// Payload of `status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusData {
    pub modified: Vec<String>,
    pub untracked: Vec<String>,
    pub deleted: Vec<String>,
}

/// Payload of `diff`.
#[derive(Debug, Clone, Serialize)]
pub struct DiffData {
    pub patch: String,
}

/// Payload of `show`: one commit's metadata plus its patch against the
/// first parent (against the empty tree for a root commit).
#[derive(Debug, Clone, Serialize)]
pub struct ShowData {
    pub id: String,
    pub author: String,
    pub timestamp: i64,
    pub message: String,
    pub patch: String,
}

/// Payload of `reset`.
#[derive(Debug, Clone, Serialize)]
pub struct ResetData {
    pub branch: String,
    pub commit: String,
    pub hard: bool,
}

/// Payload of `restore`.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreData {
    pub path: String,
    /// The commit the content was taken from.
    pub commit: String,
}

/// One `grep` hit.
#[derive(Debug, Clone, Serialize)]
pub struct GrepMatch {
    pub path: String,
    pub line: usize,
    pub text: String,
}

/// Payload of `grep`.
#[derive(Debug, Clone, Serialize)]
pub struct GrepData {
    pub matches: Vec<GrepMatch>,
}

fn serialize_lossy<S: serde::Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
    ser.serialize_str(&String::from_utf8_lossy(bytes))
}
