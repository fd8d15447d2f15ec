//! Commit history: first-parent walk from a branch tip or HEAD.

use std::collections::HashSet;

use quill_hash::ObjectId;
use quill_object::Commit;

use crate::{EngineError, Repository};

/// One entry of the history walk.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub oid: ObjectId,
    pub commit: Commit,
}

/// Walk history in first-parent order, newest first.
///
/// `branch` selects the starting tip; `None` starts from HEAD. An unborn
/// HEAD yields an empty history. `max` bounds the number of entries.
pub fn history(
    repo: &Repository,
    branch: Option<&str>,
    max: Option<usize>,
) -> Result<Vec<LogEntry>, EngineError> {
    let start = match branch {
        Some(name) => Some(repo.branch_tip(name)?),
        None => repo.head()?.oid(),
    };

    let mut entries = Vec::new();
    let mut seen = HashSet::new();
    let mut current = start;

    while let Some(oid) = current {
        if let Some(limit) = max {
            if entries.len() >= limit {
                break;
            }
        }
        // A cycle would mean corrupt parent links; stop rather than spin.
        if !seen.insert(oid) {
            break;
        }

        let commit = repo.store().read_commit(&oid)?;
        current = commit.first_parent().copied();
        entries.push(LogEntry { oid, commit });
    }

    Ok(entries)
}
