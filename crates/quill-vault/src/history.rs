//! Last-touch annotation for `ls`.
//!
//! For each listed entry the interesting commit is the one that last
//! *changed* it: walking first-parent history from the tip, the candidate
//! keeps advancing to older commits as long as the entry resolves to the
//! same oid, and settles on the newest commit where the older side differs
//! (or the entry disappears). Tree lookups go through the store's object
//! cache, so revisiting the same trees across commits stays cheap.

use std::collections::HashMap;

use bstr::{BStr, BString, ByteSlice};
use quill_hash::ObjectId;
use quill_repo::{log, EngineError, Repository};

/// For each `(path, oid)` pair, find the commit that introduced that oid at
/// that path, walking first-parent from `branch`'s tip.
pub(crate) fn last_touch(
    repo: &Repository,
    branch: &str,
    targets: &[(BString, ObjectId)],
) -> Result<HashMap<BString, ObjectId>, EngineError> {
    let mut result: HashMap<BString, ObjectId> = HashMap::new();
    if targets.is_empty() {
        return Ok(result);
    }

    // candidate commit per still-pending target
    let mut pending: HashMap<&BString, (&ObjectId, Option<ObjectId>)> = targets
        .iter()
        .map(|(path, oid)| (path, (oid, None)))
        .collect();

    for entry in log::history(repo, Some(branch), None)? {
        if pending.is_empty() {
            break;
        }

        let tree = entry.commit.tree;
        let mut settled: Vec<BString> = Vec::new();

        for (path, (target_oid, candidate)) in pending.iter_mut() {
            let found = lookup(repo, &tree, path.as_bstr())?;
            if found.as_ref() == Some(*target_oid) {
                // Still the same content this far back; keep walking.
                *candidate = Some(entry.oid);
            } else {
                // Content differs (or is absent) before the candidate:
                // the candidate commit is the one that introduced it.
                if let Some(commit) = candidate {
                    result.insert((*path).clone(), *commit);
                }
                settled.push((*path).clone());
            }
        }

        for path in settled {
            pending.remove(&path);
        }
    }

    // Targets still pending at the root were introduced by the oldest
    // commit that carried them.
    for (path, (_, candidate)) in pending {
        if let Some(commit) = candidate {
            result.insert(path.clone(), commit);
        }
    }

    Ok(result)
}

fn lookup(
    repo: &Repository,
    tree: &ObjectId,
    path: &BStr,
) -> Result<Option<ObjectId>, EngineError> {
    Ok(repo
        .store()
        .find_in_tree(tree, path)?
        .map(|(_, oid)| oid))
}
