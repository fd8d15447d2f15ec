//! Diff engine: Myers line diff, unified output, tree comparison.
//!
//! Diffs operate on *file sets* — flat `path → bytes` maps — so the same
//! machinery serves tree-vs-tree and tree-vs-worktree comparison. Binary
//! content is reported, not diffed.

pub mod myers;
pub mod unified;

use std::collections::{BTreeMap, BTreeSet};

use bstr::BString;
use quill_hash::ObjectId;
use quill_odb::ObjectStore;

pub use unified::looks_binary;

/// Errors produced by diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error(transparent)]
    Store(#[from] quill_odb::StoreError),
}

/// How a path differs between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Deleted,
    Modified,
}

/// A per-file diff: the path, what happened to it, and the unified text.
#[derive(Debug, Clone)]
pub struct FileDiff {
    pub path: BString,
    pub status: FileStatus,
    pub unified: String,
}

/// A flat file set: repo-relative path → content bytes.
pub type FileSet = BTreeMap<BString, Vec<u8>>;

/// Load a tree into a file set. `None` stands for the empty tree.
pub fn tree_file_set(store: &ObjectStore, tree: Option<&ObjectId>) -> Result<FileSet, DiffError> {
    let mut out = FileSet::new();
    let Some(tree) = tree else {
        return Ok(out);
    };
    for (path, file) in store.tree_files(tree)? {
        out.insert(path, store.read_blob(&file.oid)?);
    }
    Ok(out)
}

/// Diff two file sets, producing one `FileDiff` per differing path.
pub fn diff_file_sets(old: &FileSet, new: &FileSet) -> Vec<FileDiff> {
    let mut paths: BTreeSet<&BString> = BTreeSet::new();
    paths.extend(old.keys());
    paths.extend(new.keys());

    let mut out = Vec::new();
    for path in paths {
        let old_content = old.get(path);
        let new_content = new.get(path);

        let (status, unified) = match (old_content, new_content) {
            (None, Some(new_bytes)) => {
                let label = path.to_string();
                let Some(text) = unified::format(None, Some(&label), b"", new_bytes) else {
                    continue;
                };
                (FileStatus::Added, text)
            }
            (Some(old_bytes), None) => {
                let label = path.to_string();
                let Some(text) = unified::format(Some(&label), None, old_bytes, b"") else {
                    continue;
                };
                (FileStatus::Deleted, text)
            }
            (Some(old_bytes), Some(new_bytes)) => {
                if old_bytes == new_bytes {
                    continue;
                }
                let label = path.to_string();
                let Some(text) =
                    unified::format(Some(&label), Some(&label), old_bytes, new_bytes)
                else {
                    continue;
                };
                (FileStatus::Modified, text)
            }
            (None, None) => continue,
        };

        out.push(FileDiff {
            path: path.clone(),
            status,
            unified,
        });
    }

    out
}

/// Diff two trees (either side `None` = empty tree).
pub fn diff_trees(
    store: &ObjectStore,
    old_tree: Option<&ObjectId>,
    new_tree: Option<&ObjectId>,
) -> Result<Vec<FileDiff>, DiffError> {
    let old = tree_file_set(store, old_tree)?;
    let new = tree_file_set(store, new_tree)?;
    Ok(diff_file_sets(&old, &new))
}

/// Concatenate per-file unified diffs into one patch text.
pub fn render(diffs: &[FileDiff]) -> String {
    diffs
        .iter()
        .map(|d| d.unified.as_str())
        .collect::<Vec<_>>()
        .join("")
}
