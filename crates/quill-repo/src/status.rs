//! Working-tree status: partition paths against HEAD's tree.

use std::collections::BTreeMap;

use bstr::{BString, ByteSlice};
use quill_hash::hasher::Hasher;

use crate::scanner;
use crate::{EngineError, Repository};

/// The partition of working-tree paths against HEAD's tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    /// Tracked paths whose content differs from HEAD.
    pub modified: Vec<String>,
    /// Paths present in the working tree but not in HEAD's tree.
    pub untracked: Vec<String>,
    /// Paths present in HEAD's tree but missing from the working tree.
    pub deleted: Vec<String>,
}

impl Status {
    /// No differences at all?
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.untracked.is_empty() && self.deleted.is_empty()
    }
}

/// Compute the status of the working tree against HEAD.
///
/// The index's cached stat data is only a fast path: because `dev`/`ino`
/// truncate to 32 bits, a stat mismatch alone never marks a file modified —
/// the content hash decides.
pub fn status(repo: &Repository) -> Result<Status, EngineError> {
    let head_files = match repo.head_tree()? {
        Some(tree) => repo.store().tree_files(&tree)?,
        None => BTreeMap::new(),
    };
    let index = repo.load_index()?;

    let mut result = Status::default();

    let worktree = scanner::scan_worktree(repo.root())?;
    for entry in &worktree {
        match head_files.get(&entry.path) {
            Some(head_file) => {
                // Fast path: index entry matches HEAD and the stat data
                // matches the file on disk.
                if let Some(index_entry) = index.get(entry.path.as_bstr()) {
                    if index_entry.oid == head_file.oid {
                        let fs_path =
                            quill_utils::path::to_host(repo.root(), entry.path.as_bstr());
                        if let Ok(meta) = std::fs::symlink_metadata(&fs_path) {
                            if index_entry.stat.matches(&meta) {
                                continue;
                            }
                        }
                    }
                }

                // Authoritative: hash the content.
                let data = scanner::read_entry(repo.root(), entry)?;
                let oid = Hasher::hash_object("blob", &data)?;
                if oid != head_file.oid || entry.mode != head_file.mode {
                    result.modified.push(entry.path.to_string());
                }
            }
            None => result.untracked.push(entry.path.to_string()),
        }
    }

    let worktree_paths: std::collections::BTreeSet<&BString> =
        worktree.iter().map(|e| &e.path).collect();
    for path in head_files.keys() {
        if !worktree_paths.contains(path) {
            result.deleted.push(path.to_string());
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit;

    fn fixture() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path(), "main").unwrap();
        (dir, repo)
    }

    #[test]
    fn unborn_repo_reports_untracked() {
        let (dir, repo) = fixture();
        std::fs::write(dir.path().join("new.txt"), "x\n").unwrap();

        let st = status(&repo).unwrap();
        assert_eq!(st.untracked, ["new.txt"]);
        assert!(st.modified.is_empty());
        assert!(st.deleted.is_empty());
    }

    #[test]
    fn clean_after_commit() {
        let (dir, mut repo) = fixture();
        std::fs::write(dir.path().join("f.txt"), "x\n").unwrap();
        commit::commit_worktree(&mut repo, "c", None).unwrap();

        assert!(status(&repo).unwrap().is_clean());
    }

    #[test]
    fn partitions_modified_untracked_deleted() {
        let (dir, mut repo) = fixture();
        std::fs::write(dir.path().join("keep.txt"), "same\n").unwrap();
        std::fs::write(dir.path().join("edit.txt"), "old\n").unwrap();
        std::fs::write(dir.path().join("drop.txt"), "bye\n").unwrap();
        commit::commit_worktree(&mut repo, "base", None).unwrap();

        std::fs::write(dir.path().join("edit.txt"), "new\n").unwrap();
        std::fs::remove_file(dir.path().join("drop.txt")).unwrap();
        std::fs::write(dir.path().join("fresh.txt"), "hello\n").unwrap();

        let st = status(&repo).unwrap();
        assert_eq!(st.modified, ["edit.txt"]);
        assert_eq!(st.deleted, ["drop.txt"]);
        assert_eq!(st.untracked, ["fresh.txt"]);
    }

    #[test]
    fn touched_but_identical_file_stays_clean() {
        let (dir, mut repo) = fixture();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, "stable\n").unwrap();
        commit::commit_worktree(&mut repo, "c", None).unwrap();

        // Rewrite identical bytes: mtime changes, content does not. The
        // stat fast path misses and the content hash must clear it.
        std::fs::write(&path, "stable\n").unwrap();

        assert!(status(&repo).unwrap().is_clean());
    }

    #[cfg(unix)]
    #[test]
    fn mode_change_is_modified() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, mut repo) = fixture();
        let path = dir.path().join("tool.sh");
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        commit::commit_worktree(&mut repo, "c", None).unwrap();

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let st = status(&repo).unwrap();
        assert_eq!(st.modified, ["tool.sh"]);
    }
}
