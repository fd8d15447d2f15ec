//! The commit pipeline.
//!
//! A commit snapshots either the index or the working tree into a tree
//! object, writes a commit object referencing the current HEAD commit as
//! parent (none when unborn), and then — only after every object is safely
//! on disk — advances the branch ref named by HEAD. The index is rebuilt
//! from the new tree as the final step.

use bstr::BString;
use quill_hash::ObjectId;
use quill_index::Index;
use quill_object::{Commit, Object};
use quill_ref::{Head, RefName};
use quill_utils::date::Signature;

use crate::scanner;
use crate::{EngineError, Repository};

/// Compile-time fallback identity used when the caller supplies none.
pub const DEFAULT_IDENT_NAME: &str = "quill";
pub const DEFAULT_IDENT_EMAIL: &str = "quill@localhost";

/// The default signature, stamped with the current time.
pub fn default_signature() -> Signature {
    Signature::now(DEFAULT_IDENT_NAME, DEFAULT_IDENT_EMAIL)
}

/// Commit the current index. Returns the new commit OID.
pub fn commit_index(
    repo: &mut Repository,
    message: &str,
    author: Option<Signature>,
) -> Result<ObjectId, EngineError> {
    let index = repo.load_index()?;
    let tree = index.write_tree(repo.store())?;
    finish_commit(repo, tree, message, author)
}

/// Commit a snapshot of the entire working tree (everything outside
/// `.git`), staging every file found. Returns the new commit OID.
pub fn commit_worktree(
    repo: &mut Repository,
    message: &str,
    author: Option<Signature>,
) -> Result<ObjectId, EngineError> {
    let mut index = Index::new();
    for entry in scanner::scan_worktree(repo.root())? {
        index.stage_file(repo.store(), repo.root(), entry.path.as_ref())?;
    }
    let tree = index.write_tree(repo.store())?;
    finish_commit(repo, tree, message, author)
}

/// Trivial two-parent merge: commits the current index with the tips of
/// the current branch and `other_branch` as parents. No content
/// reconciliation is attempted.
pub fn merge_branch(
    repo: &mut Repository,
    other_branch: &str,
    message: &str,
    author: Option<Signature>,
) -> Result<ObjectId, EngineError> {
    let other_tip = repo.branch_tip(other_branch)?;
    let current_tip = repo.refs().head_oid()?;

    let index = repo.load_index()?;
    let tree = index.write_tree(repo.store())?;

    write_commit_and_advance(
        repo,
        tree,
        vec![current_tip, other_tip],
        message,
        author,
    )
}

/// Does `new_tree` match the tree of the current HEAD commit?
///
/// Callers use this for no-op detection; the engine itself permits
/// empty-delta commits.
pub fn tree_unchanged(repo: &Repository, new_tree: &ObjectId) -> Result<bool, EngineError> {
    Ok(repo.head_tree()? == Some(*new_tree))
}

fn finish_commit(
    repo: &mut Repository,
    tree: ObjectId,
    message: &str,
    author: Option<Signature>,
) -> Result<ObjectId, EngineError> {
    let parents = match repo.head()? {
        Head::Branch { oid: Some(oid), .. } | Head::Detached(oid) => vec![oid],
        Head::Branch { oid: None, .. } => Vec::new(),
    };
    write_commit_and_advance(repo, tree, parents, message, author)
}

fn write_commit_and_advance(
    repo: &mut Repository,
    tree: ObjectId,
    parents: Vec<ObjectId>,
    message: &str,
    author: Option<Signature>,
) -> Result<ObjectId, EngineError> {
    let author = author.unwrap_or_else(default_signature);
    let committer = author.clone();

    let mut message = BString::from(message);
    if !message.ends_with(b"\n") {
        message.push(b'\n');
    }

    let commit = Commit {
        tree,
        parents,
        author,
        committer,
        message,
    };

    // Objects first; no ref moves until the commit is on disk.
    let commit_oid = repo.store().write(&Object::Commit(commit))?;

    match repo.head()? {
        Head::Branch { name, .. } => {
            // Creates the branch ref on first commit of an unborn branch.
            let refname = RefName::branch(&name)?;
            repo.refs().write_ref(&refname, &commit_oid)?;
            log::debug!("commit {} on branch {}", commit_oid.short_hex(), name);
        }
        Head::Detached(_) => {
            repo.refs().write_ref(&RefName::head(), &commit_oid)?;
            log::debug!("commit {} on detached HEAD", commit_oid.short_hex());
        }
    }

    // Rebuild the index from the committed tree so a subsequent status is
    // clean; the index write is the last step of the pipeline.
    let mut index = repo.load_index()?;
    index.read_tree(repo.store(), &tree, repo.root())?;
    repo.save_index(&index)?;

    repo.reopen();
    Ok(commit_oid)
}
