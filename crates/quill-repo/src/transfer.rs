//! Local transfer: push, fetch, and clone between repository directories.
//!
//! Transport here is trivial file-to-file copy of loose objects and refs —
//! there is no wire protocol. Object copies are additive and idempotent
//! (content addressing makes re-copying harmless); refs are overwritten.

use std::fs;
use std::path::Path;

use quill_ref::RefName;

use crate::checkout;
use crate::{EngineError, Repository};

/// Push a branch to another local repository: copy every loose object,
/// then overwrite the remote's branch ref.
pub fn push_local(repo: &Repository, remote_root: &Path, branch: &str) -> Result<(), EngineError> {
    let tip = repo.branch_tip(branch)?;
    let remote = Repository::open(remote_root)?;

    copy_objects(repo, &remote)?;
    remote.refs().write_ref(&RefName::branch(branch)?, &tip)?;

    log::debug!("pushed {branch} ({}) to {}", tip.short_hex(), remote_root.display());
    Ok(())
}

/// Fetch all branches from another local repository into
/// `refs/remotes/<remote_name>/*`, copying their objects.
pub fn fetch_local(
    repo: &Repository,
    remote_root: &Path,
    remote_name: &str,
) -> Result<(), EngineError> {
    let remote = Repository::open(remote_root)?;

    copy_objects(&remote, repo)?;
    for branch in remote.refs().list_branches()? {
        let tip = remote.branch_tip(&branch)?;
        repo.refs()
            .write_ref(&RefName::remote(remote_name, &branch)?, &tip)?;
    }

    Ok(())
}

/// Clone a local repository: copy its `.git` contents into a fresh
/// repository at `dest_root` and materialize the working tree.
pub fn clone_local(src_root: &Path, dest_root: &Path) -> Result<Repository, EngineError> {
    let src = Repository::open(src_root)?;

    fs::create_dir_all(dest_root)?;
    let head_raw = fs::read(src.git_dir().join("HEAD"))?;
    let default_branch = String::from_utf8_lossy(&head_raw)
        .trim()
        .strip_prefix("ref: refs/heads/")
        .unwrap_or("main")
        .to_string();

    let dest = Repository::init(dest_root, &default_branch)?;

    copy_objects(&src, &dest)?;
    for branch in src.refs().list_branches()? {
        let tip = src.branch_tip(&branch)?;
        dest.refs().write_ref(&RefName::branch(&branch)?, &tip)?;
    }

    let mut dest = dest;
    checkout::checkout_head(&mut dest)?;
    Ok(dest)
}

/// Copy every loose object from `from` into `to`, skipping ones already
/// present.
fn copy_objects(from: &Repository, to: &Repository) -> Result<(), EngineError> {
    for oid in from.store().iter()? {
        let oid = oid?;
        if to.store().contains(&oid) {
            continue;
        }
        let dest_path = to.store().object_path(&oid);
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(from.store().object_path(&oid), &dest_path)?;
    }
    Ok(())
}
