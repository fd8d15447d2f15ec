//! The checkout engine.
//!
//! Switching branches reconciles three things at once: HEAD, the working
//! tree, and the index. The flow is fixed:
//!
//! 1. Rewrite HEAD symbolically to the target branch and reopen the handle.
//! 2. Resolve the target commit; an unborn branch means the empty tree.
//! 3. Compute the expected set: every path in the target tree with mode and oid.
//! 4. Prune the working tree: delete files not in the expected set and
//!    directories with no expected descendants. `.git` is never entered.
//! 5. Materialize every expected entry (parent dirs, blob bytes, exec bit).
//! 6. Rebuild the index from the target tree.
//! 7. Audit: rescan and fail with `CheckoutIncomplete` on any residual path.
//!
//! Running the engine twice in a row yields the same state.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bstr::{BStr, BString, ByteSlice, ByteVec};
use quill_hash::ObjectId;
use quill_object::FileMode;
use quill_ref::{Head, RefName};

use crate::scanner;
use crate::{EngineError, Repository};

/// The target state of a checkout: path → (mode, oid).
type Expected = BTreeMap<BString, (FileMode, ObjectId)>;

/// Switch HEAD to `branch` and reconcile the working tree and index.
///
/// The branch must exist (loose or packed); use [`checkout_head`] to
/// reconcile against an unborn HEAD.
pub fn checkout_branch(repo: &mut Repository, branch: &str) -> Result<(), EngineError> {
    let refname = RefName::branch(branch)?;
    if !repo.refs().exists(&refname)? {
        return Err(EngineError::BranchMissing(branch.to_string()));
    }

    // HEAD moves first; the handle is reopened so no cached view of the
    // previous branch survives.
    repo.refs().write_symbolic_ref(&RefName::head(), &refname)?;
    repo.reopen();

    log::debug!("checkout: switched HEAD to {branch}");
    checkout_head(repo)
}

/// Reconcile the working tree and index with whatever HEAD points at.
///
/// An unborn HEAD reconciles against the empty tree: the working tree is
/// emptied and the index file removed.
pub fn checkout_head(repo: &mut Repository) -> Result<(), EngineError> {
    let head = repo.head()?;

    let tree = match head.oid() {
        Some(commit_oid) => Some(repo.store().read_commit(&commit_oid)?.tree),
        None => None,
    };

    let expected = match tree {
        Some(ref tree_oid) => expected_set(repo, tree_oid)?,
        None => Expected::new(),
    };

    prune_dir(repo.root(), &BString::from(""), &expected)?;
    materialize(repo, &expected)?;

    // Index rebuild is the last mutation of the flow.
    let mut index = repo.load_index()?;
    match tree {
        Some(ref tree_oid) => index.read_tree(repo.store(), tree_oid, repo.root())?,
        None => index.clear(),
    }
    repo.save_index(&index)?;

    audit(repo.root(), &expected)
}

/// Move the current branch tip (or a detached HEAD) to `target`.
///
/// With `hard`, the working tree and index are reconciled with the target
/// commit through the checkout engine; otherwise only the ref moves and
/// the working tree keeps whatever state it had.
pub fn reset(repo: &mut Repository, target: &ObjectId, hard: bool) -> Result<(), EngineError> {
    // Refuse to point a branch at something that is not a commit.
    repo.store().read_commit(target)?;

    match repo.head()? {
        Head::Branch { name, .. } => {
            repo.refs().write_ref(&RefName::branch(&name)?, target)?;
            log::debug!("reset {name} to {}", target.short_hex());
        }
        Head::Detached(_) => {
            repo.refs().write_ref(&RefName::head(), target)?;
        }
    }
    repo.reopen();

    if hard {
        checkout_head(repo)?;
    }
    Ok(())
}

/// Flatten the target tree into the expected path set.
fn expected_set(repo: &Repository, tree_oid: &ObjectId) -> Result<Expected, EngineError> {
    let mut expected = Expected::new();
    for (path, file) in repo.store().tree_files(tree_oid)? {
        expected.insert(path, (file.mode, file.oid));
    }
    Ok(expected)
}

/// Delete everything under `dir` that the expected set does not claim.
fn prune_dir(dir: &Path, prefix: &BString, expected: &Expected) -> Result<(), EngineError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name_bytes = Vec::from_os_string(entry.file_name())
            .map_err(|_| EngineError::InvalidFormat("non-unicode file name".into()))?;

        if prefix.is_empty() && name_bytes == b".git" {
            continue;
        }

        let rel = join(prefix, &name_bytes);
        let file_type = entry.file_type()?;

        if file_type.is_dir() && !file_type.is_symlink() {
            if has_descendants(expected, &rel) {
                prune_dir(&entry.path(), &rel, expected)?;
                // The directory may now be empty; materialization recreates
                // it for the entries it owns.
                let _ = fs::remove_dir(entry.path());
            } else {
                fs::remove_dir_all(entry.path())?;
            }
        } else if !expected.contains_key(&rel) {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Does any expected path live under the directory `prefix`?
fn has_descendants(expected: &Expected, prefix: &BString) -> bool {
    let mut bound = prefix.clone();
    bound.push_byte(b'/');
    expected
        .range(bound.clone()..)
        .next()
        .is_some_and(|(path, _)| path.starts_with(&bound))
}

/// Write every expected entry into the working tree.
fn materialize(repo: &Repository, expected: &Expected) -> Result<(), EngineError> {
    for (path, (mode, oid)) in expected {
        restore_file(repo, path.as_bstr(), *mode, oid)?;
    }
    Ok(())
}

/// Write one blob into the working tree at `path`, honoring its mode.
///
/// A file already on disk with matching content and mode is left alone,
/// which keeps repeated checkouts byte-stable (its stat data would
/// otherwise change on every switch). Also used by the façade's `restore`.
pub fn restore_file(
    repo: &Repository,
    path: &BStr,
    mode: FileMode,
    oid: &ObjectId,
) -> Result<(), EngineError> {
    let fs_path = quill_utils::path::to_host(repo.root(), path);
    if let Some(parent) = fs_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = repo.store().read_blob(oid)?;
    if entry_up_to_date(&fs_path, mode, &data) {
        return Ok(());
    }

    if mode.is_symlink() {
        write_symlink(&fs_path, &data)?;
    } else {
        // A stale symlink at this path must not redirect the write.
        if fs::symlink_metadata(&fs_path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
        {
            fs::remove_file(&fs_path)?;
        }
        fs::write(&fs_path, &data)?;
        set_file_mode(&fs_path, mode)?;
    }
    Ok(())
}

/// Is the on-disk entry already exactly what the target tree wants?
fn entry_up_to_date(fs_path: &Path, mode: FileMode, data: &[u8]) -> bool {
    let Ok(meta) = fs::symlink_metadata(fs_path) else {
        return false;
    };

    if mode.is_symlink() {
        return meta.file_type().is_symlink()
            && fs::read_link(fs_path)
                .map(|t| t.to_string_lossy().as_bytes() == data)
                .unwrap_or(false);
    }

    if !meta.is_file() || meta.file_type().is_symlink() {
        return false;
    }
    if !mode_matches(&meta, mode) {
        return false;
    }
    fs::read(fs_path).map(|bytes| bytes == data).unwrap_or(false)
}

fn mode_matches(meta: &fs::Metadata, mode: FileMode) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let is_exec = meta.mode() & 0o111 != 0;
        return is_exec == (mode == FileMode::Executable);
    }
    #[cfg(not(unix))]
    {
        let _ = (meta, mode);
        true
    }
}

#[cfg(unix)]
fn write_symlink(fs_path: &Path, target: &[u8]) -> Result<(), EngineError> {
    if fs::symlink_metadata(fs_path).is_ok() {
        fs::remove_file(fs_path)?;
    }
    let target = std::path::PathBuf::from(String::from_utf8_lossy(target).into_owned());
    std::os::unix::fs::symlink(target, fs_path)?;
    Ok(())
}

#[cfg(not(unix))]
fn write_symlink(fs_path: &Path, target: &[u8]) -> Result<(), EngineError> {
    // Without symlink support the target path is stored as file content,
    // which still round-trips through commit.
    fs::write(fs_path, target)?;
    Ok(())
}

fn set_file_mode(fs_path: &Path, mode: FileMode) -> Result<(), EngineError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let bits = if mode == FileMode::Executable {
            0o755
        } else {
            0o644
        };
        fs::set_permissions(fs_path, fs::Permissions::from_mode(bits))?;
    }
    #[cfg(not(unix))]
    {
        let _ = (fs_path, mode);
    }
    Ok(())
}

/// Rescan the working tree and assert nothing outside the expected set
/// survived the prune.
fn audit(root: &Path, expected: &Expected) -> Result<(), EngineError> {
    let residual: Vec<String> = scanner::scan_worktree(root)?
        .into_iter()
        .filter(|e| !expected.contains_key(&e.path))
        .map(|e| e.path.to_string())
        .collect();

    if residual.is_empty() {
        Ok(())
    } else {
        Err(EngineError::CheckoutIncomplete { residual })
    }
}

fn join(prefix: &BString, name: &[u8]) -> BString {
    if prefix.is_empty() {
        BString::from(name)
    } else {
        let mut p = prefix.clone();
        p.push_byte(b'/');
        p.extend_from_slice(name);
        p
    }
}
