use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use quill_hash::ObjectId;
use quill_utils::lockfile::LockFile;

use crate::error::RefError;
use crate::name::RefName;
use crate::Reference;

/// Read a loose ref file and return the Reference.
///
/// A loose ref is a file under `.git/refs/` (or `.git/HEAD`) containing
/// either a hex OID or `ref: <target-ref>`.
pub(crate) fn read_loose_ref(
    git_dir: &Path,
    name: &RefName,
) -> Result<Option<Reference>, RefError> {
    let path = loose_ref_path(git_dir, name);
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read(&path).map_err(|e| RefError::IoPath {
        path: path.clone(),
        source: e,
    })?;

    let trimmed = contents.trim();

    if let Some(target_name) = trimmed.strip_prefix(b"ref: ") {
        let target_str = std::str::from_utf8(target_name.trim())
            .map_err(|_| RefError::Parse("invalid UTF-8 in symbolic ref target".into()))?;
        let target = RefName::new(target_str)?;
        Ok(Some(Reference::Symbolic {
            name: name.clone(),
            target,
        }))
    } else {
        let hex = std::str::from_utf8(trimmed)
            .map_err(|_| RefError::Parse("invalid UTF-8 in ref OID".into()))?;
        let oid = ObjectId::from_hex(hex)
            .map_err(|e| RefError::Parse(format!("bad ref content in {}: {e}", name)))?;
        Ok(Some(Reference::Direct {
            name: name.clone(),
            target: oid,
        }))
    }
}

/// Write a loose ref file atomically using a lock file.
pub(crate) fn write_loose_ref(
    git_dir: &Path,
    name: &RefName,
    oid: &ObjectId,
) -> Result<(), RefError> {
    let path = loose_ref_path(git_dir, name);

    if let Some(parent) = path.parent() {
        check_dir_file_conflict(git_dir, name)?;
        fs::create_dir_all(parent).map_err(|e| RefError::IoPath {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut lock = LockFile::acquire(&path)?;
    let content = format!("{}\n", oid.to_hex());
    lock.write_all(content.as_bytes())
        .map_err(|e| RefError::IoPath {
            path: path.clone(),
            source: e,
        })?;
    lock.commit()?;
    Ok(())
}

/// Write a symbolic ref file atomically.
pub(crate) fn write_symbolic_ref(
    git_dir: &Path,
    name: &RefName,
    target: &RefName,
) -> Result<(), RefError> {
    let path = loose_ref_path(git_dir, name);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| RefError::IoPath {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut lock = LockFile::acquire(&path)?;
    let content = format!("ref: {}\n", target);
    lock.write_all(content.as_bytes())
        .map_err(|e| RefError::IoPath {
            path: path.clone(),
            source: e,
        })?;
    lock.commit()?;
    Ok(())
}

/// Delete a loose ref file, pruning parent directories that become empty.
pub(crate) fn delete_loose_ref(git_dir: &Path, name: &RefName) -> Result<(), RefError> {
    let path = loose_ref_path(git_dir, name);
    if path.exists() {
        fs::remove_file(&path).map_err(|e| RefError::IoPath {
            path: path.clone(),
            source: e,
        })?;

        let refs_dir = git_dir.join("refs");
        let mut dir = path.parent().map(|p| p.to_path_buf());
        while let Some(d) = dir {
            if d == refs_dir || d == *git_dir {
                break;
            }
            if d.read_dir().map(|mut e| e.next().is_none()).unwrap_or(false) {
                let _ = fs::remove_dir(&d);
                dir = d.parent().map(|p| p.to_path_buf());
            } else {
                break;
            }
        }
    }
    Ok(())
}

/// Check for directory/file conflicts when creating a ref.
///
/// If `refs/heads/main` exists as a file, `refs/heads/main/sub` cannot be
/// created because `main` would need to be a directory, and vice versa.
fn check_dir_file_conflict(git_dir: &Path, name: &RefName) -> Result<(), RefError> {
    let ref_path = loose_ref_path(git_dir, name);

    let mut current = git_dir.to_path_buf();
    for component in name.as_str().split('/') {
        current = current.join(component);
        if current == ref_path {
            break;
        }
        if current.is_file() {
            return Err(RefError::DirectoryConflict {
                name: name.to_string(),
                conflict: current
                    .strip_prefix(git_dir)
                    .unwrap_or(&current)
                    .display()
                    .to_string(),
            });
        }
    }

    if ref_path.is_dir() {
        return Err(RefError::DirectoryConflict {
            name: name.to_string(),
            conflict: format!(
                "{} (is a directory)",
                ref_path
                    .strip_prefix(git_dir)
                    .unwrap_or(&ref_path)
                    .display()
            ),
        });
    }

    Ok(())
}

/// Enumerate all loose refs under a given prefix (e.g. `refs/heads/`).
///
/// Returns (RefName, file path) pairs sorted by ref name.
pub(crate) fn enumerate_loose_refs(
    git_dir: &Path,
    prefix: &str,
) -> Result<Vec<(RefName, PathBuf)>, RefError> {
    let refs_base = git_dir.join("refs");
    let sub = prefix.strip_prefix("refs/").unwrap_or(prefix);
    let search_dir = if sub.is_empty() {
        refs_base
    } else {
        refs_base.join(sub.trim_end_matches('/'))
    };

    let mut result = Vec::new();
    if search_dir.is_dir() {
        collect_loose_refs_recursive(git_dir, &search_dir, prefix, &mut result)?;
    }
    result.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(result)
}

fn collect_loose_refs_recursive(
    git_dir: &Path,
    dir: &Path,
    prefix: &str,
    result: &mut Vec<(RefName, PathBuf)>,
) -> Result<(), RefError> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(RefError::IoPath {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    for entry in entries {
        let entry = entry.map_err(|e| RefError::IoPath {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_loose_refs_recursive(git_dir, &path, prefix, result)?;
        } else if path.is_file() {
            let rel_path = path
                .strip_prefix(git_dir)
                .map_err(|_| RefError::Parse("cannot determine ref name from path".into()))?;

            let Some(name_str) = rel_path.to_str() else {
                continue;
            };

            // Skip stale lock files.
            if name_str.ends_with(".lock") {
                continue;
            }

            if let Ok(name) = RefName::new(name_str) {
                if name.as_str().starts_with(prefix) {
                    result.push((name, path));
                }
            }
        }
    }

    Ok(())
}

/// Get the file system path for a loose ref.
pub(crate) fn loose_ref_path(git_dir: &Path, name: &RefName) -> PathBuf {
    git_dir.join(name.as_str())
}
