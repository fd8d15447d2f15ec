//! Working-tree scanner.
//!
//! Depth-first enumeration of the files under a repository root. The
//! scanner never traverses into `.git`, reports the executable bit as mode
//! `100755`, and reports symlinks as mode `120000` whose content is the
//! link target.

use std::fs;
use std::path::Path;

use bstr::{BString, ByteSlice, ByteVec};
use quill_object::FileMode;

use crate::EngineError;

/// A file found in the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeEntry {
    /// Repo-relative `/`-separated path.
    pub path: BString,
    /// `100644`, `100755`, or `120000`.
    pub mode: FileMode,
}

/// Enumerate every file under `root`, excluding `.git`, sorted by path.
pub fn scan_worktree(root: &Path) -> Result<Vec<WorktreeEntry>, EngineError> {
    let mut entries = Vec::new();
    scan_dir(root, &BString::from(""), &mut entries)?;
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn scan_dir(
    dir: &Path,
    prefix: &BString,
    out: &mut Vec<WorktreeEntry>,
) -> Result<(), EngineError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name_bytes = Vec::from_os_string(entry.file_name())
            .map_err(|_| EngineError::InvalidFormat("non-unicode file name".into()))?;

        if name_bytes == b".git" {
            continue;
        }

        let rel = join(prefix, &name_bytes);
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            out.push(WorktreeEntry {
                path: rel,
                mode: FileMode::Symlink,
            });
        } else if file_type.is_dir() {
            scan_dir(&entry.path(), &rel, out)?;
        } else if file_type.is_file() {
            let mode = if is_executable(&entry.metadata()?) {
                FileMode::Executable
            } else {
                FileMode::Regular
            };
            out.push(WorktreeEntry { path: rel, mode });
        }
        // Sockets, fifos and the like are skipped.
    }
    Ok(())
}

/// Read the content a scanned entry contributes to a blob: file bytes
/// verbatim, or the target path for a symlink.
pub fn read_entry(root: &Path, entry: &WorktreeEntry) -> Result<Vec<u8>, EngineError> {
    let fs_path = quill_utils::path::to_host(root, entry.path.as_bstr());
    if entry.mode.is_symlink() {
        let target = fs::read_link(&fs_path)?;
        Ok(target.to_string_lossy().into_owned().into_bytes())
    } else {
        Ok(fs::read(&fs_path)?)
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

fn is_executable(meta: &fs::Metadata) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        return meta.mode() & 0o111 != 0;
    }
    #[cfg(not(unix))]
    {
        let _ = meta;
        false
    }
}
