//! Repository-relative paths.
//!
//! Inside the engine a path is a `/`-separated byte string relative to the
//! work tree root. Conversion to the host's `Path` type happens only at the
//! filesystem boundary.

use std::path::{Path, PathBuf};

use bstr::{BStr, BString, ByteSlice};

use crate::{Result, UtilError};

/// Normalize a caller-supplied path to repository-relative form.
///
/// Strips leading and trailing slashes and collapses empty segments.
/// Rejects `.`/`..` components, absolute escapes, and NUL bytes.
pub fn normalize(input: &BStr) -> Result<BString> {
    if input.contains(&0) {
        return Err(UtilError::InvalidPath("path contains NUL byte".into()));
    }

    let mut out = BString::new(Vec::with_capacity(input.len()));
    for segment in input.split(|&b| b == b'/') {
        if segment.is_empty() || segment == b"." {
            continue;
        }
        if segment == b".." {
            return Err(UtilError::InvalidPath(format!(
                "path escapes repository: {}",
                input.to_str_lossy()
            )));
        }
        if !out.is_empty() {
            out.push(b'/');
        }
        out.extend_from_slice(segment);
    }
    Ok(out)
}

/// Join a repository-relative byte path onto a host root directory.
pub fn to_host(root: &Path, relpath: &BStr) -> PathBuf {
    let mut out = root.to_path_buf();
    for segment in relpath.split(|&b| b == b'/') {
        if segment.is_empty() {
            continue;
        }
        out.push(segment.to_str_lossy().as_ref());
    }
    out
}

/// The parent of a repository-relative path, if any.
pub fn parent(relpath: &BStr) -> Option<&BStr> {
    relpath
        .rfind_byte(b'/')
        .map(|pos| relpath[..pos].as_bstr())
}

/// The final component of a repository-relative path.
pub fn file_name(relpath: &BStr) -> &BStr {
    match relpath.rfind_byte(b'/') {
        Some(pos) => relpath[pos + 1..].as_bstr(),
        None => relpath,
    }
}
