use std::fmt;

use bstr::{BStr, BString, ByteSlice};

use crate::error::RefError;

/// A validated reference name.
///
/// Enforces the rules from `git-check-ref-format(1)` that this engine can
/// hit:
/// - No double dots `..`
/// - No ASCII control characters or space, `~`, `^`, `:`, `?`, `*`, `[`, `\`
/// - Cannot begin or end with `/`, or contain `//`
/// - Cannot end with `.` or `.lock`
/// - Cannot contain `@{` or a NUL byte
/// - Must contain a `/` unless it is HEAD
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefName(BString);

/// Characters forbidden anywhere in a ref name.
const FORBIDDEN_CHARS: &[u8] = b" ~^:?*[\\";

impl RefName {
    /// Create and validate a ref name.
    pub fn new(name: impl Into<BString>) -> Result<Self, RefError> {
        let name = name.into();
        validate_ref_name(&name)?;
        Ok(Self(name))
    }

    /// The distinguished HEAD ref.
    pub fn head() -> Self {
        Self(BString::from("HEAD"))
    }

    /// Build `refs/heads/<branch>` from a short branch name.
    pub fn branch(short: &str) -> Result<Self, RefError> {
        Self::new(format!("refs/heads/{short}"))
    }

    /// Build `refs/tags/<tag>` from a short tag name.
    pub fn tag(short: &str) -> Result<Self, RefError> {
        Self::new(format!("refs/tags/{short}"))
    }

    /// Build `refs/remotes/<remote>/<branch>`.
    pub fn remote(remote: &str, branch: &str) -> Result<Self, RefError> {
        Self::new(format!("refs/remotes/{remote}/{branch}"))
    }

    /// Get the short name (e.g., `main` from `refs/heads/main`).
    pub fn short_name(&self) -> &BStr {
        let s = self.0.as_bstr();
        if let Some(rest) = s.strip_prefix(b"refs/heads/") {
            rest.as_bstr()
        } else if let Some(rest) = s.strip_prefix(b"refs/tags/") {
            rest.as_bstr()
        } else if let Some(rest) = s.strip_prefix(b"refs/remotes/") {
            rest.as_bstr()
        } else {
            s
        }
    }

    /// Is this under `refs/heads/`?
    pub fn is_branch(&self) -> bool {
        self.0.starts_with(b"refs/heads/")
    }

    /// Is this under `refs/tags/`?
    pub fn is_tag(&self) -> bool {
        self.0.starts_with(b"refs/tags/")
    }

    /// Is this HEAD?
    pub fn is_head(&self) -> bool {
        self.0 == "HEAD"
    }

    /// Get as a string slice (ref names are always valid UTF-8 in practice).
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("<invalid-utf8>")
    }
}

impl fmt::Display for RefName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a ref name per git-check-ref-format rules.
fn validate_ref_name(name: &[u8]) -> Result<(), RefError> {
    let name_str = || String::from_utf8_lossy(name).into_owned();

    if name.is_empty() {
        return Err(RefError::InvalidName("empty ref name".into()));
    }

    if name == b"HEAD" {
        return Ok(());
    }

    if name.starts_with(b"/") || name.ends_with(b"/") {
        return Err(RefError::InvalidName(name_str()));
    }
    if name.find(b"//").is_some() || name.find(b"..").is_some() {
        return Err(RefError::InvalidName(name_str()));
    }
    if name.ends_with(b".") || name.ends_with(b".lock") {
        return Err(RefError::InvalidName(name_str()));
    }
    if name.find(b"@{").is_some() || name == b"@" {
        return Err(RefError::InvalidName(name_str()));
    }
    for &b in name {
        if b < 0x20 || b == 0x7f || FORBIDDEN_CHARS.contains(&b) {
            return Err(RefError::InvalidName(name_str()));
        }
    }
    // Components may not start with a dot.
    for component in name.split(|&b| b == b'/') {
        if component.starts_with(b".") {
            return Err(RefError::InvalidName(name_str()));
        }
    }
    if !name.contains(&b'/') {
        return Err(RefError::InvalidName(format!(
            "{} (full ref name required)",
            name_str()
        )));
    }

    Ok(())
}
