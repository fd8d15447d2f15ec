//! Index entry types: IndexEntry and StatData.

use bstr::BString;
use quill_hash::ObjectId;
use quill_object::FileMode;

/// A single entry in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// File path (relative to repo root, `/`-separated).
    pub path: BString,
    /// Object ID of the blob.
    pub oid: ObjectId,
    /// File mode.
    pub mode: FileMode,
    /// Stat data from the file system.
    pub stat: StatData,
    /// CE_VALID: assume the entry is unchanged.
    pub assume_valid: bool,
}

/// File system stat data cached in the index.
///
/// All fields are truncated to 32 bits on disk; a value of zero means
/// "unknown" and is excluded from comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatData {
    pub ctime_secs: u32,
    pub ctime_nsecs: u32,
    pub mtime_secs: u32,
    pub mtime_nsecs: u32,
    pub dev: u32,
    pub ino: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl StatData {
    /// Create from file system metadata.
    #[cfg(unix)]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            ctime_secs: meta.ctime() as u32,
            ctime_nsecs: meta.ctime_nsec() as u32,
            mtime_secs: meta.mtime() as u32,
            mtime_nsecs: meta.mtime_nsec() as u32,
            dev: meta.dev() as u32,
            ino: meta.ino() as u32,
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.len() as u32,
        }
    }

    /// Create from file system metadata (non-Unix fallback).
    #[cfg(not(unix))]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::time::UNIX_EPOCH;
        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .unwrap_or_default();
        Self {
            ctime_secs: mtime.as_secs() as u32,
            ctime_nsecs: mtime.subsec_nanos(),
            mtime_secs: mtime.as_secs() as u32,
            mtime_nsecs: mtime.subsec_nanos(),
            dev: 0,
            ino: 0,
            uid: 0,
            gid: 0,
            size: meta.len() as u32,
        }
    }

    /// Check whether stat data matches file metadata.
    ///
    /// This is only a fast-path hint: truncation to 32 bits can alias, so a
    /// mismatch must be confirmed by hashing the content before a file is
    /// reported modified. Zero fields are treated as unknown and skipped.
    pub fn matches(&self, meta: &std::fs::Metadata) -> bool {
        let other = Self::from_metadata(meta);

        if self.size != other.size {
            return false;
        }
        if self.mtime_secs != other.mtime_secs || self.mtime_nsecs != other.mtime_nsecs {
            return false;
        }
        if self.ctime_secs != 0
            && other.ctime_secs != 0
            && (self.ctime_secs != other.ctime_secs || self.ctime_nsecs != other.ctime_nsecs)
        {
            return false;
        }
        if self.ino != 0 && other.ino != 0 && self.ino != other.ino {
            return false;
        }
        if self.dev != 0 && other.dev != 0 && self.dev != other.dev {
            return false;
        }
        if self.uid != 0 && other.uid != 0 && self.uid != other.uid {
            return false;
        }
        if self.gid != 0 && other.gid != 0 && self.gid != other.gid {
            return false;
        }

        true
    }
}
