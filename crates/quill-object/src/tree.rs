//! Tree objects: ordered directory snapshots.
//!
//! The binary form is a concatenation of `"<octal-mode> <name>\0"` followed
//! by the raw 20-byte oid, one run per entry, with entries in git's sort
//! order: byte-wise over the name, where a directory's name is compared as
//! if it ended in `/`.

use std::cmp::Ordering;

use bstr::{BStr, BString, ByteSlice};
use quill_hash::ObjectId;

use crate::ObjectError;

/// Bytes of raw oid trailing each entry.
const OID_LEN: usize = 20;

/// File mode recorded for a tree entry.
///
/// Four modes occur in trees quill writes; any other value read from a
/// foreign repository is kept numerically so the tree re-hashes to its
/// original identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    /// Regular file (100644)
    Regular,
    /// Executable file (100755)
    Executable,
    /// Symbolic link (120000)
    Symlink,
    /// Subdirectory (40000)
    Tree,
    /// Anything else, preserved for round-trip
    Unknown(u32),
}

impl FileMode {
    /// Classify a raw numeric mode.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0o100644 => Self::Regular,
            0o100755 => Self::Executable,
            0o120000 => Self::Symlink,
            0o040000 => Self::Tree,
            other => Self::Unknown(other),
        }
    }

    /// Parse the octal ASCII form that precedes the space in an entry.
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        std::str::from_utf8(s)
            .ok()
            .filter(|text| !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|text| u32::from_str_radix(text, 8).ok())
            .map(Self::from_raw)
            .ok_or_else(|| ObjectError::InvalidFileMode(String::from_utf8_lossy(s).into()))
    }

    /// The raw numeric mode.
    pub fn raw(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Executable => 0o100755,
            Self::Symlink => 0o120000,
            Self::Tree => 0o040000,
            Self::Unknown(raw) => *raw,
        }
    }

    /// The octal ASCII form written into trees. Directory mode carries no
    /// leading zero (`40000`); file modes keep their leading `1`.
    pub fn as_bytes(&self) -> BString {
        match self {
            Self::Regular => "100644".into(),
            Self::Executable => "100755".into(),
            Self::Symlink => "120000".into(),
            Self::Tree => "40000".into(),
            Self::Unknown(raw) => format!("{raw:o}").into(),
        }
    }

    /// Is this a tree (directory) entry?
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree)
    }

    /// Is this a blob (file) entry?
    pub fn is_blob(&self) -> bool {
        matches!(self, Self::Regular | Self::Executable)
    }

    /// Is this a symlink?
    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }
}

/// One `(mode, name, oid)` row of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub name: BString,
    pub oid: ObjectId,
}

impl TreeEntry {
    /// The byte sequence this entry sorts by: its name, with `/` appended
    /// when the entry is a directory. Trees are ordered by this key rather
    /// than the bare name, so `foo` (a directory) lands after `foo.c` but
    /// a file named `foo` lands before it.
    fn sort_key(&self) -> impl Iterator<Item = u8> + '_ {
        self.name
            .iter()
            .copied()
            .chain(self.mode.is_tree().then_some(b'/'))
    }
}

impl Ord for TreeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(other.sort_key())
    }
}

impl PartialOrd for TreeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A tree object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse tree content (no object header). The empty tree is valid.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut rest = content;

        while !rest.is_empty() {
            let offset = content.len() - rest.len();

            let (mode_bytes, after_mode) = rest
                .split_once_str(" ")
                .ok_or_else(|| malformed(offset, "mode is not followed by a space"))?;
            let mode = FileMode::from_bytes(mode_bytes)
                .map_err(|_| malformed(offset, "unparseable mode"))?;

            let name_end = after_mode
                .find_byte(0)
                .ok_or_else(|| malformed(offset, "name is not NUL-terminated"))?;
            let name = &after_mode[..name_end];
            if name.is_empty() {
                return Err(malformed(offset, "empty entry name"));
            }

            let oid_bytes = after_mode
                .get(name_end + 1..name_end + 1 + OID_LEN)
                .ok_or_else(|| malformed(offset, "oid is truncated"))?;
            let oid = ObjectId::from_bytes(oid_bytes)?;

            entries.push(TreeEntry {
                mode,
                name: name.into(),
                oid,
            });
            rest = &after_mode[name_end + 1 + OID_LEN..];
        }

        Ok(Self { entries })
    }

    /// Serialize to the canonical binary form, entries in sort order.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut ordered: Vec<&TreeEntry> = self.entries.iter().collect();
        ordered.sort();

        let mut out = Vec::with_capacity(self.entries.len() * (8 + OID_LEN));
        for entry in ordered {
            out.extend_from_slice(&entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.name);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    /// Put the in-memory entries into canonical order.
    pub fn sort(&mut self) {
        self.entries.sort();
    }

    /// Look up an entry by exact name.
    pub fn find(&self, name: &BStr) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_bstr() == name)
    }

    /// Iterate entries in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn malformed(offset: usize, reason: &str) -> ObjectError {
    ObjectError::InvalidTreeEntry {
        offset,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, mode: FileMode) -> TreeEntry {
        TreeEntry {
            mode,
            name: BString::from(name),
            oid: ObjectId::NULL,
        }
    }

    #[test]
    fn mode_octal_forms() {
        assert_eq!(FileMode::from_bytes(b"100644").unwrap(), FileMode::Regular);
        assert_eq!(FileMode::from_bytes(b"100755").unwrap(), FileMode::Executable);
        assert_eq!(FileMode::from_bytes(b"120000").unwrap(), FileMode::Symlink);
        // With or without the leading zero.
        assert_eq!(FileMode::from_bytes(b"40000").unwrap(), FileMode::Tree);
        assert_eq!(FileMode::from_bytes(b"040000").unwrap(), FileMode::Tree);
    }

    #[test]
    fn mode_rejects_garbage() {
        assert!(FileMode::from_bytes(b"").is_err());
        assert!(FileMode::from_bytes(b"+0644").is_err());
        assert!(FileMode::from_bytes(b"10x644").is_err());
        // 8 and 9 are not octal digits.
        assert!(FileMode::from_bytes(b"100948").is_err());
    }

    #[test]
    fn mode_written_without_leading_zero_for_dirs() {
        assert_eq!(FileMode::Tree.as_bytes(), "40000");
        assert_eq!(FileMode::Regular.as_bytes(), "100644");
    }

    #[test]
    fn foreign_mode_round_trips_numerically() {
        let gitlink = FileMode::from_bytes(b"160000").unwrap();
        assert_eq!(gitlink, FileMode::Unknown(0o160000));
        assert_eq!(gitlink.as_bytes(), "160000");
        assert!(!gitlink.is_blob());
        assert!(!gitlink.is_tree());
    }

    #[test]
    fn mode_predicates() {
        assert!(FileMode::Tree.is_tree());
        assert!(FileMode::Regular.is_blob() && FileMode::Executable.is_blob());
        assert!(FileMode::Symlink.is_symlink());
        assert!(!FileMode::Symlink.is_blob());
    }

    #[test]
    fn directories_sort_with_implicit_slash() {
        let mut tree = Tree {
            entries: vec![
                entry("foo.c", FileMode::Regular),
                entry("foo", FileMode::Tree),
                entry("foo-bar", FileMode::Regular),
            ],
        };
        tree.sort();
        let names: Vec<&BString> = tree.entries.iter().map(|e| &e.name).collect();
        // '-' < '.' < '/', so the directory comes last.
        assert_eq!(names, ["foo-bar", "foo.c", "foo"]);
    }

    #[test]
    fn file_sorts_before_identically_named_directory() {
        let mut tree = Tree {
            entries: vec![entry("x", FileMode::Tree), entry("x", FileMode::Regular)],
        };
        tree.sort();
        assert!(!tree.entries[0].mode.is_tree());
        assert!(tree.entries[1].mode.is_tree());
    }

    #[test]
    fn empty_tree_parses_and_serializes() {
        let tree = Tree::parse(b"").unwrap();
        assert!(tree.is_empty());
        assert!(tree.serialize_content().is_empty());
    }

    #[test]
    fn parse_one_entry() {
        let oid = ObjectId::from_hex("45b983be36b73c0788dc9cbcb76cbb80fc7bb057").unwrap();
        let mut raw = b"100755 run with space.sh\0".to_vec();
        raw.extend_from_slice(oid.as_bytes());

        let tree = Tree::parse(&raw).unwrap();
        assert_eq!(tree.len(), 1);
        let e = &tree.entries[0];
        assert_eq!(e.mode, FileMode::Executable);
        // Names may contain spaces; only the first space delimits the mode.
        assert_eq!(e.name, "run with space.sh");
        assert_eq!(e.oid, oid);
    }

    #[test]
    fn parse_failures() {
        // No space after the mode.
        assert!(Tree::parse(b"100644name").is_err());
        // Name never NUL-terminated.
        assert!(Tree::parse(b"100644 name-without-nul").is_err());
        // Empty name.
        let mut raw = b"100644 \0".to_vec();
        raw.extend_from_slice(&[0u8; OID_LEN]);
        assert!(Tree::parse(&raw).is_err());
        // Truncated oid.
        assert!(Tree::parse(b"100644 f\0shortoid").is_err());
    }

    #[test]
    fn serialize_orders_and_round_trips() {
        let oid_a = ObjectId::from_hex("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391").unwrap();
        let oid_b = ObjectId::from_hex("4b825dc642cb6eb9a060e54bf8d69288fbee4904").unwrap();
        let tree = Tree {
            entries: vec![
                entry("zzz.txt", FileMode::Regular),
                TreeEntry {
                    mode: FileMode::Tree,
                    name: BString::from("aaa"),
                    oid: oid_b,
                },
                TreeEntry {
                    mode: FileMode::Regular,
                    name: BString::from("mmm"),
                    oid: oid_a,
                },
            ],
        };

        let raw = tree.serialize_content();
        let reparsed = Tree::parse(&raw).unwrap();
        let names: Vec<&BString> = reparsed.entries.iter().map(|e| &e.name).collect();
        assert_eq!(names, ["aaa", "mmm", "zzz.txt"]);
        // Serializing the parsed form reproduces the bytes.
        assert_eq!(reparsed.serialize_content(), raw);
    }

    #[test]
    fn find_is_exact_match() {
        let tree = Tree {
            entries: vec![entry("README", FileMode::Regular)],
        };
        assert!(tree.find(BStr::new("README")).is_some());
        assert!(tree.find(BStr::new("readme")).is_none());
        assert!(tree.find(BStr::new("READ")).is_none());
    }
}
