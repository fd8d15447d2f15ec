use std::fs;
use std::path::Path;

use bstr::ByteSlice;
use quill_hash::ObjectId;

use crate::error::RefError;
use crate::name::RefName;

/// A single entry in the packed-refs file.
#[derive(Debug, Clone)]
pub struct PackedRef {
    pub name: RefName,
    pub oid: ObjectId,
}

/// Parsed packed-refs file.
///
/// The packed-refs file contains refs that have been "packed" from loose
/// files into a single file. Quill treats it as a read-only fallback:
/// ```text
/// # pack-refs with: peeled fully-peeled sorted
/// <hex-oid> <refname>
/// ^<hex-oid>   (peeled value of the annotated tag above — ignored)
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackedRefs {
    refs: Vec<PackedRef>,
}

impl PackedRefs {
    /// Parse a packed-refs file.
    pub fn parse(data: &[u8]) -> Result<Self, RefError> {
        let mut refs = Vec::new();

        for line in data.lines() {
            if line.is_empty() || line.starts_with(b"#") || line.starts_with(b"^") {
                continue;
            }

            let space_pos = line
                .find_byte(b' ')
                .ok_or_else(|| RefError::Parse("invalid packed-refs line".into()))?;

            let hex = std::str::from_utf8(&line[..space_pos])
                .map_err(|_| RefError::Parse("invalid UTF-8 in packed-refs OID".into()))?;
            let oid = ObjectId::from_hex(hex)
                .map_err(|e| RefError::Parse(format!("bad packed-refs oid: {e}")))?;

            let name_str = std::str::from_utf8(&line[space_pos + 1..])
                .map_err(|_| RefError::Parse("invalid UTF-8 in packed-refs name".into()))?;
            let name = RefName::new(name_str.trim())?;

            refs.push(PackedRef { name, oid });
        }

        refs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { refs })
    }

    /// Load packed-refs from disk. Returns empty if the file doesn't exist.
    pub fn load(git_dir: &Path) -> Result<Self, RefError> {
        let path = git_dir.join("packed-refs");
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read(&path).map_err(|e| RefError::IoPath {
            path: path.clone(),
            source: e,
        })?;
        Self::parse(&data)
    }

    /// Look up a ref by name.
    pub fn find(&self, name: &RefName) -> Option<&PackedRef> {
        self.refs
            .binary_search_by(|pr| pr.name.cmp(name))
            .ok()
            .map(|idx| &self.refs[idx])
    }

    /// Get all refs (sorted by name).
    pub fn refs(&self) -> &[PackedRef] {
        &self.refs
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty() {
        let packed = PackedRefs::parse(b"").unwrap();
        assert!(packed.is_empty());
    }

    #[test]
    fn parse_with_header() {
        let data = b"# pack-refs with: peeled fully-peeled sorted \n\
                     e69de29bb2d1d6434b8b29ae775ad8c2e48c5391 refs/heads/main\n";
        let packed = PackedRefs::parse(data).unwrap();
        assert_eq!(packed.refs().len(), 1);
        assert_eq!(packed.refs()[0].name.as_str(), "refs/heads/main");
    }

    #[test]
    fn peel_lines_are_ignored() {
        let data = b"# pack-refs with: peeled fully-peeled sorted \n\
                     e69de29bb2d1d6434b8b29ae775ad8c2e48c5391 refs/tags/v1.0\n\
                     ^aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\n";
        let packed = PackedRefs::parse(data).unwrap();
        assert_eq!(packed.refs().len(), 1);
        assert_eq!(
            packed.refs()[0].oid,
            ObjectId::from_hex("e69de29bb2d1d6434b8b29ae775ad8c2e48c5391").unwrap()
        );
    }

    #[test]
    fn find_by_name() {
        let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa refs/heads/alpha\n\
                     bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb refs/heads/beta\n\
                     cccccccccccccccccccccccccccccccccccccccc refs/tags/v1.0\n";
        let packed = PackedRefs::parse(data).unwrap();

        let found = packed
            .find(&RefName::new("refs/heads/beta").unwrap())
            .unwrap();
        assert_eq!(
            found.oid,
            ObjectId::from_hex("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb").unwrap()
        );

        assert!(packed
            .find(&RefName::new("refs/heads/nonexistent").unwrap())
            .is_none());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let packed = PackedRefs::load(dir.path()).unwrap();
        assert!(packed.is_empty());
    }

    #[test]
    fn malformed_line_errors() {
        assert!(PackedRefs::parse(b"nonsense-without-space\n").is_err());
    }
}
