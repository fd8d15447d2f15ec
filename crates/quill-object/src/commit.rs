use bstr::{BStr, BString, ByteSlice};
use quill_hash::ObjectId;
use quill_utils::date::Signature;

use crate::ObjectError;

/// A commit object.
///
/// Headers are serialized in fixed order: `tree`, `parent`*, `author`,
/// `committer`, then a blank line and the message. Unknown headers (gpgsig
/// and friends from foreign repositories) are tolerated on parse and
/// dropped; quill never writes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// OID of the root tree.
    pub tree: ObjectId,
    /// Parent commit OIDs (empty for a root commit).
    pub parents: Vec<ObjectId>,
    /// Author identity and timestamp.
    pub author: Signature,
    /// Committer identity and timestamp.
    pub committer: Signature,
    /// Commit message (everything after the blank line separator).
    pub message: BString,
}

impl Commit {
    /// Parse commit content from raw bytes (no object header).
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut tree: Option<ObjectId> = None;
        let mut parents = Vec::new();
        let mut author: Option<Signature> = None;
        let mut committer: Option<Signature> = None;

        let data = content;
        let mut pos = 0;

        // Parse headers (lines before the blank line).
        loop {
            if pos >= data.len() {
                // No message (unusual but possible).
                break;
            }

            // A blank line separates headers from message.
            if data[pos] == b'\n' {
                pos += 1;
                break;
            }

            let line_end = data[pos..]
                .iter()
                .position(|&b| b == b'\n')
                .map(|p| p + pos)
                .unwrap_or(data.len());

            let line = &data[pos..line_end];

            if let Some(space_pos) = line.iter().position(|&b| b == b' ') {
                let key = &line[..space_pos];
                let value = &line[space_pos + 1..];

                match key {
                    b"tree" => {
                        let hex = std::str::from_utf8(value)
                            .map_err(|_| ObjectError::InvalidHeader("non-UTF8 tree OID".into()))?;
                        tree = Some(ObjectId::from_hex(hex)?);
                    }
                    b"parent" => {
                        let hex = std::str::from_utf8(value).map_err(|_| {
                            ObjectError::InvalidHeader("non-UTF8 parent OID".into())
                        })?;
                        parents.push(ObjectId::from_hex(hex)?);
                    }
                    b"author" => {
                        author = Some(parse_signature(value)?);
                    }
                    b"committer" => {
                        committer = Some(parse_signature(value)?);
                    }
                    _ => {
                        // Unknown header — skip it along with any
                        // space-prefixed continuation lines (gpgsig etc.).
                        let mut next = line_end + 1;
                        while next < data.len() && data[next] == b' ' {
                            let cont_end = data[next..]
                                .iter()
                                .position(|&b| b == b'\n')
                                .map(|p| p + next)
                                .unwrap_or(data.len());
                            next = cont_end + 1;
                        }
                        pos = next;
                        continue;
                    }
                }
            }

            pos = line_end + 1;
        }

        let tree = tree.ok_or(ObjectError::MissingCommitField { field: "tree" })?;
        let author = author.ok_or(ObjectError::MissingCommitField { field: "author" })?;
        let committer = committer.ok_or(ObjectError::MissingCommitField { field: "committer" })?;

        let message = BString::from(&data[pos..]);

        Ok(Self {
            tree,
            parents,
            author,
            committer,
            message,
        })
    }

    /// Serialize commit content to bytes (no object header).
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(b"tree ");
        out.extend_from_slice(self.tree.to_hex().as_bytes());
        out.push(b'\n');

        for parent in &self.parents {
            out.extend_from_slice(b"parent ");
            out.extend_from_slice(parent.to_hex().as_bytes());
            out.push(b'\n');
        }

        out.extend_from_slice(b"author ");
        out.extend_from_slice(&self.author.to_bytes());
        out.push(b'\n');

        out.extend_from_slice(b"committer ");
        out.extend_from_slice(&self.committer.to_bytes());
        out.push(b'\n');

        out.push(b'\n');
        out.extend_from_slice(&self.message);

        out
    }

    /// Get the first parent (or None for root commits).
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    /// Is this a merge commit? (more than one parent)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Is this a root commit? (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Get just the summary (first line) of the message.
    pub fn summary(&self) -> &BStr {
        let msg: &[u8] = self.message.as_ref();
        match msg.find_byte(b'\n') {
            Some(pos) => BStr::new(&msg[..pos]),
            None => BStr::new(msg),
        }
    }
}

fn parse_signature(data: &[u8]) -> Result<Signature, ObjectError> {
    Signature::parse(BStr::new(data)).map_err(|e| ObjectError::InvalidSignature(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_commit_bytes() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n");
        out.extend_from_slice(b"parent 0000000000000000000000000000000000000001\n");
        out.extend_from_slice(b"author John Doe <john@example.com> 1234567890 +0000\n");
        out.extend_from_slice(b"committer Jane Doe <jane@example.com> 1234567890 +0000\n");
        out.extend_from_slice(b"\n");
        out.extend_from_slice(b"Initial commit\n");
        out
    }

    #[test]
    fn parse_commit() {
        let commit = Commit::parse(&sample_commit_bytes()).unwrap();
        assert_eq!(
            commit.tree.to_hex(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
        assert_eq!(commit.parents.len(), 1);
        assert_eq!(commit.author.name, "John Doe");
        assert_eq!(commit.committer.email, "jane@example.com");
        assert_eq!(commit.message, "Initial commit\n");
    }

    #[test]
    fn parse_root_commit() {
        let mut data = Vec::new();
        data.extend_from_slice(b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n");
        data.extend_from_slice(b"author A <a@b.com> 1000000000 +0000\n");
        data.extend_from_slice(b"committer A <a@b.com> 1000000000 +0000\n");
        data.extend_from_slice(b"\nroot\n");

        let commit = Commit::parse(&data).unwrap();
        assert!(commit.is_root());
        assert!(!commit.is_merge());
    }

    #[test]
    fn parse_merge_commit() {
        let mut data = Vec::new();
        data.extend_from_slice(b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n");
        data.extend_from_slice(b"parent 0000000000000000000000000000000000000001\n");
        data.extend_from_slice(b"parent 0000000000000000000000000000000000000002\n");
        data.extend_from_slice(b"author A <a@b.com> 1000000000 +0000\n");
        data.extend_from_slice(b"committer A <a@b.com> 1000000000 +0000\n");
        data.extend_from_slice(b"\nMerge\n");

        let commit = Commit::parse(&data).unwrap();
        assert!(commit.is_merge());
        assert_eq!(commit.parents.len(), 2);
    }

    #[test]
    fn serialize_roundtrip() {
        let original_bytes = sample_commit_bytes();
        let commit = Commit::parse(&original_bytes).unwrap();
        assert_eq!(commit.serialize_content(), original_bytes);
    }

    #[test]
    fn unknown_headers_are_skipped() {
        let mut data = Vec::new();
        data.extend_from_slice(b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n");
        data.extend_from_slice(b"author A <a@b.com> 1000000000 +0000\n");
        data.extend_from_slice(b"committer A <a@b.com> 1000000000 +0000\n");
        data.extend_from_slice(b"gpgsig -----BEGIN PGP SIGNATURE-----\n");
        data.extend_from_slice(b" line two of signature\n");
        data.extend_from_slice(b" -----END PGP SIGNATURE-----\n");
        data.extend_from_slice(b"\nsigned\n");

        let commit = Commit::parse(&data).unwrap();
        assert_eq!(commit.message, "signed\n");
    }

    #[test]
    fn summary_is_first_line() {
        let commit = Commit::parse(&sample_commit_bytes()).unwrap();
        assert_eq!(commit.summary(), "Initial commit");
    }

    #[test]
    fn missing_tree_errors() {
        let data =
            b"author A <a@b.com> 1000000000 +0000\ncommitter A <a@b.com> 1000000000 +0000\n\nmsg\n";
        assert!(Commit::parse(data).is_err());
    }

    #[test]
    fn missing_committer_errors() {
        let data = b"tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904\nauthor A <a@b.com> 1 +0000\n\nmsg\n";
        assert!(Commit::parse(data).is_err());
    }
}
