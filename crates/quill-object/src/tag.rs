use bstr::{BStr, BString};
use quill_hash::ObjectId;
use quill_utils::date::Signature;

use crate::{ObjectError, ObjectType};

/// An annotated tag object.
///
/// Quill reads annotated tags found in foreign repositories but never
/// creates them; its own tags are plain refs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// OID of the tagged object.
    pub target: ObjectId,
    /// Type of the tagged object.
    pub target_type: ObjectType,
    /// Tag name.
    pub tag_name: BString,
    /// Tagger identity and timestamp (absent in some ancient tags).
    pub tagger: Option<Signature>,
    /// Tag message.
    pub message: BString,
}

impl Tag {
    /// Parse tag content from raw bytes (no object header).
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut target: Option<ObjectId> = None;
        let mut target_type: Option<ObjectType> = None;
        let mut tag_name: Option<BString> = None;
        let mut tagger: Option<Signature> = None;

        let data = content;
        let mut pos = 0;

        loop {
            if pos >= data.len() {
                break;
            }

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
                    b"object" => {
                        let hex = std::str::from_utf8(value).map_err(|_| {
                            ObjectError::InvalidHeader("non-UTF8 target OID".into())
                        })?;
                        target = Some(ObjectId::from_hex(hex)?);
                    }
                    b"type" => {
                        target_type = Some(ObjectType::from_bytes(value)?);
                    }
                    b"tag" => {
                        tag_name = Some(BString::from(value));
                    }
                    b"tagger" => {
                        tagger = Some(
                            Signature::parse(BStr::new(value))
                                .map_err(|e| ObjectError::InvalidSignature(e.to_string()))?,
                        );
                    }
                    _ => {
                        // Skip unknown headers.
                    }
                }
            }

            pos = line_end + 1;
        }

        let target = target.ok_or(ObjectError::MissingTagField { field: "object" })?;
        let target_type = target_type.ok_or(ObjectError::MissingTagField { field: "type" })?;
        let tag_name = tag_name.ok_or(ObjectError::MissingTagField { field: "tag" })?;
        let message = BString::from(&data[pos..]);

        Ok(Self {
            target,
            target_type,
            tag_name,
            tagger,
            message,
        })
    }

    /// Serialize tag content to bytes (no object header).
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend_from_slice(b"object ");
        out.extend_from_slice(self.target.to_hex().as_bytes());
        out.push(b'\n');

        out.extend_from_slice(b"type ");
        out.extend_from_slice(self.target_type.as_bytes());
        out.push(b'\n');

        out.extend_from_slice(b"tag ");
        out.extend_from_slice(&self.tag_name);
        out.push(b'\n');

        if let Some(ref tagger) = self.tagger {
            out.extend_from_slice(b"tagger ");
            out.extend_from_slice(&tagger.to_bytes());
            out.push(b'\n');
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tag_bytes() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"object 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n");
        out.extend_from_slice(b"type commit\n");
        out.extend_from_slice(b"tag v1.0\n");
        out.extend_from_slice(b"tagger A <a@b.com> 1234567890 +0000\n");
        out.extend_from_slice(b"\nRelease 1.0\n");
        out
    }

    #[test]
    fn parse_tag() {
        let tag = Tag::parse(&sample_tag_bytes()).unwrap();
        assert_eq!(tag.tag_name, "v1.0");
        assert_eq!(tag.target_type, ObjectType::Commit);
        assert_eq!(tag.message, "Release 1.0\n");
        assert!(tag.tagger.is_some());
    }

    #[test]
    fn serialize_roundtrip() {
        let bytes = sample_tag_bytes();
        let tag = Tag::parse(&bytes).unwrap();
        assert_eq!(tag.serialize_content(), bytes);
    }

    #[test]
    fn missing_object_errors() {
        assert!(Tag::parse(b"type commit\ntag v1\n\nmsg\n").is_err());
    }
}
