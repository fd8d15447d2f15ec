use crate::ObjectError;

/// A blob object: a file's bytes, stored verbatim.
///
/// Blobs carry no structure of their own; framing and identity come
/// entirely from the object header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Blob content never fails to parse: every byte sequence is valid.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        Ok(Self::new(content.to_vec()))
    }

    pub fn serialize_content(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<Vec<u8>> for Blob {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_bytes_are_a_valid_blob() {
        for content in [&b""[..], b"text\n", b"\x00\xff\x00binary"] {
            let blob = Blob::parse(content).unwrap();
            assert_eq!(blob.serialize_content(), content);
            assert_eq!(blob.len(), content.len());
        }
    }

    #[test]
    fn from_vec() {
        let blob: Blob = b"payload".to_vec().into();
        assert!(!blob.is_empty());
        assert_eq!(blob.data, b"payload");
    }
}
