use digest::Digest;

use crate::{HashError, ObjectId};

/// Streaming SHA-1 computation with collision detection.
///
/// Data can be fed incrementally with [`update`](Hasher::update) or through
/// the [`std::io::Write`] implementation, then finalised into an
/// [`ObjectId`].
pub struct Hasher {
    inner: Box<sha1_checked::Sha1>,
}

impl Hasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self {
            inner: Box::new(sha1_checked::Sha1::new()),
        }
    }

    /// Feed data into the hasher.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finalize and return the ObjectId.
    ///
    /// Returns an error if SHA-1 collision detection fires.
    pub fn finalize(self) -> Result<ObjectId, HashError> {
        let result = self.inner.try_finalize();
        if result.has_collision() {
            return Err(HashError::Sha1Collision);
        }
        ObjectId::from_bytes(result.hash().as_slice())
    }

    /// Convenience: hash data in one call.
    pub fn digest(data: &[u8]) -> Result<ObjectId, HashError> {
        let mut h = Self::new();
        h.update(data);
        h.finalize()
    }

    /// Hash a framed object: `"{type} {len}\0{content}"`.
    pub fn hash_object(obj_type: &str, data: &[u8]) -> Result<ObjectId, HashError> {
        let header = format!("{} {}\0", obj_type, data.len());
        let mut h = Self::new();
        h.update(header.as_bytes());
        h.update(data);
        h.finalize()
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
