use std::fs;
use std::io::Read;

use flate2::read::ZlibDecoder;
use quill_hash::hasher::Hasher;
use quill_hash::ObjectId;
use quill_object::header;
use quill_object::{Object, ObjectType};

use crate::{ObjectStore, StoreError};

impl ObjectStore {
    /// Check if a loose object exists.
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Read a loose object by OID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    /// Returns `Err` if the object exists but is corrupt.
    pub fn read(&self, oid: &ObjectId) -> Result<Option<Object>, StoreError> {
        let path = self.object_path(oid);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let decompressed = decompress_all(&compressed, oid)?;
        let obj = Object::parse(&decompressed)?;
        Ok(Some(obj))
    }

    /// Read an object, failing with `NotFound` when it is missing.
    pub fn read_required(&self, oid: &ObjectId) -> Result<Object, StoreError> {
        self.read_cached(oid)?.ok_or(StoreError::NotFound(*oid))
    }

    /// Read just the header (type + size) without decompressing the full content.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    pub fn read_header(
        &self,
        oid: &ObjectId,
    ) -> Result<Option<(ObjectType, usize)>, StoreError> {
        let path = self.object_path(oid);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        // Decompress just enough to read the header (type + size + null byte).
        // Headers are typically < 32 bytes, so 64 is plenty of room.
        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut buf = [0u8; 64];
        let mut filled = 0;

        loop {
            if filled >= buf.len() {
                return Err(StoreError::Corrupt {
                    oid: oid.to_hex(),
                    reason: "header exceeds 64 bytes".into(),
                });
            }
            let n = decoder
                .read(&mut buf[filled..])
                .map_err(|e| StoreError::Decompress {
                    oid: oid.to_hex(),
                    source: e,
                })?;
            if n == 0 {
                return Err(StoreError::Corrupt {
                    oid: oid.to_hex(),
                    reason: "unexpected EOF before header null terminator".into(),
                });
            }
            filled += n;
            if buf[..filled].contains(&0) {
                break;
            }
        }

        let (obj_type, content_size, _header_len) = header::parse_header(&buf[..filled])?;
        Ok(Some((obj_type, content_size)))
    }

    /// Read a loose object and verify its hash matches the expected OID.
    ///
    /// Returns `Ok(None)` if the object does not exist.
    pub fn read_verified(&self, oid: &ObjectId) -> Result<Option<Object>, StoreError> {
        let path = self.object_path(oid);
        let compressed = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let decompressed = decompress_all(&compressed, oid)?;

        // Verify hash of the raw decompressed data (header + content).
        let actual_oid = Hasher::digest(&decompressed)?;
        if actual_oid != *oid {
            return Err(StoreError::HashMismatch {
                path,
                expected: oid.to_hex(),
                actual: actual_oid.to_hex(),
            });
        }

        let obj = Object::parse(&decompressed)?;
        Ok(Some(obj))
    }

    /// Read an object that must be a blob; returns its bytes.
    pub fn read_blob(&self, oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
        match self.read_required(oid)? {
            Object::Blob(b) => Ok(b.data),
            other => Err(StoreError::TypeMismatch {
                oid: *oid,
                expected: "blob",
                actual: other.object_type().as_str(),
            }),
        }
    }

    /// Read an object that must be a commit.
    pub fn read_commit(&self, oid: &ObjectId) -> Result<quill_object::Commit, StoreError> {
        match self.read_required(oid)? {
            Object::Commit(c) => Ok(c),
            other => Err(StoreError::TypeMismatch {
                oid: *oid,
                expected: "commit",
                actual: other.object_type().as_str(),
            }),
        }
    }

    /// Read an object that must be a tree.
    pub fn read_tree(&self, oid: &ObjectId) -> Result<quill_object::Tree, StoreError> {
        match self.read_required(oid)? {
            Object::Tree(t) => Ok(t),
            other => Err(StoreError::TypeMismatch {
                oid: *oid,
                expected: "tree",
                actual: other.object_type().as_str(),
            }),
        }
    }
}

/// Zlib-decompress the full contents of a loose object file.
fn decompress_all(compressed: &[u8], oid: &ObjectId) -> Result<Vec<u8>, StoreError> {
    let mut decoder = ZlibDecoder::new(compressed);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| StoreError::Decompress {
            oid: oid.to_hex(),
            source: e,
        })?;
    Ok(decompressed)
}
