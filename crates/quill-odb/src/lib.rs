//! Loose object storage: read, write, and enumerate zlib-compressed objects.
//!
//! Each loose object lives at `.git/objects/XX/YYYY...` where `XX` is the
//! first byte of the OID in hex and `YYYY...` is the rest. The file content
//! is zlib-compressed `"<type> <size>\0<content>"`. Writes are idempotent:
//! identical content yields the same OID and at most one on-disk file.

mod enumerate;
mod read;
mod tree;
mod write;

pub use enumerate::LooseObjectIter;
pub use tree::TreeFile;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use quill_hash::ObjectId;
use quill_object::cache::ObjectCache;
use quill_object::Object;

/// Interface to the loose object directory (`.git/objects/`).
pub struct ObjectStore {
    /// Path to the objects directory.
    objects_dir: PathBuf,
    /// Zlib compression level.
    compression_level: flate2::Compression,
    /// Cache of parsed objects.
    cache: Mutex<ObjectCache>,
}

impl ObjectStore {
    /// Open the object store at the given objects directory.
    pub fn open(objects_dir: impl AsRef<Path>) -> Self {
        Self {
            objects_dir: objects_dir.as_ref().to_path_buf(),
            compression_level: flate2::Compression::default(),
            cache: Mutex::new(ObjectCache::new(1024)),
        }
    }

    /// Set the zlib compression level (0–9).
    pub fn set_compression_level(&mut self, level: u32) {
        self.compression_level = flate2::Compression::new(level);
    }

    /// Get the file path for a given OID.
    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_dir.join(oid.loose_path())
    }

    /// Get the path to the objects directory.
    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Read an object through the LRU cache.
    pub fn read_cached(&self, oid: &ObjectId) -> Result<Option<Object>, StoreError> {
        {
            let mut cache = self.cache.lock().unwrap();
            if let Some(obj) = cache.get(oid) {
                return Ok(Some(obj.clone()));
            }
        }

        let obj = self.read(oid)?;

        if let Some(ref obj) = obj {
            let mut cache = self.cache.lock().unwrap();
            cache.insert(*oid, obj.clone());
        }

        Ok(obj)
    }

    /// Drop all cached objects.
    pub fn clear_cache(&self) {
        self.cache.lock().unwrap().clear();
    }
}

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("corrupt loose object {oid}: {reason}")]
    Corrupt { oid: String, reason: String },

    #[error("decompression error for {oid}: {source}")]
    Decompress {
        oid: String,
        #[source]
        source: std::io::Error,
    },

    #[error("hash mismatch for {path}: expected {expected}, got {actual}")]
    HashMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("object {oid} is a {actual}, expected {expected}")]
    TypeMismatch {
        oid: ObjectId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("object parse error: {0}")]
    Object(#[from] quill_object::ObjectError),

    #[error("hash error: {0}")]
    Hash(#[from] quill_hash::HashError),
}
