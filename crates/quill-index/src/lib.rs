//! The index (staging area).
//!
//! Reads and writes the index file (`.git/index`) in DIRC version 2 format
//! and maintains the path → (mode, oid) mapping between the working tree and
//! the object database.

pub mod entry;
mod read;
mod write;

use std::path::Path;

use bstr::{BStr, BString, ByteSlice};
use quill_hash::ObjectId;
use quill_object::FileMode;
use quill_odb::ObjectStore;

pub use entry::{IndexEntry, StatData};

/// Errors from index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("invalid index header: {0}")]
    InvalidHeader(String),

    #[error("unsupported index version: {0}")]
    UnsupportedVersion(u32),

    #[error("index checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid index entry at offset {offset}: {reason}")]
    InvalidEntry { offset: usize, reason: String },

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("lock failed: {0}")]
    LockFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] quill_odb::StoreError),
}

/// The staging area: a flat ordered mapping from path to (mode, oid, stat).
#[derive(Debug, Default)]
pub struct Index {
    /// Entries sorted by byte-exact path.
    entries: Vec<IndexEntry>,
}

impl Index {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Read the index from a file (memory-mapped).
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let file = std::fs::File::open(path.as_ref())?;
        let data = unsafe { memmap2::Mmap::map(&file) }?;
        read::parse_index(&data)
    }

    /// Load the index at `path`, treating a missing file as empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        if path.exists() {
            Self::read_from(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Write the index to a file atomically.
    ///
    /// An empty index removes the file instead of writing a zero-entry one.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), IndexError> {
        write::write_index(self, path.as_ref())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the index empty?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by byte-exact path.
    pub fn get(&self, path: &BStr) -> Option<&IndexEntry> {
        self.entries
            .binary_search_by(|e| e.path.as_bstr().cmp(path))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Add or replace an entry, keeping the list sorted by path.
    pub fn add(&mut self, entry: IndexEntry) {
        match self
            .entries
            .binary_search_by(|e| e.path.cmp(&entry.path))
        {
            Ok(pos) => self.entries[pos] = entry,
            Err(pos) => self.entries.insert(pos, entry),
        }
    }

    /// Remove the entry for a path. Returns true if one was removed.
    pub fn remove(&mut self, path: &BStr) -> bool {
        match self
            .entries
            .binary_search_by(|e| e.path.as_bstr().cmp(path))
        {
            Ok(pos) => {
                self.entries.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate over all entries in path order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Stage a working-tree file: store its blob, stamp stat data, and
    /// insert or replace the entry for `path`.
    pub fn stage_file(
        &mut self,
        store: &ObjectStore,
        work_tree: &Path,
        path: &BStr,
    ) -> Result<ObjectId, IndexError> {
        let fs_path = quill_utils::path::to_host(work_tree, path);
        let meta = std::fs::symlink_metadata(&fs_path)?;

        let (data, mode) = if meta.file_type().is_symlink() {
            let target = std::fs::read_link(&fs_path)?;
            (
                target.to_string_lossy().into_owned().into_bytes(),
                FileMode::Symlink,
            )
        } else if meta.is_file() {
            (std::fs::read(&fs_path)?, file_mode_of(&meta))
        } else {
            return Err(IndexError::NotAFile(path.to_string()));
        };

        let oid = store.write_blob(&data)?;
        self.add(IndexEntry {
            path: BString::from(path),
            oid,
            mode,
            stat: StatData::from_metadata(&meta),
            assume_valid: false,
        });
        Ok(oid)
    }

    /// Build a tree hierarchy from the current entries, writing subtrees
    /// bottom-up into the store. Returns the root tree OID.
    pub fn write_tree(&self, store: &ObjectStore) -> Result<ObjectId, IndexError> {
        write::write_tree_from_index(self, store)
    }

    /// Rebuild the index from a tree.
    ///
    /// Stat fields are freshly sampled when the corresponding file exists in
    /// the working tree, zero otherwise, so that a subsequent `status` does
    /// not invent fake modifications.
    pub fn read_tree(
        &mut self,
        store: &ObjectStore,
        tree_oid: &ObjectId,
        work_tree: &Path,
    ) -> Result<(), IndexError> {
        self.entries.clear();
        for (path, file) in store.tree_files(tree_oid)? {
            let fs_path = quill_utils::path::to_host(work_tree, path.as_bstr());
            let stat = std::fs::symlink_metadata(&fs_path)
                .map(|meta| StatData::from_metadata(&meta))
                .unwrap_or_default();
            self.entries.push(IndexEntry {
                path,
                oid: file.oid,
                mode: file.mode,
                stat,
                assume_valid: false,
            });
        }
        // tree_files yields in BTreeMap order, which is the index order.
        Ok(())
    }
}

fn file_mode_of(meta: &std::fs::Metadata) -> FileMode {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        if meta.mode() & 0o111 != 0 {
            return FileMode::Executable;
        }
    }
    let _ = meta;
    FileMode::Regular
}
