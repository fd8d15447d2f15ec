use std::fs;
use std::path::PathBuf;

use quill_hash::ObjectId;

use crate::{ObjectStore, StoreError};

/// Iterator over all loose object OIDs in a store.
///
/// Walks the 256 fan-out directories in order; within a directory, entries
/// come back in filesystem order.
pub struct LooseObjectIter {
    objects_dir: PathBuf,
    /// Fan-out directory names not yet visited, reverse-sorted so pop() is next.
    dirs: Vec<String>,
    /// OIDs from the current fan-out directory, reverse-sorted.
    current: Vec<ObjectId>,
}

impl ObjectStore {
    /// Iterate over every loose object in the store.
    pub fn iter(&self) -> Result<LooseObjectIter, StoreError> {
        let mut dirs = Vec::new();
        match fs::read_dir(self.objects_dir()) {
            Ok(entries) => {
                for entry in entries {
                    let entry = entry?;
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    if name.len() == 2 && quill_hash::hex::is_valid_hex(&name) {
                        dirs.push(name.into_owned());
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::Io(e)),
        }
        dirs.sort_unstable_by(|a, b| b.cmp(a));

        Ok(LooseObjectIter {
            objects_dir: self.objects_dir().to_path_buf(),
            dirs,
            current: Vec::new(),
        })
    }
}

impl LooseObjectIter {
    fn fill_current(&mut self) -> Result<(), StoreError> {
        while self.current.is_empty() {
            let Some(prefix) = self.dirs.pop() else {
                return Ok(());
            };
            let dir = self.objects_dir.join(&prefix);
            let entries = match fs::read_dir(&dir) {
                Ok(e) => e,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::Io(e)),
            };
            for entry in entries {
                let entry = entry?;
                let name = entry.file_name();
                let name = name.to_string_lossy();
                let hex = format!("{prefix}{name}");
                if let Ok(oid) = ObjectId::from_hex(&hex) {
                    self.current.push(oid);
                }
            }
            self.current.sort_unstable_by(|a, b| b.cmp(a));
        }
        Ok(())
    }
}

impl Iterator for LooseObjectIter {
    type Item = Result<ObjectId, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.fill_current() {
            return Some(Err(e));
        }
        self.current.pop().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_object::ObjectType;

    #[test]
    fn iterates_written_objects_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());

        let mut written: Vec<ObjectId> = [b"one".as_slice(), b"two", b"three"]
            .iter()
            .map(|data| store.write_raw(ObjectType::Blob, data).unwrap())
            .collect();
        written.sort();

        let found: Vec<ObjectId> = store.iter().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(found, written);
    }

    #[test]
    fn empty_store_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        assert_eq!(store.iter().unwrap().count(), 0);
    }
}
