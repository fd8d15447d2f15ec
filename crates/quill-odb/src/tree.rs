//! Tree traversal over the object store.

use std::collections::BTreeMap;

use bstr::{BStr, BString, ByteSlice, ByteVec};
use quill_hash::ObjectId;
use quill_object::{FileMode, Tree};

use crate::{ObjectStore, StoreError};

/// A file found by flattening a tree: repo-relative path plus mode and oid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    pub mode: FileMode,
    pub oid: ObjectId,
}

impl ObjectStore {
    /// Walk a tree depth-first, reporting every entry as `(path, mode, oid)`.
    ///
    /// Subtree entries are reported before being descended into.
    pub fn walk_tree<F>(&self, tree_oid: &ObjectId, visitor: &mut F) -> Result<(), StoreError>
    where
        F: FnMut(&BStr, FileMode, ObjectId),
    {
        self.walk_tree_inner(tree_oid, &BString::from(""), visitor)
    }

    fn walk_tree_inner<F>(
        &self,
        tree_oid: &ObjectId,
        prefix: &BString,
        visitor: &mut F,
    ) -> Result<(), StoreError>
    where
        F: FnMut(&BStr, FileMode, ObjectId),
    {
        let tree = self.read_tree(tree_oid)?;
        for entry in tree.iter() {
            let path = join_path(prefix, entry.name.as_bstr());
            visitor(path.as_bstr(), entry.mode, entry.oid);
            if entry.mode.is_tree() {
                self.walk_tree_inner(&entry.oid, &path, visitor)?;
            }
        }
        Ok(())
    }

    /// Flatten a tree into `path → (mode, oid)` for every non-tree entry.
    pub fn tree_files(&self, tree_oid: &ObjectId) -> Result<BTreeMap<BString, TreeFile>, StoreError> {
        let mut files = BTreeMap::new();
        self.walk_tree(tree_oid, &mut |path, mode, oid| {
            if !mode.is_tree() {
                files.insert(BString::from(path), TreeFile { mode, oid });
            }
        })?;
        Ok(files)
    }

    /// Resolve a slash-separated path inside a tree.
    ///
    /// Returns `None` when any component is missing, or when a non-final
    /// component is not a subtree.
    pub fn find_in_tree(
        &self,
        tree_oid: &ObjectId,
        path: &BStr,
    ) -> Result<Option<(FileMode, ObjectId)>, StoreError> {
        if path.is_empty() {
            return Ok(Some((FileMode::Tree, *tree_oid)));
        }

        let mut current: Tree = self.read_tree(tree_oid)?;
        let mut components = path.split(|&b| b == b'/').peekable();

        while let Some(component) = components.next() {
            let Some(entry) = current.find(component.as_bstr()) else {
                return Ok(None);
            };

            if components.peek().is_none() {
                return Ok(Some((entry.mode, entry.oid)));
            }

            if !entry.mode.is_tree() {
                return Ok(None);
            }
            current = self.read_tree(&entry.oid)?;
        }

        Ok(None)
    }
}

fn join_path(prefix: &BString, name: &BStr) -> BString {
    if prefix.is_empty() {
        BString::from(name)
    } else {
        let mut p = prefix.clone();
        p.push_byte(b'/');
        p.extend_from_slice(name);
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_object::{Object, ObjectType, TreeEntry};

    /// Build `a.txt`, `sub/b.txt` in a fresh store; returns the root tree oid.
    fn sample_tree(store: &ObjectStore) -> ObjectId {
        let blob_a = store.write_raw(ObjectType::Blob, b"alpha\n").unwrap();
        let blob_b = store.write_raw(ObjectType::Blob, b"beta\n").unwrap();

        let sub = Tree {
            entries: vec![TreeEntry {
                mode: FileMode::Regular,
                name: BString::from("b.txt"),
                oid: blob_b,
            }],
        };
        let sub_oid = store.write(&Object::Tree(sub)).unwrap();

        let root = Tree {
            entries: vec![
                TreeEntry {
                    mode: FileMode::Regular,
                    name: BString::from("a.txt"),
                    oid: blob_a,
                },
                TreeEntry {
                    mode: FileMode::Tree,
                    name: BString::from("sub"),
                    oid: sub_oid,
                },
            ],
        };
        store.write(&Object::Tree(root)).unwrap()
    }

    #[test]
    fn walk_reports_subtrees_before_descending() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let root = sample_tree(&store);

        let mut seen = Vec::new();
        store
            .walk_tree(&root, &mut |path, mode, _| {
                seen.push((path.to_string(), mode.is_tree()));
            })
            .unwrap();

        assert_eq!(
            seen,
            vec![
                ("a.txt".to_string(), false),
                ("sub".to_string(), true),
                ("sub/b.txt".to_string(), false),
            ]
        );
    }

    #[test]
    fn tree_files_flattens_blobs_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let root = sample_tree(&store);

        let files = store.tree_files(&root).unwrap();
        let paths: Vec<String> = files.keys().map(|p| p.to_string()).collect();
        assert_eq!(paths, ["a.txt", "sub/b.txt"]);
    }

    #[test]
    fn find_in_tree_resolves_nested_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let root = sample_tree(&store);

        let (mode, oid) = store
            .find_in_tree(&root, BStr::new("sub/b.txt"))
            .unwrap()
            .unwrap();
        assert_eq!(mode, FileMode::Regular);
        assert_eq!(store.read_blob(&oid).unwrap(), b"beta\n");

        assert!(store
            .find_in_tree(&root, BStr::new("missing.txt"))
            .unwrap()
            .is_none());
        // A blob in a non-final position is not traversable.
        assert!(store
            .find_in_tree(&root, BStr::new("a.txt/nested"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn find_in_tree_empty_path_is_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path());
        let root = sample_tree(&store);

        let (mode, oid) = store.find_in_tree(&root, BStr::new("")).unwrap().unwrap();
        assert!(mode.is_tree());
        assert_eq!(oid, root);
    }
}
