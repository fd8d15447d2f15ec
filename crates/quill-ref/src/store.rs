use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use quill_hash::ObjectId;

use crate::error::RefError;
use crate::loose;
use crate::name::RefName;
use crate::packed::PackedRefs;
use crate::Reference;

/// Maximum depth for following symbolic ref chains.
const MAX_SYMREF_DEPTH: usize = 10;

/// The state of HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// HEAD is symbolic to a branch. `oid` is `None` when the branch is
    /// unborn (its ref file does not exist yet).
    Branch {
        name: String,
        oid: Option<ObjectId>,
    },
    /// HEAD points directly at a commit.
    Detached(ObjectId),
}

impl Head {
    /// The commit HEAD resolves to, if any.
    pub fn oid(&self) -> Option<ObjectId> {
        match self {
            Head::Branch { oid, .. } => *oid,
            Head::Detached(oid) => Some(*oid),
        }
    }

    /// The branch short name, if HEAD is on a branch.
    pub fn branch_name(&self) -> Option<&str> {
        match self {
            Head::Branch { name, .. } => Some(name),
            Head::Detached(_) => None,
        }
    }

    /// Is HEAD on a branch with no commits yet?
    pub fn is_unborn(&self) -> bool {
        matches!(self, Head::Branch { oid: None, .. })
    }
}

/// Files-backend ref store (loose refs + read-only packed-refs fallback).
///
/// Loose refs take precedence over packed refs; writes always go to loose
/// files through a lock file.
pub struct RefStore {
    git_dir: PathBuf,
}

impl RefStore {
    /// Create a ref store over the given `.git` directory.
    pub fn new(git_dir: impl AsRef<Path>) -> Self {
        Self {
            git_dir: git_dir.as_ref().to_path_buf(),
        }
    }

    /// The `.git` directory this store operates on.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Resolve a ref name to a Reference (loose first, then packed-refs).
    pub fn resolve(&self, name: &RefName) -> Result<Option<Reference>, RefError> {
        match loose::read_loose_ref(&self.git_dir, name)? {
            Some(r) => Ok(Some(r)),
            None => {
                let packed = PackedRefs::load(&self.git_dir)?;
                Ok(packed.find(name).map(|pr| Reference::Direct {
                    name: name.clone(),
                    target: pr.oid,
                }))
            }
        }
    }

    /// Resolve a ref name to its final OID, following symbolic ref chains.
    pub fn resolve_to_oid(&self, name: &RefName) -> Result<Option<ObjectId>, RefError> {
        self.resolve_inner(name, 0)
    }

    fn resolve_inner(&self, name: &RefName, depth: usize) -> Result<Option<ObjectId>, RefError> {
        if depth > MAX_SYMREF_DEPTH {
            return Err(RefError::SymrefLoop(name.to_string()));
        }

        match self.resolve(name)? {
            Some(Reference::Direct { target, .. }) => Ok(Some(target)),
            Some(Reference::Symbolic { target, .. }) => self.resolve_inner(&target, depth + 1),
            None => Ok(None),
        }
    }

    /// Write a ref: `<hex>\n` to its loose file.
    pub fn write_ref(&self, name: &RefName, oid: &ObjectId) -> Result<(), RefError> {
        loose::write_loose_ref(&self.git_dir, name, oid)
    }

    /// Write a symbolic ref: `ref: <target>\n`.
    pub fn write_symbolic_ref(&self, name: &RefName, target: &RefName) -> Result<(), RefError> {
        loose::write_symbolic_ref(&self.git_dir, name, target)
    }

    /// Delete a loose ref if present.
    pub fn delete_ref(&self, name: &RefName) -> Result<(), RefError> {
        loose::delete_loose_ref(&self.git_dir, name)
    }

    /// Does this ref exist (loose or packed)?
    pub fn exists(&self, name: &RefName) -> Result<bool, RefError> {
        Ok(self.resolve(name)?.is_some())
    }

    /// List branch short names, sorted, merging loose refs and packed-refs.
    pub fn list_branches(&self) -> Result<Vec<String>, RefError> {
        let mut names = BTreeSet::new();

        for (name, _) in loose::enumerate_loose_refs(&self.git_dir, "refs/heads/")? {
            names.insert(name.short_name().to_string());
        }
        let packed = PackedRefs::load(&self.git_dir)?;
        for pr in packed.refs() {
            if pr.name.is_branch() {
                names.insert(pr.name.short_name().to_string());
            }
        }

        Ok(names.into_iter().collect())
    }

    /// List tag short names, sorted.
    pub fn list_tags(&self) -> Result<Vec<String>, RefError> {
        let mut names = BTreeSet::new();

        for (name, _) in loose::enumerate_loose_refs(&self.git_dir, "refs/tags/")? {
            names.insert(name.short_name().to_string());
        }
        let packed = PackedRefs::load(&self.git_dir)?;
        for pr in packed.refs() {
            if pr.name.is_tag() {
                names.insert(pr.name.short_name().to_string());
            }
        }

        Ok(names.into_iter().collect())
    }

    /// Read HEAD and classify it.
    ///
    /// A symbolic HEAD whose target branch has no ref yet yields
    /// `Head::Branch { oid: None, .. }` — the unborn state.
    pub fn head(&self) -> Result<Head, RefError> {
        let head = RefName::head();
        match self.resolve(&head)? {
            Some(Reference::Symbolic { target, .. }) => {
                let oid = self.resolve_to_oid(&target)?;
                Ok(Head::Branch {
                    name: target.short_name().to_string(),
                    oid,
                })
            }
            Some(Reference::Direct { target, .. }) => Ok(Head::Detached(target)),
            None => Err(RefError::NotFound("HEAD".into())),
        }
    }

    /// The commit HEAD points to, failing with `Unborn` on an unborn branch.
    pub fn head_oid(&self) -> Result<ObjectId, RefError> {
        match self.head()? {
            Head::Branch { oid: Some(oid), .. } | Head::Detached(oid) => Ok(oid),
            Head::Branch { name, oid: None } => Err(RefError::Unborn(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn oid(n: u8) -> ObjectId {
        let mut bytes = [0u8; 20];
        bytes[19] = n;
        ObjectId::from_bytes(&bytes).unwrap()
    }

    fn store_with_head(dir: &Path, branch: &str) -> RefStore {
        let store = RefStore::new(dir);
        store
            .write_symbolic_ref(&RefName::head(), &RefName::branch(branch).unwrap())
            .unwrap();
        store
    }

    #[test]
    fn head_unborn_when_branch_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_head(dir.path(), "main");

        let head = store.head().unwrap();
        assert!(head.is_unborn());
        assert_eq!(head.branch_name(), Some("main"));
        assert!(matches!(store.head_oid(), Err(RefError::Unborn(_))));
    }

    #[test]
    fn head_resolves_once_branch_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_head(dir.path(), "main");

        store
            .write_ref(&RefName::branch("main").unwrap(), &oid(1))
            .unwrap();

        let head = store.head().unwrap();
        assert!(!head.is_unborn());
        assert_eq!(head.oid(), Some(oid(1)));
        assert_eq!(store.head_oid().unwrap(), oid(1));
    }

    #[test]
    fn detached_head() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::new(dir.path());
        store.write_ref(&RefName::head(), &oid(7)).unwrap();

        match store.head().unwrap() {
            Head::Detached(o) => assert_eq!(o, oid(7)),
            other => panic!("expected detached head, got {other:?}"),
        }
    }

    #[test]
    fn missing_head_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::new(dir.path());
        assert!(matches!(store.head(), Err(RefError::NotFound(_))));
    }

    #[test]
    fn packed_refs_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::new(dir.path());

        fs::write(
            dir.path().join("packed-refs"),
            format!("{} refs/heads/packed-only\n", oid(9).to_hex()),
        )
        .unwrap();

        let name = RefName::branch("packed-only").unwrap();
        assert_eq!(store.resolve_to_oid(&name).unwrap(), Some(oid(9)));
        assert!(store.exists(&name).unwrap());
    }

    #[test]
    fn loose_wins_over_packed() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::new(dir.path());

        fs::write(
            dir.path().join("packed-refs"),
            format!("{} refs/heads/main\n", oid(1).to_hex()),
        )
        .unwrap();
        store
            .write_ref(&RefName::branch("main").unwrap(), &oid(2))
            .unwrap();

        assert_eq!(
            store
                .resolve_to_oid(&RefName::branch("main").unwrap())
                .unwrap(),
            Some(oid(2))
        );
    }

    #[test]
    fn list_branches_merges_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::new(dir.path());

        store
            .write_ref(&RefName::branch("zeta").unwrap(), &oid(1))
            .unwrap();
        store
            .write_ref(&RefName::branch("alpha").unwrap(), &oid(2))
            .unwrap();
        fs::write(
            dir.path().join("packed-refs"),
            format!(
                "{} refs/heads/midway\n{} refs/tags/v1\n",
                oid(3).to_hex(),
                oid(4).to_hex()
            ),
        )
        .unwrap();

        assert_eq!(store.list_branches().unwrap(), ["alpha", "midway", "zeta"]);
        assert_eq!(store.list_tags().unwrap(), ["v1"]);
    }

    #[test]
    fn symref_loop_detected() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::new(dir.path());

        let a = RefName::new("refs/heads/a").unwrap();
        let b = RefName::new("refs/heads/b").unwrap();
        store.write_symbolic_ref(&a, &b).unwrap();
        store.write_symbolic_ref(&b, &a).unwrap();

        assert!(matches!(
            store.resolve_to_oid(&a),
            Err(RefError::SymrefLoop(_))
        ));
    }

    #[test]
    fn delete_then_resolve_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::new(dir.path());
        let name = RefName::branch("gone").unwrap();

        store.write_ref(&name, &oid(1)).unwrap();
        store.delete_ref(&name).unwrap();
        assert!(store.resolve(&name).unwrap().is_none());
    }
}
