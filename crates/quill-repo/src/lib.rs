//! Repository handle and the engine operations built on it: init/open, the
//! working-tree scanner, the commit pipeline, the checkout engine, status,
//! first-parent log, and local transfer.

pub mod checkout;
pub mod commit;
mod error;
mod init;
pub mod log;
pub mod scanner;
pub mod status;
pub mod transfer;

pub use error::EngineError;
pub use init::init_repository;

use std::path::{Path, PathBuf};

use quill_hash::ObjectId;
use quill_index::Index;
use quill_object::Commit;
use quill_odb::ObjectStore;
use quill_ref::{Head, RefName, RefStore};

/// The central repository handle tying all subsystems together.
///
/// This is the only long-lived state in the engine. It is an owned value
/// passed explicitly; after any ref-changing action, [`reopen`](Self::reopen)
/// drops cached views so subsequent reads see the new state.
pub struct Repository {
    /// Working tree root.
    root: PathBuf,
    /// Path to the .git directory.
    git_dir: PathBuf,
    /// Object store.
    store: ObjectStore,
    /// Reference store.
    refs: RefStore,
    /// Path to the index file.
    index_path: PathBuf,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("git_dir", &self.git_dir)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open an existing repository rooted at `path`.
    ///
    /// Fails with `NotARepository` when `path/.git` is absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let root = absolutize(path.as_ref())?;
        let git_dir = root.join(".git");
        if !git_dir.join("HEAD").is_file() {
            return Err(EngineError::NotARepository(root));
        }
        Ok(Self::from_parts(root, git_dir))
    }

    /// Initialize a repository at `path` (creating the directory if needed)
    /// and open it. Re-running init on an existing repository is a no-op.
    pub fn init(path: impl AsRef<Path>, default_branch: &str) -> Result<Self, EngineError> {
        let root = absolutize(path.as_ref())?;
        init::init_repository(&root, default_branch)?;
        let git_dir = root.join(".git");
        Ok(Self::from_parts(root, git_dir))
    }

    fn from_parts(root: PathBuf, git_dir: PathBuf) -> Self {
        let store = ObjectStore::open(git_dir.join("objects"));
        let refs = RefStore::new(&git_dir);
        let index_path = git_dir.join("index");
        Self {
            root,
            git_dir,
            store,
            refs,
            index_path,
        }
    }

    /// Drop any cached view of the repository.
    ///
    /// Called after ref-changing actions (checkout, commit) so reads do not
    /// serve stale objects or index state.
    pub fn reopen(&mut self) {
        self.store.clear_cache();
    }

    // --- Path accessors ---

    /// Working tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the .git directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Path to the index file.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    // --- Subsystem accessors ---

    /// Access the object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Access the reference store.
    pub fn refs(&self) -> &RefStore {
        &self.refs
    }

    /// Load the index from disk (missing file = empty index).
    pub fn load_index(&self) -> Result<Index, EngineError> {
        Ok(Index::load(&self.index_path)?)
    }

    /// Write an index back to disk (empty index removes the file).
    pub fn save_index(&self, index: &Index) -> Result<(), EngineError> {
        Ok(index.write_to(&self.index_path)?)
    }

    // --- Ref conveniences ---

    /// The state of HEAD.
    pub fn head(&self) -> Result<Head, EngineError> {
        Ok(self.refs.head()?)
    }

    /// The branch HEAD is on, or `None` when detached.
    pub fn current_branch(&self) -> Result<Option<String>, EngineError> {
        Ok(self.head()?.branch_name().map(str::to_string))
    }

    /// The commit HEAD resolves to, or `None` on an unborn branch.
    pub fn head_commit(&self) -> Result<Option<(ObjectId, Commit)>, EngineError> {
        match self.head()?.oid() {
            Some(oid) => {
                let commit = self.store.read_commit(&oid)?;
                Ok(Some((oid, commit)))
            }
            None => Ok(None),
        }
    }

    /// The tree of the HEAD commit, or `None` on an unborn branch.
    pub fn head_tree(&self) -> Result<Option<ObjectId>, EngineError> {
        Ok(self.head_commit()?.map(|(_, c)| c.tree))
    }

    /// The tip commit of a branch, failing with `BranchMissing`.
    pub fn branch_tip(&self, branch: &str) -> Result<ObjectId, EngineError> {
        let refname = RefName::branch(branch)?;
        self.refs
            .resolve_to_oid(&refname)?
            .ok_or_else(|| EngineError::BranchMissing(branch.to_string()))
    }

    /// Does a branch exist (loose or packed)?
    pub fn branch_exists(&self, branch: &str) -> Result<bool, EngineError> {
        Ok(self.refs.exists(&RefName::branch(branch)?)?)
    }

    /// Create a branch at the given commit. Fails with `BranchExists`.
    pub fn create_branch(&self, branch: &str, oid: &ObjectId) -> Result<(), EngineError> {
        let refname = RefName::branch(branch)?;
        if self.refs.exists(&refname)? {
            return Err(EngineError::BranchExists(branch.to_string()));
        }
        Ok(self.refs.write_ref(&refname, oid)?)
    }

    /// Delete a branch ref. Fails with `BranchMissing` when absent.
    pub fn delete_branch(&self, branch: &str) -> Result<(), EngineError> {
        let refname = RefName::branch(branch)?;
        if !self.refs.exists(&refname)? {
            return Err(EngineError::BranchMissing(branch.to_string()));
        }
        Ok(self.refs.delete_ref(&refname)?)
    }

    /// Sorted branch short names.
    pub fn branches(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.refs.list_branches()?)
    }

    /// Create a lightweight tag at the given commit (HEAD by default).
    pub fn create_tag(&self, tag: &str, oid: Option<&ObjectId>) -> Result<(), EngineError> {
        let target = match oid {
            Some(oid) => *oid,
            None => self.refs.head_oid()?,
        };
        let refname = RefName::tag(tag)?;
        Ok(self.refs.write_ref(&refname, &target)?)
    }

    /// The tree of a branch tip.
    pub fn branch_tree(&self, branch: &str) -> Result<ObjectId, EngineError> {
        let tip = self.branch_tip(branch)?;
        Ok(self.store.read_commit(&tip)?.tree)
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, EngineError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
