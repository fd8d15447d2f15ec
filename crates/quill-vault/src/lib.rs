//! File-level operations layered on the repository engine.
//!
//! A `Vault` wraps a repository and exposes read/write/delete/rename/ls
//! plus history, status, diff, and grep. Every mutating call follows the
//! same dance: remember the current branch, switch to the target branch
//! (creating it from HEAD when absent), apply the filesystem change, stage
//! and commit, then switch back. Results come back in uniform envelopes;
//! the underlying error kind is never lost.

mod envelope;
mod history;

pub use envelope::{
    BranchesData, DeleteData, DiffData, Envelope, GrepData, GrepMatch, HistoryData, HistoryEntry,
    LsData, LsEntry, ReadData, RenameData, ResetData, RestoreData, ShowData, StatusData,
    WriteData,
};

use std::fs;
use std::path::Path;

use bstr::{BStr, BString, ByteSlice};
use quill_hash::ObjectId;
use quill_repo::log as revlog;
use quill_repo::{checkout, commit, scanner, status, EngineError, Repository};
use quill_utils::date::Signature;

/// Configuration for opening a vault.
#[derive(Debug, Clone)]
pub struct VaultOptions {
    /// The branch created at bootstrap and protected from deletion.
    pub default_branch: String,
    /// Identity recorded on commits made through the vault.
    pub author_name: String,
    pub author_email: String,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            default_branch: "main".into(),
            author_name: commit::DEFAULT_IDENT_NAME.into(),
            author_email: commit::DEFAULT_IDENT_EMAIL.into(),
        }
    }
}

/// A file store backed by a Git-compatible repository.
pub struct Vault {
    repo: Repository,
    opts: VaultOptions,
}

impl Vault {
    /// Open (bootstrapping if necessary) a vault at `path`.
    ///
    /// A fresh directory gets a repository with an initial commit on the
    /// default branch containing `.gitignore`. An existing repository whose
    /// default branch is missing gets the branch created at HEAD.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        Self::open_opts(path, VaultOptions::default())
    }

    /// Open with explicit options.
    pub fn open_opts(path: impl AsRef<Path>, opts: VaultOptions) -> Result<Self, EngineError> {
        let repo = Repository::init(path, &opts.default_branch)?;
        let mut vault = Self { repo, opts };
        vault.bootstrap()?;
        Ok(vault)
    }

    fn bootstrap(&mut self) -> Result<(), EngineError> {
        let branches = self.repo.branches()?;

        if branches.is_empty() {
            // First open: seed the default branch with an initial commit so
            // every later operation has a parent to build on.
            let gitignore = self.repo.root().join(".gitignore");
            if !gitignore.exists() {
                fs::write(&gitignore, "# initial\n")?;
            }
            let signature = self.signature();
            commit::commit_worktree(&mut self.repo, "Initial commit", Some(signature))?;
        } else if !branches.contains(&self.opts.default_branch) {
            // Repository predates this vault; repair the default branch.
            let head_oid = match self.repo.head()?.oid() {
                Some(oid) => oid,
                None => self.repo.branch_tip(&branches[0])?,
            };
            self.repo
                .create_branch(&self.opts.default_branch, &head_oid)?;
            checkout::checkout_branch(&mut self.repo, &self.opts.default_branch)?;
        }

        Ok(())
    }

    /// The wrapped repository.
    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// The protected default branch.
    pub fn default_branch(&self) -> &str {
        &self.opts.default_branch
    }

    fn signature(&self) -> Signature {
        Signature::now(self.opts.author_name.as_str(), self.opts.author_email.as_str())
    }

    // --- Read-only operations ---

    /// Read a file from a branch tree. Never touches the working tree.
    pub fn read(&self, path: &str, branch: &str) -> Envelope<ReadData> {
        match self.try_read(path, branch) {
            Ok(env) => env,
            Err(e) => Envelope::fail(branch, &e),
        }
    }

    fn try_read(&self, path: &str, branch: &str) -> Result<Envelope<ReadData>, EngineError> {
        let rel = normalize(path)?;
        let tip = self.repo.branch_tip(branch)?;
        let tree = self.repo.store().read_commit(&tip)?.tree;

        let Some((mode, oid)) = self.repo.store().find_in_tree(&tree, rel.as_bstr())? else {
            return Err(EngineError::NotFound(format!("file '{path}' on {branch}")));
        };
        if mode.is_tree() {
            return Err(EngineError::PreconditionFailed(format!(
                "'{path}' is not a file"
            )));
        }

        let content = self.repo.store().read_blob(&oid)?;
        Ok(Envelope::ok(
            branch,
            format!("read {path}"),
            ReadData {
                path: rel.to_string(),
                commit: tip.to_hex(),
                content,
            },
        ))
    }

    /// List the names directly under `dir` in a branch tree, each annotated
    /// with the last commit that touched it.
    pub fn ls(&self, dir: &str, branch: &str) -> Envelope<LsData> {
        match self.try_ls(dir, branch) {
            Ok(env) => env,
            Err(e) => Envelope::fail(branch, &e),
        }
    }

    fn try_ls(&self, dir: &str, branch: &str) -> Result<Envelope<LsData>, EngineError> {
        let rel = normalize(dir)?;
        let tip = self.repo.branch_tip(branch)?;
        let root_tree = self.repo.store().read_commit(&tip)?.tree;

        let (mode, tree_oid) = self
            .repo
            .store()
            .find_in_tree(&root_tree, rel.as_bstr())?
            .ok_or_else(|| EngineError::NotFound(format!("directory '{dir}' on {branch}")))?;
        if !mode.is_tree() {
            return Err(EngineError::PreconditionFailed(format!(
                "'{dir}' is not a directory"
            )));
        }

        let tree = self.repo.store().read_tree(&tree_oid)?;
        let targets: Vec<(BString, ObjectId)> = tree
            .iter()
            .map(|e| (full_path(&rel, e.name.as_bstr()), e.oid))
            .collect();
        let touched = history::last_touch(&self.repo, branch, &targets)?;

        let mut entries = Vec::with_capacity(tree.len());
        for entry in tree.iter() {
            let full = full_path(&rel, entry.name.as_bstr());
            let last = touched.get(&full);
            let last_message = match last {
                Some(commit_oid) => Some(
                    self.repo
                        .store()
                        .read_commit(commit_oid)?
                        .summary()
                        .to_string(),
                ),
                None => None,
            };
            entries.push(LsEntry {
                name: entry.name.to_string(),
                is_dir: entry.mode.is_tree(),
                last_commit: last.map(ObjectId::to_hex),
                last_message,
            });
        }

        Ok(Envelope::ok(
            branch,
            format!("listed {}", if rel.is_empty() { "." } else { dir }),
            LsData {
                path: rel.to_string(),
                entries,
            },
        ))
    }

    /// Sorted branch names.
    pub fn branches(&self) -> Envelope<BranchesData> {
        match self.repo.branches() {
            Ok(branches) => Envelope::ok(
                self.default_branch(),
                format!("{} branches", branches.len()),
                BranchesData { branches },
            ),
            Err(e) => Envelope::fail(self.default_branch(), &e),
        }
    }

    /// First-parent history of a branch (or HEAD), newest first.
    pub fn history(&self, branch: Option<&str>, max: Option<usize>) -> Envelope<HistoryData> {
        let label = branch.unwrap_or("HEAD");
        match revlog::history(&self.repo, branch, max) {
            Ok(entries) => {
                let entries: Vec<HistoryEntry> = entries
                    .into_iter()
                    .map(|e| HistoryEntry {
                        id: e.oid.to_hex(),
                        message: e.commit.message.to_string(),
                        author: format!("{} <{}>", e.commit.author.name, e.commit.author.email),
                        timestamp: e.commit.author.date.timestamp,
                    })
                    .collect();
                Envelope::ok(label, format!("{} commits", entries.len()), HistoryData {
                    entries,
                })
            }
            Err(e) => Envelope::fail(label, &e),
        }
    }

    /// Working-tree status against HEAD.
    pub fn status(&self) -> Envelope<StatusData> {
        let branch = self
            .repo
            .current_branch()
            .ok()
            .flatten()
            .unwrap_or_else(|| "HEAD".into());
        match status::status(&self.repo) {
            Ok(st) => {
                let message = if st.is_clean() {
                    "clean".to_string()
                } else {
                    format!(
                        "{} modified, {} untracked, {} deleted",
                        st.modified.len(),
                        st.untracked.len(),
                        st.deleted.len()
                    )
                };
                Envelope::ok(branch, message, StatusData {
                    modified: st.modified,
                    untracked: st.untracked,
                    deleted: st.deleted,
                })
            }
            Err(e) => Envelope::fail(branch, &e),
        }
    }

    /// Unified diff. `from`/`to` name branches; a `None` side is the
    /// working tree.
    pub fn diff(&self, from: Option<&str>, to: Option<&str>) -> Envelope<DiffData> {
        let label = from.unwrap_or("HEAD");
        match self.try_diff(from, to) {
            Ok(patch) => Envelope::ok(
                label,
                if patch.is_empty() { "no differences" } else { "diff" },
                DiffData { patch },
            ),
            Err(e) => Envelope::fail(label, &e),
        }
    }

    fn try_diff(&self, from: Option<&str>, to: Option<&str>) -> Result<String, EngineError> {
        let old = self.file_set_of(from)?;
        let new = self.file_set_of(to)?;
        Ok(quill_diff::render(&quill_diff::diff_file_sets(&old, &new)))
    }

    /// A branch's tree as a file set, or the working tree for `None`.
    fn file_set_of(&self, branch: Option<&str>) -> Result<quill_diff::FileSet, EngineError> {
        match branch {
            Some(name) => {
                let tree = self.repo.branch_tree(name)?;
                quill_diff::tree_file_set(self.repo.store(), Some(&tree)).map_err(diff_error)
            }
            None => {
                let mut set = quill_diff::FileSet::new();
                for entry in scanner::scan_worktree(self.repo.root())? {
                    let data = scanner::read_entry(self.repo.root(), &entry)?;
                    set.insert(entry.path, data);
                }
                Ok(set)
            }
        }
    }

    /// Show one commit: its metadata and the patch against its first
    /// parent (a root commit diffs against the empty tree).
    ///
    /// `revision` is a branch name or a full hex commit id; `None` is HEAD.
    pub fn show(&self, revision: Option<&str>) -> Envelope<ShowData> {
        let label = revision.unwrap_or("HEAD");
        match self.try_show(revision) {
            Ok(env) => env,
            Err(e) => Envelope::fail(label, &e),
        }
    }

    fn try_show(&self, revision: Option<&str>) -> Result<Envelope<ShowData>, EngineError> {
        let oid = match revision {
            Some(rev) => self.resolve_commitish(rev)?,
            None => self.repo.refs().head_oid()?,
        };
        let commit = self.repo.store().read_commit(&oid)?;

        let parent_tree = match commit.first_parent() {
            Some(parent) => Some(self.repo.store().read_commit(parent)?.tree),
            None => None,
        };
        let diffs =
            quill_diff::diff_trees(self.repo.store(), parent_tree.as_ref(), Some(&commit.tree))
                .map_err(diff_error)?;

        Ok(Envelope::ok(
            revision.unwrap_or("HEAD"),
            format!("show {}", oid.short_hex()),
            ShowData {
                id: oid.to_hex(),
                author: format!("{} <{}>", commit.author.name, commit.author.email),
                timestamp: commit.author.date.timestamp,
                message: commit.message.to_string(),
                patch: quill_diff::render(&diffs),
            },
        ))
    }

    /// Regex search over a branch tree (or the working tree for `None`).
    pub fn grep(&self, pattern: &str, branch: Option<&str>) -> Envelope<GrepData> {
        let label = branch.unwrap_or("worktree");
        let re = match regex::Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                return Envelope::fail(
                    label,
                    &EngineError::PreconditionFailed(format!("bad pattern: {e}")),
                )
            }
        };

        match self.file_set_of(branch) {
            Ok(files) => {
                let mut matches = Vec::new();
                for (path, content) in &files {
                    for (idx, line) in content.to_str_lossy().lines().enumerate() {
                        if re.is_match(line) {
                            matches.push(GrepMatch {
                                path: path.to_string(),
                                line: idx + 1,
                                text: line.to_string(),
                            });
                        }
                    }
                }
                Envelope::ok(label, format!("{} matches", matches.len()), GrepData {
                    matches,
                })
            }
            Err(e) => Envelope::fail(label, &e),
        }
    }

    // --- Mutating operations ---

    /// Write a file on a branch, committing the change.
    ///
    /// Identical content is success without a commit. The branch is created
    /// from HEAD when absent; the original branch is restored afterwards.
    pub fn write(
        &mut self,
        path: &str,
        content: &[u8],
        branch: &str,
        message: &str,
    ) -> Envelope<WriteData> {
        match self.try_write(path, content, branch, message) {
            Ok(env) => env,
            Err(e) => Envelope::fail(branch, &e),
        }
    }

    fn try_write(
        &mut self,
        path: &str,
        content: &[u8],
        branch: &str,
        message: &str,
    ) -> Result<Envelope<WriteData>, EngineError> {
        let rel = normalize(path)?;
        if rel.is_empty() {
            return Err(EngineError::PreconditionFailed("empty path".into()));
        }

        // No-change short circuit, answered from the object store alone.
        if self.repo.branch_exists(branch)? {
            let tree = self.repo.branch_tree(branch)?;
            if let Some((mode, oid)) = self.repo.store().find_in_tree(&tree, rel.as_bstr())? {
                if !mode.is_tree() && self.repo.store().read_blob(&oid)? == content {
                    return Ok(Envelope::ok(
                        branch,
                        "No changes",
                        WriteData {
                            path: rel.to_string(),
                            commit: None,
                            created: false,
                        },
                    ));
                }
            }
        }

        let rel_owned = rel.clone();
        let commit_oid = self.on_branch(branch, |repo, sig| {
            let fs_path = quill_utils::path::to_host(repo.root(), rel_owned.as_bstr());
            if let Some(parent) = fs_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&fs_path, content)?;

            let mut index = repo.load_index()?;
            index.stage_file(repo.store(), repo.root(), rel_owned.as_bstr())?;
            repo.save_index(&index)?;

            commit::commit_index(repo, message, Some(sig))
        })?;

        Ok(Envelope::ok(
            branch,
            message,
            WriteData {
                path: rel.to_string(),
                commit: Some(commit_oid.to_hex()),
                created: true,
            },
        ))
    }

    /// Delete a file on a branch, committing the removal.
    ///
    /// With `kill_empty_branch`, a branch left with no tracked files is
    /// deleted after HEAD is restored — unless it is the default branch,
    /// which is never killed. Killing the current branch switches to the
    /// default branch first.
    pub fn delete(
        &mut self,
        path: &str,
        branch: &str,
        message: &str,
        kill_empty_branch: bool,
    ) -> Envelope<DeleteData> {
        match self.try_delete(path, branch, message, kill_empty_branch) {
            Ok(env) => env,
            Err(e) => Envelope::fail(branch, &e),
        }
    }

    fn try_delete(
        &mut self,
        path: &str,
        branch: &str,
        message: &str,
        kill_empty_branch: bool,
    ) -> Result<Envelope<DeleteData>, EngineError> {
        let rel = normalize(path)?;

        if !self.repo.branch_exists(branch)? {
            return Err(EngineError::BranchMissing(branch.to_string()));
        }
        let tree = self.repo.branch_tree(branch)?;
        match self.repo.store().find_in_tree(&tree, rel.as_bstr())? {
            Some((mode, _)) if !mode.is_tree() => {}
            Some(_) => {
                return Err(EngineError::PreconditionFailed(format!(
                    "'{path}' is not a file"
                )))
            }
            None => {
                return Err(EngineError::PreconditionFailed(format!(
                    "'{path}' is not tracked on {branch}"
                )))
            }
        }

        let original = self.current_or_default()?;
        if original != branch {
            checkout::checkout_branch(&mut self.repo, branch)?;
        }

        let sig = self.signature();
        let rel_owned = rel.clone();
        let result: Result<ObjectId, EngineError> = (|| {
            let fs_path = quill_utils::path::to_host(self.repo.root(), rel_owned.as_bstr());
            match fs::remove_file(&fs_path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(EngineError::Io(e)),
            }

            let mut index = self.repo.load_index()?;
            index.remove(rel_owned.as_bstr());
            self.repo.save_index(&index)?;

            commit::commit_index(&mut self.repo, message, Some(sig))
        })();

        let commit_oid = match result {
            Ok(oid) => oid,
            Err(e) => {
                self.restore_branch(&original, branch);
                return Err(e);
            }
        };

        // Decide where HEAD goes before (possibly) deleting the branch.
        let now_empty = {
            let new_tree = self.repo.store().read_commit(&commit_oid)?.tree;
            self.repo.store().tree_files(&new_tree)?.is_empty()
        };
        let kill = kill_empty_branch && now_empty && branch != self.opts.default_branch;

        let restore_to = if kill && original == branch {
            self.opts.default_branch.clone()
        } else {
            original
        };
        if self.repo.current_branch()?.as_deref() != Some(restore_to.as_str()) {
            checkout::checkout_branch(&mut self.repo, &restore_to)?;
        }

        let mut branch_deleted = false;
        if kill {
            self.repo.delete_branch(branch)?;
            branch_deleted = true;
        }

        Ok(Envelope::ok(
            branch,
            message,
            DeleteData {
                path: rel.to_string(),
                commit: Some(commit_oid.to_hex()),
                branch_deleted,
            },
        ))
    }

    /// Rename a file on a branch, committing the move.
    pub fn rename(
        &mut self,
        from: &str,
        to: &str,
        branch: &str,
        message: &str,
    ) -> Envelope<RenameData> {
        match self.try_rename(from, to, branch, message) {
            Ok(env) => env,
            Err(e) => Envelope::fail(branch, &e),
        }
    }

    fn try_rename(
        &mut self,
        from: &str,
        to: &str,
        branch: &str,
        message: &str,
    ) -> Result<Envelope<RenameData>, EngineError> {
        let rel_from = normalize(from)?;
        let rel_to = normalize(to)?;

        if !self.repo.branch_exists(branch)? {
            return Err(EngineError::BranchMissing(branch.to_string()));
        }
        let tree = self.repo.branch_tree(branch)?;
        if self
            .repo
            .store()
            .find_in_tree(&tree, rel_from.as_bstr())?
            .is_none()
        {
            return Err(EngineError::PreconditionFailed(format!(
                "source file '{from}' not found on {branch}"
            )));
        }

        let rel_from_owned = rel_from.clone();
        let rel_to_owned = rel_to.clone();
        let commit_oid = self.on_branch(branch, |repo, sig| {
            let fs_from = quill_utils::path::to_host(repo.root(), rel_from_owned.as_bstr());
            let fs_to = quill_utils::path::to_host(repo.root(), rel_to_owned.as_bstr());
            if let Some(parent) = fs_to.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(&fs_from, &fs_to)?;

            let mut index = repo.load_index()?;
            index.remove(rel_from_owned.as_bstr());
            index.stage_file(repo.store(), repo.root(), rel_to_owned.as_bstr())?;
            repo.save_index(&index)?;

            commit::commit_index(repo, message, Some(sig))
        })?;

        Ok(Envelope::ok(
            branch,
            message,
            RenameData {
                from: rel_from.to_string(),
                to: rel_to.to_string(),
                commit: Some(commit_oid.to_hex()),
            },
        ))
    }

    /// Copy a file's committed content back into the working tree.
    ///
    /// The source is `branch`'s tip (HEAD when `None`). Nothing is staged
    /// or committed: a subsequent `status` reports the file as modified if
    /// it now differs from HEAD.
    pub fn restore(&mut self, path: &str, branch: Option<&str>) -> Envelope<RestoreData> {
        let label = branch.unwrap_or("HEAD");
        match self.try_restore(path, branch) {
            Ok(env) => env,
            Err(e) => Envelope::fail(label, &e),
        }
    }

    fn try_restore(
        &mut self,
        path: &str,
        branch: Option<&str>,
    ) -> Result<Envelope<RestoreData>, EngineError> {
        let rel = normalize(path)?;
        let (tip, label) = match branch {
            Some(name) => (self.repo.branch_tip(name)?, name.to_string()),
            None => (self.repo.refs().head_oid()?, self.current_or_default()?),
        };
        let tree = self.repo.store().read_commit(&tip)?.tree;

        let Some((mode, oid)) = self.repo.store().find_in_tree(&tree, rel.as_bstr())? else {
            return Err(EngineError::NotFound(format!("file '{path}' in {label}")));
        };
        if mode.is_tree() {
            return Err(EngineError::PreconditionFailed(format!(
                "'{path}' is not a file"
            )));
        }

        checkout::restore_file(&self.repo, rel.as_bstr(), mode, &oid)?;

        Ok(Envelope::ok(
            label,
            format!("restored {path}"),
            RestoreData {
                path: rel.to_string(),
                commit: tip.to_hex(),
            },
        ))
    }

    /// Move the current branch tip to `revision` (a branch name or full
    /// hex commit id). With `hard`, the working tree and index follow.
    pub fn reset(&mut self, revision: &str, hard: bool) -> Envelope<ResetData> {
        match self.try_reset(revision, hard) {
            Ok(env) => env,
            Err(e) => Envelope::fail(revision, &e),
        }
    }

    fn try_reset(&mut self, revision: &str, hard: bool) -> Result<Envelope<ResetData>, EngineError> {
        let target = self.resolve_commitish(revision)?;
        let branch = self.current_or_default()?;

        checkout::reset(&mut self.repo, &target, hard)?;

        Ok(Envelope::ok(
            branch.clone(),
            format!("reset to {}", target.short_hex()),
            ResetData {
                branch,
                commit: target.to_hex(),
                hard,
            },
        ))
    }

    /// Resolve a revision string: a branch short name wins, then a full
    /// hex commit id of an object actually in the store.
    fn resolve_commitish(&self, rev: &str) -> Result<ObjectId, EngineError> {
        // A string that is not even a valid ref name may still be a hex id.
        if let Ok(true) = self.repo.branch_exists(rev) {
            return self.repo.branch_tip(rev);
        }
        if let Ok(oid) = ObjectId::from_hex(rev) {
            if self.repo.store().contains(&oid) {
                return Ok(oid);
            }
        }
        Err(EngineError::NotFound(format!("revision '{rev}'")))
    }

    // --- Branch dance plumbing ---

    /// Run `f` with HEAD on `branch` (creating the branch from HEAD when
    /// absent), then restore the original branch.
    fn on_branch<T>(
        &mut self,
        branch: &str,
        f: impl FnOnce(&mut Repository, Signature) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let original = self.current_or_default()?;

        if !self.repo.branch_exists(branch)? {
            let head_oid = self.repo.refs().head_oid()?;
            self.repo.create_branch(branch, &head_oid)?;
            log::debug!("created branch {branch} from {}", head_oid.short_hex());
        }

        if original != branch {
            checkout::checkout_branch(&mut self.repo, branch)?;
        }

        let sig = self.signature();
        let result = f(&mut self.repo, sig);

        if original != branch {
            match result {
                Ok(value) => {
                    checkout::checkout_branch(&mut self.repo, &original)?;
                    Ok(value)
                }
                Err(e) => {
                    // Best effort: the operation already failed, a restore
                    // failure must not mask it.
                    self.restore_branch(&original, branch);
                    Err(e)
                }
            }
        } else {
            result
        }
    }

    fn restore_branch(&mut self, original: &str, from: &str) {
        if original != from {
            if let Err(restore_err) = checkout::checkout_branch(&mut self.repo, original) {
                log::warn!("could not restore branch {original}: {restore_err}");
            }
        }
    }

    fn current_or_default(&self) -> Result<String, EngineError> {
        Ok(self
            .repo
            .current_branch()?
            .unwrap_or_else(|| self.opts.default_branch.clone()))
    }
}

/// Normalize a caller path to repo-relative form.
fn normalize(path: &str) -> Result<BString, EngineError> {
    Ok(quill_utils::path::normalize(BStr::new(path))?)
}

/// Diff errors only wrap store errors; forward the underlying kind.
fn diff_error(e: quill_diff::DiffError) -> EngineError {
    match e {
        quill_diff::DiffError::Store(store) => store.into(),
    }
}

fn full_path(dir: &BString, name: &BStr) -> BString {
    if dir.is_empty() {
        BString::from(name)
    } else {
        let mut p = dir.clone();
        p.push(b'/');
        p.extend_from_slice(name);
        p
    }
}
