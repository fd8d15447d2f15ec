//! End-to-end behavior of the file-level API, from bootstrap through
//! branch-dance writes, deletes, renames, listing, and history.

use quill_repo::{checkout, status, Repository};
use quill_vault::Vault;

fn fresh_vault() -> (tempfile::TempDir, Vault) {
    let dir = tempfile::tempdir().unwrap();
    let vault = Vault::open(dir.path()).unwrap();
    (dir, vault)
}

#[test]
fn bootstrap_creates_repo_with_initial_commit() {
    let (dir, vault) = fresh_vault();

    // .git created, HEAD on main.
    assert!(dir.path().join(".git/HEAD").is_file());
    assert_eq!(
        std::fs::read_to_string(dir.path().join(".git/HEAD")).unwrap(),
        "ref: refs/heads/main\n"
    );

    // One initial commit whose tree carries .gitignore with "# initial\n".
    let env = vault.read(".gitignore", "main");
    assert!(env.success, "{}", env.message);
    assert_eq!(env.data.unwrap().content, b"# initial\n");

    let branches = vault.branches().data.unwrap().branches;
    assert_eq!(branches, ["main"]);

    let history = vault.history(Some("main"), None).data.unwrap();
    assert_eq!(history.entries.len(), 1);
    assert!(history.entries[0].message.starts_with("Initial commit"));
}

#[test]
fn reopening_existing_vault_is_stable() {
    let (dir, vault) = fresh_vault();
    let tip_before = vault.history(Some("main"), None).data.unwrap().entries[0]
        .id
        .clone();
    drop(vault);

    let vault = Vault::open(dir.path()).unwrap();
    let tip_after = vault.history(Some("main"), None).data.unwrap().entries[0]
        .id
        .clone();
    assert_eq!(tip_before, tip_after);
}

#[test]
fn write_on_new_branch_forks_from_main_and_restores_head() {
    let (dir, mut vault) = fresh_vault();

    let env = vault.write("hello.txt", b"hi\n", "feature", "add");
    assert!(env.success, "{}", env.message);
    let data = env.data.unwrap();
    assert!(data.created);
    assert!(data.commit.is_some());

    // Branch created off main; HEAD restored to main.
    let repo = Repository::open(dir.path()).unwrap();
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("main"));
    assert_eq!(
        vault.branches().data.unwrap().branches,
        ["feature", "main"]
    );

    // Content readable on feature, absent on main.
    assert_eq!(
        vault.read("hello.txt", "feature").data.unwrap().content,
        b"hi\n"
    );
    let miss = vault.read("hello.txt", "main");
    assert!(!miss.success);
    assert_eq!(miss.error.as_deref(), Some("NotFound"));

    // The feature commit's parent is main's tip.
    let feature_log = vault.history(Some("feature"), None).data.unwrap();
    let main_log = vault.history(Some("main"), None).data.unwrap();
    assert_eq!(feature_log.entries.len(), 2);
    assert_eq!(feature_log.entries[1].id, main_log.entries[0].id);
}

#[test]
fn identical_write_is_success_without_commit() {
    let (_dir, mut vault) = fresh_vault();

    vault.write("hello.txt", b"hi\n", "feature", "add");
    let before = vault.history(Some("feature"), None).data.unwrap().entries;

    let env = vault.write("hello.txt", b"hi\n", "feature", "add again");
    assert!(env.success);
    assert_eq!(env.message, "No changes");
    let data = env.data.unwrap();
    assert!(data.commit.is_none());
    assert!(!data.created);

    let after = vault.history(Some("feature"), None).data.unwrap().entries;
    assert_eq!(before.len(), after.len());
}

#[test]
fn checkout_removes_untracked_files_and_leaves_clean_status() {
    let (dir, mut vault) = fresh_vault();
    vault.write("hello.txt", b"hi\n", "feature", "add");

    // Untracked scratch file on main.
    std::fs::write(dir.path().join("scratch.tmp"), "junk").unwrap();

    let mut repo = Repository::open(dir.path()).unwrap();
    checkout::checkout_branch(&mut repo, "feature").unwrap();

    assert!(!dir.path().join("scratch.tmp").exists());
    assert_eq!(
        std::fs::read(dir.path().join("hello.txt")).unwrap(),
        b"hi\n"
    );

    let index = repo.load_index().unwrap();
    let paths: Vec<String> = index.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(paths, [".gitignore", "hello.txt"]);

    assert!(status::status(&repo).unwrap().is_clean());
}

#[test]
fn delete_kills_emptied_branch_but_never_default() {
    let (dir, mut vault) = fresh_vault();

    // A branch whose only tracked file is only.txt (plus the bootstrap
    // .gitignore, which we remove first to empty the branch completely).
    vault.write("only.txt", b"data\n", "tmp", "add only");
    let env = vault.delete(".gitignore", "tmp", "drop gitignore", false);
    assert!(env.success, "{}", env.message);

    let env = vault.delete("only.txt", "tmp", "remove last file", true);
    assert!(env.success, "{}", env.message);
    let data = env.data.unwrap();
    assert!(data.branch_deleted);

    // tmp is gone, HEAD restored to main, main untouched.
    assert_eq!(vault.branches().data.unwrap().branches, ["main"]);
    let repo = Repository::open(dir.path()).unwrap();
    assert_eq!(repo.current_branch().unwrap().as_deref(), Some("main"));
    assert!(vault.read(".gitignore", "main").success);
}

#[test]
fn default_branch_survives_kill_request() {
    let (_dir, mut vault) = fresh_vault();

    let env = vault.delete(".gitignore", "main", "empty main", true);
    assert!(env.success, "{}", env.message);
    assert!(!env.data.unwrap().branch_deleted);
    assert_eq!(vault.branches().data.unwrap().branches, ["main"]);
}

#[test]
fn delete_untracked_file_is_precondition_failure() {
    let (_dir, mut vault) = fresh_vault();

    let env = vault.delete("ghost.txt", "main", "remove", false);
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("PreconditionFailed"));
}

#[test]
fn rename_moves_content_in_one_commit() {
    let (_dir, mut vault) = fresh_vault();
    vault.write("old-name.txt", b"payload\n", "main", "add");

    let env = vault.rename("old-name.txt", "sub/new-name.txt", "main", "move it");
    assert!(env.success, "{}", env.message);
    assert!(env.data.unwrap().commit.is_some());

    assert!(!vault.read("old-name.txt", "main").success);
    assert_eq!(
        vault.read("sub/new-name.txt", "main").data.unwrap().content,
        b"payload\n"
    );
}

#[test]
fn rename_missing_source_fails() {
    let (_dir, mut vault) = fresh_vault();
    let env = vault.rename("nope.txt", "other.txt", "main", "move");
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("PreconditionFailed"));
}

#[test]
fn ls_lists_names_directly_under_dir() {
    let (_dir, mut vault) = fresh_vault();
    vault.write("top.txt", b"1\n", "main", "add top");
    vault.write("docs/a.md", b"a\n", "main", "add a");
    vault.write("docs/b.md", b"b\n", "main", "add b");

    let root = vault.ls("", "main").data.unwrap();
    let names: Vec<&str> = root.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, [".gitignore", "docs", "top.txt"]);
    assert!(root.entries[1].is_dir);

    let docs = vault.ls("docs", "main").data.unwrap();
    let names: Vec<&str> = docs.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["a.md", "b.md"]);
}

#[test]
fn ls_annotates_last_touching_commit() {
    let (_dir, mut vault) = fresh_vault();

    // a.txt=v1 at T1, b.txt=v1 at T2, a.txt=v2 at T3.
    let t1 = vault
        .write("a.txt", b"v1\n", "main", "T1")
        .data
        .unwrap()
        .commit
        .unwrap();
    let t2 = vault
        .write("b.txt", b"v1\n", "main", "T2")
        .data
        .unwrap()
        .commit
        .unwrap();
    let t3 = vault
        .write("a.txt", b"v2\n", "main", "T3")
        .data
        .unwrap()
        .commit
        .unwrap();
    assert_ne!(t1, t3);

    let listing = vault.ls("", "main").data.unwrap();
    let a = listing.entries.iter().find(|e| e.name == "a.txt").unwrap();
    let b = listing.entries.iter().find(|e| e.name == "b.txt").unwrap();

    assert_eq!(a.last_commit.as_deref(), Some(t3.as_str()));
    assert_eq!(a.last_message.as_deref(), Some("T3"));
    assert_eq!(b.last_commit.as_deref(), Some(t2.as_str()));
    assert_eq!(b.last_message.as_deref(), Some("T2"));
}

#[test]
fn ls_missing_directory_is_not_found() {
    let (_dir, vault) = fresh_vault();
    let env = vault.ls("no/such/dir", "main");
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("NotFound"));
}

#[test]
fn history_respects_max() {
    let (_dir, mut vault) = fresh_vault();
    for i in 0..4 {
        vault.write("f.txt", format!("v{i}\n").as_bytes(), "main", &format!("c{i}"));
    }

    let all = vault.history(Some("main"), None).data.unwrap();
    assert_eq!(all.entries.len(), 5); // 4 writes + initial commit

    let capped = vault.history(Some("main"), Some(2)).data.unwrap();
    assert_eq!(capped.entries.len(), 2);
    assert!(capped.entries[0].message.starts_with("c3"));
}

#[test]
fn status_reports_clean_after_facade_write() {
    let (_dir, mut vault) = fresh_vault();
    vault.write("f.txt", b"x\n", "main", "add");

    let st = vault.status().data.unwrap();
    assert!(st.modified.is_empty());
    assert!(st.untracked.is_empty());
    assert!(st.deleted.is_empty());
}

#[test]
fn diff_between_branches() {
    let (_dir, mut vault) = fresh_vault();
    vault.write("shared.txt", b"one\n", "main", "base");
    vault.write("shared.txt", b"two\n", "feature", "change");

    let env = vault.diff(Some("main"), Some("feature"));
    assert!(env.success);
    let patch = env.data.unwrap().patch;
    assert!(patch.contains("-one\n"));
    assert!(patch.contains("+two\n"));

    let same = vault.diff(Some("main"), Some("main"));
    assert_eq!(same.data.unwrap().patch, "");
}

#[test]
fn grep_searches_branch_content() {
    let (_dir, mut vault) = fresh_vault();
    vault.write("code.rs", b"fn main() {}\nlet x = 1;\n", "main", "add");

    let env = vault.grep(r"fn \w+", Some("main"));
    assert!(env.success);
    let matches = env.data.unwrap().matches;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].path, "code.rs");
    assert_eq!(matches[0].line, 1);

    let bad = vault.grep(r"(unclosed", Some("main"));
    assert!(!bad.success);
}

#[test]
fn show_renders_commit_and_patch() {
    let (_dir, mut vault) = fresh_vault();
    vault.write("f.txt", b"v1\n", "main", "first version");
    let second = vault
        .write("f.txt", b"v2\n", "main", "second version")
        .data
        .unwrap()
        .commit
        .unwrap();

    // By full commit id.
    let env = vault.show(Some(second.as_str()));
    assert!(env.success, "{}", env.message);
    let data = env.data.unwrap();
    assert_eq!(data.id, second);
    assert!(data.message.starts_with("second version"));
    assert!(data.patch.contains("-v1\n"));
    assert!(data.patch.contains("+v2\n"));

    // By branch name, and via HEAD: all three name the same commit.
    assert_eq!(vault.show(Some("main")).data.unwrap().id, second);
    assert_eq!(vault.show(None).data.unwrap().id, second);
}

#[test]
fn show_root_commit_diffs_against_empty_tree() {
    let (_dir, vault) = fresh_vault();
    let entries = vault.history(Some("main"), None).data.unwrap().entries;
    let root = entries.last().unwrap().id.as_str();

    let env = vault.show(Some(root));
    assert!(env.success, "{}", env.message);
    assert!(env.data.unwrap().patch.contains("+# initial\n"));
}

#[test]
fn show_unknown_revision_is_not_found() {
    let (_dir, vault) = fresh_vault();
    let env = vault.show(Some("0000000000000000000000000000000000000bad"));
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("NotFound"));
}

#[test]
fn restore_discards_local_edits_without_committing() {
    let (dir, mut vault) = fresh_vault();
    vault.write("f.txt", b"committed\n", "main", "add");
    let before = vault.history(Some("main"), None).data.unwrap().entries.len();

    std::fs::write(dir.path().join("f.txt"), b"scribbled over\n").unwrap();

    let env = vault.restore("f.txt", None);
    assert!(env.success, "{}", env.message);
    assert_eq!(
        std::fs::read(dir.path().join("f.txt")).unwrap(),
        b"committed\n"
    );

    // No commit was made and the tree is clean again.
    let after = vault.history(Some("main"), None).data.unwrap().entries.len();
    assert_eq!(before, after);
    let st = vault.status().data.unwrap();
    assert!(st.modified.is_empty() && st.untracked.is_empty());
}

#[test]
fn restore_missing_path_is_not_found() {
    let (_dir, mut vault) = fresh_vault();
    let env = vault.restore("never-committed.txt", None);
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("NotFound"));
}

#[test]
fn reset_hard_rewinds_branch_and_tree() {
    let (dir, mut vault) = fresh_vault();
    let first = vault
        .write("f.txt", b"v1\n", "main", "v1")
        .data
        .unwrap()
        .commit
        .unwrap();
    vault.write("f.txt", b"v2\n", "main", "v2");

    let env = vault.reset(&first, true);
    assert!(env.success, "{}", env.message);
    let data = env.data.unwrap();
    assert_eq!(data.branch, "main");
    assert_eq!(data.commit, first);

    assert_eq!(std::fs::read(dir.path().join("f.txt")).unwrap(), b"v1\n");
    let history = vault.history(Some("main"), None).data.unwrap();
    assert_eq!(history.entries[0].id, first);
}

#[test]
fn reset_soft_keeps_working_tree() {
    let (dir, mut vault) = fresh_vault();
    let first = vault
        .write("f.txt", b"v1\n", "main", "v1")
        .data
        .unwrap()
        .commit
        .unwrap();
    vault.write("f.txt", b"v2\n", "main", "v2");

    let env = vault.reset(&first, false);
    assert!(env.success, "{}", env.message);

    // Ref moved, files did not.
    assert_eq!(std::fs::read(dir.path().join("f.txt")).unwrap(), b"v2\n");
    let st = vault.status().data.unwrap();
    assert_eq!(st.modified, ["f.txt"]);

    let bad = vault.reset("does-not-exist", false);
    assert!(!bad.success);
    assert_eq!(bad.error.as_deref(), Some("NotFound"));
}

#[test]
fn read_of_directory_is_rejected() {
    let (_dir, mut vault) = fresh_vault();
    vault.write("docs/a.md", b"a\n", "main", "add");

    let env = vault.read("docs", "main");
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("PreconditionFailed"));
}

#[test]
fn path_escapes_are_rejected() {
    let (_dir, mut vault) = fresh_vault();
    let env = vault.write("../outside.txt", b"x\n", "main", "escape");
    assert!(!env.success);
}

#[test]
fn branch_missing_errors_keep_their_kind() {
    let (_dir, vault) = fresh_vault();
    let env = vault.read("anything", "no-branch");
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("BranchMissing"));
}
