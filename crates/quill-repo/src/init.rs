use std::fs;
use std::path::Path;

use crate::EngineError;

/// Initialize the `.git` structure at `root`.
///
/// Creates:
/// - HEAD (symbolic to the default branch)
/// - config (minimal `[core]` section)
/// - objects/
/// - refs/heads/, refs/tags/, refs/remotes/
///
/// Re-running init on an existing repository is a safe no-op: nothing is
/// overwritten.
pub fn init_repository(root: &Path, default_branch: &str) -> Result<(), EngineError> {
    let git_dir = root.join(".git");

    if git_dir.join("HEAD").is_file() {
        return Ok(());
    }

    fs::create_dir_all(root)?;
    fs::create_dir_all(git_dir.join("objects"))?;
    fs::create_dir_all(git_dir.join("refs").join("heads"))?;
    fs::create_dir_all(git_dir.join("refs").join("tags"))?;
    fs::create_dir_all(git_dir.join("refs").join("remotes"))?;

    fs::write(
        git_dir.join("HEAD"),
        format!("ref: refs/heads/{default_branch}\n"),
    )?;

    fs::write(
        git_dir.join("config"),
        "[core]\n\trepositoryformatversion = 0\n\tfilemode = true\n\tbare = false\n",
    )?;

    log::debug!("initialized repository at {}", root.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        init_repository(dir.path(), "main").unwrap();

        let git_dir = dir.path().join(".git");
        assert_eq!(
            fs::read_to_string(git_dir.join("HEAD")).unwrap(),
            "ref: refs/heads/main\n"
        );
        assert!(git_dir.join("objects").is_dir());
        assert!(git_dir.join("refs/heads").is_dir());
        assert!(git_dir.join("refs/tags").is_dir());
        assert!(git_dir.join("refs/remotes").is_dir());

        let config = fs::read_to_string(git_dir.join("config")).unwrap();
        assert!(config.contains("repositoryformatversion = 0"));
        assert!(config.contains("bare = false"));
    }

    #[test]
    fn reinit_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        init_repository(dir.path(), "main").unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/other\n").unwrap();

        init_repository(dir.path(), "main").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join(".git/HEAD")).unwrap(),
            "ref: refs/heads/other\n"
        );
    }

    #[test]
    fn creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/repo");
        init_repository(&nested, "trunk").unwrap();
        assert!(nested.join(".git/HEAD").is_file());
    }
}
