//! Cloning of hosted repositories into a temporary checkout.

use crate::error::{CodebaseError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::TempDir;
#[cfg(feature = "logging")]
use tracing;

static GIT_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?github\.com/.+/.+(\.git)?$").expect("valid git url regex")
});

/// True for `http(s)://github.com/<owner>/<repo>` style inputs.
pub fn is_git_url(input: &str) -> bool {
    GIT_URL.is_match(input)
}

/// Last path segment of a repository URL, without query, fragment, trailing
/// slash or `.git` suffix.
pub fn repo_name(url: &str) -> String {
    let trimmed = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Clones a remote repository into a local directory.
pub trait RepositoryCloner {
    /// Clones `url` into `dest` and returns the working directory.
    fn clone_into(&self, url: &str, dest: &Path) -> Result<PathBuf>;
}

/// [`RepositoryCloner`] backed by libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCloner;

impl RepositoryCloner for GitCloner {
    fn clone_into(&self, url: &str, dest: &Path) -> Result<PathBuf> {
        #[cfg(feature = "logging")]
        tracing::info!("Cloning {} into {}", url, dest.display());
        let repo = git2::build::RepoBuilder::new()
            .clone(url, dest)
            .map_err(|e| CodebaseError::Vcs(format!("failed to clone {}: {}", url, e)))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| CodebaseError::Vcs(format!("{} has no working directory", url)))?;
        if !workdir.is_dir() {
            return Err(CodebaseError::Vcs(format!(
                "working directory of {} is missing",
                url
            )));
        }
        Ok(workdir.to_path_buf())
    }
}

/// A cloned repository living in a temporary directory, removed on drop.
#[derive(Debug)]
pub struct Checkout {
    workdir: PathBuf,
    name: String,
    _dir: TempDir,
}

impl Checkout {
    pub fn clone_with<C: RepositoryCloner + ?Sized>(cloner: &C, url: &str) -> Result<Self> {
        let name = repo_name(url);
        let dir = tempfile::Builder::new()
            .prefix(&format!("codebase_context_{}_", name))
            .tempdir()
            .map_err(|e| CodebaseError::io(std::env::temp_dir(), e))?;
        let workdir = cloner.clone_into(url, dir.path())?;
        Ok(Self {
            workdir,
            name,
            _dir: dir,
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Repository name derived from the URL.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct FakeCloner;

    impl RepositoryCloner for FakeCloner {
        fn clone_into(&self, _url: &str, dest: &Path) -> Result<PathBuf> {
            fs::write(dest.join("main.py"), "print('hi')").unwrap();
            Ok(dest.to_path_buf())
        }
    }

    struct FailingCloner;

    impl RepositoryCloner for FailingCloner {
        fn clone_into(&self, url: &str, _dest: &Path) -> Result<PathBuf> {
            Err(CodebaseError::Vcs(format!("cannot reach {}", url)))
        }
    }

    #[test]
    fn recognizes_hosted_urls() {
        assert!(is_git_url("https://github.com/owner/repo"));
        assert!(is_git_url("http://www.github.com/owner/repo.git"));
        assert!(!is_git_url("github.com/owner/repo"));
        assert!(!is_git_url("https://github.com/owner"));
        assert!(!is_git_url("./local/dir"));
    }

    #[test]
    fn repo_name_strips_decorations() {
        assert_eq!(repo_name("https://github.com/o/repo.git"), "repo");
        assert_eq!(repo_name("https://github.com/o/repo/"), "repo");
        assert_eq!(repo_name("https://github.com/o/repo?tab=readme"), "repo");
    }

    #[test]
    fn checkout_is_removed_on_drop() {
        let checkout = Checkout::clone_with(&FakeCloner, "https://github.com/o/demo").unwrap();
        let dir = checkout.workdir().to_path_buf();
        assert!(dir.join("main.py").is_file());
        assert_eq!(checkout.name(), "demo");
        assert!(dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("codebase_context_demo_"));
        drop(checkout);
        assert!(!dir.exists());
    }

    #[test]
    fn clone_failure_is_a_vcs_error() {
        let err = Checkout::clone_with(&FailingCloner, "https://github.com/o/x").unwrap_err();
        assert!(matches!(err, CodebaseError::Vcs(_)));
    }
}
