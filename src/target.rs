//! Resolution of the user-supplied input into a directory to flatten.

use crate::engine::absolute_path;
use crate::error::{CodebaseError, Result};
use crate::vcs::is_git_url;
use std::path::{Path, PathBuf};

/// Marker file that makes a directory an importable package.
pub const PACKAGE_MARKER: &str = "__init__.py";
pub const MODULE_SUFFIX: &str = ".py";

/// What an input string refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A hosted repository to clone first.
    Remote(String),
    /// A package found by name in the search paths; holds its directory.
    Package(PathBuf),
    /// An existing local directory.
    Directory(PathBuf),
}

impl Target {
    /// Resolves `input`: repository URLs first, then existing directories,
    /// then package names looked up in `search_paths`. Dotted names map to
    /// nested directories (`a.b` → `a/b`).
    pub fn resolve(input: &str, search_paths: &[PathBuf]) -> Result<Self> {
        if is_git_url(input) {
            return Ok(Target::Remote(input.to_string()));
        }
        let as_path = Path::new(input);
        if as_path.is_dir() {
            return Ok(Target::Directory(absolute_path(as_path)?));
        }
        if let Some(dir) = find_package(input, search_paths) {
            return Ok(Target::Package(absolute_path(&dir)?));
        }
        Err(CodebaseError::NotFound(format!(
            "{} is neither a directory nor a package",
            input
        )))
    }
}

fn find_package(name: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    if name.is_empty() || name.split('.').any(|part| part.is_empty() || part.contains(['/', '\\'])) {
        return None;
    }
    let rel: PathBuf = name.split('.').collect();
    for base in search_paths {
        let package = base.join(&rel);
        if package.join(PACKAGE_MARKER).is_file() {
            return Some(package);
        }
        let mut module = package.into_os_string();
        module.push(MODULE_SUFFIX);
        let module = PathBuf::from(module);
        if module.is_file() {
            return module.parent().map(Path::to_path_buf);
        }
    }
    None
}

/// Search paths for package lookup: entries of `PYTHONPATH`, then the
/// current directory.
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = std::env::var_os("PYTHONPATH")
        .map(|v| std::env::split_paths(&v).collect())
        .unwrap_or_default();
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd);
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn existing_directory_wins() {
        let dir = tempdir().unwrap();
        let input = dir.path().to_string_lossy().into_owned();
        let target = Target::resolve(&input, &[]).unwrap();
        assert_eq!(target, Target::Directory(dir.path().to_path_buf()));
    }

    #[cfg(unix)]
    #[test]
    fn linked_directory_keeps_the_given_name() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        let link = dir.path().join("alias");
        std::os::unix::fs::symlink(dir.path().join("real"), &link).unwrap();

        let target = Target::resolve(&link.to_string_lossy(), &[]).unwrap();
        assert_eq!(target, Target::Directory(link));
    }

    #[test]
    fn package_and_module_lookup() {
        let dir = tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("pkg/inner")).unwrap();
        fs::write(base.join("pkg/__init__.py"), "").unwrap();
        fs::write(base.join("pkg/inner/__init__.py"), "").unwrap();
        fs::write(base.join("single.py"), "").unwrap();
        let search = vec![base.clone()];

        assert_eq!(
            Target::resolve("pkg.inner", &search).unwrap(),
            Target::Package(base.join("pkg/inner"))
        );
        assert_eq!(
            Target::resolve("single", &search).unwrap(),
            Target::Package(base.clone())
        );
    }

    #[test]
    fn unknown_input_is_not_found() {
        let dir = tempdir().unwrap();
        let err = Target::resolve("nonexistentmodule", &[dir.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, CodebaseError::NotFound(_)));
        assert!(Target::resolve("", &[]).is_err());
    }

    #[test]
    fn urls_are_remote() {
        let target = Target::resolve("https://github.com/owner/repo", &[]).unwrap();
        assert_eq!(target, Target::Remote("https://github.com/owner/repo".into()));
    }
}
