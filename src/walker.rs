//! Pruning depth-first walk over one or more scopes under the root.

use crate::error::{CodebaseError, Result};
use crate::patterns::IgnoreMatcher;
use crate::tree::FolderTree;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

/// Surviving entries of a walk.
#[derive(Debug, Clone, Default)]
pub struct Walk {
    /// Directories and files that survived filtering, merged across scopes.
    pub tree: FolderTree,
    /// Absolute file paths in traversal order, scopes in the order given.
    pub files: Vec<PathBuf>,
}

/// Entries of one directory that passed both filters.
struct Survivors {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

pub struct TreeWalker<'a> {
    root: &'a Path,
    matcher: &'a IgnoreMatcher,
    ignore_hidden: bool,
    dedupe_files: bool,
}

impl<'a> TreeWalker<'a> {
    pub fn new(root: &'a Path, matcher: &'a IgnoreMatcher, ignore_hidden: bool) -> Self {
        Self {
            root,
            matcher,
            ignore_hidden,
            dedupe_files: false,
        }
    }

    /// Drop repeated files when scopes overlap.
    pub fn dedupe_files(mut self, yes: bool) -> Self {
        self.dedupe_files = yes;
        self
    }

    pub fn walk(&self, scopes: &[PathBuf]) -> Result<Walk> {
        let mut walk = Walk::default();
        let mut seen = HashSet::new();
        for scope in scopes {
            if !scope.starts_with(self.root) {
                return Err(CodebaseError::InvalidPath(format!(
                    "{} is outside {}",
                    scope.display(),
                    self.root.display()
                )));
            }
            if !scope.is_dir() {
                #[cfg(feature = "logging")]
                tracing::warn!("Skipping missing subdirectory {}", scope.display());
                continue;
            }
            if self.matcher.is_ignored(scope) {
                #[cfg(feature = "logging")]
                tracing::debug!("Subdirectory {} is ignored", scope.display());
                continue;
            }
            self.visit(scope, &mut walk, &mut seen)?;
        }
        #[cfg(feature = "logging")]
        tracing::debug!(
            "Walk finished: {} directories, {} files",
            walk.tree.len(),
            walk.files.len()
        );
        Ok(walk)
    }

    fn visit(&self, dir: &Path, walk: &mut Walk, seen: &mut HashSet<PathBuf>) -> Result<()> {
        let rel = self.relative(dir);
        walk.tree.ensure_dir(&rel);

        let survivors = self.survivors(dir)?;
        for file in survivors.files {
            if let Some(name) = file.file_name() {
                walk.tree.add_file(&rel, &name.to_string_lossy());
            }
            if self.dedupe_files && !seen.insert(file.clone()) {
                continue;
            }
            walk.files.push(file);
        }
        for child in &survivors.dirs {
            self.visit(child, walk, seen)?;
        }
        Ok(())
    }

    /// Lists `dir` sorted by name and keeps entries that pass the hidden-name
    /// filter and the ignore matcher.
    fn survivors(&self, dir: &Path) -> Result<Survivors> {
        let mut entries: Vec<_> = fs::read_dir(dir)
            .map_err(|e| CodebaseError::io(dir, e))?
            .collect::<std::io::Result<_>>()
            .map_err(|e| CodebaseError::io(dir, e))?;
        entries.sort_by_key(|e| e.file_name());

        let mut survivors = Survivors {
            dirs: Vec::new(),
            files: Vec::new(),
        };
        for entry in entries {
            if self.ignore_hidden && entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            if self.matcher.is_ignored(&path) {
                continue;
            }
            let file_type = entry.file_type().map_err(|e| CodebaseError::io(&path, e))?;
            // Linked directories are never descended into.
            if file_type.is_symlink() && path.is_dir() {
                #[cfg(feature = "logging")]
                tracing::debug!("Not following directory link {}", path.display());
                continue;
            }
            if file_type.is_dir() {
                survivors.dirs.push(path);
            } else {
                survivors.files.push(path);
            }
        }
        Ok(survivors)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.root)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn files_of_a_directory_come_before_its_subdirectories() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        touch(&root, "b/z.py");
        touch(&root, "a/y.py");
        touch(&root, "x.py");

        let matcher = IgnoreMatcher::default();
        let walk = TreeWalker::new(&root, &matcher, false)
            .walk(&[root.clone()])
            .unwrap();
        assert_eq!(names(&root, &walk.files), vec!["x.py", "a/y.py", "b/z.py"]);
    }

    #[test]
    fn ignored_subtree_is_pruned() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        touch(&root, "build/keep.py");
        touch(&root, "src/main.py");

        let matcher = IgnoreMatcher::resolve(&["build", "!build/keep.py"], &root, false).unwrap();
        let walk = TreeWalker::new(&root, &matcher, false)
            .walk(&[root.clone()])
            .unwrap();
        assert_eq!(names(&root, &walk.files), vec!["src/main.py"]);
        assert!(walk.tree.get(Path::new("build")).is_none());
    }

    #[test]
    fn hidden_names_are_skipped_without_patterns() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        touch(&root, ".secret/a.py");
        touch(&root, ".b.py");
        touch(&root, "c.py");

        let matcher = IgnoreMatcher::default();
        let walk = TreeWalker::new(&root, &matcher, true)
            .walk(&[root.clone()])
            .unwrap();
        assert_eq!(names(&root, &walk.files), vec!["c.py"]);

        let walk = TreeWalker::new(&root, &matcher, false)
            .walk(&[root.clone()])
            .unwrap();
        assert_eq!(walk.files.len(), 3);
    }

    #[test]
    fn overlapping_scopes_merge_tree_and_optionally_dedupe() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        touch(&root, "src/lib.py");
        touch(&root, "src/core/a.py");
        touch(&root, "docs/readme.md");
        let scopes = vec![root.join("src"), root.join("src/core")];

        let matcher = IgnoreMatcher::default();
        let walk = TreeWalker::new(&root, &matcher, false).walk(&scopes).unwrap();
        assert_eq!(
            names(&root, &walk.files),
            vec!["src/lib.py", "src/core/a.py", "src/core/a.py"]
        );
        assert_eq!(walk.tree.get(Path::new("src/core")).unwrap().files, vec!["a.py"]);
        assert!(walk.tree.get(Path::new("docs")).is_none());

        let walk = TreeWalker::new(&root, &matcher, false)
            .dedupe_files(true)
            .walk(&scopes)
            .unwrap();
        assert_eq!(names(&root, &walk.files), vec!["src/lib.py", "src/core/a.py"]);
    }

    #[cfg(unix)]
    #[test]
    fn directory_links_are_not_followed() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        touch(&root, "a/x.py");
        std::os::unix::fs::symlink(root.join("a"), root.join("a/loop")).unwrap();

        let matcher = IgnoreMatcher::default();
        let walk = TreeWalker::new(&root, &matcher, false)
            .walk(&[root.clone()])
            .unwrap();
        assert_eq!(names(&root, &walk.files), vec!["a/x.py"]);
        assert!(walk.tree.get(Path::new("a/loop")).is_none());
        assert!(walk.tree.get(Path::new("a")).unwrap().dirs.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn linked_directory_cannot_bypass_ignore_patterns() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        touch(&root, "real/secret.log");
        touch(&root, "real/ok.py");
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let matcher = IgnoreMatcher::resolve(&["*.log"], &root, false).unwrap();
        let walk = TreeWalker::new(&root, &matcher, false)
            .walk(&[root.clone()])
            .unwrap();
        assert_eq!(names(&root, &walk.files), vec!["real/ok.py"]);
        assert!(walk.tree.get(Path::new("link")).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn linked_files_are_kept() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        touch(&root, "target.py");
        std::os::unix::fs::symlink(root.join("target.py"), root.join("alias.py")).unwrap();

        let matcher = IgnoreMatcher::default();
        let walk = TreeWalker::new(&root, &matcher, false)
            .walk(&[root.clone()])
            .unwrap();
        assert_eq!(names(&root, &walk.files), vec!["alias.py", "target.py"]);
    }

    #[test]
    fn scope_outside_root_is_rejected() {
        let dir = tempdir().unwrap();
        let other = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let matcher = IgnoreMatcher::default();
        let err = TreeWalker::new(&root, &matcher, false)
            .walk(&[other.path().to_path_buf()])
            .unwrap_err();
        assert!(matches!(err, CodebaseError::InvalidPath(_)));
    }

    #[test]
    fn missing_scope_is_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        touch(&root, "a.py");
        let matcher = IgnoreMatcher::default();
        let walk = TreeWalker::new(&root, &matcher, false)
            .walk(&[root.join("nope"), root.clone()])
            .unwrap();
        assert_eq!(walk.files.len(), 1);
    }
}
