use crate::assemble::assemble;
use crate::error::{CodebaseError, Result};
use crate::options::FlattenOptions;
use crate::patterns::IgnoreMatcher;
use crate::tree::render_tree;
use crate::types::Flattened;
use crate::walker::TreeWalker;
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

pub const TREE_HEADER: &str = "# folder tree:\n\n";

fn scopes(root: &Path, subdirs: &[PathBuf]) -> Vec<PathBuf> {
    if subdirs.is_empty() {
        return vec![root.to_path_buf()];
    }
    subdirs
        .iter()
        .map(|sd| {
            if sd.as_os_str().is_empty() {
                root.to_path_buf()
            } else {
                root.join(sd)
            }
        })
        .collect()
}

/// Folder name shown on the first tree line.
pub fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

/// Runs the whole pipeline: resolve patterns, walk the scopes, render the
/// tree and assemble the content blocks.
pub fn flatten(options: &FlattenOptions) -> Result<Flattened> {
    #[cfg(feature = "logging")]
    tracing::debug!("Flattening {}", options.root.display());
    let named = absolute_path(&options.root)?;
    let root = fs::canonicalize(&options.root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            CodebaseError::NotFound(options.root.display().to_string())
        }
        _ => CodebaseError::io(&options.root, e),
    })?;
    if !root.is_dir() {
        return Err(CodebaseError::NotFound(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let matcher = IgnoreMatcher::resolve(&options.ignore_patterns, &root, options.ignore_hidden)?;
    let scopes = scopes(&root, &options.subdirs)
        .into_iter()
        .map(|s| normalize(&s))
        .collect::<Vec<_>>();
    let walk = TreeWalker::new(&root, &matcher, options.ignore_hidden)
        .dedupe_files(options.dedupe_files)
        .walk(&scopes)?;

    let tree = render_tree(&walk.tree, &root_name(&named));
    let assembled = assemble(&walk.files, &options.endings, &root, options.parallel_reads)?;

    let mut output = Vec::with_capacity(TREE_HEADER.len() + tree.len() + 1 + assembled.content.len());
    output.extend_from_slice(TREE_HEADER.as_bytes());
    output.extend_from_slice(tree.as_bytes());
    output.push(b'\n');
    output.extend_from_slice(&assembled.content);

    #[cfg(feature = "logging")]
    tracing::info!(
        "Flattened {}: {} files included, {} excluded",
        root.display(),
        assembled.included.len(),
        assembled.excluded.len()
    );
    Ok(Flattened {
        root,
        tree,
        files: walk.files,
        included: assembled.included,
        excluded: assembled.excluded,
        output,
    })
}

/// Absolute form of `path` as it was named: symbolic links are kept, `.`
/// and `..` are resolved lexically.
pub(crate) fn absolute_path(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .map(|p| normalize(&p))
        .map_err(|e| CodebaseError::io(path, e))
}

/// Lexically removes `.` and resolves `..` so scopes compare against the
/// canonical root.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_subdir_means_root() {
        let root = Path::new("/r");
        assert_eq!(scopes(root, &[]), vec![PathBuf::from("/r")]);
        assert_eq!(
            scopes(root, &[PathBuf::new(), PathBuf::from("src")]),
            vec![PathBuf::from("/r"), PathBuf::from("/r/src")]
        );
    }

    #[cfg(unix)]
    #[test]
    fn linked_root_keeps_its_own_name() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir(base.join("real")).unwrap();
        fs::write(base.join("real/a.py"), "A").unwrap();
        std::os::unix::fs::symlink(base.join("real"), base.join("alias")).unwrap();

        let options = crate::options::FlattenBuilder::new(base.join("alias")).build();
        let result = flatten(&options).unwrap();
        assert_eq!(result.tree, "-alias\n  - a.py\n");
        assert_eq!(result.included, vec!["a.py"]);
    }

    #[test]
    fn absolute_path_keeps_names_and_resolves_dots() {
        assert_eq!(
            absolute_path(Path::new("/r/./link/../other")).unwrap(),
            PathBuf::from("/r/other")
        );
    }

    #[test]
    fn normalize_drops_dot_segments() {
        assert_eq!(normalize(Path::new("/r/./a/../b")), PathBuf::from("/r/b"));
    }
}
