//! Writing the flattened artifact to disk.
//!
//! The artifact is written to a temporary file next to the destination and
//! renamed into place, so a failed run never leaves a truncated file behind.

use crate::error::{CodebaseError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default artifact name for a project directory: `<name>_codebase.txt`.
pub fn default_output_name(project: &str) -> String {
    format!("{}_codebase.txt", project)
}

/// Default artifact path inside `root`.
pub fn default_output_path(root: &Path) -> PathBuf {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "codebase".to_string());
    root.join(default_output_name(&name))
}

/// Atomically replaces `path` with `bytes`.
pub fn write_output(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| CodebaseError::io(&dir, e))?;
    tmp.write_all(bytes).map_err(|e| CodebaseError::io(tmp.path(), e))?;
    tmp.flush().map_err(|e| CodebaseError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| CodebaseError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn replaces_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old contents that are longer").unwrap();
        write_output(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory_fails_without_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");
        assert!(matches!(
            write_output(&path, b"x"),
            Err(CodebaseError::Io { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn default_path_uses_folder_name() {
        assert_eq!(
            default_output_path(Path::new("/work/proj")),
            PathBuf::from("/work/proj/proj_codebase.txt")
        );
    }
}
