//! Concatenation of selected file contents under path headers.

use crate::error::{CodebaseError, Result};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

pub const HEADER_RULE: &str = "# ======================";

/// Content blocks of the included files plus the paths that were left out.
#[derive(Debug, Clone, Default)]
pub struct Assembled {
    pub content: Vec<u8>,
    /// Root-relative paths of files that received a content block.
    pub included: Vec<String>,
    /// Root-relative paths of files rejected by the ending filter.
    pub excluded: Vec<String>,
}

/// True when the file name ends with one of `endings` (case-sensitive).
pub fn has_allowed_ending<S: AsRef<str>>(path: &Path, endings: &[S]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    endings.iter().any(|e| name.ends_with(e.as_ref()))
}

/// Root-relative path with `/` separators, as written into headers.
pub fn display_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn write_header(out: &mut Vec<u8>, rel: &str) {
    out.extend_from_slice(b"\n\n");
    out.extend_from_slice(HEADER_RULE.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(b"# File: ");
    out.extend_from_slice(rel.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(HEADER_RULE.as_bytes());
    out.push(b'\n');
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| CodebaseError::io(path, e))
}

/// Builds the content blocks for `files` in order. The first unreadable file
/// aborts the whole assembly.
pub fn assemble<S: AsRef<str> + Sync>(
    files: &[PathBuf],
    endings: &[S],
    root: &Path,
    parallel: bool,
) -> Result<Assembled> {
    let mut assembled = Assembled::default();
    let mut selected = Vec::new();
    for path in files {
        let rel = display_path(path, root);
        if has_allowed_ending(path, endings) {
            selected.push((path, rel));
        } else {
            #[cfg(feature = "logging")]
            tracing::info!("excluding {}", rel);
            assembled.excluded.push(rel);
        }
    }

    let contents = read_all(selected.iter().map(|(p, _)| p.as_path()).collect(), parallel)?;

    for ((_, rel), bytes) in selected.into_iter().zip(contents) {
        write_header(&mut assembled.content, &rel);
        assembled.content.extend_from_slice(&bytes);
        assembled.included.push(rel);
    }
    Ok(assembled)
}

#[cfg(feature = "parallel")]
fn read_all(paths: Vec<&Path>, parallel: bool) -> Result<Vec<Vec<u8>>> {
    if parallel {
        #[cfg(feature = "logging")]
        tracing::debug!("Reading {} files in parallel", paths.len());
        return paths.par_iter().map(|p| read_file(p)).collect();
    }
    paths.into_iter().map(read_file).collect()
}

#[cfg(not(feature = "parallel"))]
fn read_all(paths: Vec<&Path>, _parallel: bool) -> Result<Vec<Vec<u8>>> {
    paths.into_iter().map(read_file).collect()
}
