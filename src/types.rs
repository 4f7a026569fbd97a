use std::path::PathBuf;

/// The complete result of a flatten run.
#[derive(Debug, Clone)]
pub struct Flattened {
    /// Canonical root directory that was walked.
    pub root: PathBuf,
    /// Rendered folder tree, starting with `-<root name>`.
    pub tree: String,
    /// Absolute paths of every file that survived the walk, in walk order.
    pub files: Vec<PathBuf>,
    /// Root-relative paths of files whose contents were appended.
    pub included: Vec<String>,
    /// Root-relative paths of files left out by the ending filter.
    pub excluded: Vec<String>,
    /// The artifact: tree header, rendered tree, then the content blocks.
    pub output: Vec<u8>,
}
