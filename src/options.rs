use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Endings used when none are configured.
pub const DEFAULT_ENDINGS: [&str; 1] = [".py"];

/// Ignore patterns written to a fresh configuration.
pub const DEFAULT_IGNORE: [&str; 8] = [
    ".git",
    "/**/__pycache__",
    ".vscode",
    ".venv",
    ".env",
    "generate_codebase.*",
    "*codebase.txt",
    "*.lock",
];

pub fn default_endings() -> Vec<String> {
    DEFAULT_ENDINGS.iter().map(|s| s.to_string()).collect()
}

pub fn default_ignore() -> Vec<String> {
    DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect()
}

/// Prefixes `.` to endings that lack it.
pub fn normalize_ending(ending: &str) -> String {
    if ending.starts_with('.') {
        ending.to_string()
    } else {
        format!(".{}", ending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenOptions {
    pub root: PathBuf,
    pub endings: Vec<String>,
    pub ignore_hidden: bool,
    /// Walk scopes. Relative entries are taken from `root`; empty means the
    /// root itself.
    pub subdirs: Vec<PathBuf>,
    pub ignore_patterns: Vec<String>,
    pub dedupe_files: bool,
    pub parallel_reads: bool,
}
impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            endings: default_endings(),
            ignore_hidden: true,
            subdirs: Vec::new(),
            ignore_patterns: Vec::new(),
            dedupe_files: false,
            parallel_reads: cfg!(feature = "parallel"),
        }
    }
}
#[derive(Debug, Default)]
pub struct FlattenBuilder {
    options: FlattenOptions,
}
impl FlattenBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: FlattenOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn endings<I, S>(mut self, endings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.options.endings = endings
            .into_iter()
            .map(|e| normalize_ending(e.as_ref()))
            .collect();
        self
    }
    pub fn ignore_hidden(mut self, yes: bool) -> Self {
        self.options.ignore_hidden = yes;
        self
    }
    pub fn subdirs<I, P>(mut self, subdirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.options.subdirs = subdirs.into_iter().map(Into::into).collect();
        self
    }
    pub fn ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.ignore_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }
    pub fn dedupe_files(mut self, yes: bool) -> Self {
        self.options.dedupe_files = yes;
        self
    }
    pub fn parallel_reads(mut self, yes: bool) -> Self {
        self.options.parallel_reads = yes;
        self
    }
    pub fn build(self) -> FlattenOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_normalizes_endings() {
        let options = FlattenBuilder::new("/tmp/x").endings(["rs", ".toml"]).build();
        assert_eq!(options.endings, vec![".rs", ".toml"]);
    }

    #[test]
    fn defaults_are_fresh_per_call() {
        let mut first = default_ignore();
        first.push("**/.*".to_string());
        assert_eq!(default_ignore().len(), DEFAULT_IGNORE.len());
        assert_eq!(FlattenOptions::default().endings, vec![".py"]);
    }
}
