//! Ignore-pattern resolution.
//!
//! Patterns are expanded once against the root into two sets of absolute paths
//! (ignored directories and ignored files). Matches of negated patterns are
//! removed from the ignored set after every pattern has been expanded, so a
//! `!pattern` always wins over an ignore pattern, whatever their order.

use crate::error::{CodebaseError, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
#[cfg(feature = "logging")]
use tracing;

/// Patterns appended when hidden entries are ignored: any dot-prefixed
/// component at any depth, and root-level dotfiles.
pub const HIDDEN_PATTERNS: [&str; 2] = ["**/.*", ".*"];

/// A single parsed ignore pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    glob: String,
    negated: bool,
    anchored: bool,
    dir_only: bool,
}

impl IgnoreRule {
    /// Parses a raw pattern. Returns `None` for patterns that are empty, or
    /// become empty once the `!` and `/` markers are stripped.
    pub fn parse(raw: &str) -> Option<Self> {
        let (negated, rest) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (anchored, rest) = match rest.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let (dir_only, rest) = match rest.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        if rest.is_empty() {
            return None;
        }
        Some(Self {
            glob: rest.to_string(),
            negated,
            anchored,
            dir_only,
        })
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// The glob matched against root-relative paths. Unanchored patterns may
    /// match at any depth.
    fn effective_glob(&self) -> String {
        if self.anchored || self.glob.starts_with("**") {
            self.glob.clone()
        } else {
            format!("**/{}", self.glob)
        }
    }
}

/// Decides whether a path is excluded from the walk.
#[derive(Debug, Clone, Default)]
pub struct IgnoreMatcher {
    dirs: HashSet<PathBuf>,
    files: HashSet<PathBuf>,
}

#[derive(Default)]
struct Expansion {
    ignored: BTreeSet<PathBuf>,
    include: BTreeSet<PathBuf>,
}

impl IgnoreMatcher {
    /// Expands `patterns` against `root` (an absolute path). When
    /// `ignore_hidden` is set the [`HIDDEN_PATTERNS`] are appended.
    pub fn resolve<S: AsRef<str>>(patterns: &[S], root: &Path, ignore_hidden: bool) -> Result<Self> {
        let mut rules: Vec<IgnoreRule> = patterns
            .iter()
            .filter_map(|p| IgnoreRule::parse(p.as_ref()))
            .collect();
        if ignore_hidden {
            rules.extend(HIDDEN_PATTERNS.iter().filter_map(|p| IgnoreRule::parse(p)));
        }
        if rules.is_empty() {
            return Ok(Self::default());
        }

        let mut builder = GlobSetBuilder::new();
        for rule in &rules {
            let glob = GlobBuilder::new(&rule.effective_glob())
                .literal_separator(true)
                .build()
                .map_err(|e| CodebaseError::pattern(&rule.glob, e))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| CodebaseError::pattern("<set>", e))?;

        let expansion = expand(root, Arc::new(set), Arc::new(rules));
        let Expansion { ignored, include } = expansion;

        let mut matcher = Self::default();
        for path in ignored.difference(&include) {
            if fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false) {
                matcher.dirs.insert(path.clone());
            } else {
                matcher.files.insert(path.clone());
            }
        }
        #[cfg(feature = "logging")]
        tracing::debug!(
            "Resolved ignore set: {} directories, {} files ({} forced includes)",
            matcher.dirs.len(),
            matcher.files.len(),
            include.len()
        );
        Ok(matcher)
    }

    /// True when `path` is an ignored file, or equals or lies under an
    /// ignored directory. The check is component-wise, so `/a/foo2` is not
    /// under `/a/foo`.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.files.contains(path) || path.ancestors().any(|a| self.dirs.contains(a))
    }
}

/// One pass over the root, hidden entries included and no ignore files
/// honoured. A directory matched only by ignore rules is not descended:
/// nothing beneath it can change the outcome once it is ignored.
fn expand(root: &Path, set: Arc<GlobSet>, rules: Arc<Vec<IgnoreRule>>) -> Expansion {
    let shared = Arc::new(Mutex::new(Expansion::default()));
    let state = Arc::clone(&shared);
    let base = root.to_path_buf();

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .filter_entry(move |entry| {
            let Ok(rel) = entry.path().strip_prefix(&base) else {
                return true;
            };
            if rel.as_os_str().is_empty() {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir())
                || (entry.path_is_symlink() && entry.path().is_dir());
            let mut ignored = false;
            let mut included = false;
            for idx in set.matches(rel) {
                let rule = &rules[idx];
                if rule.dir_only && !is_dir {
                    continue;
                }
                if rule.negated {
                    included = true;
                } else {
                    ignored = true;
                }
            }
            if ignored || included {
                let mut guard = match state.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                if ignored {
                    guard.ignored.insert(entry.path().to_path_buf());
                }
                if included {
                    guard.include.insert(entry.path().to_path_buf());
                }
            }
            !(ignored && !included && is_dir)
        });

    for result in builder.build() {
        if let Err(_e) = result {
            #[cfg(feature = "logging")]
            tracing::warn!("Skipping unreadable entry during pattern expansion: {}", _e);
        }
    }

    // The builder still owns the filter closure, so take the state out.
    let mut guard = match shared.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    std::mem::take(&mut *guard)
}
