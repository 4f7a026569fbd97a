//! # codebase-context
//!
//! `codebase_context` flattens a directory tree into one text artifact: a
//! rendered folder tree followed by the raw contents of every selected file,
//! each under a `# File: <path>` header.
//!
//! Selection is driven by glob ignore patterns (`!pattern` forces a path back
//! in, `/pattern` anchors it to the root), an optional hidden-file policy,
//! a list of subdirectory scopes and an allowlist of file endings. Ignored
//! directories are pruned before they are descended into.
//!
//! [`flatten`] is the core entry point. [`Generator`] adds the surrounding
//! workflow: resolving a directory, package name or repository URL, keeping
//! the filter settings in a TOML file and writing the artifact atomically.
//!
//! # Features
//!
//! - `parallel`: Reads selected files concurrently using Rayon. Output order
//!   is unaffected.
//! - `logging`: Emits diagnostics via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use codebase_context::{FlattenBuilder, flatten};
//!
//! let options = FlattenBuilder::new(".")
//!     .endings([".rs", ".toml"])
//!     .ignore_patterns(["target", "*.lock", "!keep.lock"])
//!     .ignore_hidden(true)
//!     .build();
//!
//! let result = flatten(&options).expect("Failed to flatten directory");
//!
//! println!("{}", result.tree);
//! for path in &result.excluded {
//!     println!("excluding {}", path);
//! }
//! ```

pub mod assemble;
pub mod config;
mod engine;
mod error;
pub mod generate;
mod options;
pub mod output;
pub mod patterns;
pub mod target;
pub mod tree;
mod types;
pub mod vcs;
pub mod walker;

pub use config::{ConfigStore, FilterArgs, FilterSettings};
pub use engine::{TREE_HEADER, flatten, root_name};
pub use error::{CodebaseError, Result};
pub use generate::{GenerateRequest, Generator, Outcome};
pub use options::{
    DEFAULT_ENDINGS, DEFAULT_IGNORE, FlattenBuilder, FlattenOptions, default_endings,
    default_ignore, normalize_ending,
};
pub use patterns::{IgnoreMatcher, IgnoreRule};
pub use target::Target;
pub use tree::{FolderTree, FolderTreeNode, render_tree};
pub use types::Flattened;
pub use vcs::{GitCloner, RepositoryCloner, is_git_url};
pub use walker::{TreeWalker, Walk};
