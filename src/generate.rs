//! End-to-end generation: resolve the input, reconcile stored settings,
//! flatten and write the artifact.

use crate::config::{CONFIG_FILE_NAME, ConfigStore, FilterArgs, FilterSettings};
use crate::engine::flatten;
use crate::error::{CodebaseError, Result};
use crate::options::{FlattenBuilder, default_endings};
use crate::output::{default_output_name, default_output_path, write_output};
use crate::target::{Target, default_search_paths};
use crate::types::Flattened;
use crate::vcs::{Checkout, GitCloner, RepositoryCloner};
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

/// Inputs of one generation run.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Directory, package name, or repository URL.
    pub input: String,
    pub outfile: Option<PathBuf>,
    /// Endings added to the stored ones; a missing leading `.` is added.
    pub endings: Vec<String>,
    pub config_path: Option<PathBuf>,
    pub ignore_hidden: Option<bool>,
    pub save_config: bool,
    pub overwrite: bool,
    pub subdirs: Option<Vec<String>>,
    pub dedupe_files: bool,
    pub search_paths: Vec<PathBuf>,
}

impl GenerateRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            outfile: None,
            endings: default_endings(),
            config_path: None,
            ignore_hidden: None,
            save_config: true,
            overwrite: false,
            subdirs: None,
            dedupe_files: false,
            search_paths: default_search_paths(),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Written { path: PathBuf, report: Flattened },
    /// The output existed and replacing it was declined.
    Declined { path: PathBuf },
}

pub struct Generator<C: RepositoryCloner = GitCloner> {
    cloner: C,
}

impl Default for Generator<GitCloner> {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<GitCloner> {
    pub fn new() -> Self {
        Self { cloner: GitCloner }
    }
}

impl<C: RepositoryCloner> Generator<C> {
    pub fn with_cloner(cloner: C) -> Self {
        Self { cloner }
    }

    /// Runs a generation. `confirm` is asked whether an existing output may
    /// be replaced when `overwrite` is not set.
    pub fn run<F>(&self, request: &GenerateRequest, confirm: F) -> Result<Outcome>
    where
        F: FnOnce(&Path) -> bool,
    {
        let target = Target::resolve(&request.input, &request.search_paths)?;
        #[cfg(feature = "logging")]
        tracing::debug!("Resolved {} to {:?}", request.input, target);

        // Held until the run ends; dropping it removes the clone.
        let checkout;
        let (root, default_out, default_config) = match &target {
            Target::Remote(url) => {
                checkout = Checkout::clone_with(&self.cloner, url)?;
                let cwd = std::env::current_dir().map_err(|e| CodebaseError::io(".", e))?;
                let name = checkout.name().to_string();
                (
                    checkout.workdir().to_path_buf(),
                    cwd.join(default_output_name(&name)),
                    cwd.join(format!("{}_{}", name, CONFIG_FILE_NAME)),
                )
            }
            Target::Package(dir) | Target::Directory(dir) => (
                dir.clone(),
                default_output_path(dir),
                dir.join(CONFIG_FILE_NAME),
            ),
        };

        let outfile = request.outfile.clone().unwrap_or(default_out);
        if outfile.exists() && !request.overwrite && !confirm(&outfile) {
            #[cfg(feature = "logging")]
            tracing::info!("Keeping existing {}", outfile.display());
            return Ok(Outcome::Declined { path: outfile });
        }

        let config_path = request.config_path.clone().unwrap_or(default_config);
        let mut store = ConfigStore::open(config_path, request.save_config)?;
        let args = FilterArgs {
            endings: request.endings.clone(),
            ignore_hidden: request.ignore_hidden,
            subdirs: request.subdirs.clone(),
        };
        let settings = FilterSettings::reconcile(&mut store, &args)?;

        let options = FlattenBuilder::new(&root)
            .endings(&settings.endings)
            .ignore_hidden(settings.ignore_hidden)
            .ignore_patterns(settings.ignore.iter().cloned())
            .subdirs(settings.subdirs.iter().map(PathBuf::from))
            .dedupe_files(request.dedupe_files)
            .build();
        let report = flatten(&options)?;

        write_output(&outfile, &report.output)?;
        #[cfg(feature = "logging")]
        tracing::info!("Wrote {} bytes to {}", report.output.len(), outfile.display());
        Ok(Outcome::Written {
            path: outfile,
            report,
        })
    }
}
