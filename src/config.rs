//! Persistent settings.
//!
//! [`ConfigStore`] is a small sectioned key/value store kept in a TOML file.
//! [`FilterSettings`] reconciles the arguments of a run with the `[filter]`
//! section of that store, writing the merged values back.

use crate::error::{CodebaseError, Result};
use crate::options::{default_ignore, normalize_ending};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

/// File name of the settings file placed in a project root.
pub const CONFIG_FILE_NAME: &str = "generate_codebase.toml";
pub const FILTER_SECTION: &str = "filter";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    doc: toml::Table,
    autosave: bool,
}

impl ConfigStore {
    /// Opens the store at `path`. A missing file yields an empty store; the
    /// file is only created once something is saved. With `autosave` every
    /// [`set`](Self::set) is written through immediately.
    pub fn open(path: impl Into<PathBuf>, autosave: bool) -> Result<Self> {
        let path = path.into();
        let doc = if path.exists() {
            let text = fs::read_to_string(&path)
                .map_err(|e| CodebaseError::Config(format!("{}: {}", path.display(), e)))?;
            toml::from_str(&text)
                .map_err(|e| CodebaseError::Config(format!("{}: {}", path.display(), e)))?
        } else {
            toml::Table::new()
        };
        Ok(Self {
            path,
            doc,
            autosave,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored value, or `default` when the section or key is absent.
    pub fn get<T: DeserializeOwned>(&self, section: &str, key: &str, default: T) -> Result<T> {
        let Some(value) = self
            .doc
            .get(section)
            .and_then(toml::Value::as_table)
            .and_then(|t| t.get(key))
        else {
            return Ok(default);
        };
        value
            .clone()
            .try_into()
            .map_err(|e| CodebaseError::Config(format!("{}.{}: {}", section, key, e)))
    }

    pub fn set<T: Serialize + ?Sized>(&mut self, section: &str, key: &str, value: &T) -> Result<()> {
        let value = toml::Value::try_from(value)
            .map_err(|e| CodebaseError::Config(format!("{}.{}: {}", section, key, e)))?;
        let table = self
            .doc
            .entry(section.to_string())
            .or_insert(toml::Value::Table(toml::Table::new()));
        let Some(table) = table.as_table_mut() else {
            return Err(CodebaseError::Config(format!(
                "{} is not a table in {}",
                section,
                self.path.display()
            )));
        };
        table.insert(key.to_string(), value);
        if self.autosave {
            self.save()?;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| CodebaseError::Config(format!("{}: {}", parent.display(), e)))?;
            }
        }
        let text = toml::to_string_pretty(&self.doc)
            .map_err(|e| CodebaseError::Config(e.to_string()))?;
        fs::write(&self.path, text)
            .map_err(|e| CodebaseError::Config(format!("{}: {}", self.path.display(), e)))?;
        #[cfg(feature = "logging")]
        tracing::debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

/// Settings supplied for a single run. `None` falls back to the store.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    pub endings: Vec<String>,
    pub ignore_hidden: Option<bool>,
    pub subdirs: Option<Vec<String>>,
}

/// The `[filter]` section after merging run arguments with stored values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSettings {
    pub endings: Vec<String>,
    pub ignore_hidden: bool,
    pub ignore: Vec<String>,
    pub subdirs: Vec<String>,
}

impl FilterSettings {
    /// Merges `args` into the store:
    /// - endings are normalised and unioned with the stored endings;
    /// - `ignore_hidden` comes from the arguments, else the store, else `true`;
    /// - the ignore list is taken from the store, seeded with the defaults;
    /// - subdirs given as arguments replace the stored ones, else the store
    ///   is used, else the root alone.
    pub fn reconcile(store: &mut ConfigStore, args: &FilterArgs) -> Result<Self> {
        if !args.endings.is_empty() {
            let stored: Vec<String> = store.get(FILTER_SECTION, "endings", Vec::new())?;
            let merged: BTreeSet<String> = stored
                .into_iter()
                .chain(args.endings.iter().map(|e| normalize_ending(e)))
                .collect();
            let merged: Vec<String> = merged.into_iter().collect();
            store.set(FILTER_SECTION, "endings", &merged)?;
        }
        let endings: Vec<String> = store.get(FILTER_SECTION, "endings", Vec::new())?;

        let ignore_hidden = match args.ignore_hidden {
            Some(value) => value,
            None => store.get(FILTER_SECTION, "ignore_hidden", true)?,
        };
        store.set(FILTER_SECTION, "ignore_hidden", &ignore_hidden)?;

        let ignore: Vec<String> = store.get(FILTER_SECTION, "ignore", default_ignore())?;
        store.set(FILTER_SECTION, "ignore", &ignore)?;

        let subdirs = match &args.subdirs {
            Some(subdirs) => {
                store.set(FILTER_SECTION, "subdirs", subdirs)?;
                subdirs.clone()
            }
            None => store.get(FILTER_SECTION, "subdirs", vec![String::new()])?,
        };

        Ok(Self {
            endings,
            ignore_hidden,
            ignore,
            subdirs,
        })
    }
}
