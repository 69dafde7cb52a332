//! Configuration for a module registry.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`ModuleRegistry`](crate::ModuleRegistry).
///
/// Controls where module sources are searched and whether imported modules
/// are implemented.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegistryConfig {
    /// Directories searched for module files, in order.
    pub search_dirs: Vec<PathBuf>,

    /// Whether the current working directory is searched after `search_dirs`.
    pub search_cwd: bool,

    /// Implement every loaded module, imports included.
    pub all_implemented: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            search_dirs: Vec::new(),
            search_cwd: true,
            all_implemented: false,
        }
    }
}

impl RegistryConfig {
    /// Creates a configuration that searches nothing but the given directories.
    #[must_use]
    pub fn with_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_dirs: dirs.into_iter().map(Into::into).collect(),
            search_cwd: false,
            ..Self::default()
        }
    }

    /// Builder method to append a search directory.
    #[must_use]
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    /// Builder method to enable/disable searching the current directory.
    #[must_use]
    pub fn with_search_cwd(mut self, search: bool) -> Self {
        self.search_cwd = search;
        self
    }

    /// Builder method to implement every loaded module.
    #[must_use]
    pub fn with_all_implemented(mut self, all: bool) -> Self {
        self.all_implemented = all;
        self
    }

    /// Returns the effective list of directories to search.
    #[must_use]
    pub fn effective_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.search_dirs.clone();
        if self.search_cwd {
            dirs.push(PathBuf::from("."));
        }
        dirs
    }
}
