//! Backing stores for module sources.
//!
//! The registry asks a [`ModuleSource`] for the text of a named module; it
//! does not care whether the text comes from a search path or memory. An
//! [`Input`] feeds one explicit source to
//! [`ModuleRegistry::parse_module`](crate::ModuleRegistry::parse_module).

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::trace;
use yangtree_foundation::{Error, Result, is_newer};
use yangtree_syntax::SchemaFormat;

use crate::config::RegistryConfig;

// =============================================================================
// SourceText
// =============================================================================

/// Source text of one module, as handed out by a [`ModuleSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceText {
    /// The module text.
    pub text: String,
    /// Its concrete syntax.
    pub format: SchemaFormat,
    /// File the text was read from, if any.
    pub origin: Option<PathBuf>,
}

impl SourceText {
    /// Creates source text without an origin.
    #[must_use]
    pub fn new(text: impl Into<String>, format: SchemaFormat) -> Self {
        Self {
            text: text.into(),
            format,
            origin: None,
        }
    }
}

/// A backing store that can supply module sources by name.
pub trait ModuleSource {
    /// Fetches the source of `name`, preferably at `revision`.
    ///
    /// When `revision` is `None` the newest available source is returned.
    /// `Ok(None)` means the store has no such module.
    ///
    /// # Errors
    /// Returns an I/O error when a matching source exists but cannot be read.
    fn fetch(&mut self, name: &str, revision: Option<&str>) -> Result<Option<SourceText>>;
}

// =============================================================================
// SearchPathSource
// =============================================================================

/// Looks for `name.yang`, `name@revision.yang` and their `.yin` twins in a
/// list of directories.
#[derive(Clone, Debug, Default)]
pub struct SearchPathSource {
    dirs: Vec<PathBuf>,
}

/// A file that may hold a module.
struct Candidate {
    path: PathBuf,
    revision: Option<String>,
    format: SchemaFormat,
}

impl SearchPathSource {
    /// Creates a source searching the given directories in order.
    #[must_use]
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Creates a source from a registry configuration.
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.effective_dirs())
    }

    /// Returns the searched directories.
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Lists the files of `dir` that may contain module `name`.
    fn candidates(dir: &Path, name: &str) -> Result<Vec<Candidate>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(Some(dir.display().to_string()), e.to_string())),
        };

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(Some(dir.display().to_string()), e.to_string()))?;
            let path = entry.path();
            let Some(format) = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(SchemaFormat::from_extension)
            else {
                continue;
            };
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let (stem_name, revision) = match stem.split_once('@') {
                Some((n, rev)) => (n, Some(rev.to_string())),
                None => (stem, None),
            };
            if stem_name == name {
                found.push(Candidate {
                    path,
                    revision,
                    format,
                });
            }
        }
        // Directory order is unspecified.
        found.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(found)
    }
}

impl ModuleSource for SearchPathSource {
    fn fetch(&mut self, name: &str, revision: Option<&str>) -> Result<Option<SourceText>> {
        let mut all = Vec::new();
        for dir in &self.dirs {
            all.extend(Self::candidates(dir, name)?);
        }

        let chosen = match revision {
            Some(rev) => all
                .iter()
                .find(|c| c.revision.as_deref() == Some(rev))
                .or_else(|| all.iter().find(|c| c.revision.is_none())),
            None => all
                .iter()
                .filter(|c| c.revision.is_some())
                .fold(None::<&Candidate>, |best, c| match best {
                    Some(b) if !is_newer(c.revision.as_deref(), b.revision.as_deref()) => Some(b),
                    _ => Some(c),
                })
                .or_else(|| all.iter().find(|c| c.revision.is_none())),
        };

        let Some(candidate) = chosen else {
            trace!(module = name, "no file found in search path");
            return Ok(None);
        };
        trace!(module = name, path = %candidate.path.display(), "reading module file");
        let text = fs::read_to_string(&candidate.path)
            .map_err(|e| Error::io(Some(candidate.path.display().to_string()), e.to_string()))?;
        Ok(Some(SourceText {
            text,
            format: candidate.format,
            origin: Some(candidate.path.clone()),
        }))
    }
}

// =============================================================================
// MemorySource
// =============================================================================

/// An in-memory store of module sources.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    entries: Vec<(String, Option<String>, SourceText)>,
}

impl MemorySource {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a YANG source for `name` at `revision`.
    pub fn add(&mut self, name: impl Into<String>, revision: Option<&str>, text: impl Into<String>) {
        self.add_source(name, revision, SourceText::new(text, SchemaFormat::Yang));
    }

    /// Adds a source in any syntax.
    pub fn add_source(&mut self, name: impl Into<String>, revision: Option<&str>, source: SourceText) {
        self.entries
            .push((name.into(), revision.map(str::to_string), source));
    }

    /// Builder variant of [`MemorySource::add`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, revision: Option<&str>, text: impl Into<String>) -> Self {
        self.add(name, revision, text);
        self
    }

    /// Returns the number of stored sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ModuleSource for MemorySource {
    fn fetch(&mut self, name: &str, revision: Option<&str>) -> Result<Option<SourceText>> {
        let named = self.entries.iter().filter(|(n, _, _)| n == name);
        let found = match revision {
            Some(rev) => named
                .clone()
                .find(|(_, r, _)| r.as_deref() == Some(rev))
                .or_else(|| named.clone().find(|(_, r, _)| r.is_none())),
            None => named.fold(None::<&(String, Option<String>, SourceText)>, |best, e| {
                match best {
                    Some(b) if !is_newer(e.1.as_deref(), b.1.as_deref()) => Some(b),
                    _ => Some(e),
                }
            }),
        };
        Ok(found.map(|(_, _, source)| source.clone()))
    }
}

// =============================================================================
// Input
// =============================================================================

/// One explicit module source.
#[derive(Debug)]
pub enum Input {
    /// Text held in memory.
    Memory(String),
    /// An already opened file.
    File(File),
    /// A file to open.
    Path(PathBuf),
}

impl Input {
    /// Creates an in-memory input.
    #[must_use]
    pub fn memory(text: impl Into<String>) -> Self {
        Self::Memory(text.into())
    }

    /// Creates a path input.
    #[must_use]
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Reads the whole input.
    ///
    /// Returns the text and, for path inputs, the path it came from.
    ///
    /// # Errors
    /// Returns an I/O error if the input cannot be read or is not UTF-8.
    pub fn read(self) -> Result<(String, Option<PathBuf>)> {
        match self {
            Self::Memory(text) => Ok((text, None)),
            Self::File(mut file) => {
                let mut text = String::new();
                file.read_to_string(&mut text)?;
                Ok((text, None))
            }
            Self::Path(path) => {
                let text = fs::read_to_string(&path)
                    .map_err(|e| Error::io(Some(path.display().to_string()), e.to_string()))?;
                Ok((text, Some(path)))
            }
        }
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Self::Memory(text.to_string())
    }
}

impl From<File> for Input {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}
