//! Where catalog tables come from.

use crate::error::{CatalogError, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A named collection of binary table resources.
pub trait ResourceSource: Send + Sync {
    /// Full contents of the named resource, or [`CatalogError::MissingTable`].
    fn open(&self, name: &str) -> Result<Bytes>;

    /// Human readable location, for logging.
    fn describe(&self) -> String;
}

/// Tables stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Fails when `root` is not an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CatalogError::InvalidSource(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for DirectorySource {
    fn open(&self, name: &str) -> Result<Bytes> {
        let path = self.root.join(name);
        match std::fs::read(&path) {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(CatalogError::MissingTable(name.to_string()))
            }
            Err(source) => Err(CatalogError::Io {
                name: path.display().to_string(),
                source,
            }),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Tables held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, Bytes>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Bytes>) {
        self.files.insert(name.into(), data.into());
    }

    pub fn with(mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Bytes> {
        self.files.remove(name)
    }
}

impl ResourceSource for MemorySource {
    fn open(&self, name: &str) -> Result<Bytes> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::MissingTable(name.to_string()))
    }

    fn describe(&self) -> String {
        format!("memory ({} tables)", self.files.len())
    }
}
