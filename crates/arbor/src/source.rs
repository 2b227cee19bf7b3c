//! # Sources — Named Descriptions
//!
//! Settings, scene, and prefab descriptions can be referred to by name. A
//! [`SourceLoader`] turns that name into a JSON value:
//!
//! ```text
//! "level1"   ──DirectorySource("assets")──▶  assets/level1.json  ──▶  Value
//! "asteroid" ──MemorySource──────────────▶  in-memory table     ──▶  Value
//! ```
//!
//! What the value means (settings, scene, or prefab) is decided by the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Error, Result};

pub trait SourceLoader {
    fn load(&self, id: &str) -> Result<Value>;
}

/// A loader that knows no sources. The default for a new scene.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSources;

impl SourceLoader for NoSources {
    fn load(&self, id: &str) -> Result<Value> {
        Err(Error::Source {
            id: id.to_string(),
            reason: "no source loader configured".to_string(),
        })
    }
}

/// Sources held in memory, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sources: HashMap<String, Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, value: Value) {
        self.sources.insert(id.to_string(), value);
    }

    pub fn with(mut self, id: &str, value: Value) -> Self {
        self.insert(id, value);
        self
    }
}

impl SourceLoader for MemorySource {
    fn load(&self, id: &str) -> Result<Value> {
        self.sources.get(id).cloned().ok_or_else(|| Error::Source {
            id: id.to_string(),
            reason: "not found".to_string(),
        })
    }
}

/// JSON files under a root directory: `id` resolves to `<root>/<id>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

impl SourceLoader for DirectorySource {
    fn load(&self, id: &str) -> Result<Value> {
        let source_error = |reason: String| Error::Source {
            id: id.to_string(),
            reason,
        };
        if id.is_empty() || id.split(['/', '\\']).any(|part| part == "..") {
            return Err(source_error("identifier leaves the source directory".to_string()));
        }
        let path = self.path_of(id);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| source_error(format!("{}: {e}", path.display())))?;
        log::debug!("loaded source `{id}` from {}", path.display());
        serde_json::from_str(&text).map_err(|e| source_error(format!("{}: {e}", path.display())))
    }
}
