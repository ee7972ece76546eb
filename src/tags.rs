//! Highway Classification Table
//!
//! Which `highway=*` values count as routable. The table ships embedded in
//! the binary and can be replaced by a TOML file with the same layout.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::graph::{Entity, Tags};

const EMBEDDED_TABLE: &str = include_str!("../resources/tags/highway.toml");

/// Root of a tag table file (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TagTableFile {
    pub highway: HighwaySection,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HighwaySection {
    pub routable: Vec<String>,
}

/// Runtime table (optimized for lookups)
#[derive(Debug, Clone, PartialEq)]
pub struct TagTable {
    routable_highways: BTreeSet<String>,
    source: Option<PathBuf>,
}

impl Default for TagTable {
    fn default() -> Self {
        Self::embedded()
    }
}

impl From<TagTableFile> for TagTable {
    fn from(file: TagTableFile) -> Self {
        Self {
            routable_highways: file
                .highway
                .routable
                .into_iter()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .collect(),
            source: None,
        }
    }
}

impl TagTable {
    /// Build a table from explicit values
    pub fn new<I, S>(routable: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routable_highways: routable.into_iter().map(Into::into).collect(),
            source: None,
        }
    }

    /// The table compiled into the binary
    pub fn embedded() -> Self {
        match Self::from_toml_str(EMBEDDED_TABLE) {
            Ok(table) => table,
            Err(e) => {
                log::warn!(
                    "Failed to parse embedded tag table: {}. Using minimal fallback.",
                    e
                );
                Self::minimal()
            }
        }
    }

    fn minimal() -> Self {
        Self::new([
            "motorway",
            "trunk",
            "primary",
            "secondary",
            "tertiary",
            "unclassified",
            "residential",
            "service",
        ])
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TagTableFile = toml::from_str(content).context("Invalid tag table")?;
        Ok(Self::from(file))
    }

    /// Load a table file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tag table {}", path.display()))?;
        let mut table = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse tag table {}", path.display()))?;
        table.source = Some(path.to_path_buf());
        log::debug!(
            "Loaded {} routable highway values from {}",
            table.routable_highways.len(),
            path.display()
        );
        Ok(table)
    }

    /// Load `path` if given, otherwise the user table if one exists,
    /// otherwise the embedded table. Unreadable user tables fall back too.
    pub fn resolve(path: Option<&Path>, user_dirs: &[PathBuf]) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        for dir in user_dirs {
            let candidate = dir.join("tags.toml");
            if !candidate.is_file() {
                continue;
            }
            match Self::load(&candidate) {
                Ok(table) => return Ok(table),
                Err(e) => log::warn!("{:#}. Falling back to the embedded table.", e),
            }
        }

        Ok(Self::embedded())
    }

    /// Where the table was loaded from, `None` for built-in tables
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_routable_highway(&self, value: &str) -> bool {
        self.routable_highways.contains(value)
    }

    /// True if `tags` carry a routable `highway` value
    pub fn has_routable_highway(&self, tags: &Tags) -> bool {
        tags.get("highway")
            .is_some_and(|value| self.is_routable_highway(value))
    }

    pub fn is_tagged_as_highway(&self, entity: &Entity) -> bool {
        self.has_routable_highway(entity.tags())
    }

    pub fn routable_values(&self) -> impl Iterator<Item = &str> {
        self.routable_highways.iter().map(String::as_str)
    }
}
