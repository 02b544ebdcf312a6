//! Schema registry - loads and merges schema records with their localizations
//!
//! The registry is an immutable snapshot: reloading produces a whole new
//! `Registry`, never an incremental mutation of an existing one.

pub mod examples;
pub mod schema;

pub use examples::ExampleSet;
pub use schema::{Localization, PropertyMeta, Schema, SchemaError};

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::Site;

/// A derived topic grouping label
///
/// Ids are positional within one load (sorted lexicographically) and are
/// presentation-local: they are recomputed on every load and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: usize,
    pub name: String,
}

/// A schema record that failed to load
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Immutable snapshot of every schema in a site
#[derive(Debug)]
pub struct Registry {
    schemas: BTreeMap<String, Schema>,
    topics: Vec<Topic>,
    failures: Vec<LoadFailure>,
}

impl Registry {
    /// Load every schema record in the site, merging i18n overlays
    ///
    /// A malformed record is fatal for that record only: it is recorded in
    /// `failures()` and logged, and the rest of the registry still loads.
    /// Directory-level I/O errors fail the whole load.
    pub fn load(site: &Site) -> Result<Self, RegistryError> {
        let schemas_dir = site.schemas_dir();
        let i18n_dir = site.i18n_dir();
        let languages = list_languages(&i18n_dir)?;

        let mut schemas = BTreeMap::new();
        let mut failures = Vec::new();

        for path in list_json_files(&schemas_dir)? {
            match load_record(&path, &i18n_dir, &languages) {
                Ok(schema) => {
                    schemas.insert(schema.ty().to_string(), schema);
                }
                Err(message) => {
                    tracing::warn!(path = %path.display(), %message, "skipping schema record");
                    failures.push(LoadFailure { path, message });
                }
            }
        }

        let topics = derive_topics(&schemas);

        Ok(Self {
            schemas,
            topics,
            failures,
        })
    }

    /// Look up a schema by type
    pub fn get(&self, ty: &str) -> Result<&Schema, RegistryError> {
        self.schemas
            .get(ty)
            .ok_or_else(|| RegistryError::SchemaNotFound(ty.to_string()))
    }

    /// Whether a schema with this type exists
    pub fn contains(&self, ty: &str) -> bool {
        self.schemas.contains_key(ty)
    }

    /// Number of known schema types
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterate schemas in type order
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Distinct topic labels, sorted ascending, with positional ids
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Topic labels for the topics.json feed
    ///
    /// The feed carries names only; the positional ids never leave the
    /// rendered pages.
    pub fn topic_names(&self) -> Vec<&str> {
        self.topics.iter().map(|topic| topic.name.as_str()).collect()
    }

    /// Types whose `@parent` equals the given type, sorted by type name
    ///
    /// An unresolved parent reference simply yields no children.
    pub fn children_of(&self, ty: &str) -> Vec<&str> {
        self.schemas
            .values()
            .filter(|schema| schema.parent() == Some(ty))
            .map(Schema::ty)
            .collect()
    }

    /// Records that failed to load in this snapshot
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Merged records for the schemas.json feed, in type order
    pub fn records(&self) -> Vec<&Value> {
        self.schemas.values().map(Schema::record).collect()
    }
}

/// Read one schema record and merge its i18n overlays
fn load_record(path: &Path, i18n_dir: &Path, languages: &[String]) -> Result<Schema, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let mut record: Value = serde_json::from_str(&contents).map_err(|e| e.to_string())?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut overlays = serde_json::Map::new();
    for language in languages {
        let overlay_path = i18n_dir.join(language).join(&filename);
        if !overlay_path.is_file() {
            continue;
        }
        let overlay = std::fs::read_to_string(&overlay_path).map_err(|e| e.to_string())?;
        let overlay: Value = serde_json::from_str(&overlay)
            .map_err(|e| format!("i18n overlay {}: {}", overlay_path.display(), e))?;
        overlays.insert(language.clone(), overlay);
    }

    record
        .as_object_mut()
        .ok_or_else(|| "record is not a JSON object".to_string())?
        .insert("@i18n".to_string(), Value::Object(overlays));

    Schema::from_record(record).map_err(|e| e.to_string())
}

/// Languages present as subdirectories of the i18n directory
fn list_languages(i18n_dir: &Path) -> Result<Vec<String>, RegistryError> {
    if !i18n_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut languages = Vec::new();
    for entry in std::fs::read_dir(i18n_dir).map_err(|e| RegistryError::Io {
        path: i18n_dir.to_path_buf(),
        source: e,
    })? {
        let entry = entry.map_err(|e| RegistryError::Io {
            path: i18n_dir.to_path_buf(),
            source: e,
        })?;
        if entry.path().is_dir() {
            languages.push(entry.file_name().to_string_lossy().to_string());
        }
    }

    languages.sort();
    Ok(languages)
}

/// Top-level `*.json` files of a directory, sorted by name
fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>, RegistryError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| RegistryError::Io {
        path: dir.to_path_buf(),
        source: e,
    })? {
        let entry = entry.map_err(|e| RegistryError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Distinct topic labels across all schemas, sorted, with positional ids
fn derive_topics(schemas: &BTreeMap<String, Schema>) -> Vec<Topic> {
    let mut labels: Vec<String> = Vec::new();
    for schema in schemas.values() {
        for label in schema.topics() {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
    }
    labels.sort();

    labels
        .into_iter()
        .enumerate()
        .map(|(id, name)| Topic { id, name })
        .collect()
}

/// Errors that can occur during registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("schema \"{0}\" not found")]
    SchemaNotFound(String),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
