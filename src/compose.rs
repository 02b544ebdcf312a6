//! View composer - turns a `(type, language)` pair into a page-ready view
//!
//! The composer reads from the registry and example set and builds a fresh
//! `View` per call; the registry itself is never mutated.

use serde::Serialize;
use thiserror::Error;

use crate::registry::{ExampleSet, PropertyMeta, Registry, Topic};

/// Transient, render-ready composition of a schema's localized metadata
///
/// Serializes with camelCase names so templates read `hasChildren` etc.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    /// The merged schema record
    pub schema: serde_json::Value,
    /// All topics in the catalogue
    pub topics: Vec<Topic>,
    /// Types whose parent is this schema's type
    pub children: Vec<String>,
    /// Localized schema name (reserved key `@name`)
    pub name: String,
    /// Localized schema description (reserved key `@description`)
    pub description: String,
    /// Localized property metadata, in source insertion order
    pub properties: Vec<PropertyMeta>,
    /// Localized enum-like choices, in source insertion order
    pub options: Vec<PropertyMeta>,
    pub has_children: bool,
    pub has_options: bool,
    pub has_properties: bool,
    pub has_example: bool,
}

/// Compose a view for one `(type, language)` pair
///
/// Language is a mandatory input here; defaulting happens only in the
/// outward-facing CLI/server layer.
pub fn compose(
    registry: &Registry,
    examples: &ExampleSet,
    ty: &str,
    language: &str,
) -> Result<View, ComposeError> {
    let schema = registry
        .get(ty)
        .map_err(|_| ComposeError::SchemaNotFound(ty.to_string()))?;

    let localization = schema
        .localization(language)
        .ok_or_else(|| ComposeError::LocalizationMissing {
            ty: ty.to_string(),
            language: language.to_string(),
        })?;

    let children: Vec<String> = registry
        .children_of(ty)
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(View {
        schema: schema.record().clone(),
        topics: registry.topics().to_vec(),
        has_children: !children.is_empty(),
        has_options: !localization.options.is_empty(),
        has_properties: !localization.properties.is_empty(),
        has_example: examples.has(ty),
        children,
        name: localization.name.clone(),
        description: localization.description.clone(),
        properties: localization.properties.clone(),
        options: localization.options.clone(),
    })
}

/// Errors that can occur while composing a view
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("schema \"{0}\" not found")]
    SchemaNotFound(String),

    #[error("schema \"{ty}\" has no localization for language \"{language}\"")]
    LocalizationMissing { ty: String, language: String },
}
