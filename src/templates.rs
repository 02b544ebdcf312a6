//! Template store - named template bodies keyed by schema type
//!
//! Absence of a template is not an error at the store level; it becomes one
//! only when the rendering engine is asked to render that type.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::Site;

/// Template bodies keyed by schema type
#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: BTreeMap<String, String>,
}

impl TemplateStore {
    /// Load every `<type>.tpl` body from the site's templates directory
    pub fn load(site: &Site) -> Result<Self, TemplateError> {
        let dir = site.templates_dir();
        let mut templates = BTreeMap::new();

        if !dir.is_dir() {
            return Ok(Self { templates });
        }

        for entry in std::fs::read_dir(&dir).map_err(|e| TemplateError::Io {
            path: dir.clone(),
            source: e,
        })? {
            let entry = entry.map_err(|e| TemplateError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "tpl") {
                continue;
            }
            let Some(ty) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let body = std::fs::read_to_string(&path).map_err(|e| TemplateError::Io {
                path: path.clone(),
                source: e,
            })?;
            templates.insert(ty.to_string(), body);
        }

        Ok(Self { templates })
    }

    /// Construct a store from in-memory bodies
    pub fn from_bodies<I, K, V>(bodies: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            templates: bodies
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Get the template body for a type, if one is registered
    pub fn get(&self, ty: &str) -> Option<&str> {
        self.templates.get(ty).map(String::as_str)
    }

    /// Iterate `(type, body)` pairs in type order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates
            .iter()
            .map(|(ty, body)| (ty.as_str(), body.as_str()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// The `type -> body` mapping for the templates.json feed
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (ty, body) in &self.templates {
            map.insert(ty.clone(), Value::String(body.clone()));
        }
        Value::Object(map)
    }
}

/// Errors that can occur while loading templates
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
