//! Example module instances, one per schema type
//!
//! Examples seed the page builder (a drop with no example is a no-op) and
//! the isolated previews. A missing or malformed example degrades the
//! features that need it; it is never fatal.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::core::Site;
use crate::registry::RegistryError;

/// Example payloads keyed by their `@type`
#[derive(Debug, Default)]
pub struct ExampleSet {
    examples: BTreeMap<String, Value>,
}

impl ExampleSet {
    /// Load every example payload in the site's examples directory
    pub fn load(site: &Site) -> Result<Self, RegistryError> {
        let dir = site.examples_dir();
        let mut examples = BTreeMap::new();

        for path in super::list_json_files(&dir)? {
            let contents = std::fs::read_to_string(&path).map_err(|e| RegistryError::Io {
                path: path.clone(),
                source: e,
            })?;
            let payload: Value = match serde_json::from_str(&contents) {
                Ok(payload) => payload,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping malformed example");
                    continue;
                }
            };
            match payload.get("@type").and_then(Value::as_str) {
                Some(ty) => {
                    examples.insert(ty.to_string(), payload);
                }
                None => {
                    tracing::warn!(path = %path.display(), "skipping example without @type");
                }
            }
        }

        Ok(Self { examples })
    }

    /// Get the example payload for a type
    pub fn get(&self, ty: &str) -> Option<&Value> {
        self.examples.get(ty)
    }

    /// Whether a type has an example payload
    pub fn has(&self, ty: &str) -> bool {
        self.examples.contains_key(ty)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Example payloads for the examples.json feed, in type order
    pub fn records(&self) -> Vec<&Value> {
        self.examples.values().collect()
    }
}
