//! Schema records and their localized metadata
//!
//! A schema record is a JSON object describing one reusable content module
//! type. Reserved localization keys (`@name`, `@description`, `options`) are
//! decoded once here, at load time, into typed fields; render paths never
//! re-derive reserved-ness from key prefixes.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Localized name/description for one property or option key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyMeta {
    pub key: String,
    pub name: String,
    pub description: String,
}

/// Per-language property metadata, decoded from an i18n overlay
#[derive(Debug, Clone, Default)]
pub struct Localization {
    /// Localized name of the schema itself (reserved key `@name`)
    pub name: String,
    /// Localized description of the schema itself (reserved key `@description`)
    pub description: String,
    /// Enum-like choices (reserved key `options`), in source insertion order
    pub options: Vec<PropertyMeta>,
    /// All remaining property keys, in source insertion order
    pub properties: Vec<PropertyMeta>,
}

impl Localization {
    /// Decode an i18n overlay object into typed form
    pub fn from_record(value: &Value) -> Result<Self, SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject)?;

        let mut loc = Localization {
            name: string_field(value, "@name"),
            description: string_field(value, "@description"),
            ..Default::default()
        };

        if let Some(options) = object.get("options").and_then(Value::as_object) {
            for (key, entry) in options {
                if key.starts_with('@') {
                    continue;
                }
                loc.options.push(PropertyMeta {
                    key: key.clone(),
                    name: string_field(entry, "@name"),
                    description: string_field(entry, "@description"),
                });
            }
        }

        for (key, entry) in object {
            if key == "@name" || key == "@description" || key == "options" {
                continue;
            }
            loc.properties.push(PropertyMeta {
                key: key.clone(),
                name: string_field(entry, "@name"),
                description: string_field(entry, "@description"),
            });
        }

        Ok(loc)
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// One schema definition, merged with its localization overlays
///
/// Immutable after load. The raw merged record (including `@i18n`) is kept
/// verbatim for the JSON feeds; derived views are always built into new
/// structures, never written back into the record.
#[derive(Debug, Clone)]
pub struct Schema {
    ty: String,
    parent: Option<String>,
    topics: Vec<String>,
    role: Option<String>,
    i18n: BTreeMap<String, Localization>,
    record: Value,
}

impl Schema {
    /// Decode a merged schema record (with `@i18n` already attached)
    pub fn from_record(record: Value) -> Result<Self, SchemaError> {
        let object = record.as_object().ok_or(SchemaError::NotAnObject)?;

        let ty = object
            .get("@type")
            .and_then(Value::as_str)
            .ok_or(SchemaError::MissingType)?
            .to_string();

        let parent = object
            .get("@parent")
            .and_then(Value::as_str)
            .map(str::to_string);

        // `@topic` accepts a bare string or an array of strings
        let topics = match object.get("@topic") {
            Some(Value::String(label)) => vec![label.clone()],
            Some(Value::Array(labels)) => labels
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        let role = object
            .get("@role")
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut i18n = BTreeMap::new();
        if let Some(overlays) = object.get("@i18n").and_then(Value::as_object) {
            for (language, overlay) in overlays {
                i18n.insert(language.clone(), Localization::from_record(overlay)?);
            }
        }

        Ok(Self {
            ty,
            parent,
            topics,
            role,
            i18n,
            record,
        })
    }

    /// The unique type id of this schema
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// Parent type for the documentation navigation tree, if any
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Topic labels attached to this schema
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Role label, if any (e.g. "partial")
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Whether this type is only ever used as a sub-template
    pub fn is_partial(&self) -> bool {
        self.role.as_deref() == Some("partial")
    }

    /// Languages this schema carries localizations for
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.i18n.keys().map(String::as_str)
    }

    /// Decoded localization for one language
    pub fn localization(&self, language: &str) -> Option<&Localization> {
        self.i18n.get(language)
    }

    /// The raw merged record, including `@i18n` (served by the JSON feeds)
    pub fn record(&self) -> &Value {
        &self.record
    }

    /// The structural definition: the record without its `@i18n` overlays
    pub fn definition(&self) -> Value {
        let mut definition = self.record.clone();
        if let Some(object) = definition.as_object_mut() {
            object.remove("@i18n");
        }
        definition
    }
}

/// Errors produced while decoding a schema record
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no \"@type\" string")]
    MissingType,
}
