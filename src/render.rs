//! Rendering engine - executes module templates against instance data
//!
//! All module template bodies are registered by type name in one Tera
//! instance, so templates can embed each other as partials via
//! `{% include "Type" %}`. An include of a type with no template body
//! renders as empty output (silent miss); asking to render such a type
//! directly is still `TemplateNotFound`.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;
use tera::Tera;
use thiserror::Error;

use crate::templates::TemplateStore;

/// Renders module instances through their type's template
pub struct Renderer {
    tera: Tera,
    /// Types with a real template body (stubs registered for silent-miss
    /// includes are deliberately absent from this set)
    registered: BTreeSet<String>,
}

impl Renderer {
    /// Build a renderer from a template store
    pub fn new(store: &TemplateStore) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        let mut registered = BTreeSet::new();

        for (ty, body) in store.iter() {
            tera.add_raw_template(ty, body)
                .map_err(|source| RenderError::Parse {
                    name: ty.to_string(),
                    source,
                })?;
            registered.insert(ty.to_string());
        }

        // Unresolved partial references render as empty output, not an
        // error: register an empty stub for every include target that has
        // no real template.
        let include_target =
            Regex::new(r#"\{%-?\s*include\s+"([^"]+)""#).expect("static include pattern");
        for (_, body) in store.iter() {
            for captures in include_target.captures_iter(body) {
                let target = &captures[1];
                if registered.contains(target) {
                    continue;
                }
                tera.add_raw_template(target, "")
                    .map_err(|source| RenderError::Parse {
                        name: target.to_string(),
                        source,
                    })?;
            }
        }

        Ok(Self { tera, registered })
    }

    /// Types with a real template body
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.registered.iter().map(String::as_str)
    }

    /// Whether a real template is registered for this type
    pub fn has_template(&self, ty: &str) -> bool {
        self.registered.contains(ty)
    }

    /// Render a module instance into an HTML fragment
    pub fn render(&self, ty: &str, data: &Value) -> Result<String, RenderError> {
        if !self.registered.contains(ty) {
            return Err(RenderError::TemplateNotFound(ty.to_string()));
        }

        let context =
            tera::Context::from_value(data.clone()).map_err(|source| RenderError::Render {
                name: ty.to_string(),
                source,
            })?;

        self.tera
            .render(ty, &context)
            .map_err(|source| RenderError::Render {
                name: ty.to_string(),
                source,
            })
    }

    /// Render a module instance as a standalone HTML document
    ///
    /// Wraps the fragment in a minimal document shell for isolated preview.
    pub fn render_standalone(&self, ty: &str, data: &Value) -> Result<String, RenderError> {
        let fragment = self.render(ty, data)?;
        Ok(wrap_document(&fragment))
    }

    /// Standalone document with newlines stripped, for single-line embedding
    /// (e.g. an iframe `srcdoc` attribute)
    pub fn render_standalone_inline(&self, ty: &str, data: &Value) -> Result<String, RenderError> {
        Ok(self.render_standalone(ty, data)?.replace('\n', ""))
    }
}

/// Wrap an HTML fragment in a minimal document shell
pub fn wrap_document(fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta name="viewport" content="width=device-width, initial-scale=0.6">
<meta charset="utf8">
<link rel="stylesheet" type="text/css" href="/css/style.css">
<link rel="stylesheet" type="text/css" href="/css/site.css">
</head>
<body>
{fragment}
</body>
</html>"#
    )
}

/// Errors that can occur while rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no template registered for \"{0}\"")]
    TemplateNotFound(String),

    #[error("invalid template \"{name}\"")]
    Parse {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("failed to render template \"{name}\"")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },
}
