//! Documentation page rendering
//!
//! Renders the index and per-schema documentation pages from app templates
//! embedded at compile time. Site stylesheets override the embedded default.

use rust_embed::Embed;
use serde_json::{json, Value};
use tera::Tera;

use crate::compose::View;
use crate::registry::Registry;
use crate::render::RenderError;

/// App page templates embedded at compile time
#[derive(Embed)]
#[folder = "assets/templates/"]
struct AppTemplates;

/// Default stylesheets embedded at compile time
#[derive(Embed)]
#[folder = "assets/css/"]
struct AppCss;

/// Look up an embedded default stylesheet by file name
pub fn embedded_css(name: &str) -> Option<Vec<u8>> {
    AppCss::get(name).map(|file| file.data.into_owned())
}

/// File names of the embedded default stylesheets
pub fn embedded_css_names() -> Vec<String> {
    AppCss::iter().map(|name| name.to_string()).collect()
}

/// Renders documentation pages from the embedded app templates
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();

        for file in AppTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = AppTemplates::get(filename) {
                if let Ok(body) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, body)
                        .map_err(|source| RenderError::Parse {
                            name: filename.to_string(),
                            source,
                        })?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the catalogue index page
    pub fn index(&self, registry: &Registry) -> Result<String, RenderError> {
        let topics: Vec<Value> = registry
            .topics()
            .iter()
            .map(|topic| {
                let schemas: Vec<&str> = registry
                    .iter()
                    .filter(|schema| schema.topics().contains(&topic.name))
                    .map(|schema| schema.ty())
                    .collect();
                json!({ "id": topic.id, "name": topic.name, "schemas": schemas })
            })
            .collect();

        let schemas: Vec<Value> = registry
            .iter()
            .map(|schema| {
                json!({
                    "type": schema.ty(),
                    "partial": schema.is_partial(),
                })
            })
            .collect();

        let context = json!({ "topics": topics, "schemas": schemas });
        self.render_page("index.html.tera", context)
    }

    /// Render one schema's documentation page from a composed view
    pub fn schema_page(&self, view: &View) -> Result<String, RenderError> {
        let name = "schema.html.tera";
        let context =
            tera::Context::from_serialize(view).map_err(|source| RenderError::Render {
                name: name.to_string(),
                source,
            })?;
        self.tera
            .render(name, &context)
            .map_err(|source| RenderError::Render {
                name: name.to_string(),
                source,
            })
    }

    /// Render the not-found page
    pub fn not_found(&self, message: &str) -> String {
        self.render_page("notfound.html.tera", json!({ "message": message }))
            .unwrap_or_else(|_| format!("<h1>Not found</h1><p>{message}</p>"))
    }

    fn render_page(&self, name: &str, context: Value) -> Result<String, RenderError> {
        let context =
            tera::Context::from_value(context).map_err(|source| RenderError::Render {
                name: name.to_string(),
                source,
            })?;
        self.tera
            .render(name, &context)
            .map_err(|source| RenderError::Render {
                name: name.to_string(),
                source,
            })
    }
}
