//! Module composition engine - the page builder
//!
//! Maintains an ordered, persisted, editable sequence of module instances
//! for a named page, reusing the same rendering path as the documentation
//! pages. Every mutation persists synchronously before it returns, so the
//! persisted state and the in-memory state agree after every operation.

pub mod store;

pub use store::{FileStore, MemoryStore, PageStore, StoreError};

use serde_json::Value;
use thiserror::Error;

use crate::registry::{ExampleSet, Registry};
use crate::render::Renderer;

/// Derived page statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Number of modules on the page
    pub modules: usize,
    /// Number of distinct `@type` values present
    pub distinct_types: usize,
    /// Total number of known schema types
    pub known_types: usize,
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} modules, {}/{} types",
            self.modules, self.distinct_types, self.known_types
        )
    }
}

/// Inspector view of the active module
#[derive(Debug)]
pub struct Inspector {
    /// Editable JSON text of the module instance
    pub json: String,
    /// Standalone preview document (single line, embeddable)
    pub preview: String,
    /// Structural definition of the module's schema type
    pub definition: Value,
}

/// State machine for one open builder page
///
/// A page is `Empty` (no modules) or `Populated` (one or more modules, at
/// most one active). Selection is in-memory only and never persisted.
pub struct PageBuilder<'a> {
    store: &'a dyn PageStore,
    renderer: &'a Renderer,
    registry: &'a Registry,
    examples: &'a ExampleSet,
    page: String,
    modules: Vec<Value>,
    active: Option<usize>,
    edit_invalid: bool,
    previews: Vec<String>,
}

impl<'a> PageBuilder<'a> {
    /// Open a named page, loading its persisted module sequence
    ///
    /// A page that has never been saved starts as an empty sequence.
    pub fn open(
        store: &'a dyn PageStore,
        renderer: &'a Renderer,
        registry: &'a Registry,
        examples: &'a ExampleSet,
        page: &str,
    ) -> Result<Self, BuilderError> {
        let modules = store.load(page)?.unwrap_or_default();
        let mut builder = Self {
            store,
            renderer,
            registry,
            examples,
            page: page.to_string(),
            modules,
            active: None,
            edit_invalid: false,
            previews: Vec::new(),
        };
        builder.rerender();
        Ok(builder)
    }

    /// Name of the open page
    pub fn page_name(&self) -> &str {
        &self.page
    }

    /// The ordered module sequence (order is display order)
    pub fn modules(&self) -> &[Value] {
        &self.modules
    }

    /// Rendered HTML fragment per module, in display order
    ///
    /// A module whose type has no template degrades to an empty fragment.
    pub fn previews(&self) -> &[String] {
        &self.previews
    }

    /// Index of the active module, if any
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Whether the last edit attempt failed to parse
    ///
    /// Sticky: cleared only by a subsequent successful edit.
    pub fn edit_invalid(&self) -> bool {
        self.edit_invalid
    }

    /// Whether the page holds no modules
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Derived statistics for the open page
    pub fn stats(&self) -> Stats {
        let mut types: Vec<&str> = self
            .modules
            .iter()
            .filter_map(|module| module.get("@type").and_then(Value::as_str))
            .collect();
        types.sort_unstable();
        types.dedup();

        Stats {
            modules: self.modules.len(),
            distinct_types: types.len(),
            known_types: self.registry.len(),
        }
    }

    /// Append the example payload for a type to the page
    ///
    /// A drop with no example for its type is a no-op (returns `false`,
    /// nothing is persisted). The selection is unchanged either way.
    pub fn add_module(&mut self, ty: &str) -> Result<bool, BuilderError> {
        let Some(example) = self.examples.get(ty) else {
            return Ok(false);
        };
        self.modules.push(example.clone());
        self.persist()?;
        self.rerender();
        Ok(true)
    }

    /// Set the active module index
    ///
    /// Idempotent and exclusive: at most one module is active at a time.
    pub fn select(&mut self, index: usize) -> Result<(), BuilderError> {
        if index >= self.modules.len() {
            return Err(BuilderError::NoSuchModule {
                index,
                count: self.modules.len(),
            });
        }
        self.active = Some(index);
        Ok(())
    }

    /// Inspector view of the active module, if one is selected
    pub fn inspect(&self) -> Option<Inspector> {
        let index = self.active?;
        let module = self.modules.get(index)?;
        let ty = module.get("@type").and_then(Value::as_str).unwrap_or("");

        Some(Inspector {
            json: serde_json::to_string_pretty(module).unwrap_or_default(),
            preview: self
                .renderer
                .render_standalone_inline(ty, module)
                .unwrap_or_default(),
            definition: self
                .registry
                .get(ty)
                .map(|schema| schema.definition())
                .unwrap_or(Value::Null),
        })
    }

    /// Replace the active module with the parsed JSON text
    ///
    /// A parse failure leaves the stored sequence untouched, returns
    /// `false` and raises the sticky `edit_invalid` flag; it never
    /// propagates as an error.
    pub fn edit_active(&mut self, json_text: &str) -> Result<bool, BuilderError> {
        let Some(index) = self.active else {
            return Err(BuilderError::NothingSelected);
        };

        match serde_json::from_str::<Value>(json_text) {
            Ok(module) => {
                self.modules[index] = module;
                self.edit_invalid = false;
                self.persist()?;
                self.rerender();
                Ok(true)
            }
            Err(_) => {
                self.edit_invalid = true;
                Ok(false)
            }
        }
    }

    /// Delete the active module and clear the selection
    ///
    /// No-op (returns `false`) when nothing is active.
    pub fn remove_active(&mut self) -> Result<bool, BuilderError> {
        let Some(index) = self.active else {
            return Ok(false);
        };
        self.modules.remove(index);
        self.active = None;
        self.persist()?;
        self.rerender();
        Ok(true)
    }

    /// Switch to (or create) the named page
    pub fn switch_page(&mut self, name: &str) -> Result<(), BuilderError> {
        self.modules = self.store.load(name)?.unwrap_or_default();
        self.page = name.to_string();
        self.active = None;
        self.edit_invalid = false;
        self.rerender();
        Ok(())
    }

    /// Create a new empty page, persist it and switch to it
    pub fn add_page(&mut self, name: &str) -> Result<(), BuilderError> {
        self.store.save(name, &[])?;
        self.switch_page(name)
    }

    /// Delete the named page's persisted entry
    ///
    /// If the open page is removed, it falls back to an empty sequence.
    /// The page list is re-derived from the remaining persisted keys.
    pub fn remove_page(&mut self, name: &str) -> Result<(), BuilderError> {
        self.store.remove(name)?;
        if name == self.page {
            self.modules.clear();
            self.active = None;
            self.edit_invalid = false;
            self.rerender();
        }
        Ok(())
    }

    /// Names of all persisted pages
    pub fn pages(&self) -> Result<Vec<String>, BuilderError> {
        Ok(self.store.list()?)
    }

    fn persist(&self) -> Result<(), BuilderError> {
        Ok(self.store.save(&self.page, &self.modules)?)
    }

    fn rerender(&mut self) {
        self.previews = self
            .modules
            .iter()
            .map(|module| {
                let ty = module.get("@type").and_then(Value::as_str).unwrap_or("");
                self.renderer.render(ty, module).unwrap_or_default()
            })
            .collect();
    }
}

/// Errors that can occur in the builder
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no module at index {index} (page has {count})")]
    NoSuchModule { index: usize, count: usize },

    #[error("no module is selected")]
    NothingSelected,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Site;
    use crate::templates::TemplateStore;
    use serde_json::json;
    use tempfile::tempdir;

    struct Fixture {
        _tmp: tempfile::TempDir,
        registry: Registry,
        examples: ExampleSet,
        renderer: Renderer,
        store: MemoryStore,
    }

    fn fixture() -> Fixture {
        let tmp = tempdir().unwrap();
        let site = Site::init(tmp.path()).unwrap();
        std::fs::write(
            site.schemas_dir().join("Article.json"),
            r#"{ "@type": "Article" }"#,
        )
        .unwrap();
        std::fs::write(
            site.schemas_dir().join("Quote.json"),
            r#"{ "@type": "Quote" }"#,
        )
        .unwrap();
        std::fs::write(
            site.examples_dir().join("Article.json"),
            r#"{ "@type": "Article", "title": "Example headline" }"#,
        )
        .unwrap();

        let registry = Registry::load(&site).unwrap();
        let examples = ExampleSet::load(&site).unwrap();
        let templates =
            TemplateStore::from_bodies([("Article", "<article>{{ title }}</article>")]);
        let renderer = Renderer::new(&templates).unwrap();

        Fixture {
            _tmp: tmp,
            registry,
            examples,
            renderer,
            store: MemoryStore::new(),
        }
    }

    fn open<'a>(f: &'a Fixture, page: &str) -> PageBuilder<'a> {
        PageBuilder::open(&f.store, &f.renderer, &f.registry, &f.examples, page).unwrap()
    }

    #[test]
    fn test_add_module_appends_persists_and_rerenders() {
        let f = fixture();
        let mut builder = open(&f, "My page");

        assert!(builder.is_empty());
        assert!(builder.add_module("Article").unwrap());
        assert_eq!(builder.modules().len(), 1);
        assert_eq!(builder.previews().len(), 1);
        assert!(builder.previews()[0].contains("Example headline"));
        assert_eq!(
            f.store.load("My page").unwrap().unwrap(),
            builder.modules()
        );
    }

    #[test]
    fn test_add_module_without_example_is_a_noop() {
        let f = fixture();
        let mut builder = open(&f, "My page");

        let writes_before = f.store.writes();
        assert!(!builder.add_module("Quote").unwrap());
        assert!(builder.modules().is_empty());
        assert_eq!(f.store.writes(), writes_before);
    }

    #[test]
    fn test_select_is_bounded_and_exclusive() {
        let f = fixture();
        let mut builder = open(&f, "My page");
        builder.add_module("Article").unwrap();
        builder.add_module("Article").unwrap();

        builder.select(0).unwrap();
        builder.select(1).unwrap();
        assert_eq!(builder.active(), Some(1));
        assert!(matches!(
            builder.select(2),
            Err(BuilderError::NoSuchModule { .. })
        ));
    }

    #[test]
    fn test_inspect_exposes_json_preview_and_definition() {
        let f = fixture();
        let mut builder = open(&f, "My page");
        builder.add_module("Article").unwrap();
        builder.select(0).unwrap();

        let inspector = builder.inspect().unwrap();
        assert!(inspector.json.contains("Example headline"));
        assert!(!inspector.preview.contains('\n'));
        assert!(inspector.preview.contains("Example headline"));
        assert_eq!(inspector.definition["@type"], "Article");
    }

    #[test]
    fn test_edit_active_replaces_and_persists() {
        let f = fixture();
        let mut builder = open(&f, "My page");
        builder.add_module("Article").unwrap();
        builder.select(0).unwrap();

        assert!(builder
            .edit_active(r#"{ "@type": "Article", "title": "Edited" }"#)
            .unwrap());
        assert!(!builder.edit_invalid());
        assert!(builder.previews()[0].contains("Edited"));
        assert_eq!(
            f.store.load("My page").unwrap().unwrap()[0]["title"],
            "Edited"
        );
    }

    #[test]
    fn test_edit_active_invalid_json_keeps_persisted_state_intact() {
        let f = fixture();
        let mut builder = open(&f, "My page");
        builder.add_module("Article").unwrap();
        builder.select(0).unwrap();

        let persisted_before = f.store.raw("My page").unwrap();
        assert!(!builder.edit_active("{ not json").unwrap());
        assert!(builder.edit_invalid());
        assert_eq!(f.store.raw("My page").unwrap(), persisted_before);
        assert_eq!(builder.modules()[0]["title"], "Example headline");

        // the flag is sticky until an edit succeeds
        assert!(!builder.edit_active("still { not json").unwrap());
        assert!(builder.edit_invalid());
        assert!(builder.edit_active(r#"{ "@type": "Article" }"#).unwrap());
        assert!(!builder.edit_invalid());
    }

    #[test]
    fn test_edit_without_selection_is_an_error() {
        let f = fixture();
        let mut builder = open(&f, "My page");
        assert!(matches!(
            builder.edit_active("{}"),
            Err(BuilderError::NothingSelected)
        ));
    }

    #[test]
    fn test_remove_only_module_empties_page_and_clears_selection() {
        let f = fixture();
        let mut builder = open(&f, "My page");
        builder.add_module("Article").unwrap();
        builder.select(0).unwrap();

        assert!(builder.remove_active().unwrap());
        assert!(builder.is_empty());
        assert!(builder.active().is_none());
        assert_eq!(builder.stats().modules, 0);
        assert!(f.store.load("My page").unwrap().unwrap().is_empty());
    }

    #[test]
    fn test_remove_without_selection_is_a_noop() {
        let f = fixture();
        let mut builder = open(&f, "My page");
        builder.add_module("Article").unwrap();

        assert!(!builder.remove_active().unwrap());
        assert_eq!(builder.modules().len(), 1);
    }

    #[test]
    fn test_stats_report_distinct_against_known_types() {
        let f = fixture();
        let mut builder = open(&f, "My page");
        builder.add_module("Article").unwrap();
        builder.add_module("Article").unwrap();

        let stats = builder.stats();
        assert_eq!(stats.modules, 2);
        assert_eq!(stats.distinct_types, 1);
        assert_eq!(stats.known_types, 2);
        assert_eq!(stats.to_string(), "2 modules, 1/2 types");
    }

    #[test]
    fn test_page_switch_add_remove() {
        let f = fixture();
        let mut builder = open(&f, "My page");
        builder.add_module("Article").unwrap();
        builder.select(0).unwrap();

        builder.add_page("Other").unwrap();
        assert_eq!(builder.page_name(), "Other");
        assert!(builder.is_empty());
        assert!(builder.active().is_none());

        builder.switch_page("My page").unwrap();
        assert_eq!(builder.modules().len(), 1);

        builder.remove_page("My page").unwrap();
        assert!(builder.is_empty());
        assert_eq!(builder.pages().unwrap(), vec!["Other"]);
    }
}
