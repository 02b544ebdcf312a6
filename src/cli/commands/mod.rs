//! Command implementations

pub mod completions;
pub mod generate;
pub mod init;
pub mod page;
pub mod schema;
pub mod serve;
pub mod topic;

use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::{Config, Site};
use crate::registry::{ExampleSet, Registry};
use crate::templates::TemplateStore;

/// A consistent, read-only snapshot of the site's data
///
/// Reloading always builds a whole new snapshot; nothing is mutated in
/// place.
pub(crate) struct Snapshot {
    pub registry: Registry,
    pub templates: TemplateStore,
    pub examples: ExampleSet,
}

impl Snapshot {
    pub(crate) fn load(site: &Site) -> Result<Self> {
        Ok(Self {
            registry: Registry::load(site).into_diagnostic()?,
            templates: TemplateStore::load(site).into_diagnostic()?,
            examples: ExampleSet::load(site).into_diagnostic()?,
        })
    }
}

/// Open the site from the global options (explicit path or discovery)
pub(crate) fn open_site(global: &GlobalOpts) -> Result<Site> {
    match &global.site {
        Some(path) => Site::open(path).into_diagnostic(),
        None => Site::discover().into_diagnostic(),
    }
}

/// Resolve the page language: flag, then config, then the "en" default
pub(crate) fn resolve_language(global: &GlobalOpts, config: &Config) -> String {
    global
        .language
        .clone()
        .unwrap_or_else(|| config.language.clone())
}

/// Initialize structured logging; `RUST_LOG` overrides the default filter
pub(crate) fn init_tracing(global: &GlobalOpts) {
    let default = if global.verbose {
        "uidoc=debug"
    } else {
        "uidoc=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Print load failures unless silenced
pub(crate) fn report_failures(snapshot: &Snapshot, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    for failure in snapshot.registry.failures() {
        eprintln!(
            "{} skipped {}: {}",
            console::style("!").yellow(),
            failure.path.display(),
            failure.message
        );
    }
}
