//! Site discovery and directory layout
//!
//! A site is a directory holding schema records, their localizations,
//! module templates, example payloads and persisted builder pages.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents a uidoc site
#[derive(Debug)]
pub struct Site {
    /// Root directory of the site
    root: PathBuf,
}

impl Site {
    /// Find the site root by walking up from the current directory
    pub fn discover() -> Result<Self, SiteError> {
        let current = std::env::current_dir().map_err(|e| SiteError::Io(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find the site root by walking up from the given directory
    ///
    /// A directory is a site root if it contains `uidoc.yaml` or a
    /// `schemas/` directory.
    pub fn discover_from(start: &Path) -> Result<Self, SiteError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| SiteError::Io(e.to_string()))?;

        loop {
            if current.join("uidoc.yaml").is_file() || current.join("schemas").is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(SiteError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Open a site at an explicit path
    pub fn open(path: &Path) -> Result<Self, SiteError> {
        let root = path
            .canonicalize()
            .map_err(|e| SiteError::Io(e.to_string()))?;

        if !root.join("uidoc.yaml").is_file() && !root.join("schemas").is_dir() {
            return Err(SiteError::NotASite(root));
        }

        Ok(Self { root })
    }

    /// Create a new site structure at the given path
    pub fn init(path: &Path) -> Result<Self, SiteError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if root.join("uidoc.yaml").exists() {
            return Err(SiteError::AlreadyExists(root));
        }

        for dir in ["schemas/i18n/en", "templates", "examples", "css", "pages"] {
            std::fs::create_dir_all(root.join(dir)).map_err(|e| SiteError::Io(e.to_string()))?;
        }

        std::fs::write(root.join("uidoc.yaml"), Self::default_config())
            .map_err(|e| SiteError::Io(e.to_string()))?;

        Ok(Self { root })
    }

    fn default_config() -> &'static str {
        r#"# uidoc site configuration

# Language used for rendered pages (must match a schemas/i18n/<lang>/ directory)
# language: en

# Port for `uidoc serve`
# port: 4000

# Output directory for `uidoc generate`, relative to the site root
# output: public
"#
    }

    /// Get the site root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the site configuration file
    pub fn config_path(&self) -> PathBuf {
        self.root.join("uidoc.yaml")
    }

    /// Directory holding schema records (`<type>.json`)
    pub fn schemas_dir(&self) -> PathBuf {
        self.root.join("schemas")
    }

    /// Directory holding localization overlays (`i18n/<lang>/<type>.json`)
    pub fn i18n_dir(&self) -> PathBuf {
        self.root.join("schemas").join("i18n")
    }

    /// Directory holding module template bodies (`<type>.tpl`)
    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    /// Directory holding example module instances (`<type>.json`)
    pub fn examples_dir(&self) -> PathBuf {
        self.root.join("examples")
    }

    /// Directory holding site stylesheets
    pub fn css_dir(&self) -> PathBuf {
        self.root.join("css")
    }

    /// Directory holding persisted builder pages
    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }
}

/// Errors that can occur during site operations
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("not a uidoc site (searched from {searched_from:?}). Run 'uidoc init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("{0:?} is not a uidoc site (no uidoc.yaml or schemas/ directory)")]
    NotASite(PathBuf),

    #[error("uidoc site already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(String),
}
