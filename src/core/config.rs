//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::Site;

/// uidoc configuration with layered hierarchy
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language used for rendered pages
    pub language: String,

    /// Port for `uidoc serve`
    pub port: u16,

    /// Output directory for `uidoc generate`, relative to the site root
    pub output: String,

    /// Editor command for `uidoc page edit`
    pub editor: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            port: 4000,
            output: "public".to_string(),
            editor: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(site: Option<&Site>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/uidoc/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<PartialConfig>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Site config (uidoc.yaml)
        if let Some(site) = site {
            let site_config_path = site.config_path();
            if site_config_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&site_config_path) {
                    if let Ok(site_config) = serde_yml::from_str::<PartialConfig>(&contents) {
                        config.merge(site_config);
                    }
                }
            }
        }

        // 4. Environment variables
        if let Ok(language) = std::env::var("UIDOC_LANGUAGE") {
            config.language = language;
        }
        if let Ok(port) = std::env::var("UIDOC_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "uidoc")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge a partial config into this one (other takes precedence)
    fn merge(&mut self, other: PartialConfig) {
        if let Some(language) = other.language {
            self.language = language;
        }
        if let Some(port) = other.port {
            self.port = port;
        }
        if let Some(output) = other.output {
            self.output = output;
        }
        if other.editor.is_some() {
            self.editor = other.editor;
        }
    }

    /// Get the editor command
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file, properly handling commands with arguments
    /// (e.g., "emacsclient -nw" or "code --wait")
    pub fn run_editor(
        &self,
        file_path: &std::path::Path,
    ) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let parts: Vec<&str> = editor.split_whitespace().collect();

        if parts.is_empty() {
            return std::process::Command::new("vi").arg(file_path).status();
        }

        let cmd = parts[0];
        let args = &parts[1..];

        std::process::Command::new(cmd)
            .args(args)
            .arg(file_path)
            .status()
    }
}

/// Config file shape - every field optional so layers can be sparse
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialConfig {
    language: Option<String>,
    port: Option<u16>,
    output: Option<String>,
    editor: Option<String>,
}
