//! Project configuration.
//!
//! Mirrors the settings a documentation project declares in `conf.py`. The
//! same structure can be loaded from `conf.toml`, `conf.yaml` or `conf.json`.

use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::python_config::PythonConfigParser;

/// Declarative project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub project: String,
    pub copyright: Option<String>,
    pub author: Option<String>,
    /// Full version string, e.g. `0.2.0`.
    pub release: Option<String>,
    /// Short version, e.g. `0.2`.
    pub version: Option<String>,

    /// Extensions to load, in order.
    pub extensions: Vec<String>,
    pub templates_path: Vec<String>,
    pub exclude_patterns: Vec<String>,

    /// Registered style used for code blocks. `None` selects `default`.
    pub pygments_style: Option<String>,
    /// Lexer for code blocks that do not name a language.
    pub highlight_language: String,

    /// Wrap C signatures longer than this many characters; `0` wraps all.
    pub c_maximum_signature_line_length: Option<usize>,

    pub html_theme: String,
    pub html_theme_options: IndexMap<String, serde_json::Value>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project: "Project name not set".to_string(),
            copyright: None,
            author: None,
            release: None,
            version: None,
            extensions: Vec::new(),
            templates_path: Vec::new(),
            exclude_patterns: Vec::new(),
            pygments_style: None,
            highlight_language: "default".to_string(),
            c_maximum_signature_line_length: None,
            html_theme: "alabaster".to_string(),
            html_theme_options: IndexMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Load from a file, picking the format from its extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let config = match extension.as_deref() {
            Some("py") => PythonConfigParser::new()?
                .parse_conf_py(path)?
                .to_project_config()?,
            Some("toml") => toml::from_str(&std::fs::read_to_string(path)?)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&std::fs::read_to_string(path)?)?,
            Some("json") => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            _ => return Err(Error::UnsupportedConfigFormat(path.to_path_buf())),
        };

        info!(
            "Loaded configuration for '{}' from {}",
            config.project,
            path.display()
        );
        Ok(config)
    }

    /// Look for `conf.py`, `conf.toml`, `conf.yaml` or `conf.json` in `dir`.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        for name in ["conf.py", "conf.toml", "conf.yaml", "conf.yml", "conf.json"] {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Self::from_file(&candidate).map(Some);
            }
        }
        Ok(None)
    }

    /// Build from `name -> value` settings, ignoring unknown names.
    pub fn from_settings(settings: IndexMap<String, serde_json::Value>) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> = settings.into_iter().collect();
        Ok(serde_json::from_value(serde_json::Value::Object(object))?)
    }

    /// Name of the style code blocks are rendered with.
    pub fn style_name(&self) -> &str {
        self.pygments_style.as_deref().unwrap_or("default")
    }

    /// Boolean theme option, e.g. `display_version`.
    pub fn theme_flag(&self, option: &str) -> Option<bool> {
        self.html_theme_options
            .get(option)
            .and_then(serde_json::Value::as_bool)
    }
}
