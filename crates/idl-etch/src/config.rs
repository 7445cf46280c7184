//! Generator configuration
//!
//! Registry locations and output settings. Every field has a default that
//! points at the public webref/MDN data, so an empty TOML file is valid.

use crate::diagnostics::{EtchError, EtchResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// MDN API group table
pub const DEFAULT_GROUP_DATA_URL: &str =
    "https://raw.githubusercontent.com/mdn/content/main/files/jsondata/GroupData.json";

/// webref index of every IDL name
pub const DEFAULT_IDL_NAMES_URL: &str =
    "https://raw.githubusercontent.com/w3c/webref/curated/ed/idlnames.json";

/// webref events table
pub const DEFAULT_EVENTS_URL: &str = "https://w3c.github.io/webref/ed/events.json";

/// Base for per-name parsed IDL documents
pub const DEFAULT_IDL_PARSED_BASE: &str = "https://w3c.github.io/webref/ed/";

/// Configuration for the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EtchConfig {
    /// Location of GroupData.json
    pub group_data_url: String,
    /// Location of idlnames.json
    pub idl_names_url: String,
    /// Location of events.json
    pub events_url: String,
    /// Base that relative document locations are joined onto
    pub idl_parsed_base: String,
    /// User agent for HTTP requests
    pub user_agent: String,
    /// Extension of generated page files
    pub file_extension: String,
    /// Directory with template overrides
    pub templates_dir: Option<PathBuf>,
    /// Local registry mirror used instead of HTTP
    pub mirror_dir: Option<PathBuf>,
    /// Output directory for generated pages
    pub output_dir: PathBuf,
}

impl Default for EtchConfig {
    fn default() -> Self {
        Self {
            group_data_url: DEFAULT_GROUP_DATA_URL.to_string(),
            idl_names_url: DEFAULT_IDL_NAMES_URL.to_string(),
            events_url: DEFAULT_EVENTS_URL.to_string(),
            idl_parsed_base: DEFAULT_IDL_PARSED_BASE.to_string(),
            user_agent: format!("idl-etch/{}", crate::VERSION),
            file_extension: "md".to_string(),
            templates_dir: None,
            mirror_dir: None,
            output_dir: PathBuf::from("docs"),
        }
    }
}

impl EtchConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(source: &str) -> EtchResult<Self> {
        let config: EtchConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> EtchResult<Self> {
        if !path.exists() {
            return Err(EtchError::FileNotFound(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Use a local registry mirror
    pub fn with_mirror_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mirror_dir = Some(dir.into());
        self
    }

    /// Use a template override directory
    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Location of the parsed IDL document for `name` when the registry
    /// index does not list one.
    pub fn default_idl_location(&self, name: &str) -> String {
        self.resolve_location(&format!("idlnamesparsed/{name}.json"))
    }

    /// Join a registry-relative location onto `idl_parsed_base`.
    /// Absolute URLs pass through.
    pub fn resolve_location(&self, location: &str) -> String {
        if location.contains("://") {
            return location.to_string();
        }
        let base = self.idl_parsed_base.trim_end_matches('/');
        let relative = location.trim_start_matches('/');
        if base.is_empty() {
            relative.to_string()
        } else {
            format!("{base}/{relative}")
        }
    }

    fn validate(&self) -> EtchResult<()> {
        if self.file_extension.is_empty() || self.file_extension.contains('/') {
            return Err(EtchError::config(format!(
                "invalid file_extension: {:?}",
                self.file_extension
            )));
        }
        Ok(())
    }
}
