//! Generator configuration.
//!
//! Reads `kun.toml`:
//!
//! ```toml
//! fixtures = "testdata/fixtures.json"
//!
//! [resolve]
//! naming = "lower_camel_case"
//! void_success = "rewrite"
//! ```

use std::path::{Path, PathBuf};

use kun_parser::ResolveOptions;
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kun.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Options handed to the resolver.
    #[serde(default)]
    pub resolve: ResolveOptions,

    /// Test fixture file checked against the resolved operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixtures: Option<PathBuf>,
}

impl CodegenConfig {
    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
