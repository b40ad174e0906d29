//! Test fixtures: operation name → list of test cases.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::bail;
use kun_ir::Specification;
use serde_json::Value;
use tracing::{debug, warn};

pub type Fixtures = BTreeMap<String, Vec<Value>>;

/// Load a fixture file. A missing file is not an error.
pub fn load(path: &Path) -> anyhow::Result<Option<Fixtures>> {
    if !path.exists() {
        warn!("fixture file {} not found, skipping fixtures", path.display());
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let fixtures: Fixtures = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("invalid fixture file {}: {}", path.display(), e))?;
    debug!("loaded fixtures for {} operations", fixtures.len());
    Ok(Some(fixtures))
}

/// Every fixture must name a resolved operation.
pub fn validate(fixtures: &Fixtures, spec: &Specification) -> anyhow::Result<()> {
    let unknown: Vec<&str> = fixtures
        .keys()
        .filter(|name| spec.operation(name).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        bail!("fixtures reference unknown operations: {}", unknown.join(", "));
    }
    Ok(())
}
