//! Kun spec generator.
//!
//! Reads an interface description (JSON, as produced by the reflection
//! layer), resolves its `//kun:` directives and writes the resulting
//! specification to `<output>/spec.json`.

pub mod config;
pub mod fixtures;

use std::path::Path;

use anyhow::{bail, Context};
use kun_ir::{Interface, Specification};
use kun_parser::resolve_interface;
use tracing::{error, info};

pub use config::CodegenConfig;

/// Name of the generated specification file.
pub const SPEC_FILE: &str = "spec.json";
/// Name of the validated fixture file.
pub const FIXTURES_FILE: &str = "fixtures.json";

/// Read an interface description from disk.
pub fn load_interface(path: &Path) -> anyhow::Result<Interface> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let iface = serde_json::from_str(&content)
        .with_context(|| format!("invalid interface description {}", path.display()))?;
    Ok(iface)
}

/// Resolve `input` and write the outputs under `output`.
///
/// Every method error is logged before the run fails, so one invocation
/// reports all of them.
pub fn run(input: &Path, output: &Path, config: &CodegenConfig) -> anyhow::Result<Specification> {
    info!("Reading interface: {}", input.display());
    let iface = load_interface(input)?;

    let resolution = resolve_interface(&iface, &config.resolve)?;
    for notice in &resolution.notices {
        info!("method {}: {}", notice.method, notice.message);
    }
    if !resolution.errors.is_empty() {
        for err in &resolution.errors {
            error!("[{}] {}", err.error_code(), err);
        }
        bail!(
            "{} method(s) of {} failed to resolve",
            resolution.errors.len(),
            iface.name
        );
    }
    let spec = resolution.spec;

    std::fs::create_dir_all(output)?;
    write_json(&output.join(SPEC_FILE), &spec)?;
    info!("Wrote {} operations to {}", spec.operations.len(), output.display());

    if let Some(path) = &config.fixtures {
        if let Some(fixtures) = fixtures::load(path)? {
            fixtures::validate(&fixtures, &spec)?;
            write_json(&output.join(FIXTURES_FILE), &fixtures)?;
        }
    }

    Ok(spec)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
