use crate::config::{load_config, load_config_from_path, validate_config_result, AssemblyConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// The configuration at `path`, or the nearest `.exam-assembly.toml` when none
/// is given.
pub fn effective_config(path: Option<&Path>) -> Result<AssemblyConfig> {
    let config = match path {
        Some(path) => load_config_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => load_config(),
    };
    validate_config_result(&config).context("Invalid configuration")?;
    Ok(config)
}

pub fn run_check_config(path: Option<&Path>) -> Result<()> {
    let config = effective_config(path)?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}
