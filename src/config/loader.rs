use std::fs;
use std::path::{Path, PathBuf};

use super::core::AssemblyConfig;
use super::validation::validate_config_result;
use crate::errors::AssemblyError;

/// File name searched for in the current directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".exam-assembly.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate config from a TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<AssemblyConfig, AssemblyError> {
    let config = toml::from_str::<AssemblyConfig>(contents).map_err(|e| {
        AssemblyError::config(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
    })?;
    validate_config_result(&config)?;
    Ok(config)
}

/// Load configuration from an explicit path
pub fn load_config_from_path(path: &Path) -> Result<AssemblyConfig, AssemblyError> {
    let contents = fs::read_to_string(path)?;
    let config = parse_and_validate_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

fn try_load_config_from_path(config_path: &Path) -> Option<AssemblyConfig> {
    if !config_path.is_file() {
        return None;
    }
    match load_config_from_path(config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("{} ({}). Using defaults.", e, config_path.display());
            None
        }
    }
}

/// Find the nearest config file from `start` upwards, or fall back to defaults.
pub fn load_config_from(start: PathBuf) -> AssemblyConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            AssemblyConfig::default()
        })
}

pub fn load_config() -> AssemblyConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            AssemblyConfig::default()
        }
    }
}
