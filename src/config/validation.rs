//! Configuration validation.
//!
//! All problems are collected before reporting, so a single run shows every
//! invalid field instead of the first one only.

use super::AssemblyConfig;
use crate::errors::AssemblyError;

/// One invalid configuration field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

/// Collect every validation issue in `config`.
pub fn validate_config(config: &AssemblyConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if config.field_test.position_draw_bound == 0 {
        issues.push(ConfigIssue {
            field: "field_test.position_draw_bound",
            message: "must be greater than zero".into(),
        });
    }
    if config.forms.rotation_idle_secs == 0 {
        issues.push(ConfigIssue {
            field: "forms.rotation_idle_secs",
            message: "must be greater than zero".into(),
        });
    }
    if config.items.language_property.trim().is_empty() {
        issues.push(ConfigIssue {
            field: "items.language_property",
            message: "must not be empty".into(),
        });
    }

    issues
}

/// Validate and convert the issues into a single error.
pub fn validate_config_result(config: &AssemblyConfig) -> Result<(), AssemblyError> {
    let issues = validate_config(config);
    match issues.as_slice() {
        [] => Ok(()),
        [single] => Err(AssemblyError::config_with_field(
            format!("{}: {}", single.field, single.message),
            single.field,
        )),
        many => Err(AssemblyError::config(
            many.iter()
                .map(|issue| format!("{}: {}", issue.field, issue.message))
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}
