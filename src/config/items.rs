use serde::{Deserialize, Serialize};

fn default_language_property() -> String {
    "Language".to_string()
}

/// Item pool settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemPoolConfig {
    /// Item property carrying the item's language code (default: "Language")
    #[serde(default = "default_language_property")]
    pub language_property: String,
}

impl Default for ItemPoolConfig {
    fn default() -> Self {
        Self {
            language_property: default_language_property(),
        }
    }
}
