use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_rotation_idle_secs() -> u64 {
    3600
}

/// Round-robin form rotation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormRotationConfig {
    /// Idle seconds after which a segment's rotation restarts at its first form (default: 3600)
    #[serde(default = "default_rotation_idle_secs")]
    pub rotation_idle_secs: u64,
}

impl Default for FormRotationConfig {
    fn default() -> Self {
        Self {
            rotation_idle_secs: default_rotation_idle_secs(),
        }
    }
}

impl FormRotationConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.rotation_idle_secs)
    }
}
