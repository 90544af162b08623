use serde::{Deserialize, Serialize};

use super::field_test::FieldTestConfig;
use super::forms::FormRotationConfig;
use super::items::ItemPoolConfig;

/// Root configuration structure for exam assembly
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AssemblyConfig {
    /// Field-test eligibility and placement
    #[serde(default)]
    pub field_test: FieldTestConfig,

    /// Fixed-form rotation
    #[serde(default)]
    pub forms: FormRotationConfig,

    /// Item pool resolution
    #[serde(default)]
    pub items: ItemPoolConfig,
}
