mod core;
mod forms;
mod items;
mod loader;
pub mod validation;

pub use core::AssemblyConfig;
pub use field_test::FieldTestConfig;
pub use forms::FormRotationConfig;
pub use items::ItemPoolConfig;
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use validation::{validate_config, validate_config_result, ConfigIssue};
