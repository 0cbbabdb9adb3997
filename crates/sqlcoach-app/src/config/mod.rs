//! Configuration for SQL Coach
//!
//! Settings live in `config.toml` under the platform config directory
//! (`~/.config/sqlcoach/` on Linux). Command-line flags override them.

pub mod settings;
pub mod types;

pub use settings::{
    default_config_dir, default_data_dir, init_config_dir, load_settings, APP_DIR,
    CONFIG_FILENAME,
};
pub use types::*;
