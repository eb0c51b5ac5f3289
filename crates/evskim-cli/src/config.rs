//! Run configuration for the `skim` command, merged from CLI flags, an optional TOML
//! file, and built-in defaults, in that order of precedence.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::AppConfig;
