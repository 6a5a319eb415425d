//! Configuration system for the halo viewer.
//!
//! Runtime-configurable settings persisted to disk as RON, with CLI overrides
//! via clap and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, CatalogConfig, Config, DebugConfig, RenderConfig, WindowConfig, default_config_dir,
};
pub use error::ConfigError;
