//! Command-line argument parsing for the halo viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Halo viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "haloview", about = "3D halo catalog viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Catalog generator seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of halos to generate.
    #[arg(long)]
    pub halo_count: Option<u32>,

    /// Mass threshold (1e10 Msun) below which halos are hidden.
    #[arg(long)]
    pub mass_threshold: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(seed) = args.seed {
            self.catalog.seed = seed;
        }
        if let Some(count) = args.halo_count {
            self.catalog.halo_count = count;
        }
        if let Some(threshold) = args.mass_threshold {
            self.catalog.mass_threshold = threshold;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            seed: Some(7),
            mass_threshold: Some(25.0),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.catalog.seed, 7);
        assert_eq!(config.catalog.mass_threshold, 25.0);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.catalog.halo_count, 5000);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }
}
