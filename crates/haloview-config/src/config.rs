//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Camera navigation and fly-to settings.
    pub camera: CameraConfig,
    /// Procedural catalog settings.
    pub catalog: CatalogConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Uniform tint for halo profile shading, linear RGB.
    pub point_color: [f32; 3],
    /// Background clear color, linear RGB.
    pub background: [f32; 3],
    /// Half-extent of the ground grid in Mpc.
    pub grid_extent: f32,
    /// Spacing between grid lines in Mpc.
    pub grid_step: f32,
}

/// Camera navigation and fly-to configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Damping factor applied per tick to orbit motion (0 = frozen, 1 = instant).
    pub damping: f32,
    /// Mouse sensitivity for orbit rotation, radians per pixel.
    pub orbit_sensitivity: f32,
    /// Pan speed scale, world units per pixel at unit distance.
    pub pan_sensitivity: f32,
    /// Scroll wheel zoom sensitivity.
    pub zoom_sensitivity: f32,
    /// Minimum zoom distance in Mpc.
    pub min_distance: f32,
    /// Maximum zoom distance in Mpc.
    pub max_distance: f32,
    /// Fly-to animation duration in seconds.
    pub fly_to_duration: f32,
    /// Fly-to approach distance as a multiple of the target's outer radius.
    pub approach_scale: f32,
    /// Minimum fly-to approach distance in Mpc.
    pub approach_floor: f32,
}

/// Procedural catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Seed for the deterministic generator.
    pub seed: u64,
    /// Number of halos to generate.
    pub halo_count: u32,
    /// Side length of the catalog volume in Mpc.
    pub box_size: f32,
    /// Mass threshold (1e10 Msun); halos below it are filtered out.
    pub mass_threshold: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Haloview".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            point_color: [0.55, 0.75, 1.0],
            background: [0.02, 0.02, 0.05],
            grid_extent: 60.0,
            grid_step: 10.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            damping: 0.1,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.0012,
            zoom_sensitivity: 0.1,
            min_distance: 0.05,
            max_distance: 500.0,
            fly_to_duration: 2.0,
            approach_scale: 3.0,
            approach_floor: 0.5,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            halo_count: 5000,
            box_size: 100.0,
            mass_threshold: 0.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// The default config directory: `~/.config/haloview` (platform equivalent),
/// falling back to the current directory when no config dir exists.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("haloview"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("halo_count: 5000"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), render: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.camera, CameraConfig::default());
        assert_eq!(config.catalog, CatalogConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.catalog.seed = 7;
        config.camera.approach_scale = 10.0;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.catalog.halo_count = 100;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().catalog.halo_count, 100);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_camera_constants_are_sane() {
        let cam = CameraConfig::default();
        assert!(cam.damping > 0.0 && cam.damping <= 1.0);
        assert!(cam.min_distance < cam.max_distance);
        assert!(cam.fly_to_duration > 0.0);
        assert!(cam.approach_scale > 0.0);
        assert!(cam.approach_floor > 0.0);
    }
}
