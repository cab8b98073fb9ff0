use anemone_resolve::{ResolverConfig, TelegramConfig};
use anemone_world::WorldConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/anemone.toml";

/// Everything the binary reads from `config/anemone.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnemoneConfig {
    pub world: WorldConfig,
    pub resolver: ResolverConfig,
    pub telegram: TelegramConfig,
}

impl AnemoneConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    ///
    /// Telegram credentials are always taken from the environment.
    pub fn load_from_path(path: &Path) -> Self {
        let mut config = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AnemoneConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AnemoneConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                AnemoneConfig::default()
            }
        };

        if let Err(err) = config.world.validate() {
            warn!("Invalid [world] section in {}: {err}. Using defaults", path.display());
            config.world = WorldConfig::default();
        }
        config.telegram = config.telegram.with_env();
        config
    }
}
