use std::path::Path;

use tracing::warn;

use crate::board::Dimensions;
use crate::error::ConfigError;

/// Board size, mine count and optional RNG seed, loadable from TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
  pub height: u32,
  pub width: u32,
  pub mines: u32,
  /// Seeds both the mine layout and the agent's random moves.
  pub seed: Option<u64>,
}

impl Default for GameConfig {
  fn default() -> Self {
    GameConfig {
      height: 8,
      width: 8,
      mines: 8,
      seed: None,
    }
  }
}

impl GameConfig {
  /// Load configuration from a TOML file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
      path: path.to_path_buf(),
      source: e,
    })?;
    Self::from_toml(&content)
  }

  /// Load configuration from a TOML file, falling back to defaults if the file
  /// does not exist.
  pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
    if path.exists() {
      Self::load(path)
    } else {
      warn!(path = %path.display(), "config file not found, using defaults");
      Ok(Self::default())
    }
  }

  pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
    let config: GameConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn dims(&self) -> Dimensions {
    Dimensions::new(self.height, self.width)
  }

  /// Validate configuration values.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.height == 0 || self.width == 0 {
      return Err(ConfigError::Validation("height and width must be > 0".into()));
    }
    if self.height > 1024 || self.width > 1024 {
      return Err(ConfigError::Validation("height and width must be <= 1024".into()));
    }
    if self.mines >= self.height * self.width {
      return Err(ConfigError::Validation(format!(
        "mines must be < {} for a {}x{} board",
        self.height * self.width,
        self.height,
        self.width
      )));
    }
    Ok(())
  }
}
