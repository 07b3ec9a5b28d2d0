//! Game settings, read from an optional TOML file and overridden by
//! `BLOCKFALL_*` environment variables.

use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;

use crate::board::{check_dimensions, LockColors, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::GameError;

pub const ENV_SEED: &str = "BLOCKFALL_SEED";
pub const ENV_WIDTH: &str = "BLOCKFALL_WIDTH";
pub const ENV_HEIGHT: &str = "BLOCKFALL_HEIGHT";
pub const ENV_LOCK_COLORS: &str = "BLOCKFALL_LOCK_COLORS";

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub lock_colors: LockColors,
    /// Fixed seed for the piece randomiser; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            lock_colors: LockColors::Marker,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults, then `path` if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, GameError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let text = fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, GameError> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), GameError> {
        if let Some(seed) = env_override(ENV_SEED)? {
            self.seed = Some(seed);
        }
        if let Some(width) = env_override(ENV_WIDTH)? {
            self.width = width;
        }
        if let Some(height) = env_override(ENV_HEIGHT)? {
            self.height = height;
        }
        if let Some(lock_colors) = env_override(ENV_LOCK_COLORS)? {
            self.lock_colors = lock_colors;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), GameError> {
        check_dimensions(self.width, self.height)
    }
}

fn env_override<T: FromStr>(var: &'static str) -> Result<Option<T>, GameError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| GameError::InvalidOverride { var, value }),
        Err(_) => Ok(None),
    }
}
