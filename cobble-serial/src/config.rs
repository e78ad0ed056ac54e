use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest value a VarInt length prefix can carry.
const MAX_ENCODABLE_LENGTH: usize = i32::MAX as usize;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Couldn't read configuration file at {path:?}. Reason: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Couldn't parse config. Reason: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{field} must be between 1 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: usize,
        max: usize,
    },
}

/// Decoding limits applied by a [`crate::SerializerRegistry`].
///
/// Every limit is checked on both the read and the write path, so anything a
/// registry writes it can also read back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Longest string, in UTF-8 bytes.
    pub max_string_length: usize,
    /// Largest element count of a single array. Nested arrays are checked
    /// one level at a time.
    pub max_array_length: usize,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            max_string_length: cobble_io::DEFAULT_STRING_BOUND,
            max_array_length: 1 << 20,
        }
    }
}

impl SerializerConfig {
    /// Loads the config from a TOML file. A missing file is not an error;
    /// the defaults are used instead.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let file_content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            log::debug!("loading serializer config from {path:?}");
            Self::from_toml(&file_content)?
        } else {
            log::debug!("no serializer config at {path:?}, using defaults");
            let config = Self::default();
            config.validate()?;
            config
        };

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_limit("max_string_length", self.max_string_length)?;
        check_limit("max_array_length", self.max_array_length)
    }
}

fn check_limit(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_ENCODABLE_LENGTH {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            max: MAX_ENCODABLE_LENGTH,
        });
    }
    Ok(())
}
