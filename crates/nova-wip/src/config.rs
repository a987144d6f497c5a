use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boundary settings for the value model.
///
/// ```toml
/// # Give up on a property load after five seconds. Unset waits forever.
/// fetch_timeout_ms = 5000
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WipValuesConfig {
    /// Deadline for a single property load, in milliseconds.
    ///
    /// The value model itself never times out; when set, the property source
    /// is wrapped so that stalled loads fail with a timeout error instead of
    /// blocking their callers indefinitely.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a snippet of the input; keep only the message.
        ConfigError::Toml(err.message().to_string())
    }
}

impl WipValuesConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: WipValuesConfig = toml::from_str(text)?;
        config.normalize();
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms
            .map(|timeout_ms| Duration::from_millis(timeout_ms.max(1)))
    }

    fn normalize(&mut self) {
        if let Some(timeout_ms) = self.fetch_timeout_ms.as_mut() {
            if *timeout_ms == 0 {
                *timeout_ms = 1;
            }
        }
    }
}
