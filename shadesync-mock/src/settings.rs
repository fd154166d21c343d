use std::error::Error;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::{Deserialize, Serialize};
use shadesync_device::DeviceConfig;

/// Overrides the embedded configuration with a file on disk.
pub const CONFIG_ENV: &str = "SHADESYNC_CONFIG";

const DEFAULT_CONFIG: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../",
    "configs/default.toml"
));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Actuator {
    #[serde(default)]
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub targets: Vec<u8>,
    pub settle_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub device: DeviceConfig,
    #[serde(default)]
    pub actuator: Actuator,
    pub scenario: Scenario,
}

impl Settings {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_path(&path),
            Err(_) => Self::parse(DEFAULT_CONFIG),
        }
    }

    pub fn from_path(path: &str) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(Self::normalize_path(path)?)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Box<dyn Error>> {
        let settings: Settings = toml::from_str(content)?;
        settings.device.validate()?;

        Ok(settings)
    }

    fn normalize_path(path: &str) -> io::Result<PathBuf> {
        let path_buf = PathBuf::from(path);

        Ok(if path_buf.is_absolute() {
            path_buf
        } else {
            env::current_dir()?.as_path().join(&path_buf)
        })
    }
}
