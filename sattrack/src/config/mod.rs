// config.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};
use thiserror::Error;

const APP_NAME: &str = "sattrack";
const CONFIG_FILE_NAME: &str = "config.json";

pub fn default_config_path() -> PathBuf {
    let mut dir = dirs_next::config_dir().unwrap_or_else(|| {
        dirs_next::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
    });
    dir.push(APP_NAME);
    dir.push(CONFIG_FILE_NAME);
    dir
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// BCM pin numbers of the rotary encoder.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Gpio {
    pub clk: u8,
    pub dt: u8,
    pub sw: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above sea level.
    pub altitude: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tle {
    pub path: PathBuf,
    /// Selectable targets, in menu order. "None" parks the mount.
    pub whitelist: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Motion {
    pub steps_per_revolution: u32,
    pub servo_offset: i32,
    #[serde(default)]
    pub encoder_reversed: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Actuator {
    pub i2c_address: u8,
    /// Device or file the frames are written to; frames are only logged when unset.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Timing {
    pub select_timeout_ms: u64,
    pub settle_ms: u64,
    pub exit_pause_ms: u64,
}

impl Timing {
    pub fn select_timeout(&self) -> Duration {
        Duration::from_millis(self.select_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn exit_pause(&self) -> Duration {
        Duration::from_millis(self.exit_pause_ms)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            select_timeout_ms: 2500,
            settle_ms: 3000,
            exit_pause_ms: 1500,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub gpio: Gpio,
    pub location: Location,
    pub tle: Tle,
    pub motion: Motion,
    pub actuator: Actuator,
    #[serde(default)]
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gpio: Gpio {
                clk: 17,
                dt: 18,
                sw: 27,
            },
            location: Location {
                latitude: 45.503575,
                longitude: -73.587090,
                altitude: 100.0,
            },
            tle: Tle {
                path: PathBuf::from("tle.txt"),
                whitelist: vec![
                    "None".to_string(),
                    "ISS (ZARYA)".to_string(),
                    "NOAA 19".to_string(),
                ],
            },
            motion: Motion {
                steps_per_revolution: 7200,
                servo_offset: 90,
                encoder_reversed: false,
            },
            actuator: Actuator {
                i2c_address: 0x08,
                output_path: None,
            },
            timing: Timing::default(),
        }
    }
}

impl Config {
    /// Load from the default location, or return default if missing
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Config::load(&path)
        } else {
            let cfg = Config::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let cfg: Config = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tle.whitelist.is_empty() {
            return Err(ConfigError::Invalid(
                "tle.whitelist must name at least one target".to_owned(),
            ));
        }
        if self.tle.whitelist.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "tle.whitelist entries must not be blank".to_owned(),
            ));
        }
        if self.motion.steps_per_revolution == 0 {
            return Err(ConfigError::Invalid(
                "motion.steps_per_revolution must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Azimuth steps per degree, computed the way the actuator firmware expects.
    pub fn degrees_to_steps(&self) -> f64 {
        f64::from(self.motion.steps_per_revolution) / 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.degrees_to_steps(), 20.0);
        assert_eq!(cfg.timing.select_timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn json_round_trip() {
        let cfg = Config::default();
        let raw = serde_json::to_string_pretty(&cfg).unwrap();
        let back: Config = serde_json::from_str(&raw).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let raw = r#"{
            "gpio": {"clk": 5, "dt": 6, "sw": 13},
            "location": {"latitude": 51.5, "longitude": -0.1, "altitude": 20.0},
            "tle": {"path": "/tmp/active.txt", "whitelist": ["None", "NOAA 15"]},
            "motion": {"steps_per_revolution": 3200, "servo_offset": 90},
            "actuator": {"i2c_address": 8}
        }"#;
        let cfg: Config = serde_json::from_str(raw).unwrap();
        assert!(!cfg.motion.encoder_reversed);
        assert_eq!(cfg.actuator.output_path, None);
        assert_eq!(cfg.timing, Timing::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn example_config_parses() {
        let cfg: Config = serde_json::from_str(include_str!("../../config.example.json")).unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.tle.whitelist.first().map(String::as_str), Some("None"));
    }

    #[test]
    fn empty_whitelist_rejected() {
        let mut cfg = Config::default();
        cfg.tle.whitelist.clear();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_step_ratio_rejected() {
        let mut cfg = Config::default();
        cfg.motion.steps_per_revolution = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join("sattrack_config_load_test.json");
        let mut cfg = Config::default();
        cfg.tle.whitelist = vec!["NOAA 18".to_string()];
        fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.tle.whitelist, vec!["NOAA 18".to_string()]);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_rejects_bad_json() {
        let path = std::env::temp_dir().join("sattrack_config_bad_json_test.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}
