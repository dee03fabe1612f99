//! Configuration file support for wkt.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/wkt/config.toml`.

use crate::category::DEFAULT_SEPARATORS;
use crate::statistics::{StatsOptions, DEFAULT_ACTIVITY_DAYS, DEFAULT_STREAK_LOOKBACK_DAYS};
use crate::{DurationPolicy, Error, Period, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub categories: CategoryConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Statistics parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Longest streak reported; 0 disables the cap
    #[serde(default = "default_streak_lookback_days")]
    pub streak_lookback_days: u32,

    #[serde(default = "default_activity_days")]
    pub activity_days: u32,

    /// Estimate missing durations from the exercise count instead of using 0
    #[serde(default)]
    pub estimate_missing_duration: bool,

    #[serde(default = "default_minutes_per_exercise")]
    pub minutes_per_exercise: u32,

    #[serde(default)]
    pub default_period: Period,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            streak_lookback_days: default_streak_lookback_days(),
            activity_days: default_activity_days(),
            estimate_missing_duration: false,
            minutes_per_exercise: default_minutes_per_exercise(),
            default_period: Period::default(),
        }
    }
}

/// Muscle-group label derivation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryConfig {
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            separators: default_separators(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("wkt")
}

fn default_streak_lookback_days() -> u32 {
    DEFAULT_STREAK_LOOKBACK_DAYS
}

fn default_activity_days() -> u32 {
    DEFAULT_ACTIVITY_DAYS
}

fn default_minutes_per_exercise() -> u32 {
    5
}

fn default_separators() -> Vec<String> {
    DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("wkt").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject settings the statistics cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.categories.separators.iter().any(|s| s.is_empty()) {
            return Err(Error::Config("Category separators must not be empty".into()));
        }
        if self.stats.activity_days == 0 {
            return Err(Error::Config("stats.activity_days must be at least 1".into()));
        }
        Ok(())
    }

    /// Path of the workout snapshot inside the data directory
    pub fn workouts_path(&self) -> PathBuf {
        self.data.data_dir.join("workouts.json")
    }

    pub fn duration_policy(&self) -> DurationPolicy {
        if self.stats.estimate_missing_duration {
            DurationPolicy::Estimate {
                minutes_per_exercise: self.stats.minutes_per_exercise,
            }
        } else {
            DurationPolicy::Zero
        }
    }

    /// Statistics options for `period`, or the configured default period
    pub fn stats_options(&self, period: Option<Period>) -> StatsOptions {
        StatsOptions {
            period: period.unwrap_or(self.stats.default_period),
            streak_lookback_days: self.stats.streak_lookback_days,
            activity_days: self.stats.activity_days,
            duration_policy: self.duration_policy(),
            separators: self.categories.separators.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.stats.streak_lookback_days, 30);
        assert_eq!(config.stats.activity_days, 7);
        assert!(!config.stats.estimate_missing_duration);
        assert_eq!(config.categories.separators, vec!["-", "+"]);
        assert!(config.workouts_path().ends_with("wkt/workouts.json"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.stats.streak_lookback_days,
            parsed.stats.streak_lookback_days
        );
        assert_eq!(config.stats.default_period, parsed.stats.default_period);
        assert_eq!(config.categories.separators, parsed.categories.separators);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[stats]
estimate_missing_duration = true
default_period = "week"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.stats.default_period, Period::Week);
        assert_eq!(config.stats.minutes_per_exercise, 5); // default
        assert_eq!(
            config.duration_policy(),
            DurationPolicy::Estimate {
                minutes_per_exercise: 5
            }
        );

        let options = config.stats_options(Some(Period::Year));
        assert_eq!(options.period, Period::Year);
        assert_eq!(config.stats_options(None).period, Period::Week);
    }

    #[test]
    fn test_load_from_rejects_empty_separator() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[categories]\nseparators = [\"\"]\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_rejects_empty_activity_window() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[stats]\nactivity_days = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("activity_days")));

        std::fs::write(&path, "[stats]\nactivity_days = 1\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.stats_options(None).activity_days, 1);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.stats.streak_lookback_days = 90;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.stats.streak_lookback_days, 90);
    }
}
