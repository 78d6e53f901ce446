//! Persisted settings: one struct per TOML table.
//!
//! Every field has a serde default, so a partial file still loads and the
//! missing keys are written back on the next save.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::timing::{Timestamp, TimingPolicy, TimingRefusal};

/// The whole settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Timing policy limits.
    #[serde(default)]
    pub timing: TimingSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Timing limits used by every timing operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Minimum silence between two subtitles, in milliseconds.
    #[serde(default = "default_min_gap_ms")]
    pub min_gap_ms: i64,

    /// Minimum display duration, in milliseconds.
    #[serde(default = "default_min_display_ms")]
    pub min_display_ms: i64,

    /// Slowest acceptable reading speed (characters per second).
    #[serde(default = "default_min_cps")]
    pub min_characters_per_second: f64,

    /// Fastest acceptable reading speed (characters per second).
    #[serde(default = "default_max_cps")]
    pub max_characters_per_second: f64,

    /// Comfortable reading speed used by "idealize duration".
    #[serde(default = "default_ideal_cps")]
    pub ideal_characters_per_second: f64,
}

fn default_min_gap_ms() -> i64 {
    100
}

fn default_min_display_ms() -> i64 {
    1000
}

fn default_min_cps() -> f64 {
    5.0
}

fn default_max_cps() -> f64 {
    25.0
}

fn default_ideal_cps() -> f64 {
    15.0
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            min_gap_ms: default_min_gap_ms(),
            min_display_ms: default_min_display_ms(),
            min_characters_per_second: default_min_cps(),
            max_characters_per_second: default_max_cps(),
            ideal_characters_per_second: default_ideal_cps(),
        }
    }
}

impl TimingSettings {
    /// Build a validated timing policy from these settings.
    pub fn policy(&self) -> Result<TimingPolicy, TimingRefusal> {
        TimingPolicy::new(
            Timestamp::from_millis(self.min_gap_ms),
            Timestamp::from_millis(self.min_display_ms),
            self.min_characters_per_second,
            self.max_characters_per_second,
            self.ideal_characters_per_second,
        )
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Also write logs to a file in `logs_folder`.
    #[serde(default)]
    pub log_to_file: bool,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            log_to_file: false,
            logs_folder: default_logs_folder(),
        }
    }
}

/// A top-level table of the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Timing,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 2] = [ConfigSection::Timing, ConfigSection::Logging];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Timing => "timing",
            ConfigSection::Logging => "logging",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[timing]"));
        assert!(toml.contains("[logging]"));
        assert!(toml.contains("min_gap_ms"));
    }

    #[test]
    fn settings_round_trip() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.timing.min_gap_ms, settings.timing.min_gap_ms);
        assert_eq!(parsed.logging.level, settings.logging.level);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[timing]\nmin_gap_ms = 250";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.timing.min_gap_ms, 250);
        assert_eq!(parsed.timing.min_display_ms, 1000);
        assert!(!parsed.logging.log_to_file);
    }

    #[test]
    fn default_timing_builds_policy() {
        let policy = TimingSettings::default().policy().unwrap();
        assert_eq!(policy.min_gap(), Timestamp::from_millis(100));
        assert_eq!(policy.max_cps(), 25.0);
    }

    #[test]
    fn zero_cps_is_rejected() {
        let settings = TimingSettings {
            ideal_characters_per_second: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.policy(),
            Err(TimingRefusal::InvalidPolicy(_))
        ));
    }
}
