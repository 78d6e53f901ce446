//! Configuration management for the timing engine.
//!
//! This module provides:
//! - TOML-based configuration with `[timing]` and `[logging]` sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load: missing keys get defaults, invalid timing limits
//!   are rejected
//!
//! # Example
//!
//! ```no_run
//! use subtime_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/subtime.toml");
//! config.load_or_create().unwrap();
//!
//! config.settings_mut().timing.min_gap_ms = 120;
//! config.update_section(ConfigSection::Timing).unwrap();
//!
//! let engine = config.engine().unwrap();
//! println!("gap: {}", engine.policy().min_gap());
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, LoggingSettings, Settings, TimingSettings};
