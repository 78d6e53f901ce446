//! Loading and saving the settings file.
//!
//! The file is always replaced atomically (temp file + rename). Updating one
//! section goes through `toml_edit` so the other tables stay exactly as they
//! are on disk. Loading rejects timing limits the engine would refuse.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table};

use super::settings::{ConfigSection, Settings};
use crate::timing::{TimingEngine, TimingRefusal};

/// Errors raised while reading or writing the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not edit config: {0}")]
    Edit(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Config has unusable timing limits: {0}")]
    Policy(#[from] TimingRefusal),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the settings file and the settings read from it.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Manager for the file at `config_path`, holding default settings until
    /// [`load`](Self::load) or [`load_or_create`](Self::load_or_create).
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// In-memory settings. Persist with [`save`](Self::save) or
    /// [`update_section`](Self::update_section).
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Timing engine built from the current `[timing]` table.
    pub fn engine(&self) -> ConfigResult<TimingEngine> {
        Ok(TimingEngine::new(self.settings.timing.policy()?))
    }

    /// Read the file. Fails if it does not exist or its timing limits are
    /// invalid.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let settings: Settings = toml::from_str(&fs::read_to_string(&self.config_path)?)?;
        settings.timing.policy()?;
        self.settings = settings;
        Ok(())
    }

    /// Read the file, writing defaults first if it is missing.
    ///
    /// A file with unknown tables or missing keys is rewritten in full.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            tracing::info!("Writing default config to '{}'", self.config_path.display());
            self.settings = Settings::default();
            return self.save();
        }

        let content = fs::read_to_string(&self.config_path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.timing.policy()?;
        self.settings = settings;

        if needs_rewrite(&content.parse()?, &self.settings)? {
            tracing::debug!("Normalising config '{}'", self.config_path.display());
            self.save()?;
        }
        Ok(())
    }

    /// Write every section, with comments, atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let mut output = String::from("# Subtime configuration\n");

        for section in ConfigSection::ALL {
            output.push('\n');
            output.push_str(section_comment(section));
            output.push_str(&format!("[{}]\n", section.table_name()));
            output.push_str(&self.section_toml(section)?);
        }

        self.write_atomically(&output)?;
        Ok(())
    }

    /// Replace one table in the file on disk, leaving the others untouched.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let mut doc = match fs::read_to_string(&self.config_path) {
            Ok(content) => content.parse::<DocumentMut>()?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => DocumentMut::new(),
            Err(err) => return Err(err.into()),
        };

        let fresh: DocumentMut = self.section_toml(section)?.parse()?;
        doc[section.table_name()] = Item::Table(fresh.as_table().clone());

        tracing::debug!(
            "Updating [{}] in '{}'",
            section.table_name(),
            self.config_path.display()
        );
        self.write_atomically(&doc.to_string())?;
        Ok(())
    }

    /// Key/value lines of one section, without the table header.
    fn section_toml(&self, section: ConfigSection) -> ConfigResult<String> {
        Ok(match section {
            ConfigSection::Timing => toml::to_string(&self.settings.timing)?,
            ConfigSection::Logging => toml::to_string(&self.settings.logging)?,
        })
    }

    fn write_atomically(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.config_path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.config_path)
    }
}

fn section_comment(section: ConfigSection) -> &'static str {
    match section {
        ConfigSection::Timing => {
            "# Minimum gap and display duration in ms, reading speeds in characters per second\n"
        }
        ConfigSection::Logging => {
            "# Log level (trace, debug, info, warn, error) and optional file output\n"
        }
    }
}

/// True when `doc` has tables we don't know or lacks keys that `settings`
/// (with defaults filled in) would write.
fn needs_rewrite(doc: &DocumentMut, settings: &Settings) -> ConfigResult<bool> {
    let known = |name: &str| ConfigSection::ALL.iter().any(|s| s.table_name() == name);
    if doc.iter().any(|(name, _)| !known(name)) {
        return Ok(true);
    }

    let full: DocumentMut = toml::to_string(settings)?.parse()?;
    for section in ConfigSection::ALL {
        let name = section.table_name();
        let on_disk = doc.get(name).and_then(Item::as_table);
        let expected = full.get(name).and_then(Item::as_table);
        if let (Some(expected), on_disk) = (expected, on_disk) {
            if !has_all_keys(on_disk, expected) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn has_all_keys(on_disk: Option<&Table>, expected: &Table) -> bool {
    on_disk.is_some_and(|table| expected.iter().all(|(key, _)| table.contains_key(key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(".config").join("subtime.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[timing]"));
        assert!(content.contains("[logging]"));
        assert!(content.contains("min_characters_per_second = 5.0"));
    }

    #[test]
    fn fills_in_missing_keys_and_keeps_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subtime.toml");
        fs::write(&config_path, "[timing]\nmin_gap_ms = 42\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert_eq!(manager.settings().timing.min_gap_ms, 42);
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("min_display_ms"));
        assert!(content.contains("min_gap_ms = 42"));
        assert!(content.contains("[logging]"));
    }

    #[test]
    fn drops_unknown_tables() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subtime.toml");
        fs::write(&config_path, "[spellcheck]\nlanguage = \"en\"\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(!content.contains("[spellcheck]"));
    }

    #[test]
    fn complete_file_is_not_rewritten() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subtime.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let custom = fs::read_to_string(&config_path).unwrap() + "# kept\n";
        fs::write(&config_path, &custom).unwrap();

        manager.load_or_create().unwrap();
        assert_eq!(fs::read_to_string(&config_path).unwrap(), custom);
    }

    #[test]
    fn invalid_timing_limits_are_rejected() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subtime.toml");
        fs::write(&config_path, "[timing]\nmax_characters_per_second = 0.0\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        assert!(matches!(manager.load(), Err(ConfigError::Policy(_))));
        assert!(matches!(manager.load_or_create(), Err(ConfigError::Policy(_))));
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("absent.toml"));
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn update_section_only_touches_that_table() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subtime.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();
        let with_note = fs::read_to_string(&config_path)
            .unwrap()
            .replace("[logging]", "# my logging\n[logging]");
        fs::write(&config_path, with_note).unwrap();

        manager.settings_mut().timing.min_gap_ms = 250;
        manager.update_section(ConfigSection::Timing).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("min_gap_ms = 250"));
        assert!(content.contains("# my logging"));
        assert!(!config_path.with_extension("toml.tmp").exists());

        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        assert_eq!(
            reloaded.engine().unwrap().policy().min_gap().as_millis(),
            250
        );
    }
}
