//! # Config Loader
//!
//! Option loading for the sensor registry.
//!
//! Responsibilities:
//! - Parse TOML/JSON option files into a flat [`OptionSet`]
//! - Read and write the CSV tables options point at
//! - Parse the world geometry options
//! - Flag option names no schema declares
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let options = ConfigLoader::load_from_path(Path::new("survey.toml")).unwrap();
//! println!("magnetism enabled: {:?}", options.get_raw("magnetism.enabled"));
//! ```

pub mod lint;
mod parser;
pub mod table;
pub mod world;

pub use contracts::OptionSet;
pub use parser::ConfigFormat;
pub use world::{parse_world, write_world};

use contracts::ConfigError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Option file loader
///
/// Provides static methods to load options from files or strings and to write them back.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load options from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    pub fn load_from_path(path: &Path) -> Result<OptionSet, ConfigError> {
        let format = Self::detect_format(path)?;
        let content = fs::read_to_string(path)?;
        let options = Self::load_from_str(&content, format)?;
        debug!(path = %path.display(), options = options.len(), "option file loaded");
        Ok(options)
    }

    /// Load options from string
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<OptionSet, ConfigError> {
        parser::parse(content, format)
    }

    /// Write options to a file, format chosen by extension
    pub fn write_to_path(path: &Path, options: &OptionSet) -> Result<(), ConfigError> {
        let content = match Self::detect_format(path)? {
            ConfigFormat::Toml => Self::to_toml(options)?,
            ConfigFormat::Json => Self::to_json(options)?,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        debug!(path = %path.display(), options = options.len(), "option file written");
        Ok(())
    }

    /// Serialize options to a TOML string, one table per option section
    pub fn to_toml(options: &OptionSet) -> Result<String, ConfigError> {
        let mut root = toml::Table::new();
        for (name, value) in options.iter() {
            let value = toml::Value::String(value.to_string());
            match name.split_once('.') {
                Some((section, field)) => {
                    let entry = root
                        .entry(section.to_string())
                        .or_insert(toml::Value::Table(toml::Table::new()));
                    let toml::Value::Table(table) = entry else {
                        return Err(section_conflict(section));
                    };
                    table.insert(field.to_string(), value);
                }
                None => {
                    if root.contains_key(name) {
                        return Err(section_conflict(name));
                    }
                    root.insert(name.to_string(), value);
                }
            }
        }
        toml::to_string_pretty(&root)
            .map_err(|e| ConfigError::parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize options to a JSON string, one object per option section
    pub fn to_json(options: &OptionSet) -> Result<String, ConfigError> {
        let mut root = serde_json::Map::new();
        for (name, value) in options.iter() {
            let value = serde_json::Value::String(value.to_string());
            match name.split_once('.') {
                Some((section, field)) => {
                    let entry = root
                        .entry(section.to_string())
                        .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
                    let serde_json::Value::Object(object) = entry else {
                        return Err(section_conflict(section));
                    };
                    object.insert(field.to_string(), value);
                }
                None => {
                    if root.contains_key(name) {
                        return Err(section_conflict(name));
                    }
                    root.insert(name.to_string(), value);
                }
            }
        }
        serde_json::to_string_pretty(&serde_json::Value::Object(root))
            .map_err(|e| ConfigError::parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer option file format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::parse("cannot determine file format from extension"))?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::parse(format!("unsupported option file format: .{ext}")))
    }
}

fn section_conflict(name: &str) -> ConfigError {
    ConfigError::parse(format!("'{name}' is used both as an option and as a section"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURVEY_TOML: &str = r#"
[world]
xBounds = "0 100"
yBounds = "0 100"

[gravity]
enabled = true
sensorLocations = "grav_locations.csv"
gridResolution = [4, 4, 4]
supersample = 2
noiseAlpha = 1.0
noiseBeta = 0.5
"#;

    #[test]
    fn test_load_from_str_toml() {
        let options = ConfigLoader::load_from_str(SURVEY_TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(options.get_raw("gravity.supersample"), Some("2"));
        assert_eq!(options.get_raw("world.xBounds"), Some("0 100"));
    }

    #[test]
    fn test_round_trip_toml() {
        let options = ConfigLoader::load_from_str(SURVEY_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&options).unwrap();
        let back = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(options, back);
    }

    #[test]
    fn test_round_trip_json() {
        let options = ConfigLoader::load_from_str(SURVEY_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&options).unwrap();
        let back = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(options, back);
    }

    #[test]
    fn test_write_and_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/options.toml");
        let options = ConfigLoader::load_from_str(SURVEY_TOML, ConfigFormat::Toml).unwrap();

        ConfigLoader::write_to_path(&path, &options).unwrap();
        assert_eq!(ConfigLoader::load_from_path(&path).unwrap(), options);
    }

    #[test]
    fn test_section_conflict() {
        let mut options = OptionSet::new();
        options.insert("gravity", "1");
        options.insert("gravity.enabled", "true");
        assert!(ConfigLoader::to_toml(&options).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = ConfigLoader::load_from_path(Path::new("survey.ini")).unwrap_err();
        assert!(err.to_string().contains(".ini"), "got: {err}");
    }
}
