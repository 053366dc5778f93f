use crate::constants::{DEFAULT_COMPETITION_ID, DEFAULT_MAIN_EVENT};
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Competition whose registrations are scraped.
    pub competition_id: String,
    /// Event whose world rank orders the report rows.
    pub main_event: String,
    /// Where the extracted rankings TSV is cached.
    pub cache_dir: String,
    /// Where the report CSV is written.
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            competition_id: DEFAULT_COMPETITION_ID.to_string(),
            main_event: DEFAULT_MAIN_EVENT.to_string(),
            cache_dir: "data".to_string(),
            output_dir: "output".to_string(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to the
    /// built-in defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        if !Path::new(config_path).exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{config_path}': {e}"))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults_for_missing_fields() {
        let config: Config = toml::from_str("main_event = \"222\"").unwrap();
        assert_eq!(config.main_event, "222");
        assert_eq!(config.competition_id, DEFAULT_COMPETITION_ID);
        assert_eq!(config.output_dir, "output");
    }
}
