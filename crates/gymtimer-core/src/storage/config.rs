//! Configuration storage operations

use crate::{Result, models::TimerConfig};
use std::path::PathBuf;

pub struct ConfigStorage {
    config_dir: PathBuf,
}

impl ConfigStorage {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn load(&self) -> Result<TimerConfig> {
        let config_path = self.config_dir.join("config.json");

        if !config_path.exists() {
            let config = TimerConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;

        // Handle empty file case
        if content.trim().is_empty() {
            let config = TimerConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let config: TimerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, config: &TimerConfig) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;

        let config_path = self.config_dir.join("config.json");
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }
}
