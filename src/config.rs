use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "automa-voice";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Whisper server base URL
    #[serde(default = "default_transcription_url")]
    pub url: String,
    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Largest audio upload accepted before sending
    #[serde(default = "default_max_audio_bytes")]
    pub max_audio_bytes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Defaults to `commands.toml` next to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands_file: Option<PathBuf>,
}

fn default_transcription_url() -> String {
    "http://localhost:8001".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_audio_bytes() -> usize {
    25 * 1024 * 1024
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            url: default_transcription_url(),
            timeout_secs: default_timeout_secs(),
            max_audio_bytes: default_max_audio_bytes(),
        }
    }
}

impl AppConfig {
    /// Resolve the commands file, relative paths against the config directory
    pub fn commands_path(&self, config_path: &Path) -> PathBuf {
        let base = config_path.parent().unwrap_or_else(|| Path::new("."));
        match &self.storage.commands_file {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => base.join(p),
            None => base.join("commands.toml"),
        }
    }
}

/// Default config file location
pub fn config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    config_dir.join("config.toml")
}

/// Load config, writing defaults first if the file does not exist
pub fn load_config(path: &Path) -> Result<AppConfig, String> {
    if path.exists() {
        let content =
            fs::read_to_string(path).map_err(|e| format!("failed to read config: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {e}"))
    } else {
        let config = AppConfig::default();
        save_config(path, &config)?;
        log::info!("wrote default config to {}", path.display());
        Ok(config)
    }
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("failed to create config dir: {e}"))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| format!("failed to serialize config: {e}"))?;
    fs::write(path, content).map_err(|e| format!("failed to write config: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = load_config(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[transcription]\nurl = \"http://whisper:9000\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.transcription.url, "http://whisper:9000");
        assert_eq!(config.transcription.timeout_secs, 30);
        assert_eq!(config.storage.commands_file, None);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "transcription = \"nope\"").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_commands_path() {
        let config_path = Path::new("/etc/automa/config.toml");
        let mut config = AppConfig::default();
        assert_eq!(config.commands_path(config_path), Path::new("/etc/automa/commands.toml"));
        config.storage.commands_file = Some(PathBuf::from("mine.toml"));
        assert_eq!(config.commands_path(config_path), Path::new("/etc/automa/mine.toml"));
        config.storage.commands_file = Some(PathBuf::from("/srv/commands.toml"));
        assert_eq!(config.commands_path(config_path), Path::new("/srv/commands.toml"));
    }
}
