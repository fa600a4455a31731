//! Application configuration.
//!
//! Stored as pretty JSON in `config.json` next to the database in the
//! platform data directory (see [`DataStorage`]). A missing file means
//! defaults, so the application runs without any setup; `tabli init` walks
//! through the settings interactively.
//!
//! ```json
//! {
//!   "backup": { "file_prefix": "tabli_backup", "directory": "/home/me/backups" },
//!   "auto_backup": { "enabled": true, "delay_ms": 2000 }
//! }
//! ```

use super::data_storage::DataStorage;
use crate::libs::backup::DEFAULT_FILE_PREFIX;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Manual `backup export` settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BackupConfig {
    /// File names look like `<file_prefix>_2025-01-15_14-30.json`.
    pub file_prefix: String,

    /// Target directory; the current directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// Debounced auto-backup settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AutoBackupConfig {
    pub enabled: bool,

    /// Quiet period after the last change before a snapshot is taken.
    pub delay_ms: u64,

    /// When set, every snapshot is also written here as a backup file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub backup: BackupConfig,
    pub auto_backup: AutoBackupConfig,
}

impl Default for BackupConfig {
    fn default() -> Self {
        BackupConfig {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            directory: None,
        }
    }
}

impl Default for AutoBackupConfig {
    fn default() -> Self {
        AutoBackupConfig {
            enabled: true,
            delay_ms: 2000,
            directory: None,
        }
    }
}

impl BackupConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "backup".to_string(),
            name: "Backup".to_string(),
        }
    }

    /// Directory `backup export` writes to when `--output` is not given.
    pub fn target_dir(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn init(current: &BackupConfig) -> Result<Self> {
        msg_print!(Message::ConfigModuleBackup);
        let file_prefix: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptBackupPrefix.to_string())
            .default(current.file_prefix.clone())
            .interact_text()?;
        let directory = prompt_directory(Message::PromptBackupDirectory, &current.directory)?;

        Ok(BackupConfig { file_prefix, directory })
    }
}

impl AutoBackupConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "auto_backup".to_string(),
            name: "Auto-backup".to_string(),
        }
    }

    pub fn init(current: &AutoBackupConfig) -> Result<Self> {
        msg_print!(Message::ConfigModuleAutoBackup);
        let enabled = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptAutoBackupEnabled.to_string())
            .default(current.enabled)
            .interact()?;
        let delay_ms: u64 = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptAutoBackupDelay.to_string())
            .default(current.delay_ms)
            .interact_text()?;
        let directory = prompt_directory(Message::PromptAutoBackupDirectory, &current.directory)?;

        Ok(AutoBackupConfig {
            enabled,
            delay_ms,
            directory,
        })
    }
}

fn prompt_directory(prompt: Message, current: &Option<PathBuf>) -> Result<Option<PathBuf>> {
    let default = current.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(default)
        .allow_empty(true)
        .interact_text()?;
    let answer = answer.trim();
    Ok(if answer.is_empty() { None } else { Some(PathBuf::from(answer)) })
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        Ok(DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn read() -> Result<Config> {
        Self::read_from(&Self::path()?)
    }

    /// Reads the config at `path`, falling back to defaults when it is absent.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn delete() -> Result<bool> {
        let path = Self::path()?;
        if path.exists() {
            fs::remove_file(path)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Interactive setup wizard seeded with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [BackupConfig::module(), AutoBackupConfig::module()];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "backup" => config.backup = BackupConfig::init(&config.backup)?,
                "auto_backup" => config.auto_backup = AutoBackupConfig::init(&config.auto_backup)?,
                _ => {}
            }
        }

        Ok(config)
    }
}
