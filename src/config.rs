//! Configuration management
//!
//! Manages portal configuration: which key-value backend holds the records,
//! where it lives, how keys are versioned, and course-wide defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Persistence settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Course-wide defaults
    #[serde(default)]
    pub course: CourseConfig,
}

/// Key-value backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// One JSON file per key in the data directory
    File,
    /// Single SQLite table in the data directory
    Sqlite,
    /// In-process only, lost on exit
    Memory,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::File => write!(f, "file"),
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: Backend,
    /// Overrides the platform data directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Prefix shared by every record key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Suffix bumped whenever a record shape changes
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

fn default_backend() -> Backend {
    Backend::File
}

fn default_key_prefix() -> String {
    "course_portal".to_string()
}

fn default_schema_version() -> String {
    "v4".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: None,
            key_prefix: default_key_prefix(),
            schema_version: default_schema_version(),
        }
    }
}

impl StorageConfig {
    /// Directory the file and SQLite backends write into
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConfig {
    /// Passing score given to quizzes of newly created modules
    #[serde(default = "default_passing_score")]
    pub default_passing_score: u32,
    /// User id that can never be deleted
    #[serde(default = "default_protected_user_id")]
    pub protected_user_id: String,
}

fn default_passing_score() -> u32 {
    70
}

fn default_protected_user_id() -> String {
    crate::seed::ADMIN_ID.to_string()
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            default_passing_score: default_passing_score(),
            protected_user_id: default_protected_user_id(),
        }
    }
}

impl Config {
    /// Load configuration from a file, writing defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .context("Failed to read config file")?;
            let config: Config = toml::from_str(&contents)
                .context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }
}

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "course-portal", "course-portal")
        .context("Failed to get project directories")
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}
