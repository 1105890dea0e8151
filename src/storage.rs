//! Typed persistence for the four portal records
//!
//! | Record   | Shape                          |
//! |----------|--------------------------------|
//! | visual   | `VisualConfig`                 |
//! | users    | `Vec<User>`                    |
//! | course   | `Course`                       |
//! | progress | map of user id → `UserProgress` |
//!
//! A missing key yields the seed default without writing anything. A record
//! that fails to parse is logged and also replaced by the default.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::models::{Course, User, UserProgress, VisualConfig};
use crate::seed;
use crate::store::{self, KvStore, MemoryStore};

/// Progress table keyed by user id
pub type ProgressTable = BTreeMap<String, UserProgress>;

/// Versioned key names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub progress: String,
    pub users: String,
    pub course: String,
    pub visual: String,
}

impl StorageKeys {
    pub fn new(prefix: &str, version: &str) -> Self {
        let key = |record: &str| format!("{}_{}_{}", prefix, record, version);
        Self {
            progress: key("progress"),
            users: key("users"),
            course: key("course"),
            visual: key("visual"),
        }
    }

    pub fn all(&self) -> [&str; 4] {
        [&self.progress, &self.users, &self.course, &self.visual]
    }
}

/// Persistence adapter over any `KvStore`
pub struct Storage {
    kv: Box<dyn KvStore>,
    keys: StorageKeys,
}

impl Storage {
    pub fn new(kv: Box<dyn KvStore>, keys: StorageKeys) -> Self {
        Self { kv, keys }
    }

    /// Open the configured backend
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let kv = store::open(config)?;
        Ok(Self::new(kv, StorageKeys::new(&config.key_prefix, &config.schema_version)))
    }

    /// Storage over a fresh in-memory store with default keys
    pub fn in_memory() -> Self {
        let defaults = StorageConfig::default();
        Self::new(
            Box::new(MemoryStore::new()),
            StorageKeys::new(&defaults.key_prefix, &defaults.schema_version),
        )
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    fn load_or<T, F>(&self, key: &str, default: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.kv.get(key)? {
            None => {
                debug!("No record under {}, using default", key);
                Ok(default())
            }
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(value),
                Err(e) => {
                    warn!("Malformed record under {} ({}), using default", key, e);
                    Ok(default())
                }
            },
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize {}", key))?;
        self.kv.set(key, &json)
    }

    pub fn visual_config(&self) -> Result<VisualConfig> {
        self.load_or(&self.keys.visual, seed::default_visual)
    }

    pub fn save_visual_config(&mut self, config: &VisualConfig) -> Result<()> {
        let key = self.keys.visual.clone();
        self.save(&key, config)
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.load_or(&self.keys.users, seed::default_users)
    }

    pub fn save_users(&mut self, users: &[User]) -> Result<()> {
        let key = self.keys.users.clone();
        self.save(&key, &users)
    }

    pub fn course(&self) -> Result<Course> {
        self.load_or(&self.keys.course, seed::default_course)
    }

    pub fn save_course(&mut self, course: &Course) -> Result<()> {
        let key = self.keys.course.clone();
        self.save(&key, course)
    }

    /// Every stored progress record
    pub fn all_progress(&self) -> Result<ProgressTable> {
        self.load_or(&self.keys.progress, ProgressTable::new)
    }

    /// Progress for one user, empty if the user has none yet
    pub fn progress(&self, user_id: &str) -> Result<UserProgress> {
        Ok(self.all_progress()?.remove(user_id).unwrap_or_default())
    }

    pub fn save_progress(&mut self, user_id: &str, progress: &UserProgress) -> Result<()> {
        let mut table = self.all_progress()?;
        table.insert(user_id.to_string(), progress.clone());
        let key = self.keys.progress.clone();
        self.save(&key, &table)
    }

    /// Record a completed lesson, writing only if it was not already there
    pub fn mark_lesson_complete(&mut self, user_id: &str, lesson_id: &str) -> Result<UserProgress> {
        let mut progress = self.progress(user_id)?;
        if crate::gating::mark_lesson_complete(&mut progress, lesson_id) {
            self.save_progress(user_id, &progress)?;
            info!("User {} completed lesson {}", user_id, lesson_id);
        }
        Ok(progress)
    }

    /// Record a passed quiz by its owning module id
    pub fn mark_quiz_passed(&mut self, user_id: &str, module_id: &str) -> Result<UserProgress> {
        let mut progress = self.progress(user_id)?;
        if crate::gating::mark_quiz_passed(&mut progress, module_id) {
            self.save_progress(user_id, &progress)?;
            info!("User {} passed the quiz of module {}", user_id, module_id);
        }
        Ok(progress)
    }

    /// Drop every record so the next read falls back to the seed defaults
    pub fn reset(&mut self) -> Result<()> {
        let keys: Vec<String> = self.keys.all().iter().map(|k| k.to_string()).collect();
        for key in keys {
            self.kv.remove(&key)?;
        }
        info!("Storage reset to defaults");
        Ok(())
    }
}
