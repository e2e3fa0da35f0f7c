//! Engine configuration
//!
//! Read from `config.toml` in the data directory. Every field has a default,
//! so a missing file or a partial file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{FileRecordStore, StorageError};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Longest recall interval accepted from a config file (one year)
pub const MAX_INTERVAL_MINUTES: i64 = 365 * 24 * 60;

/// How repeat quiz attempts are rewarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RewardPolicy {
    /// An attempt that beats the recorded award earns the difference
    BestAttempt,
    /// Only the attempt that first completes the quiz earns points
    FirstAttemptOnly,
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self::FirstAttemptOnly
    }
}

/// Spaced repetition intervals for saved flashcards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    /// Minutes until a card recalled with difficulty is due again
    pub hard_interval_minutes: i64,
    /// Minutes until an easily recalled card is due again
    pub easy_interval_minutes: i64,
    /// Consecutive easy recalls that move a card to long-term memory
    pub promote_after_easy: u32,
}

impl RecallConfig {
    /// Reject intervals outside `0..=MAX_INTERVAL_MINUTES` and a zero promotion threshold
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, minutes) in [
            ("hard_interval_minutes", self.hard_interval_minutes),
            ("easy_interval_minutes", self.easy_interval_minutes),
        ] {
            if !(0..=MAX_INTERVAL_MINUTES).contains(&minutes) {
                return Err(ConfigError::Invalid(format!(
                    "recall.{} must be between 0 and {}, got {}",
                    name, MAX_INTERVAL_MINUTES, minutes
                )));
            }
        }
        if self.promote_after_easy == 0 {
            return Err(ConfigError::Invalid(
                "recall.promote_after_easy must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            hard_interval_minutes: 5,
            easy_interval_minutes: 60,
            promote_after_easy: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Where records are stored (defaults to the platform data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Course document (defaults to `course.json` in the data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_path: Option<PathBuf>,
    pub progress_key: String,
    pub flashcard_key: String,
    pub reward_policy: RewardPolicy,
    /// Passing score for quizzes that do not declare one
    pub default_passing_score: u8,
    /// When set, a failing quiz attempt does not complete the module
    pub quiz_requires_pass: bool,
    pub recall: RecallConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            course_path: None,
            progress_key: "user_progress".to_string(),
            flashcard_key: "flashcard_memory".to_string(),
            reward_policy: RewardPolicy::default(),
            default_passing_score: 65,
            quiz_requires_pass: false,
            recall: RecallConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file, falling back to defaults if it doesn't exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.recall.validate()?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Resolve the data directory
    pub fn data_dir(&self) -> Result<PathBuf, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileRecordStore::default_data_dir(),
        }
    }

    /// Resolve the course document path
    pub fn course_path(&self) -> Result<PathBuf, StorageError> {
        match &self.course_path {
            Some(path) => Ok(path.clone()),
            None => Ok(self.data_dir()?.join("course.json")),
        }
    }
}
