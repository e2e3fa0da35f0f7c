//! Module completion and reward points
//!
//! Info and flashcards modules pay their full value once; later completions
//! are no-ops. Quizzes pay `floor(score * value / 100)` when the score
//! reaches the passing mark, and repeat attempts follow the configured
//! [`RewardPolicy`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::models::{ModuleProgress, UserProgress};
use super::storage::ProgressStore;
use crate::config::{EngineConfig, RewardPolicy};
use crate::course::{Course, Module, ModuleType};
use crate::events::{ProgressEvent, ProgressListener, ProgressNotifier, SubscriptionId};
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Quiz completion needs a score between 0 and 100, got {0:?}")]
    InvalidScore(Option<u8>),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Points delta from one completion call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCompletion {
    pub points_earned: u32,
    pub total_points: u32,
}

/// Reward rules, taken from [`EngineConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardRules {
    pub policy: RewardPolicy,
    pub default_passing_score: u8,
    pub quiz_requires_pass: bool,
}

impl Default for RewardRules {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for RewardRules {
    fn from(config: &EngineConfig) -> Self {
        Self {
            policy: config.reward_policy,
            default_passing_score: config.default_passing_score,
            quiz_requires_pass: config.quiz_requires_pass,
        }
    }
}

/// Points a quiz score is worth, zero below the passing mark
pub fn quiz_points(score: u8, passing_score: u8, value: u32) -> u32 {
    if score < passing_score {
        return 0;
    }
    // Widened so large module values cannot overflow
    (u64::from(score) * u64::from(value) / 100) as u32
}

/// Records completions, awards points and tells listeners about it
pub struct RewardEngine {
    store: ProgressStore,
    rules: RewardRules,
    notifier: ProgressNotifier,
}

impl RewardEngine {
    pub fn new(store: ProgressStore, rules: RewardRules) -> Self {
        Self {
            store,
            rules,
            notifier: ProgressNotifier::new(),
        }
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn rules(&self) -> RewardRules {
        self.rules
    }

    pub fn progress(&self) -> UserProgress {
        self.store.load()
    }

    pub fn subscribe<L>(&mut self, listener: L) -> SubscriptionId
    where
        L: ProgressListener + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Delete all progress and notify listeners
    pub fn reset(&self) -> Result<()> {
        self.store.reset()?;
        self.notifier.notify(&ProgressEvent::Reset {
            course_id: self.store.course_id().to_string(),
        });
        Ok(())
    }

    /// Mark a module completed and award its points.
    ///
    /// `score` is required for quizzes and ignored otherwise.
    pub fn complete_module(
        &self,
        course: &Course,
        topic_id: &str,
        lesson_id: &str,
        module_id: &str,
        score: Option<u8>,
    ) -> Result<ModuleCompletion> {
        self.complete_module_at(course, topic_id, lesson_id, module_id, score, Utc::now())
    }

    pub fn complete_module_at(
        &self,
        course: &Course,
        topic_id: &str,
        lesson_id: &str,
        module_id: &str,
        score: Option<u8>,
        now: DateTime<Utc>,
    ) -> Result<ModuleCompletion> {
        let topic = course
            .topic(topic_id)
            .ok_or_else(|| EngineError::NotFound(format!("Topic {}", topic_id)))?;
        let lesson = topic
            .lesson(lesson_id)
            .ok_or_else(|| EngineError::NotFound(format!("Lesson {}/{}", topic_id, lesson_id)))?;
        let module = lesson.module(module_id).ok_or_else(|| {
            EngineError::NotFound(format!("Module {}/{}/{}", topic_id, lesson_id, module_id))
        })?;

        if module.module_type() == ModuleType::Quiz && !matches!(score, Some(s) if s <= 100) {
            return Err(EngineError::InvalidScore(score));
        }

        let mut progress = self.store.load_at(now);
        let existing = progress.module(topic_id, lesson_id, module_id).cloned();
        let (record, points_earned) = self.apply_attempt(module, existing.as_ref(), score, now);
        let changed = existing.as_ref() != Some(&record);

        progress
            .lesson_entry(topic_id, lesson_id)
            .modules
            .insert(module_id.to_string(), record);

        let lesson_completed = progress.refresh_lesson_completion(topic_id, lesson);
        let topic_completed = if lesson_completed {
            progress.refresh_topic_completion(topic)
        } else {
            progress.is_topic_completed(topic_id)
        };

        progress.total_points = progress.total_points.saturating_add(points_earned);
        progress.last_accessed_at = now;
        self.store.save(&progress)?;

        if points_earned > 0 {
            log::info!(
                "Completed module {}/{}/{}: +{} points (total {})",
                topic_id,
                lesson_id,
                module_id,
                points_earned,
                progress.total_points
            );
        }

        if changed {
            self.notifier.notify(&ProgressEvent::ModuleCompleted {
                topic_id: topic_id.to_string(),
                lesson_id: lesson_id.to_string(),
                module_id: module_id.to_string(),
                points_earned,
                total_points: progress.total_points,
                lesson_completed,
                topic_completed,
            });
        }

        Ok(ModuleCompletion {
            points_earned,
            total_points: progress.total_points,
        })
    }

    /// Compute the module's new record and the points this attempt earns
    fn apply_attempt(
        &self,
        module: &Module,
        existing: Option<&ModuleProgress>,
        score: Option<u8>,
        now: DateTime<Utc>,
    ) -> (ModuleProgress, u32) {
        let already_completed = existing.map_or(false, |p| p.completed);

        match (module.module_type(), score) {
            (ModuleType::Quiz, Some(score)) => {
                let passing_score = module
                    .passing_score()
                    .unwrap_or(self.rules.default_passing_score);
                let passed = score >= passing_score;
                let points = quiz_points(score, passing_score, module.points);

                match existing {
                    Some(previous) if already_completed => match self.rules.policy {
                        RewardPolicy::FirstAttemptOnly => {
                            let record = ModuleProgress {
                                score: Some(score),
                                ..previous.clone()
                            };
                            (record, 0)
                        }
                        RewardPolicy::BestAttempt => {
                            let earned = points.saturating_sub(previous.points_earned);
                            let record = ModuleProgress {
                                score: previous.score.max(Some(score)),
                                points_earned: previous.points_earned.saturating_add(earned),
                                ..previous.clone()
                            };
                            (record, earned)
                        }
                    },
                    _ if self.rules.quiz_requires_pass && !passed => {
                        let record = ModuleProgress {
                            module_id: module.id.clone(),
                            completed: false,
                            score: Some(score),
                            points_earned: 0,
                            completed_at: None,
                        };
                        (record, 0)
                    }
                    _ => {
                        let record = ModuleProgress {
                            module_id: module.id.clone(),
                            completed: true,
                            score: Some(score),
                            points_earned: points,
                            completed_at: Some(now),
                        };
                        (record, points)
                    }
                }
            }
            _ => match existing {
                Some(previous) if already_completed => (previous.clone(), 0),
                _ => {
                    let record = ModuleProgress {
                        module_id: module.id.clone(),
                        completed: true,
                        score: None,
                        points_earned: module.points,
                        completed_at: Some(now),
                    };
                    (record, module.points)
                }
            },
        }
    }
}
