//! Persisted learner progress
//!
//! The whole `UserProgress` for a course lives in one record. Reads never
//! fail: a missing, corrupt or foreign record yields a fresh empty progress.

use chrono::{DateTime, Utc};

use super::models::{LessonProgress, ModuleProgress, TopicProgress, UserProgress};
use crate::storage::{read_record, write_record, Result, SharedRecordStore};

/// Storage for one learner's progress through one course
pub struct ProgressStore {
    store: SharedRecordStore,
    key: String,
    course_id: String,
}

impl ProgressStore {
    pub fn new(store: SharedRecordStore, key: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            course_id: course_id.into(),
        }
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    /// Load progress, or an empty record if nothing usable is stored
    pub fn load(&self) -> UserProgress {
        self.load_at(Utc::now())
    }

    pub fn load_at(&self, now: DateTime<Utc>) -> UserProgress {
        match read_record::<UserProgress>(&*self.store, &self.key) {
            Some(progress) if progress.course_id == self.course_id => progress,
            Some(progress) => {
                log::warn!(
                    "Stored progress belongs to course '{}', expected '{}'; starting empty",
                    progress.course_id,
                    self.course_id
                );
                UserProgress::new_at(&self.course_id, now)
            }
            None => UserProgress::new_at(&self.course_id, now),
        }
    }

    /// Persist the full progress record, replacing what was there
    pub fn save(&self, progress: &UserProgress) -> Result<()> {
        write_record(&*self.store, &self.key, progress)
    }

    /// Delete all stored progress for the course
    pub fn reset(&self) -> Result<()> {
        self.store.remove(&self.key)?;
        log::info!("Reset progress for course '{}'", self.course_id);
        Ok(())
    }

    // ===== Lookups =====

    pub fn topic_progress(&self, topic_id: &str) -> Option<TopicProgress> {
        self.load().topic(topic_id).cloned()
    }

    pub fn lesson_progress(&self, topic_id: &str, lesson_id: &str) -> Option<LessonProgress> {
        self.load().lesson(topic_id, lesson_id).cloned()
    }

    pub fn module_progress(&self, topic_id: &str, lesson_id: &str, module_id: &str) -> Option<ModuleProgress> {
        self.load().module(topic_id, lesson_id, module_id).cloned()
    }
}
