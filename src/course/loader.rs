//! Course document loading
//!
//! The course is fetched once and cached for the session. The engine only
//! ever reads it.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use super::models::Course;

#[derive(Error, Debug)]
pub enum CourseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate id {id:?} in {scope}")]
    DuplicateId { scope: String, id: String },
}

pub type Result<T> = std::result::Result<T, CourseError>;

/// Parse and validate a course document
pub fn parse_course(json: &str) -> Result<Course> {
    let course: Course = serde_json::from_str(json)?;
    validate_unique_ids(&course)?;
    Ok(course)
}

/// Ids must be unique within each sequence, otherwise "previous sibling" is ambiguous
fn validate_unique_ids(course: &Course) -> Result<()> {
    check_unique(
        course.topics.iter().map(|t| t.id.as_str()),
        || format!("course {}", course.id),
    )?;
    for topic in &course.topics {
        check_unique(
            topic.lessons.iter().map(|l| l.id.as_str()),
            || format!("topic {}", topic.id),
        )?;
        for lesson in &topic.lessons {
            check_unique(
                lesson.modules.iter().map(|m| m.id.as_str()),
                || format!("lesson {}", lesson.id),
            )?;
        }
    }
    Ok(())
}

fn check_unique<'a>(
    ids: impl Iterator<Item = &'a str>,
    scope: impl Fn() -> String,
) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CourseError::DuplicateId {
                scope: scope(),
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

/// Loads a course file on first use and serves the cached copy afterwards
pub struct CourseLoader {
    path: PathBuf,
    cache: Option<Arc<Course>>,
}

impl CourseLoader {
    pub fn new(path: PathBuf) -> Self {
        Self { path, cache: None }
    }

    /// Get the course, reading it from disk only if not cached
    pub fn get(&mut self) -> Result<Arc<Course>> {
        if let Some(course) = &self.cache {
            return Ok(Arc::clone(course));
        }

        let content = fs::read_to_string(&self.path)?;
        let course = Arc::new(parse_course(&content)?);
        log::info!(
            "Loaded course '{}' ({} topics, {} modules) from {:?}",
            course.id,
            course.topics.len(),
            course.module_count(),
            self.path
        );
        self.cache = Some(Arc::clone(&course));
        Ok(course)
    }

    /// Drop the cached course so the next `get` reloads it
    pub fn clear_cache(&mut self) {
        self.cache = None;
    }
}
