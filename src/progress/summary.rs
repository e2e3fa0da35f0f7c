//! Completion summaries for progress displays

use serde::Serialize;

use super::models::UserProgress;
use crate::course::{Course, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSummary {
    pub completed_modules: usize,
    pub total_modules: usize,
    /// Rounded to the nearest whole percent
    pub percentage: u8,
}

impl CompletionSummary {
    fn new(completed_modules: usize, total_modules: usize) -> Self {
        let percentage = if total_modules == 0 {
            0
        } else {
            ((completed_modules as f64 / total_modules as f64) * 100.0).round() as u8
        };
        Self {
            completed_modules,
            total_modules,
            percentage,
        }
    }
}

fn count_topic(topic: &Topic, progress: &UserProgress) -> (usize, usize) {
    let mut completed = 0;
    let mut total = 0;
    for lesson in &topic.lessons {
        for module in &lesson.modules {
            total += 1;
            if progress.is_module_completed(&topic.id, &lesson.id, &module.id) {
                completed += 1;
            }
        }
    }
    (completed, total)
}

pub fn course_summary(course: &Course, progress: &UserProgress) -> CompletionSummary {
    let (completed, total) = course
        .topics
        .iter()
        .map(|topic| count_topic(topic, progress))
        .fold((0, 0), |(c, t), (tc, tt)| (c + tc, t + tt));
    CompletionSummary::new(completed, total)
}

/// Summary for one topic; unknown topics summarize as empty
pub fn topic_summary(course: &Course, progress: &UserProgress, topic_id: &str) -> CompletionSummary {
    match course.topic(topic_id) {
        Some(topic) => {
            let (completed, total) = count_topic(topic, progress);
            CompletionSummary::new(completed, total)
        }
        None => CompletionSummary::new(0, 0),
    }
}
