//! Sequential unlock rules
//!
//! A module is open once the module before it in its lesson is completed; a
//! lesson is open once the lesson before it in its topic is completed. The
//! first element of every sequence is always open and topics are never
//! locked. Unknown ids are never accessible.

use crate::course::Course;

use super::models::UserProgress;

/// Accessibility queries over a course and a progress snapshot
pub struct AccessGate<'a> {
    course: &'a Course,
    progress: &'a UserProgress,
}

impl<'a> AccessGate<'a> {
    pub fn new(course: &'a Course, progress: &'a UserProgress) -> Self {
        Self { course, progress }
    }

    pub fn is_topic_accessible(&self, topic_id: &str) -> bool {
        self.course.topic(topic_id).is_some()
    }

    pub fn is_lesson_accessible(&self, topic_id: &str, lesson_id: &str) -> bool {
        let Some(topic) = self.course.topic(topic_id) else {
            return false;
        };
        match topic.lesson_position(lesson_id) {
            None => false,
            Some(0) => true,
            Some(index) => self
                .progress
                .is_lesson_completed(topic_id, &topic.lessons[index - 1].id),
        }
    }

    pub fn is_module_accessible(&self, topic_id: &str, lesson_id: &str, module_id: &str) -> bool {
        let Some(lesson) = self.course.lesson(topic_id, lesson_id) else {
            return false;
        };
        match lesson.module_position(module_id) {
            None => false,
            Some(0) => true,
            Some(index) => self.progress.is_module_completed(
                topic_id,
                lesson_id,
                &lesson.modules[index - 1].id,
            ),
        }
    }
}
