//! Data models for learner progress

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::course::{Lesson, Topic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: String,
    pub completed: bool,
    /// Latest or best quiz score (0-100), quizzes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(rename = "xpEarned", default)]
    pub points_earned: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    pub lesson_id: String,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleProgress>,
    /// True iff every module in the lesson is completed
    #[serde(default)]
    pub completed: bool,
}

impl LessonProgress {
    pub fn new(lesson_id: &str) -> Self {
        Self {
            lesson_id: lesson_id.to_string(),
            modules: BTreeMap::new(),
            completed: false,
        }
    }

    pub fn is_module_completed(&self, module_id: &str) -> bool {
        self.modules.get(module_id).map_or(false, |m| m.completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProgress {
    pub topic_id: String,
    #[serde(default)]
    pub lessons: BTreeMap<String, LessonProgress>,
    /// True iff every lesson in the topic is completed
    #[serde(default)]
    pub completed: bool,
}

impl TopicProgress {
    pub fn new(topic_id: &str) -> Self {
        Self {
            topic_id: topic_id.to_string(),
            lessons: BTreeMap::new(),
            completed: false,
        }
    }

    pub fn is_lesson_completed(&self, lesson_id: &str) -> bool {
        self.lessons.get(lesson_id).map_or(false, |l| l.completed)
    }
}

/// Everything one learner has done in one course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub course_id: String,
    #[serde(default)]
    pub topics: BTreeMap<String, TopicProgress>,
    #[serde(rename = "totalXpEarned", default)]
    pub total_points: u32,
    pub last_accessed_at: DateTime<Utc>,
}

impl UserProgress {
    pub fn new(course_id: &str) -> Self {
        Self::new_at(course_id, Utc::now())
    }

    pub fn new_at(course_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            course_id: course_id.to_string(),
            topics: BTreeMap::new(),
            total_points: 0,
            last_accessed_at: now,
        }
    }

    pub fn topic(&self, topic_id: &str) -> Option<&TopicProgress> {
        self.topics.get(topic_id)
    }

    pub fn lesson(&self, topic_id: &str, lesson_id: &str) -> Option<&LessonProgress> {
        self.topic(topic_id)?.lessons.get(lesson_id)
    }

    pub fn module(&self, topic_id: &str, lesson_id: &str, module_id: &str) -> Option<&ModuleProgress> {
        self.lesson(topic_id, lesson_id)?.modules.get(module_id)
    }

    pub fn is_module_completed(&self, topic_id: &str, lesson_id: &str, module_id: &str) -> bool {
        self.module(topic_id, lesson_id, module_id)
            .map_or(false, |m| m.completed)
    }

    pub fn is_lesson_completed(&self, topic_id: &str, lesson_id: &str) -> bool {
        self.lesson(topic_id, lesson_id).map_or(false, |l| l.completed)
    }

    pub fn is_topic_completed(&self, topic_id: &str) -> bool {
        self.topic(topic_id).map_or(false, |t| t.completed)
    }

    /// Get the lesson entry, creating it and its topic entry if needed
    pub fn lesson_entry(&mut self, topic_id: &str, lesson_id: &str) -> &mut LessonProgress {
        self.topics
            .entry(topic_id.to_string())
            .or_insert_with(|| TopicProgress::new(topic_id))
            .lessons
            .entry(lesson_id.to_string())
            .or_insert_with(|| LessonProgress::new(lesson_id))
    }

    /// Recompute a lesson's completed flag from every module in the content lesson
    pub fn refresh_lesson_completion(&mut self, topic_id: &str, lesson: &Lesson) -> bool {
        let entry = self.lesson_entry(topic_id, &lesson.id);
        let completed = lesson
            .modules
            .iter()
            .all(|m| entry.is_module_completed(&m.id));
        entry.completed = completed;
        completed
    }

    /// Recompute a topic's completed flag from every lesson in the content topic
    pub fn refresh_topic_completion(&mut self, topic: &Topic) -> bool {
        let entry = self
            .topics
            .entry(topic.id.clone())
            .or_insert_with(|| TopicProgress::new(&topic.id));
        let completed = topic
            .lessons
            .iter()
            .all(|l| entry.is_lesson_completed(&l.id));
        entry.completed = completed;
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Module, ModuleContent};

    fn info(id: &str) -> Module {
        Module {
            id: id.to_string(),
            title: id.to_string(),
            description: None,
            points: 1,
            content: ModuleContent::Info {
                content: String::new(),
                video: None,
            },
        }
    }

    fn completed(module_id: &str) -> ModuleProgress {
        ModuleProgress {
            module_id: module_id.to_string(),
            completed: true,
            score: None,
            points_earned: 1,
            completed_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_lesson_completion_is_full_scan() {
        let lesson = Lesson {
            id: "l1".to_string(),
            title: "Lesson".to_string(),
            description: String::new(),
            modules: vec![info("m1"), info("m2")],
        };
        let mut progress = UserProgress::new("course");

        progress
            .lesson_entry("t1", "l1")
            .modules
            .insert("m1".to_string(), completed("m1"));
        assert!(!progress.refresh_lesson_completion("t1", &lesson));

        progress
            .lesson_entry("t1", "l1")
            .modules
            .insert("m2".to_string(), completed("m2"));
        assert!(progress.refresh_lesson_completion("t1", &lesson));
        assert!(progress.is_lesson_completed("t1", "l1"));
    }

    #[test]
    fn test_empty_lesson_is_complete() {
        let lesson = Lesson {
            id: "l1".to_string(),
            title: "Empty".to_string(),
            description: String::new(),
            modules: Vec::new(),
        };
        let mut progress = UserProgress::new("course");
        assert!(progress.refresh_lesson_completion("t1", &lesson));
    }

    #[test]
    fn test_json_shape() {
        let mut progress = UserProgress::new("course");
        progress.total_points = 10;
        progress
            .lesson_entry("t1", "l1")
            .modules
            .insert("m1".to_string(), completed("m1"));

        let value = serde_json::to_value(&progress).unwrap();
        assert_eq!(value["courseId"], "course");
        assert_eq!(value["totalXpEarned"], 10);
        assert_eq!(
            value["topics"]["t1"]["lessons"]["l1"]["modules"]["m1"]["xpEarned"],
            1
        );
        assert!(value["lastAccessedAt"].is_string());
    }
}
