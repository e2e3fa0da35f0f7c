//! Data models for course content
//!
//! Content is read-only: it is loaded once per session and never mutated by
//! the engine. Order within every sequence defines the unlock chain.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub topics: Vec<Topic>,
    /// Sum of all module rewards, as declared by the content
    #[serde(rename = "totalXp", default)]
    pub total_points: u32,
}

impl Course {
    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == topic_id)
    }

    pub fn lesson(&self, topic_id: &str, lesson_id: &str) -> Option<&Lesson> {
        self.topic(topic_id)?.lesson(lesson_id)
    }

    pub fn module(&self, topic_id: &str, lesson_id: &str, module_id: &str) -> Option<&Module> {
        self.lesson(topic_id, lesson_id)?.module(module_id)
    }

    pub fn module_count(&self) -> usize {
        self.topics.iter().map(Topic::module_count).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub lessons: Vec<Lesson>,
}

impl Topic {
    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }

    pub fn lesson_position(&self, lesson_id: &str) -> Option<usize> {
        self.lessons.iter().position(|l| l.id == lesson_id)
    }

    pub fn module_count(&self) -> usize {
        self.lessons.iter().map(|l| l.modules.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub modules: Vec<Module>,
}

impl Lesson {
    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    pub fn module_position(&self, module_id: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.id == module_id)
    }
}

/// Kind of module, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Info,
    Quiz,
    Flashcards,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reward points for completing the module
    #[serde(rename = "xp", default)]
    pub points: u32,
    #[serde(flatten)]
    pub content: ModuleContent,
}

impl Module {
    pub fn module_type(&self) -> ModuleType {
        match self.content {
            ModuleContent::Info { .. } => ModuleType::Info,
            ModuleContent::Quiz { .. } => ModuleType::Quiz,
            ModuleContent::Flashcards { .. } => ModuleType::Flashcards,
        }
    }

    /// Declared passing score, for quizzes that have one
    pub fn passing_score(&self) -> Option<u8> {
        match self.content {
            ModuleContent::Quiz { passing_score, .. } => passing_score,
            _ => None,
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        match &self.content {
            ModuleContent::Quiz { questions, .. } => questions,
            _ => &[],
        }
    }

    pub fn cards(&self) -> &[Flashcard] {
        match &self.content {
            ModuleContent::Flashcards { cards } => cards,
            _ => &[],
        }
    }
}

/// Type-specific module payload, tagged by `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModuleContent {
    Info {
        content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        video: Option<VideoContent>,
    },
    Quiz {
        questions: Vec<QuizQuestion>,
        #[serde(
            rename = "passingScore",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        passing_score: Option<u8>,
    },
    Flashcards {
        cards: Vec<Flashcard>,
    },
}

/// Video shown alongside an info module, one source per character variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoContent {
    #[serde(rename = "X")]
    pub x: String,
    #[serde(rename = "Y")]
    pub y: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    /// Exactly one correct option
    Single,
    /// Any number of correct options
    Multiple,
}

impl Default for QuizType {
    fn default() -> Self {
        Self::Single
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    #[serde(rename = "type", default)]
    pub kind: QuizType,
    pub options: Vec<QuizOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// A card inside a flashcards module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}
