//! Data models for saved flashcards

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::course::Flashcard;

/// Which memory tier a saved card is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryTier {
    /// Still being drilled through the recall queue
    ShortTerm,
    /// Learned; no longer scheduled
    LongTerm,
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::ShortTerm
    }
}

/// How well the learner recalled a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecallDifficulty {
    Easy,
    Hard,
    DontRemember,
}

/// A card the learner saved from a flashcards module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFlashcard {
    /// Same id as the card in the course
    pub id: String,
    pub topic_id: String,
    pub lesson_id: String,
    pub module_id: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(rename = "memoryType", default)]
    pub tier: MemoryTier,
    pub saved_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_recalled_at: Option<DateTime<Utc>>,
    /// Unset means due now
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_recall_at: Option<DateTime<Utc>>,
    /// Consecutive easy recalls
    #[serde(default)]
    pub easy_count: u32,
    /// Lifetime recalls
    #[serde(default)]
    pub recall_count: u32,
}

impl SavedFlashcard {
    pub fn new(card: NewFlashcard, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: card.id,
            topic_id: card.topic_id,
            lesson_id: card.lesson_id,
            module_id: card.module_id,
            front: card.front,
            back: card.back,
            emoji: card.emoji,
            tier: MemoryTier::ShortTerm,
            saved_at,
            last_recalled_at: None,
            next_recall_at: None,
            easy_count: 0,
            recall_count: 0,
        }
    }

    /// Short-term cards are due once their schedule has passed or if they have none
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.tier == MemoryTier::ShortTerm && self.next_recall_at.map_or(true, |next| next <= now)
    }

    /// Position in the recall queue; never-scheduled cards queue by save time
    pub fn queue_time(&self) -> DateTime<Utc> {
        self.next_recall_at.unwrap_or(self.saved_at)
    }
}

/// Request to save a card, with where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlashcard {
    pub id: String,
    pub topic_id: String,
    pub lesson_id: String,
    pub module_id: String,
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub emoji: String,
}

impl NewFlashcard {
    pub fn from_course_card(topic_id: &str, lesson_id: &str, module_id: &str, card: &Flashcard) -> Self {
        Self {
            id: card.id.clone(),
            topic_id: topic_id.to_string(),
            lesson_id: lesson_id.to_string(),
            module_id: module_id.to_string(),
            front: card.front.clone(),
            back: card.back.clone(),
            emoji: card.emoji.clone().unwrap_or_default(),
        }
    }
}

/// All saved cards, keyed by card id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardMemory {
    #[serde(default)]
    pub flashcards: BTreeMap<String, SavedFlashcard>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardStats {
    pub total: usize,
    pub short_term: usize,
    pub long_term: usize,
    pub due_now: usize,
}
