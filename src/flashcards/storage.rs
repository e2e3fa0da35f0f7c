//! Storage operations for saved flashcards
//!
//! All saved cards live in a single `FlashcardMemory` record. Every
//! operation loads the record, changes it, and writes it back whole.

use chrono::{DateTime, Utc};

use super::algorithm::{apply_recall, reset_to_short_term};
use super::models::*;
use crate::config::RecallConfig;
use crate::storage::{read_record, write_record, Result, SharedRecordStore};

/// Storage manager for the learner's flashcard memory
pub struct FlashcardMemoryStore {
    store: SharedRecordStore,
    key: String,
    recall: RecallConfig,
}

impl FlashcardMemoryStore {
    pub fn new(store: SharedRecordStore, key: impl Into<String>, recall: RecallConfig) -> Self {
        Self {
            store,
            key: key.into(),
            recall,
        }
    }

    /// Load the memory record, empty if missing or unreadable
    pub fn load(&self) -> FlashcardMemory {
        read_record(&*self.store, &self.key).unwrap_or_default()
    }

    fn save_memory(&self, memory: &FlashcardMemory) -> Result<()> {
        write_record(&*self.store, &self.key, memory)
    }

    // ==================== Card Operations ====================

    /// Save a card into short-term memory. Returns false if it was already saved.
    pub fn save(&self, card: NewFlashcard) -> Result<bool> {
        self.save_at(card, Utc::now())
    }

    pub fn save_at(&self, card: NewFlashcard, now: DateTime<Utc>) -> Result<bool> {
        let mut memory = self.load();
        if memory.flashcards.contains_key(&card.id) {
            return Ok(false);
        }

        log::debug!("Saving flashcard {} from module {}", card.id, card.module_id);
        let saved = SavedFlashcard::new(card, now);
        memory.flashcards.insert(saved.id.clone(), saved);
        self.save_memory(&memory)?;
        Ok(true)
    }

    /// Delete a saved card. Returns false if it wasn't saved.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut memory = self.load();
        if memory.flashcards.remove(id).is_none() {
            return Ok(false);
        }
        self.save_memory(&memory)?;
        Ok(true)
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.load().flashcards.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<SavedFlashcard> {
        self.load().flashcards.remove(id)
    }

    /// All saved cards, in save order
    pub fn list(&self) -> Vec<SavedFlashcard> {
        let mut cards: Vec<SavedFlashcard> = self.load().flashcards.into_values().collect();
        cards.sort_by(|a, b| a.saved_at.cmp(&b.saved_at).then_with(|| a.id.cmp(&b.id)));
        cards
    }

    pub fn list_by_tier(&self, tier: MemoryTier) -> Vec<SavedFlashcard> {
        self.list().into_iter().filter(|c| c.tier == tier).collect()
    }

    // ==================== Recall Operations ====================

    /// Short-term cards due for recall, earliest first
    pub fn due_queue(&self) -> Vec<SavedFlashcard> {
        self.due_queue_at(Utc::now())
    }

    pub fn due_queue_at(&self, now: DateTime<Utc>) -> Vec<SavedFlashcard> {
        let mut due: Vec<SavedFlashcard> = self
            .load()
            .flashcards
            .into_values()
            .filter(|c| c.is_due_at(now))
            .collect();

        due.sort_by(|a, b| {
            a.queue_time()
                .cmp(&b.queue_time())
                .then_with(|| a.id.cmp(&b.id))
        });
        due
    }

    /// Record a recall outcome. Returns `None` for cards that aren't saved.
    pub fn record_recall(&self, id: &str, difficulty: RecallDifficulty) -> Result<Option<SavedFlashcard>> {
        self.record_recall_at(id, difficulty, Utc::now())
    }

    pub fn record_recall_at(
        &self,
        id: &str,
        difficulty: RecallDifficulty,
        now: DateTime<Utc>,
    ) -> Result<Option<SavedFlashcard>> {
        let mut memory = self.load();
        let Some(card) = memory.flashcards.get_mut(id) else {
            return Ok(None);
        };

        let result = apply_recall(card, difficulty, &self.recall, now);
        if result.promoted {
            log::info!("Flashcard {} moved to long-term memory", id);
        }

        let updated = card.clone();
        self.save_memory(&memory)?;
        Ok(Some(updated))
    }

    /// "I forgot it": move a card back to short-term memory, due now
    pub fn demote(&self, id: &str) -> Result<Option<SavedFlashcard>> {
        let mut memory = self.load();
        let Some(card) = memory.flashcards.get_mut(id) else {
            return Ok(None);
        };

        reset_to_short_term(card);
        let updated = card.clone();
        self.save_memory(&memory)?;
        Ok(Some(updated))
    }

    /// Counts by tier and due-ness, from a full scan
    pub fn stats(&self) -> FlashcardStats {
        self.stats_at(Utc::now())
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> FlashcardStats {
        let memory = self.load();
        let mut stats = FlashcardStats::default();

        for card in memory.flashcards.values() {
            stats.total += 1;
            match card.tier {
                MemoryTier::ShortTerm => stats.short_term += 1,
                MemoryTier::LongTerm => stats.long_term += 1,
            }
            if card.is_due_at(now) {
                stats.due_now += 1;
            }
        }

        stats
    }
}
