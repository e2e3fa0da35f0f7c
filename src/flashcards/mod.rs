//! Flashcard memory for Mastery
//!
//! This module provides:
//! - Saving cards from flashcards modules (at most one copy per card)
//! - Two-tier (short-term / long-term) recall scheduling
//! - The recall queue and memory statistics
//!
//! It is independent of course progress: saved cards are never gated.

pub mod algorithm;
pub mod models;
pub mod storage;

pub use models::*;
pub use storage::FlashcardMemoryStore;
