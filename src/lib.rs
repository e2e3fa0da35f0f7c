//! Progress and mastery engine for a topic → lesson → module course player.
//!
//! The engine persists learner progress, decides which lessons and modules
//! are unlocked, awards reward points on completion, and schedules recall of
//! flashcards the learner saved. Rendering and navigation live elsewhere and
//! call into this crate.

pub mod config;
pub mod course;
pub mod events;
pub mod flashcards;
pub mod progress;
pub mod storage;

pub use config::{EngineConfig, RecallConfig, RewardPolicy};
pub use course::{Course, CourseLoader};
pub use events::{ProgressEvent, ProgressListener, ProgressNotifier};
pub use flashcards::FlashcardMemoryStore;
pub use progress::{AccessGate, ProgressStore, RewardEngine, RewardRules};
pub use storage::{FileRecordStore, MemoryRecordStore, RecordStore, SharedRecordStore};
