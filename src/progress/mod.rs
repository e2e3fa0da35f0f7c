//! Course progress tracking
//!
//! This module provides:
//! - Persisted per-learner progress (module → lesson → topic)
//! - Sequential unlock rules over the course tree
//! - Completion rewards and derived completion flags
//! - Completion summaries

pub mod gate;
pub mod models;
pub mod rewards;
pub mod storage;
pub mod summary;

pub use gate::AccessGate;
pub use models::*;
pub use rewards::{quiz_points, EngineError, ModuleCompletion, RewardEngine, RewardRules};
pub use storage::ProgressStore;
pub use summary::{course_summary, topic_summary, CompletionSummary};
