//! Course content: the topic → lesson → module tree
//!
//! This module provides:
//! - Read-only content models (info, quiz and flashcards modules)
//! - A loader that parses, validates and caches the course document
//! - Quiz grading

pub mod loader;
pub mod models;
pub mod quiz;

pub use loader::{parse_course, CourseError, CourseLoader};
pub use models::*;
pub use quiz::grade_quiz;
