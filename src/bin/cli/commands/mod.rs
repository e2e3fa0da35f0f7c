pub mod complete;
pub mod course;
pub mod flashcards;
pub mod progress;
