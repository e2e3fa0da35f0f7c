use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use mastery_lib::config::{EngineConfig, CONFIG_FILE_NAME};
use mastery_lib::course::{Course, CourseLoader, Lesson, Module, Topic};
use mastery_lib::events::ProgressEvent;
use mastery_lib::flashcards::FlashcardMemoryStore;
use mastery_lib::progress::{ProgressStore, RewardEngine, RewardRules};
use mastery_lib::storage::{FileRecordStore, SharedRecordStore};

/// Shared application state for CLI commands
pub struct App {
    pub config: EngineConfig,
    pub course: Arc<Course>,
    pub rewards: RewardEngine,
    pub flashcards: FlashcardMemoryStore,
}

impl App {
    /// Initialize from the config file and data directory
    pub fn new(
        data_dir: Option<PathBuf>,
        config_path: Option<PathBuf>,
        course_path: Option<PathBuf>,
    ) -> Result<Self> {
        let default_dir = match &data_dir {
            Some(dir) => dir.clone(),
            None => FileRecordStore::default_data_dir().context("Failed to get data directory")?,
        };
        let config_path = config_path.unwrap_or_else(|| default_dir.join(CONFIG_FILE_NAME));

        let mut config = EngineConfig::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
        if data_dir.is_some() {
            config.data_dir = data_dir;
        }
        if course_path.is_some() {
            config.course_path = course_path;
        }

        let data_dir = config.data_dir().context("Failed to get data directory")?;
        let records: SharedRecordStore = Arc::new(
            FileRecordStore::new(data_dir.clone())
                .with_context(|| format!("Failed to open records in {}", data_dir.display()))?,
        );

        let course_path = config.course_path()?;
        let course = CourseLoader::new(course_path.clone())
            .get()
            .with_context(|| format!("Failed to load course from {}", course_path.display()))?;

        let store = ProgressStore::new(Arc::clone(&records), config.progress_key.clone(), course.id.clone());
        let mut rewards = RewardEngine::new(store, RewardRules::from(&config));
        rewards.subscribe(|event: &ProgressEvent| log::debug!("Progress changed: {:?}", event));

        let flashcards = FlashcardMemoryStore::new(records, config.flashcard_key.clone(), config.recall.clone());

        Ok(Self {
            config,
            course,
            rewards,
            flashcards,
        })
    }

    /// Find a topic by id
    pub fn find_topic(&self, topic_id: &str) -> Result<&Topic> {
        self.course
            .topic(topic_id)
            .with_context(|| format!("Topic '{}' not found", topic_id))
    }

    /// Find a lesson by topic and lesson id
    pub fn find_lesson(&self, topic_id: &str, lesson_id: &str) -> Result<&Lesson> {
        self.find_topic(topic_id)?
            .lesson(lesson_id)
            .with_context(|| format!("Lesson '{}' not found in topic '{}'", lesson_id, topic_id))
    }

    /// Find a module by its full path
    pub fn find_module(&self, topic_id: &str, lesson_id: &str, module_id: &str) -> Result<&Module> {
        self.find_lesson(topic_id, lesson_id)?
            .module(module_id)
            .with_context(|| format!("Module '{}' not found in lesson '{}'", module_id, lesson_id))
    }
}
