use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use mastery_lib::config::CONFIG_FILE_NAME;
use mastery_lib::course::grade_quiz;
use mastery_lib::flashcards::{MemoryTier, NewFlashcard, RecallDifficulty};
use mastery_lib::progress::course_summary;
use mastery_lib::{
    AccessGate, CourseLoader, EngineConfig, FileRecordStore, FlashcardMemoryStore, ProgressEvent,
    ProgressStore, RewardEngine, RewardPolicy, RewardRules, SharedRecordStore,
};

const COURSE: &str = r#"{
    "id": "rust-basics",
    "title": "Rust Basics",
    "description": "Ownership and friends",
    "totalXp": 60,
    "topics": [
        {"id": "ownership", "title": "Ownership", "description": "", "icon": "box", "lessons": [
            {"id": "moves", "title": "Moves", "description": "", "modules": [
                {"id": "intro", "type": "info", "title": "What moves", "content": "Values move.", "xp": 10},
                {"id": "check", "type": "quiz", "title": "Check", "xp": 20, "passingScore": 65,
                 "questions": [
                    {"id": "q1", "question": "Is String Copy?", "type": "single", "options": [
                        {"id": "a", "text": "Yes", "isCorrect": false},
                        {"id": "b", "text": "No", "isCorrect": true}
                    ]}
                 ]}
            ]},
            {"id": "borrows", "title": "Borrows", "description": "", "modules": [
                {"id": "terms", "type": "flashcards", "title": "Terms", "xp": 30, "cards": [
                    {"id": "borrow", "front": "&T", "back": "Shared borrow", "emoji": "📎"},
                    {"id": "mut-borrow", "front": "&mut T", "back": "Exclusive borrow"}
                ]}
            ]}
        ]}
    ]
}"#;

struct Env {
    _dir: TempDir,
    config: EngineConfig,
    records: SharedRecordStore,
    loader: CourseLoader,
}

fn create_env(config_toml: &str) -> Env {
    let dir = TempDir::new().unwrap();
    let course_path = dir.path().join("course.json");
    fs::write(&course_path, COURSE).unwrap();
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&config_path, config_toml).unwrap();

    let mut config = EngineConfig::load(&config_path).unwrap();
    config.data_dir = Some(dir.path().to_path_buf());
    config.course_path = Some(course_path.clone());

    let records: SharedRecordStore = Arc::new(FileRecordStore::new(dir.path().to_path_buf()).unwrap());
    Env {
        _dir: dir,
        config,
        records,
        loader: CourseLoader::new(course_path),
    }
}

fn engine(env: &Env, course_id: &str) -> RewardEngine {
    let store = ProgressStore::new(Arc::clone(&env.records), env.config.progress_key.clone(), course_id);
    RewardEngine::new(store, RewardRules::from(&env.config))
}

#[test]
fn test_learner_walks_through_course() {
    let mut env = create_env("");
    let course = env.loader.get().unwrap();
    let mut rewards = engine(&env, &course.id);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    rewards.subscribe(move |event: &ProgressEvent| sink.lock().unwrap().push(event.clone()));

    {
        let progress = rewards.progress();
        let gate = AccessGate::new(&course, &progress);
        assert!(gate.is_lesson_accessible("ownership", "moves"));
        assert!(!gate.is_lesson_accessible("ownership", "borrows"));
        assert!(!gate.is_module_accessible("ownership", "moves", "check"));
    }

    let intro = rewards
        .complete_module(&course, "ownership", "moves", "intro", None)
        .unwrap();
    assert_eq!((intro.points_earned, intro.total_points), (10, 10));

    let check = rewards
        .complete_module(&course, "ownership", "moves", "check", Some(80))
        .unwrap();
    assert_eq!((check.points_earned, check.total_points), (16, 26));

    let progress = rewards.progress();
    assert!(progress.is_lesson_completed("ownership", "moves"));
    assert!(!progress.is_topic_completed("ownership"));
    let gate = AccessGate::new(&course, &progress);
    assert!(gate.is_lesson_accessible("ownership", "borrows"));
    assert!(gate.is_module_accessible("ownership", "borrows", "terms"));

    let terms = rewards
        .complete_module(&course, "ownership", "borrows", "terms", None)
        .unwrap();
    assert_eq!(terms.total_points, 56);
    assert!(rewards.progress().is_topic_completed("ownership"));

    let summary = course_summary(&course, &rewards.progress());
    assert_eq!(summary.completed_modules, 3);
    assert_eq!(summary.percentage, 100);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    match events.last() {
        Some(ProgressEvent::ModuleCompleted { topic_completed, .. }) => assert!(*topic_completed),
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_progress_survives_restart() {
    let mut env = create_env("");
    let course = env.loader.get().unwrap();

    engine(&env, &course.id)
        .complete_module(&course, "ownership", "moves", "intro", None)
        .unwrap();

    let reopened = engine(&env, &course.id);
    let progress = reopened.progress();
    assert_eq!(progress.total_points, 10);
    assert!(progress.is_module_completed("ownership", "moves", "intro"));

    reopened.reset().unwrap();
    assert_eq!(engine(&env, &course.id).progress().total_points, 0);
}

#[test]
fn test_progress_for_other_course_is_ignored() {
    let mut env = create_env("");
    let course = env.loader.get().unwrap();

    engine(&env, "some-other-course")
        .complete_module(&course, "ownership", "moves", "intro", None)
        .unwrap();

    assert_eq!(engine(&env, &course.id).progress().total_points, 0);
}

#[test]
fn test_best_attempt_policy_from_config() {
    let mut env = create_env("reward_policy = \"best-attempt\"\n");
    assert_eq!(env.config.reward_policy, RewardPolicy::BestAttempt);
    let course = env.loader.get().unwrap();
    let rewards = engine(&env, &course.id);

    rewards
        .complete_module(&course, "ownership", "moves", "intro", None)
        .unwrap();
    let first = rewards
        .complete_module(&course, "ownership", "moves", "check", Some(70))
        .unwrap();
    assert_eq!(first.points_earned, 14);

    let retry = rewards
        .complete_module(&course, "ownership", "moves", "check", Some(100))
        .unwrap();
    assert_eq!((retry.points_earned, retry.total_points), (6, 30));
}

#[test]
fn test_saved_cards_move_to_long_term() {
    let mut env = create_env("[recall]\npromote_after_easy = 2\n");
    let course = env.loader.get().unwrap();
    let memory = FlashcardMemoryStore::new(
        Arc::clone(&env.records),
        env.config.flashcard_key.clone(),
        env.config.recall.clone(),
    );

    let module = course.module("ownership", "borrows", "terms").unwrap();
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    for card in module.cards() {
        let new_card = NewFlashcard::from_course_card("ownership", "borrows", "terms", card);
        assert!(memory.save_at(new_card, start).unwrap());
    }
    let again = NewFlashcard::from_course_card("ownership", "borrows", "terms", &module.cards()[0]);
    assert!(!memory.save_at(again, start).unwrap());

    assert_eq!(memory.due_queue_at(start).len(), 2);

    let card = memory
        .record_recall_at("borrow", RecallDifficulty::Easy, start)
        .unwrap()
        .unwrap();
    assert_eq!(card.tier, MemoryTier::ShortTerm);
    assert_eq!(card.next_recall_at, Some(start + Duration::minutes(60)));

    let due: Vec<_> = memory.due_queue_at(start).into_iter().map(|c| c.id).collect();
    assert_eq!(due, vec!["mut-borrow".to_string()]);

    let later = start + Duration::minutes(61);
    let card = memory
        .record_recall_at("borrow", RecallDifficulty::Easy, later)
        .unwrap()
        .unwrap();
    assert_eq!(card.tier, MemoryTier::LongTerm);
    assert_eq!(card.next_recall_at, None);

    let stats = memory.stats_at(later);
    assert_eq!((stats.total, stats.short_term, stats.long_term, stats.due_now), (2, 1, 1, 1));

    let demoted = memory.demote("borrow").unwrap().unwrap();
    assert_eq!(demoted.tier, MemoryTier::ShortTerm);
    assert!(memory.remove("borrow").unwrap());
    assert!(!memory.is_saved("borrow"));
}

#[test]
fn test_graded_answers_drive_quiz_reward() {
    let mut env = create_env("");
    let course = env.loader.get().unwrap();
    let rewards = engine(&env, &course.id);
    let quiz = course.module("ownership", "moves", "check").unwrap();

    let wrong = HashMap::from([("q1".to_string(), vec!["a".to_string()])]);
    let right = HashMap::from([("q1".to_string(), vec!["b".to_string()])]);
    assert_eq!(grade_quiz(quiz.questions(), &wrong), 0);
    let score = grade_quiz(quiz.questions(), &right);
    assert_eq!(score, 100);

    rewards
        .complete_module(&course, "ownership", "moves", "intro", None)
        .unwrap();
    let result = rewards
        .complete_module(&course, "ownership", "moves", "check", Some(score))
        .unwrap();
    assert_eq!((result.points_earned, result.total_points), (20, 30));
}
