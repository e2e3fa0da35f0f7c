//! Two-tier recall scheduling
//!
//! Saved cards start in short-term memory and come back for recall on a
//! short schedule:
//! - Don't remember: due again immediately
//! - Hard: due again after the hard interval (5 minutes by default)
//! - Easy: due again after the easy interval (60 minutes by default)
//!
//! Enough consecutive easy recalls (2 by default) move a card to long-term
//! memory, where it is no longer scheduled. Anything but an easy recall
//! resets the streak.

use chrono::{DateTime, Duration, Utc};

use super::models::{MemoryTier, RecallDifficulty, SavedFlashcard};
use crate::config::RecallConfig;

/// Result of calculating the next recall
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallResult {
    pub tier: MemoryTier,
    pub next_recall_at: Option<DateTime<Utc>>,
    pub easy_count: u32,
    /// True if this recall moved the card into long-term memory
    pub promoted: bool,
}

/// `now + minutes`, clamped to a valid timestamp. Negative intervals count as zero.
fn schedule_after(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    Duration::try_minutes(minutes.max(0))
        .and_then(|interval| now.checked_add_signed(interval))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Calculate the card's schedule after a recall at `now`
pub fn calculate_next_recall(
    card: &SavedFlashcard,
    difficulty: RecallDifficulty,
    config: &RecallConfig,
    now: DateTime<Utc>,
) -> RecallResult {
    match difficulty {
        RecallDifficulty::DontRemember => RecallResult {
            tier: MemoryTier::ShortTerm,
            next_recall_at: None,
            easy_count: 0,
            promoted: false,
        },
        RecallDifficulty::Hard => RecallResult {
            tier: MemoryTier::ShortTerm,
            next_recall_at: Some(schedule_after(now, config.hard_interval_minutes)),
            easy_count: 0,
            promoted: false,
        },
        RecallDifficulty::Easy => {
            let easy_count = card.easy_count.saturating_add(1);
            if easy_count >= config.promote_after_easy || card.tier == MemoryTier::LongTerm {
                RecallResult {
                    tier: MemoryTier::LongTerm,
                    next_recall_at: None,
                    easy_count,
                    promoted: card.tier == MemoryTier::ShortTerm,
                }
            } else {
                RecallResult {
                    tier: MemoryTier::ShortTerm,
                    next_recall_at: Some(schedule_after(now, config.easy_interval_minutes)),
                    easy_count,
                    promoted: false,
                }
            }
        }
    }
}

/// Apply a recall to the card, updating its schedule and counters
pub fn apply_recall(
    card: &mut SavedFlashcard,
    difficulty: RecallDifficulty,
    config: &RecallConfig,
    now: DateTime<Utc>,
) -> RecallResult {
    let result = calculate_next_recall(card, difficulty, config, now);

    card.tier = result.tier;
    card.next_recall_at = result.next_recall_at;
    card.easy_count = result.easy_count;
    card.recall_count = card.recall_count.saturating_add(1);
    card.last_recalled_at = Some(now);

    result
}

/// Put a card back into short-term memory with a fresh schedule
pub fn reset_to_short_term(card: &mut SavedFlashcard) {
    card.tier = MemoryTier::ShortTerm;
    card.next_recall_at = None;
    card.easy_count = 0;
}

/// Format the time until the next recall for display
pub fn format_until(next_recall_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(next) = next_recall_at else {
        return "now".to_string();
    };
    let minutes = (next - now).num_minutes();
    if minutes <= 0 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{}m", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h", minutes / 60)
    } else {
        format!("{}d", minutes / (60 * 24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcards::models::NewFlashcard;

    fn new_card(now: DateTime<Utc>) -> SavedFlashcard {
        SavedFlashcard::new(
            NewFlashcard {
                id: "c1".to_string(),
                topic_id: "t1".to_string(),
                lesson_id: "l1".to_string(),
                module_id: "m1".to_string(),
                front: "front".to_string(),
                back: "back".to_string(),
                emoji: String::new(),
            },
            now,
        )
    }

    #[test]
    fn test_dont_remember_clears_schedule() {
        let now = Utc::now();
        let mut card = new_card(now);
        card.easy_count = 1;
        card.next_recall_at = Some(now + Duration::minutes(60));

        let result = apply_recall(&mut card, RecallDifficulty::DontRemember, &RecallConfig::default(), now);

        assert_eq!(result.next_recall_at, None);
        assert_eq!(card.easy_count, 0);
        assert_eq!(card.tier, MemoryTier::ShortTerm);
        assert!(card.is_due_at(now));
    }

    #[test]
    fn test_hard_schedules_five_minutes() {
        let now = Utc::now();
        let mut card = new_card(now);
        card.easy_count = 1;

        apply_recall(&mut card, RecallDifficulty::Hard, &RecallConfig::default(), now);

        assert_eq!(card.next_recall_at, Some(now + Duration::minutes(5)));
        assert_eq!(card.easy_count, 0);
        assert!(!card.is_due_at(now));
        assert!(card.is_due_at(now + Duration::minutes(5)));
    }

    #[test]
    fn test_two_easy_recalls_promote() {
        let now = Utc::now();
        let config = RecallConfig::default();
        let mut card = new_card(now);

        let first = apply_recall(&mut card, RecallDifficulty::Easy, &config, now);
        assert!(!first.promoted);
        assert_eq!(card.next_recall_at, Some(now + Duration::minutes(60)));
        assert_eq!(card.tier, MemoryTier::ShortTerm);

        let later = now + Duration::minutes(61);
        let second = apply_recall(&mut card, RecallDifficulty::Easy, &config, later);
        assert!(second.promoted);
        assert_eq!(card.tier, MemoryTier::LongTerm);
        assert_eq!(card.next_recall_at, None);
        assert!(!card.is_due_at(later));
        assert_eq!(card.recall_count, 2);
        assert_eq!(card.last_recalled_at, Some(later));
    }

    #[test]
    fn test_hard_between_easy_recalls_resets_streak() {
        let now = Utc::now();
        let config = RecallConfig::default();
        let mut card = new_card(now);

        apply_recall(&mut card, RecallDifficulty::Easy, &config, now);
        apply_recall(&mut card, RecallDifficulty::Hard, &config, now);
        apply_recall(&mut card, RecallDifficulty::Easy, &config, now);

        assert_eq!(card.tier, MemoryTier::ShortTerm);
        assert_eq!(card.easy_count, 1);
        assert_eq!(card.recall_count, 3);
    }

    #[test]
    fn test_hard_recall_returns_long_term_card() {
        let now = Utc::now();
        let mut card = new_card(now);
        card.tier = MemoryTier::LongTerm;
        card.easy_count = 2;

        apply_recall(&mut card, RecallDifficulty::Hard, &RecallConfig::default(), now);
        assert_eq!(card.tier, MemoryTier::ShortTerm);
        assert_eq!(card.easy_count, 0);
    }

    #[test]
    fn test_custom_promotion_threshold() {
        let now = Utc::now();
        let config = RecallConfig {
            promote_after_easy: 3,
            ..RecallConfig::default()
        };
        let mut card = new_card(now);

        apply_recall(&mut card, RecallDifficulty::Easy, &config, now);
        apply_recall(&mut card, RecallDifficulty::Easy, &config, now);
        assert_eq!(card.tier, MemoryTier::ShortTerm);
        apply_recall(&mut card, RecallDifficulty::Easy, &config, now);
        assert_eq!(card.tier, MemoryTier::LongTerm);
    }

    #[test]
    fn test_out_of_range_intervals_do_not_panic() {
        let now = Utc::now();
        let config = RecallConfig {
            hard_interval_minutes: 1_000_000_000_000_000,
            easy_interval_minutes: -30,
            promote_after_easy: 5,
        };
        let mut card = new_card(now);

        apply_recall(&mut card, RecallDifficulty::Hard, &config, now);
        assert_eq!(card.next_recall_at, Some(DateTime::<Utc>::MAX_UTC));

        apply_recall(&mut card, RecallDifficulty::Easy, &config, now);
        assert_eq!(card.next_recall_at, Some(now));
        assert!(card.is_due_at(now));
    }

    #[test]
    fn test_format_until() {
        let now = Utc::now();
        assert_eq!(format_until(None, now), "now");
        assert_eq!(format_until(Some(now - Duration::minutes(3)), now), "now");
        assert_eq!(format_until(Some(now + Duration::minutes(5)), now), "5m");
        assert_eq!(format_until(Some(now + Duration::minutes(60)), now), "1h");
        assert_eq!(format_until(Some(now + Duration::hours(49)), now), "2d");
    }
}
