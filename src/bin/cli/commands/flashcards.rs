use anyhow::{bail, Result};
use chrono::Utc;

use mastery_lib::course::ModuleType;
use mastery_lib::flashcards::algorithm::format_until;
use mastery_lib::flashcards::{MemoryTier, NewFlashcard, RecallDifficulty, SavedFlashcard};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

/// Save the cards of a flashcards module (or one card with `--card`)
pub fn run_save(
    app: &App,
    topic_id: &str,
    lesson_id: &str,
    module_id: &str,
    card_id: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let module = app.find_module(topic_id, lesson_id, module_id)?;
    if module.module_type() != ModuleType::Flashcards {
        bail!("Module '{}' is not a flashcards module", module_id);
    }

    let cards: Vec<_> = module
        .cards()
        .iter()
        .filter(|card| card_id.map_or(true, |id| card.id == id))
        .collect();
    if cards.is_empty() {
        match card_id {
            Some(id) => bail!("Card '{}' not found in module '{}'", id, module_id),
            None => bail!("Module '{}' has no cards", module_id),
        }
    }

    let mut saved = Vec::new();
    let mut skipped = Vec::new();
    for card in cards {
        let new_card = NewFlashcard::from_course_card(topic_id, lesson_id, module_id, card);
        if app.flashcards.save(new_card)? {
            saved.push(card.id.clone());
        } else {
            skipped.push(card.id.clone());
        }
    }

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "saved": saved,
                "alreadySaved": skipped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Saved {} card(s)", saved.len());
            if !skipped.is_empty() {
                println!("Already saved: {}", skipped.join(", "));
            }
        }
    }

    Ok(())
}

/// List saved cards, optionally limited to one tier
pub fn run_list(app: &App, tier: Option<MemoryTier>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = match tier {
        Some(tier) => app.flashcards.list_by_tier(tier),
        None => app.flashcards.list(),
    };
    print_cards(&cards, format, use_color)
}

/// List cards waiting in the recall queue
pub fn run_due(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let cards = app.flashcards.due_queue();
    if cards.is_empty() && matches!(format, OutputFormat::Plain) {
        println!("Nothing to recall right now");
        return Ok(());
    }
    print_cards(&cards, format, use_color)
}

/// Record a recall answer for a card
pub fn run_recall(
    app: &App,
    card_id: &str,
    difficulty: RecallDifficulty,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let before = app.flashcards.get(card_id);
    let Some(card) = app.flashcards.record_recall(card_id, difficulty)? else {
        bail!("Card '{}' is not saved", card_id);
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        OutputFormat::Plain => {
            let promoted = before.map_or(false, |b| b.tier == MemoryTier::ShortTerm)
                && card.tier == MemoryTier::LongTerm;
            if promoted {
                println!("{} moved to long-term memory", paint(&card.front, Color::GREEN, use_color));
            } else {
                println!(
                    "{} next recall {}",
                    card.front,
                    format_until(card.next_recall_at, Utc::now())
                );
            }
        }
    }

    Ok(())
}

/// Move a long-term card back to short-term
pub fn run_demote(app: &App, card_id: &str, format: &OutputFormat) -> Result<()> {
    let Some(card) = app.flashcards.demote(card_id)? else {
        bail!("Card '{}' is not saved", card_id);
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&card)?),
        OutputFormat::Plain => println!("{} moved back to short-term memory", card.front),
    }
    Ok(())
}

/// Delete a saved card
pub fn run_remove(app: &App, card_id: &str) -> Result<()> {
    if !app.flashcards.remove(card_id)? {
        bail!("Card '{}' is not saved", card_id);
    }
    println!("Removed '{}'", card_id);
    Ok(())
}

/// Show memory statistics
pub fn run_stats(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let stats = app.flashcards.stats();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("Saved cards:  {}", stats.total);
            println!("Short-term:   {}", stats.short_term);
            println!("Long-term:    {}", paint(&stats.long_term.to_string(), Color::GREEN, use_color));
            println!("Due now:      {}", paint(&stats.due_now.to_string(), Color::YELLOW, use_color));
        }
    }

    Ok(())
}

fn print_cards(cards: &[SavedFlashcard], format: &OutputFormat, use_color: bool) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(cards)?);
        }
        OutputFormat::Plain => {
            if cards.is_empty() {
                println!("No saved cards");
                return Ok(());
            }
            let now = Utc::now();
            for card in cards {
                let tier = match card.tier {
                    MemoryTier::ShortTerm => paint("short", Color::YELLOW, use_color),
                    MemoryTier::LongTerm => paint("long ", Color::GREEN, use_color),
                };
                let prefix = if card.emoji.is_empty() {
                    String::new()
                } else {
                    format!("{} ", card.emoji)
                };
                let when = match card.tier {
                    MemoryTier::ShortTerm => format!("recall {}", format_until(card.next_recall_at, now)),
                    MemoryTier::LongTerm => "learned".to_string(),
                };
                println!(
                    "  [{}] {}{}  {}  ({}, {})",
                    tier,
                    prefix,
                    card.front,
                    paint(&card.back, Color::DIM, use_color),
                    card.id,
                    when
                );
            }
        }
    }
    Ok(())
}
