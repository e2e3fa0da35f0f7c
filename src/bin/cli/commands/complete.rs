use std::collections::HashMap;

use anyhow::{bail, Result};

use mastery_lib::course::{grade_quiz, ModuleType};
use mastery_lib::progress::AccessGate;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

/// Complete a module, refusing locked ones
pub fn run(
    app: &App,
    topic_id: &str,
    lesson_id: &str,
    module_id: &str,
    score: Option<u8>,
    answers: &[String],
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let module = app.find_module(topic_id, lesson_id, module_id)?;

    {
        let progress = app.rewards.progress();
        let gate = AccessGate::new(&app.course, &progress);
        if !gate.is_lesson_accessible(topic_id, lesson_id) {
            bail!("Lesson '{}' is locked; finish the previous lesson first", lesson_id);
        }
        if !gate.is_module_accessible(topic_id, lesson_id, module_id) {
            bail!("Module '{}' is locked; finish the previous module first", module_id);
        }
    }

    let score = if answers.is_empty() {
        score
    } else {
        if module.module_type() != ModuleType::Quiz {
            bail!("--answer only applies to quiz modules");
        }
        let graded = grade_quiz(module.questions(), &parse_answers(answers)?);
        log::debug!("Graded quiz {}: {}", module_id, graded);
        Some(graded)
    };

    if module.module_type() == ModuleType::Quiz && score.is_none() {
        bail!("Quiz modules need --score (0-100) or --answer");
    }

    let result = app
        .rewards
        .complete_module(&app.course, topic_id, lesson_id, module_id, score)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Plain => {
            let earned = format!("+{} xp", result.points_earned);
            let color = if result.points_earned > 0 { Color::GREEN } else { Color::GRAY };
            println!(
                "Completed '{}': {} (total {})",
                module.title,
                paint(&earned, color, use_color),
                result.total_points
            );
        }
    }

    Ok(())
}

/// Parse `question=option[,option]` arguments; repeated questions accumulate
fn parse_answers(answers: &[String]) -> Result<HashMap<String, Vec<String>>> {
    let mut parsed: HashMap<String, Vec<String>> = HashMap::new();
    for answer in answers {
        let Some((question, options)) = answer.split_once('=') else {
            bail!("Invalid answer '{}', expected QUESTION=OPTION[,OPTION]", answer);
        };
        let question = question.trim();
        if question.is_empty() {
            bail!("Invalid answer '{}', missing question id", answer);
        }
        parsed.entry(question.to_string()).or_default().extend(
            options
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from),
        );
    }
    Ok(parsed)
}
