use anyhow::Result;

use mastery_lib::course::ModuleType;
use mastery_lib::progress::AccessGate;

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

/// Print the course tree with lock and completion markers
pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let progress = app.rewards.progress();
    let gate = AccessGate::new(&app.course, &progress);

    match format {
        OutputFormat::Json => {
            let topics: Vec<_> = app
                .course
                .topics
                .iter()
                .map(|topic| {
                    let lessons: Vec<_> = topic
                        .lessons
                        .iter()
                        .map(|lesson| {
                            let modules: Vec<_> = lesson
                                .modules
                                .iter()
                                .map(|module| {
                                    serde_json::json!({
                                        "id": module.id,
                                        "title": module.title,
                                        "type": module.module_type(),
                                        "xp": module.points,
                                        "accessible": gate.is_module_accessible(&topic.id, &lesson.id, &module.id),
                                        "completed": progress.is_module_completed(&topic.id, &lesson.id, &module.id),
                                    })
                                })
                                .collect();
                            serde_json::json!({
                                "id": lesson.id,
                                "title": lesson.title,
                                "accessible": gate.is_lesson_accessible(&topic.id, &lesson.id),
                                "completed": progress.is_lesson_completed(&topic.id, &lesson.id),
                                "modules": modules,
                            })
                        })
                        .collect();
                    serde_json::json!({
                        "id": topic.id,
                        "title": topic.title,
                        "completed": progress.is_topic_completed(&topic.id),
                        "lessons": lessons,
                    })
                })
                .collect();

            let output = serde_json::json!({
                "id": app.course.id,
                "title": app.course.title,
                "topics": topics,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", paint(&app.course.title, Color::BOLD, use_color));

            for (t_idx, topic) in app.course.topics.iter().enumerate() {
                let topic_last = t_idx + 1 == app.course.topics.len();
                let connector = if topic_last { "\u{2514}\u{2500}\u{2500} " } else { "\u{251c}\u{2500}\u{2500} " };
                let topic_prefix = if topic_last { "    " } else { "\u{2502}   " };
                let marker = status_marker(progress.is_topic_completed(&topic.id), true, use_color);
                println!("{}{} {} ({})", connector, marker, topic.title, topic.id);

                for (l_idx, lesson) in topic.lessons.iter().enumerate() {
                    let lesson_last = l_idx + 1 == topic.lessons.len();
                    let connector = if lesson_last { "\u{2514}\u{2500}\u{2500} " } else { "\u{251c}\u{2500}\u{2500} " };
                    let lesson_prefix = format!("{}{}", topic_prefix, if lesson_last { "    " } else { "\u{2502}   " });
                    let marker = status_marker(
                        progress.is_lesson_completed(&topic.id, &lesson.id),
                        gate.is_lesson_accessible(&topic.id, &lesson.id),
                        use_color,
                    );
                    println!("{}{}{} {} ({})", topic_prefix, connector, marker, lesson.title, lesson.id);

                    for (m_idx, module) in lesson.modules.iter().enumerate() {
                        let module_last = m_idx + 1 == lesson.modules.len();
                        let connector = if module_last { "\u{2514}\u{2500}\u{2500} " } else { "\u{251c}\u{2500}\u{2500} " };
                        let marker = status_marker(
                            progress.is_module_completed(&topic.id, &lesson.id, &module.id),
                            gate.is_module_accessible(&topic.id, &lesson.id, &module.id),
                            use_color,
                        );
                        println!(
                            "{}{}{} {} [{}, {} xp] ({})",
                            lesson_prefix,
                            connector,
                            marker,
                            module.title,
                            type_label(module.module_type()),
                            module.points,
                            module.id
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

fn status_marker(completed: bool, accessible: bool, use_color: bool) -> String {
    if completed {
        paint("[x]", Color::GREEN, use_color)
    } else if accessible {
        "[ ]".to_string()
    } else {
        paint("[locked]", Color::GRAY, use_color)
    }
}

fn type_label(module_type: ModuleType) -> &'static str {
    match module_type {
        ModuleType::Info => "info",
        ModuleType::Quiz => "quiz",
        ModuleType::Flashcards => "flashcards",
    }
}
