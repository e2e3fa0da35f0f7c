use anyhow::Result;

use mastery_lib::progress::{course_summary, topic_summary};

use crate::app::App;
use crate::render::terminal::{paint, progress_bar, Color};
use crate::OutputFormat;

/// Show overall and per-topic completion with total points
pub fn run_status(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let progress = app.rewards.progress();
    let overall = course_summary(&app.course, &progress);

    match format {
        OutputFormat::Json => {
            let topics: Vec<_> = app
                .course
                .topics
                .iter()
                .map(|topic| {
                    serde_json::json!({
                        "id": topic.id,
                        "title": topic.title,
                        "completed": progress.is_topic_completed(&topic.id),
                        "summary": topic_summary(&app.course, &progress, &topic.id),
                    })
                })
                .collect();

            let output = serde_json::json!({
                "courseId": progress.course_id,
                "totalXpEarned": progress.total_points,
                "totalXp": app.course.total_points,
                "rewardPolicy": app.config.reward_policy,
                "lastAccessedAt": progress.last_accessed_at,
                "summary": overall,
                "topics": topics,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} {} {}% ({}/{} modules)",
                paint(&app.course.title, Color::BOLD, use_color),
                progress_bar(overall.percentage, 20),
                overall.percentage,
                overall.completed_modules,
                overall.total_modules
            );
            println!(
                "Points: {} / {} ({:?})",
                paint(&progress.total_points.to_string(), Color::YELLOW, use_color),
                app.course.total_points,
                app.config.reward_policy
            );
            println!();

            for topic in &app.course.topics {
                let summary = topic_summary(&app.course, &progress, &topic.id);
                println!(
                    "  {:<30} {} {:>3}%",
                    topic.title,
                    progress_bar(summary.percentage, 10),
                    summary.percentage
                );
            }
        }
    }

    Ok(())
}

/// Delete all progress for the course
pub fn run_reset(app: &App, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("Refusing to reset progress without --yes");
    }
    app.rewards.reset()?;
    println!("Progress for '{}' reset", app.course.title);
    Ok(())
}
