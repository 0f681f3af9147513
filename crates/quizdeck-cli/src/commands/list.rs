//! The `quizdeck list` command.

use std::path::Path;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};

use quizdeck_core::traits::QuizStore;
use quizdeck_store::{load_config_from, FsStore};

pub async fn execute(config: Option<&Path>) -> Result<()> {
    let config = load_config_from(config)?;
    let store = FsStore::new(&config.data_dir);

    let mut summaries = store.list().await?;
    if summaries.is_empty() {
        println!("No quizzes stored yet. Publish one with `quizdeck publish`.");
        return Ok(());
    }
    summaries.sort_by(|a, b| {
        a.course_code
            .cmp(&b.course_code)
            .then_with(|| a.topic.cmp(&b.topic))
    });

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Course", "Topic", "Questions", "Minutes", "File"]);
    for summary in &summaries {
        table.add_row(vec![
            summary.course_code.clone(),
            summary.topic.clone(),
            summary.question_count.to_string(),
            format!("{}", summary.time_limit_minutes),
            summary.file_name.clone(),
        ]);
    }
    println!("{table}");

    println!(
        "\n{} quizzes. Cumulative exams: `quizdeck take course:<CODE>` or `quizdeck take general`.",
        summaries.len()
    );
    Ok(())
}
