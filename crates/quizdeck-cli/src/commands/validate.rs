//! The `quizdeck validate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizdeck_core::model::QuizDocument;

pub fn execute(path: PathBuf) -> Result<()> {
    let files = if path.is_dir() {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&path)
            .with_context(|| format!("failed to read {}", path.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        files
    } else {
        vec![path]
    };

    if files.is_empty() {
        println!("No quiz documents found.");
        return Ok(());
    }

    let mut invalid = 0;
    for file in &files {
        match check(file) {
            Ok(document) => println!(
                "{}: {} / {} ({} questions)",
                file.display(),
                document.course_code,
                document.topic,
                document.questions.len()
            ),
            Err(e) => {
                println!("{}: INVALID: {e:#}", file.display());
                invalid += 1;
            }
        }
    }

    if invalid == 0 {
        println!("All quiz documents valid.");
        Ok(())
    } else {
        anyhow::bail!("{invalid} invalid document(s)")
    }
}

fn check(path: &Path) -> Result<QuizDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document: QuizDocument =
        serde_json::from_str(&content).context("not valid quiz JSON")?;
    document.validate()?;
    Ok(document)
}
