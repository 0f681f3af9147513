//! Directory-backed quiz storage.
//!
//! Documents live as flat JSON files in one data directory. Listing scans
//! in sorted filename order so discovery order is deterministic; bulk loads
//! fetch concurrently and leave ordering to the aggregation layer, which
//! sorts by source key.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, StreamExt};

use quizdeck_core::error::EngineError;
use quizdeck_core::model::{QuizDocument, QuizSummary};
use quizdeck_core::traits::QuizStore;

/// How many documents `load_all` reads concurrently.
const FETCH_CONCURRENCY: usize = 8;

/// The `{COURSE}_{TOPIC}.json` name a document is stored under: course
/// code upper-cased with anything unsafe stripped, topic with anything
/// unsafe replaced by underscores.
pub fn file_name_for(document: &QuizDocument) -> String {
    let course: String = document
        .course_code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect::<String>()
        .to_uppercase();
    let topic: String = document
        .topic
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{course}_{topic}.json")
}

/// Flat-directory JSON quiz store.
pub struct FsStore {
    data_dir: PathBuf,
}

impl FsStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Save a validated document under its derived file name, stamping
    /// `created_at` if the author left it unset. Returns the file name.
    pub async fn save(&self, document: &QuizDocument) -> Result<String> {
        document.validate()?;
        let mut document = document.clone();
        if document.created_at.is_none() {
            document.created_at = Some(Utc::now());
        }

        let name = file_name_for(&document);
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .with_context(|| format!("failed to create {}", self.data_dir.display()))?;
        let json =
            serde_json::to_string_pretty(&document).context("failed to serialize quiz")?;
        tokio::fs::write(self.path_for(&name)?, json)
            .await
            .with_context(|| format!("failed to write quiz {name}"))?;

        tracing::info!(file = %name, "quiz saved");
        Ok(name)
    }

    /// Remove a stored document.
    pub async fn delete(&self, name: &str) -> Result<()> {
        tokio::fs::remove_file(self.path_for(name)?)
            .await
            .with_context(|| format!("failed to delete quiz {name}"))?;
        tracing::info!(file = %name, "quiz deleted");
        Ok(())
    }

    /// Resolve a stored name, rejecting anything that could escape the
    /// data directory.
    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.contains("..") || name.contains('/') || name.contains('\\') {
            anyhow::bail!("invalid quiz file name: {name}");
        }
        Ok(self.data_dir.join(name))
    }

    /// JSON file names in the data directory, sorted.
    async fn json_files(&self) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(&self.data_dir)
            .await
            .with_context(|| format!("failed to read {}", self.data_dir.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .context("failed to scan data directory")?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn read_document(&self, name: &str) -> Result<QuizDocument> {
        let content = tokio::fs::read_to_string(self.path_for(name)?)
            .await
            .with_context(|| format!("failed to read quiz {name}"))?;
        let document: QuizDocument = serde_json::from_str(&content)
            .map_err(|e| EngineError::MalformedDocument(format!("{name}: {e}")))?;
        document.validate()?;
        Ok(document)
    }
}

#[async_trait]
impl QuizStore for FsStore {
    async fn list(&self) -> Result<Vec<QuizSummary>> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for name in self.json_files().await? {
            match self.read_document(&name).await {
                Ok(document) => summaries.push(QuizSummary {
                    file_name: name,
                    course_code: document.course_code,
                    topic: document.topic,
                    marks: document.marks,
                    time_limit_minutes: document.time_limit_minutes,
                    quiz_type: document.quiz_type,
                    question_count: document.questions.len(),
                }),
                Err(e) => tracing::warn!(file = %name, error = %e, "skipping unreadable quiz"),
            }
        }
        Ok(summaries)
    }

    async fn load(&self, name: &str) -> Result<QuizDocument> {
        self.read_document(name).await
    }

    async fn load_all(&self) -> Result<Vec<(String, QuizDocument)>> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }

        let names = self.json_files().await?;
        let mut fetches = stream::iter(names)
            .map(|name| async move {
                let document = self.read_document(&name).await;
                (name, document)
            })
            .buffer_unordered(FETCH_CONCURRENCY);

        let mut documents = Vec::new();
        while let Some((name, document)) = fetches.next().await {
            match document {
                Ok(document) => documents.push((name, document)),
                Err(e) => tracing::warn!(file = %name, error = %e, "skipping unreadable quiz"),
            }
        }
        Ok(documents)
    }
}
