//! In-memory store for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use quizdeck_core::model::{QuizDocument, QuizSummary};
use quizdeck_core::traits::QuizStore;

/// A `QuizStore` backed by a map, for exercising sessions and aggregation
/// without touching the filesystem.
///
/// Keys are kept sorted so discovery order matches the directory store.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, QuizDocument>>,
    load_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with `(name, document)` pairs.
    pub fn with_documents(pairs: impl IntoIterator<Item = (String, QuizDocument)>) -> Self {
        Self {
            documents: Mutex::new(pairs.into_iter().collect()),
            load_count: AtomicU32::new(0),
        }
    }

    pub fn insert(&self, name: impl Into<String>, document: QuizDocument) {
        self.documents.lock().unwrap().insert(name.into(), document);
    }

    /// Number of single-document loads served.
    pub fn load_count(&self) -> u32 {
        self.load_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuizStore for MemoryStore {
    async fn list(&self) -> Result<Vec<QuizSummary>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .iter()
            .map(|(name, document)| QuizSummary {
                file_name: name.clone(),
                course_code: document.course_code.clone(),
                topic: document.topic.clone(),
                marks: document.marks,
                time_limit_minutes: document.time_limit_minutes,
                quiz_type: document.quiz_type.clone(),
                question_count: document.questions.len(),
            })
            .collect())
    }

    async fn load(&self, name: &str) -> Result<QuizDocument> {
        self.load_count.fetch_add(1, Ordering::Relaxed);
        self.documents
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("quiz not found: {name}"))
    }

    async fn load_all(&self) -> Result<Vec<(String, QuizDocument)>> {
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .iter()
            .map(|(name, document)| (name.clone(), document.clone()))
            .collect())
    }
}
