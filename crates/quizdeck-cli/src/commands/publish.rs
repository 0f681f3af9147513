//! The `quizdeck publish` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizdeck_core::model::QuizDocument;
use quizdeck_store::{load_config_from, FsStore};

pub async fn execute(config: Option<&Path>, path: PathBuf, code: &str) -> Result<()> {
    let config = load_config_from(config)?;
    if code != config.admin_code {
        anyhow::bail!("invalid admin code");
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document: QuizDocument =
        serde_json::from_str(&content).context("not valid quiz JSON")?;

    let store = FsStore::new(&config.data_dir);
    let name = store.save(&document).await?;
    println!("Published {name}");
    Ok(())
}
