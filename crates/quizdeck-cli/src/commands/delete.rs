//! The `quizdeck delete` command.

use std::path::Path;

use anyhow::Result;

use quizdeck_store::{load_config_from, FsStore};

pub async fn execute(config: Option<&Path>, name: &str, code: &str) -> Result<()> {
    let config = load_config_from(config)?;
    if code != config.admin_code {
        anyhow::bail!("invalid admin code");
    }

    let store = FsStore::new(&config.data_dir);
    store.delete(name).await?;
    println!("Deleted {name}");
    Ok(())
}
