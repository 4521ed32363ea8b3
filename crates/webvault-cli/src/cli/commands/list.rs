//! `webvault list` – print stored records.

use anyhow::{Context, Result};
use webvault_core::config::WebvaultConfig;
use webvault_core::ContentStore;

pub async fn run_list(cfg: &WebvaultConfig) -> Result<()> {
    let store = ContentStore::open_at(&cfg.database_path)
        .await
        .with_context(|| format!("open store {}", cfg.database_path.display()))?;
    store.ensure_schema().await?;
    let records = store.list_records().await?;
    store.close().await;

    if records.is_empty() {
        println!("No stored content.");
        return Ok(());
    }
    println!("{:<24} {:>10}  URL", "FILENAME", "BYTES");
    for r in records {
        println!("{:<24} {:>10}  {}", r.filename, r.content.len(), r.url);
    }
    Ok(())
}
