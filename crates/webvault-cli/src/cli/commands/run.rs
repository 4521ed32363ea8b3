//! `webvault run` – fetch all configured jobs and persist them.
//!
//! Store and output-dir problems are logged, never turned into a nonzero exit.

use anyhow::Result;
use webvault_core::config::WebvaultConfig;
use webvault_core::{ContentStore, Coordinator};

pub async fn run_jobs(cfg: &WebvaultConfig) -> Result<()> {
    if let Err(e) = tokio::fs::create_dir_all(&cfg.output_dir).await {
        tracing::error!("cannot create output dir {}: {}", cfg.output_dir.display(), e);
    }
    let store = match ContentStore::open_at(&cfg.database_path).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(
                "cannot open store {}: {}; no job was run",
                cfg.database_path.display(),
                e
            );
            return Ok(());
        }
    };

    let coordinator = Coordinator::from_config(store.clone(), cfg);
    let report = coordinator.run(cfg.jobs.clone()).await;
    store.close().await;

    tracing::info!(
        "{} of {} job(s) stored in {}",
        report.persisted(),
        report.tasks.len(),
        cfg.database_path.display()
    );
    println!("Content fetched, saved, and indexed successfully.");
    Ok(())
}
