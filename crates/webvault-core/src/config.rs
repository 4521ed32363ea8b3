use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::fetcher::FetchOptions;
use crate::job::FetchJob;

/// Store file used when no config overrides it (relative to the working directory).
pub const DEFAULT_DATABASE_FILE: &str = "web_content.db";

/// Compiled-in (url, filename) list.
const DEFAULT_JOBS: &[(&str, &str)] = &[
    ("https://www.ddu.edu.et/about", "ddu_about.html"),
    ("https://www.ddu.edu.et/contact", "ddu_contact.html"),
    ("https://www.w3schools.com", "w3schools.html"),
];

/// Runtime configuration. `Default` is what runs when no config file is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebvaultConfig {
    /// SQLite file holding the `Content` table.
    pub database_path: PathBuf,
    /// Directory the fetched bodies are written to.
    pub output_dir: PathBuf,
    /// Connect timeout per request in seconds.
    pub connect_timeout_secs: u64,
    /// Optional whole-transfer timeout in seconds (None = no deadline).
    pub transfer_timeout_secs: Option<u64>,
    /// Maximum redirects followed per request.
    pub max_redirects: u32,
    /// Jobs to run, one task each.
    pub jobs: Vec<FetchJob>,
}

impl Default for WebvaultConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            output_dir: PathBuf::from("."),
            connect_timeout_secs: 30,
            transfer_timeout_secs: None,
            max_redirects: 10,
            jobs: default_jobs(),
        }
    }
}

impl WebvaultConfig {
    /// Transfer settings handed to the fetcher.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout_secs: self.connect_timeout_secs,
            transfer_timeout_secs: self.transfer_timeout_secs,
            max_redirects: self.max_redirects,
        }
    }

    /// Rejects jobs that cannot be fetched, would write outside `output_dir`,
    /// or share a destination file with an earlier job.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.jobs.len());
        for job in &self.jobs {
            validate_url(&job.url)?;
            validate_filename(&job.filename)
                .with_context(|| format!("job for {}", job.url))?;
            if !seen.insert(job.filename.as_str()) {
                anyhow::bail!(
                    "duplicate filename {:?} (job for {})",
                    job.filename,
                    job.url
                );
            }
        }
        Ok(())
    }
}

pub fn default_jobs() -> Vec<FetchJob> {
    DEFAULT_JOBS
        .iter()
        .map(|(url, filename)| FetchJob::new(*url, *filename))
        .collect()
}

fn validate_url(raw: &str) -> Result<()> {
    let parsed = url::Url::parse(raw).with_context(|| format!("invalid job URL: {raw}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!("unsupported scheme {other:?} in job URL: {raw}"),
    }
}

fn validate_filename(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("empty filename");
    }
    if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
        anyhow::bail!("filename must be a plain file name: {name:?}");
    }
    Ok(())
}

/// Load and validate configuration from a TOML file. Missing keys take defaults.
pub fn load_from_path(path: &Path) -> Result<WebvaultConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: WebvaultConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

/// Config file if one was given, otherwise the compiled-in defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<WebvaultConfig> {
    match path {
        Some(p) => load_from_path(p),
        None => Ok(WebvaultConfig::default()),
    }
}
