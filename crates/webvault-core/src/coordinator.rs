//! Runs one task per job: fetch (blocking pool) then persist (under the store lock).
//!
//! The schema is created once before any task starts. Task failures are
//! logged with the job's URL and filename and end that task only.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::WebvaultConfig;
use crate::fetcher::{self, FetchOptions};
use crate::job::{FetchJob, TaskState};
use crate::store::ContentStore;

/// Final state of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub job: FetchJob,
    pub state: TaskState,
}

/// Terminal states of every job in a run, in job order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub tasks: Vec<TaskReport>,
}

impl RunReport {
    pub fn persisted(&self) -> usize {
        self.count(TaskState::Persisted)
    }

    pub fn fetch_failed(&self) -> usize {
        self.count(TaskState::FetchFailed)
    }

    pub fn persist_failed(&self) -> usize {
        self.count(TaskState::PersistFailed)
    }

    pub fn state_of(&self, filename: &str) -> Option<TaskState> {
        self.tasks
            .iter()
            .find(|t| t.job.filename == filename)
            .map(|t| t.state)
    }

    fn count(&self, state: TaskState) -> usize {
        self.tasks.iter().filter(|t| t.state == state).count()
    }
}

/// Per-task state shared between the tasks and the joiner.
#[derive(Clone)]
struct StateTable(Arc<Mutex<Vec<TaskState>>>);

impl StateTable {
    fn new(len: usize) -> Self {
        StateTable(Arc::new(Mutex::new(vec![TaskState::Pending; len])))
    }

    fn advance(&self, index: usize, next: TaskState) {
        let mut states = self.0.lock().unwrap_or_else(|e| e.into_inner());
        let current = states[index];
        debug_assert!(current.can_transition_to(next), "{current} -> {next}");
        tracing::trace!(task = index, "{} -> {}", current, next);
        states[index] = next;
    }

    /// Snapshot with any task that died mid-flight (panic) mapped to its failure state.
    fn finish(&self) -> Vec<TaskState> {
        let states = self.0.lock().unwrap_or_else(|e| e.into_inner());
        states
            .iter()
            .map(|s| match s {
                TaskState::Pending | TaskState::Fetching => TaskState::FetchFailed,
                TaskState::Fetched | TaskState::Persisting => TaskState::PersistFailed,
                terminal => *terminal,
            })
            .collect()
    }
}

/// Owns the store handle and transfer settings for a batch of jobs.
#[derive(Clone)]
pub struct Coordinator {
    store: ContentStore,
    output_dir: PathBuf,
    fetch_options: FetchOptions,
}

impl Coordinator {
    pub fn new(
        store: ContentStore,
        output_dir: impl Into<PathBuf>,
        fetch_options: FetchOptions,
    ) -> Self {
        Self {
            store,
            output_dir: output_dir.into(),
            fetch_options,
        }
    }

    pub fn from_config(store: ContentStore, cfg: &WebvaultConfig) -> Self {
        Self::new(store, cfg.output_dir.clone(), cfg.fetch_options())
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Create the schema, run every job concurrently and wait for all of them.
    ///
    /// Never fails: each task's outcome is logged and reported in [`RunReport`].
    pub async fn run(&self, jobs: Vec<FetchJob>) -> RunReport {
        if let Err(e) = self.store.ensure_schema().await {
            tracing::error!("schema initialization failed: {}", e);
        }

        let states = StateTable::new(jobs.len());
        let mut destinations = HashSet::with_capacity(jobs.len());
        let mut join_set = tokio::task::JoinSet::new();
        for (index, job) in jobs.iter().cloned().enumerate() {
            // Destination files are per task; a second job for the same file is not run.
            let key: PathBuf = job.destination(&self.output_dir).components().collect();
            if !destinations.insert(key) {
                tracing::error!(
                    url = %job.url,
                    filename = %job.filename,
                    "destination already claimed by an earlier job; skipping"
                );
                states.advance(index, TaskState::Fetching);
                states.advance(index, TaskState::FetchFailed);
                continue;
            }
            let this = self.clone();
            let states = states.clone();
            join_set.spawn(async move { this.run_task(index, job, &states).await });
        }

        while let Some(res) = join_set.join_next().await {
            if let Err(e) = res {
                tracing::error!("task join: {}", e);
            }
        }

        let tasks: Vec<TaskReport> = jobs
            .into_iter()
            .zip(states.finish())
            .map(|(job, state)| TaskReport { job, state })
            .collect();
        let report = RunReport { tasks };
        tracing::info!(
            persisted = report.persisted(),
            fetch_failed = report.fetch_failed(),
            persist_failed = report.persist_failed(),
            "run finished"
        );
        report
    }

    async fn run_task(&self, index: usize, job: FetchJob, states: &StateTable) {
        let destination = job.destination(&self.output_dir);

        states.advance(index, TaskState::Fetching);
        let fetched = {
            let url = job.url.clone();
            let destination = destination.clone();
            let options = self.fetch_options;
            tokio::task::spawn_blocking(move || fetcher::fetch(&url, &destination, &options)).await
        };
        match fetched {
            Ok(Ok(outcome)) => {
                tracing::info!(
                    url = %job.url,
                    filename = %job.filename,
                    bytes = outcome.bytes_written,
                    status = outcome.status,
                    "fetched"
                );
                states.advance(index, TaskState::Fetched);
            }
            Ok(Err(e)) => {
                tracing::error!(url = %job.url, filename = %job.filename, "fetch failed: {}", e);
                states.advance(index, TaskState::FetchFailed);
                return;
            }
            Err(e) => {
                tracing::error!(url = %job.url, filename = %job.filename, "fetch task join: {}", e);
                states.advance(index, TaskState::FetchFailed);
                return;
            }
        }

        states.advance(index, TaskState::Persisting);
        match self
            .store
            .persist_from(&job.filename, &job.url, &destination)
            .await
        {
            Ok(()) => {
                tracing::info!(url = %job.url, filename = %job.filename, "persisted");
                states.advance(index, TaskState::Persisted);
            }
            Err(e) => {
                tracing::error!(url = %job.url, filename = %job.filename, "persist failed: {}", e);
                states.advance(index, TaskState::PersistFailed);
            }
        }
    }
}
