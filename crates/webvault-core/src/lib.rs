//! webvault core: fetch a fixed list of URLs concurrently and record each
//! body in a shared SQLite `Content` table.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod job;
pub mod logging;
pub mod store;

pub use coordinator::{Coordinator, RunReport, TaskReport};
pub use error::{FetchError, StoreError};
pub use fetcher::{fetch, FetchOptions, FetchOutcome};
pub use job::{ContentRecord, FetchJob, TaskState};
pub use store::ContentStore;
