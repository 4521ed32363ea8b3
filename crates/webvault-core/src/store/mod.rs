//! Shared content store (SQLite via sqlx).
//!
//! Holds the append-only `Content(filename, url, content)` table. Every store
//! interaction (schema creation, insert) runs under one async mutex, so writers
//! never interleave on the single-writer database.

mod db;
mod records;

pub use db::ContentStore;
