//! # Campus Repository
//!
//! Concrete repository implementation (adapter) for the campus CMS service.
//! This crate provides the SQLite adapter that implements the
//! `ContentRepository` port, plus admin password hashing.

pub mod security;
pub mod sqlite;

mod types;

#[cfg(test)]
mod sqlite_tests;

pub use sqlite::SqliteRepo;

/// Build and initialize a repository from a database URL.
///
/// This function:
/// 1. Connects to the database
/// 2. Runs migrations to create tables
/// 3. Returns a ready-to-use `SqliteRepo`
///
/// # Examples
///
/// ```ignore
/// let repo = build_repo("sqlite://data/campus.db?mode=rwc").await?;
/// let repo = build_repo("sqlite::memory:").await?;
/// ```
pub async fn build_repo(database_url: &str) -> anyhow::Result<SqliteRepo> {
    SqliteRepo::new(database_url).await
}
