//! # Tabli - a local catalog of theater exercises and courses
//!
//! Keeps a personal library of drama exercises and the courses built from
//! them in a local SQLite database, with statistics, JSON backups, and a
//! restore that reconciles identifiers.
//!
//! ## Features
//!
//! - **Exercises**: CRUD, full-text search, filters, favorites and usage tracking
//! - **Courses**: ordered exercise playlists with a maintained total duration
//! - **Statistics**: counts by difficulty and category, top tags, recent use
//! - **Backups**: versioned JSON export, validation and destructive restore
//! - **Auto-backup**: debounced snapshots after every change
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tabli::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
