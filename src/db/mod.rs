//! Database layer.
//!
//! Exercises and courses are JSON documents in SQLite tables keyed by an
//! auto-incremented integer (see [`store`]). [`exercises`] and [`courses`]
//! build the catalog operations on top of that, [`settings`] keeps the
//! backup markers, and [`migrations`] versions the schema.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tabli::db::{courses::Courses, db::Db, exercises::Exercises};
//! use tabli::libs::course::NewCourse;
//! use tabli::libs::exercise::{Category, Difficulty, NewExercise};
//!
//! let db = Db::new()?;
//! let exercise = Exercises::new(&db.conn).create(NewExercise::new("Zip Zap Boing", 10, Difficulty::Beginner, Category::Warmup))?;
//! let ids = vec![exercise.id.unwrap_or_default()];
//! let course = Courses::new(&db.conn).create(NewCourse::new("Monday class").with_exercises(&ids))?;
//! assert_eq!(course.total_duration, 10);
//! # Ok::<(), tabli::libs::error::CatalogError>(())
//! ```

/// Connection setup; applies pending migrations on open.
pub mod db;

/// Versioned schema changes and their history.
pub mod migrations;

/// Generic JSON document collections.
pub mod store;

pub mod exercises;

/// Course playlists and their cached duration.
pub mod courses;

pub mod settings;
