//! Exercise data access: CRUD, search, filtering, statistics and bulk
//! export/import.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tabli::db::{db::Db, exercises::Exercises};
//! use tabli::libs::exercise::{Category, Difficulty, NewExercise};
//!
//! let db = Db::new()?;
//! let exercises = Exercises::new(&db.conn);
//! let mirror = exercises.create(NewExercise::new("Mirror", 10, Difficulty::Beginner, Category::Group))?;
//! exercises.mark_as_used(mirror.id.as_deref().unwrap_or_default())?;
//! # Ok::<(), tabli::libs::error::CatalogError>(())
//! ```

use crate::db::store::{Collection, CollectionName};
use crate::libs::error::{CatalogError, CatalogResult};
use crate::libs::exercise::{Exercise, ExerciseFilter, ExercisePatch, NewExercise};
use crate::libs::ids::parse_key;
use crate::libs::stats::ExerciseStats;
use chrono::Utc;
use rusqlite::Connection;
use std::collections::BTreeSet;

pub struct Exercises<'a> {
    conn: &'a Connection,
    collection: Collection<'a, Exercise>,
}

impl<'a> Exercises<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            collection: Collection::new(conn, CollectionName::Exercises),
        }
    }

    pub fn list(&self) -> CatalogResult<Vec<Exercise>> {
        self.collection.all()
    }

    /// Looks an exercise up by its string id; unknown or malformed ids yield `None`.
    pub fn get(&self, id: &str) -> CatalogResult<Option<Exercise>> {
        match parse_key(id) {
            Some(key) => self.collection.get(key),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> CatalogResult<usize> {
        self.collection.count()
    }

    pub fn create(&self, new: NewExercise) -> CatalogResult<Exercise> {
        let now = Utc::now();
        let exercise = Exercise {
            id: None,
            title: new.title,
            description: new.description,
            instructions: new.instructions,
            duration: new.duration,
            difficulty: new.difficulty,
            category: new.category,
            tags: new.tags,
            materials: new.materials,
            objectives: new.objectives,
            variations: new.variations,
            notes: new.notes,
            participants: new.participants,
            usage_count: new.usage_count.unwrap_or(0),
            is_favorite: new.is_favorite.unwrap_or(false),
            last_used: None,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let key = self.collection.add(&exercise)?;
        tracing::debug!(key, title = %exercise.title, "exercise created");
        Ok(Exercise {
            id: Some(key.to_string()),
            ..exercise
        })
    }

    /// Shallow-merges `patch` onto the stored exercise and refreshes `updatedAt`.
    pub fn update(&self, id: &str, patch: ExercisePatch) -> CatalogResult<Exercise> {
        let (key, mut exercise) = self.require(id)?;
        patch.apply(&mut exercise);
        exercise.updated_at = Some(Utc::now());
        self.collection.put(key, &exercise)?;
        Ok(exercise)
    }

    /// Hard delete. Courses that reference the exercise keep the dangling id.
    pub fn delete(&self, id: &str) -> CatalogResult<bool> {
        match parse_key(id) {
            Some(key) => self.collection.delete(key),
            None => Ok(false),
        }
    }

    pub fn toggle_favorite(&self, id: &str) -> CatalogResult<Exercise> {
        let (key, mut exercise) = self.require(id)?;
        exercise.is_favorite = !exercise.is_favorite;
        exercise.updated_at = Some(Utc::now());
        self.collection.put(key, &exercise)?;
        Ok(exercise)
    }

    /// Records a use of the exercise. Unknown ids are ignored.
    pub fn mark_as_used(&self, id: &str) -> CatalogResult<()> {
        let Some(key) = parse_key(id) else {
            return Ok(());
        };
        let Some(mut exercise) = self.collection.get(key)? else {
            tracing::debug!(id, "mark_as_used on missing exercise ignored");
            return Ok(());
        };

        let now = Utc::now();
        exercise.last_used = Some(now);
        exercise.usage_count += 1;
        exercise.updated_at = Some(now);
        self.collection.put(key, &exercise)
    }

    /// Case-insensitive substring search over title, description and tags.
    /// A blank query returns every exercise.
    pub fn search(&self, query: &str) -> CatalogResult<Vec<Exercise>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.list();
        }
        self.collection.scan(|e| e.matches_query(&needle))
    }

    pub fn filter(&self, filter: &ExerciseFilter) -> CatalogResult<Vec<Exercise>> {
        self.collection.scan(|e| filter.matches(e))
    }

    /// Distinct tags across all exercises, sorted.
    pub fn all_tags(&self) -> CatalogResult<Vec<String>> {
        let tags: BTreeSet<String> = self.list()?.into_iter().flat_map(|e| e.tags).collect();
        Ok(tags.into_iter().collect())
    }

    pub fn stats(&self) -> CatalogResult<ExerciseStats> {
        Ok(ExerciseStats::compute(&self.list()?))
    }

    /// Snapshot of the collection with ids attached.
    pub fn export(&self) -> CatalogResult<Vec<Exercise>> {
        self.list()
    }

    /// Replaces the collection with `exercises`. Prior ids are discarded and
    /// fresh ones assigned; course references are not remapped.
    pub fn import(&self, exercises: Vec<Exercise>) -> CatalogResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let collection: Collection<Exercise> = Collection::new(&tx, CollectionName::Exercises);
        collection.clear()?;

        let mut inserted = 0;
        for exercise in &exercises {
            collection.add(exercise)?;
            inserted += 1;
        }
        tx.commit()?;

        tracing::info!(inserted, "exercise collection replaced by bulk import");
        Ok(inserted)
    }

    fn require(&self, id: &str) -> CatalogResult<(i64, Exercise)> {
        let key = parse_key(id).ok_or_else(|| CatalogError::ExerciseNotFound(id.to_string()))?;
        let exercise = self.collection.get(key)?.ok_or_else(|| CatalogError::ExerciseNotFound(id.to_string()))?;
        Ok((key, exercise))
    }
}
