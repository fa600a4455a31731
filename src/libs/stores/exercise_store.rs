use super::{Observable, SubscriptionId};
use crate::db::exercises::Exercises;
use crate::libs::auto_backup::AutoBackup;
use crate::libs::error::{CatalogError, CatalogResult};
use crate::libs::exercise::{Category, Exercise, ExercisePatch, NewExercise};
use crate::libs::ids::parse_key;
use crate::libs::stats::{self, ExerciseStats, RECENTLY_USED_LIMIT};
use rusqlite::Connection;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseState {
    pub exercises: Vec<Exercise>,
    pub loading: bool,
    pub error: Option<String>,
    pub stats: Option<ExerciseStats>,
}

/// Cached exercise list kept in step with the database.
pub struct ExerciseStore<'a> {
    exercises: Exercises<'a>,
    auto_backup: Option<Arc<AutoBackup>>,
    state: Observable<ExerciseState>,
}

impl<'a> ExerciseStore<'a> {
    pub fn new(conn: &'a Connection, auto_backup: Option<Arc<AutoBackup>>) -> Self {
        Self {
            exercises: Exercises::new(conn),
            auto_backup,
            state: Observable::default(),
        }
    }

    pub fn state(&self) -> &ExerciseState {
        self.state.get()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&ExerciseState) + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn load(&mut self) -> CatalogResult<()> {
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });
        match self.exercises.list() {
            Ok(exercises) => {
                self.state.update(|s| {
                    s.exercises = exercises;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn create(&mut self, new: NewExercise) -> CatalogResult<Exercise> {
        let exercise = match self.exercises.create(new) {
            Ok(exercise) => exercise,
            Err(e) => return self.fail(e),
        };
        let cached = exercise.clone();
        self.state.update(|s| s.exercises.push(cached));
        self.schedule_backup();
        Ok(exercise)
    }

    pub fn update(&mut self, id: &str, patch: ExercisePatch) -> CatalogResult<Exercise> {
        match self.exercises.update(id, patch) {
            Ok(exercise) => {
                self.replace_cached(&exercise);
                self.schedule_backup();
                Ok(exercise)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Removes the exercise. The cache and auto-backup are only touched when
    /// something was actually deleted.
    pub fn delete(&mut self, id: &str) -> CatalogResult<bool> {
        let removed = match self.exercises.delete(id) {
            Ok(removed) => removed,
            Err(e) => return self.fail(e),
        };
        if removed {
            let key = parse_key(id);
            self.state
                .update(|s| s.exercises.retain(|e| e.id.as_deref().and_then(parse_key) != key));
            self.schedule_backup();
        }
        Ok(removed)
    }

    pub fn toggle_favorite(&mut self, id: &str) -> CatalogResult<Exercise> {
        match self.exercises.toggle_favorite(id) {
            Ok(exercise) => {
                self.replace_cached(&exercise);
                self.schedule_backup();
                Ok(exercise)
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn mark_as_used(&mut self, id: &str) -> CatalogResult<()> {
        let refreshed = self.exercises.mark_as_used(id).and_then(|_| self.exercises.get(id));
        match refreshed {
            Ok(Some(exercise)) => {
                self.replace_cached(&exercise);
                self.schedule_backup();
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => self.fail(e),
        }
    }

    pub fn load_stats(&mut self) -> CatalogResult<ExerciseStats> {
        match self.exercises.stats() {
            Ok(stats) => {
                let cached = stats.clone();
                self.state.update(|s| s.stats = Some(cached));
                Ok(stats)
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn export(&mut self) -> CatalogResult<Vec<Exercise>> {
        match self.exercises.export() {
            Ok(exercises) => Ok(exercises),
            Err(e) => self.fail(e),
        }
    }

    /// Replaces the collection and reloads the cache.
    pub fn import(&mut self, exercises: Vec<Exercise>) -> CatalogResult<usize> {
        let inserted = match self.exercises.import(exercises) {
            Ok(inserted) => inserted,
            Err(e) => return self.fail(e),
        };
        self.load()?;
        self.schedule_backup();
        Ok(inserted)
    }

    pub fn clear_error(&mut self) {
        self.state.update(|s| s.error = None);
    }

    pub fn reset(&mut self) {
        self.state.set(ExerciseState::default());
    }

    pub fn favorites(&self) -> Vec<&Exercise> {
        self.state().exercises.iter().filter(|e| e.is_favorite).collect()
    }

    pub fn by_category(&self) -> BTreeMap<Category, Vec<&Exercise>> {
        let mut grouped: BTreeMap<Category, Vec<&Exercise>> = BTreeMap::new();
        for exercise in &self.state().exercises {
            grouped.entry(exercise.category).or_default().push(exercise);
        }
        grouped
    }

    /// Distinct tags of the cached exercises, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        let tags: BTreeSet<&String> = self.state().exercises.iter().flat_map(|e| e.tags.iter()).collect();
        tags.into_iter().cloned().collect()
    }

    pub fn recently_used(&self) -> Vec<Exercise> {
        stats::recently_used(&self.state().exercises, RECENTLY_USED_LIMIT)
    }

    /// Swaps in the stored record, matched on the id the data layer returned.
    fn replace_cached(&mut self, exercise: &Exercise) {
        let id = exercise.id.clone();
        self.state.update(|s| {
            for cached in s.exercises.iter_mut().filter(|e| e.id == id) {
                *cached = exercise.clone();
            }
        });
    }

    fn schedule_backup(&self) {
        if let Some(auto_backup) = &self.auto_backup {
            auto_backup.schedule();
        }
    }

    fn fail<T>(&mut self, error: CatalogError) -> CatalogResult<T> {
        let message = error.to_string();
        self.state.update(|s| {
            s.loading = false;
            s.error = Some(message);
        });
        Err(error)
    }
}
