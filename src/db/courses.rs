//! Course data access.
//!
//! Every operation that changes a course's exercise list recomputes its
//! `total_duration` from the exercises that currently exist. Missing or
//! malformed references count as zero minutes rather than failing.

use crate::db::store::{Collection, CollectionName};
use crate::libs::course::{Course, CoursePatch, NewCourse};
use crate::libs::error::{CatalogError, CatalogResult};
use crate::libs::exercise::Exercise;
use crate::libs::ids::parse_key;
use chrono::Utc;
use rusqlite::Connection;

pub struct Courses<'a> {
    collection: Collection<'a, Course>,
    exercises: Collection<'a, Exercise>,
}

impl<'a> Courses<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            collection: Collection::new(conn, CollectionName::Courses),
            exercises: Collection::new(conn, CollectionName::Exercises),
        }
    }

    pub fn list(&self) -> CatalogResult<Vec<Course>> {
        self.collection.all()
    }

    pub fn get(&self, id: &str) -> CatalogResult<Option<Course>> {
        match parse_key(id) {
            Some(key) => self.collection.get(key),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> CatalogResult<usize> {
        self.collection.count()
    }

    /// Sum of the durations of the referenced exercises that exist.
    pub fn total_duration(&self, exercise_ids: &[String]) -> CatalogResult<u32> {
        let mut total = 0;
        for key in exercise_ids.iter().filter_map(|id| parse_key(id)) {
            if let Some(exercise) = self.exercises.get(key)? {
                total += exercise.duration;
            }
        }
        Ok(total)
    }

    pub fn create(&self, new: NewCourse) -> CatalogResult<Course> {
        let now = Utc::now();
        let total_duration = self.total_duration(&new.exercise_ids)?;
        let course = Course {
            id: None,
            title: new.title,
            description: new.description,
            tags: new.tags,
            exercise_ids: new.exercise_ids,
            is_favorite: new.is_favorite.unwrap_or(false),
            total_duration,
            created_at: Some(now),
            updated_at: Some(now),
        };

        let key = self.collection.add(&course)?;
        tracing::debug!(key, title = %course.title, total_duration, "course created");
        Ok(Course {
            id: Some(key.to_string()),
            ..course
        })
    }

    /// Shallow merge; the duration is recomputed only when the patch carries
    /// a new exercise list.
    pub fn update(&self, id: &str, patch: CoursePatch) -> CatalogResult<Course> {
        let (key, mut course) = self.require(id)?;
        let ids_changed = patch.exercise_ids.is_some();
        patch.apply(&mut course);
        if ids_changed {
            course.total_duration = self.total_duration(&course.exercise_ids)?;
        }
        course.updated_at = Some(Utc::now());
        self.collection.put(key, &course)?;
        Ok(course)
    }

    pub fn delete(&self, id: &str) -> CatalogResult<bool> {
        match parse_key(id) {
            Some(key) => self.collection.delete(key),
            None => Ok(false),
        }
    }

    pub fn toggle_favorite(&self, id: &str) -> CatalogResult<Course> {
        let (key, mut course) = self.require(id)?;
        course.is_favorite = !course.is_favorite;
        course.updated_at = Some(Utc::now());
        self.collection.put(key, &course)?;
        Ok(course)
    }

    /// Appends the exercise unless it is already listed. The duration and
    /// `updatedAt` are refreshed either way.
    pub fn add_exercise(&self, course_id: &str, exercise_id: &str) -> CatalogResult<Course> {
        self.modify_exercises(course_id, |ids| {
            if !ids.iter().any(|id| id == exercise_id) {
                ids.push(exercise_id.to_string());
            }
        })
    }

    pub fn remove_exercise(&self, course_id: &str, exercise_id: &str) -> CatalogResult<Course> {
        self.modify_exercises(course_id, |ids| ids.retain(|id| id != exercise_id))
    }

    /// Replaces the exercise list with `new_order`. The caller is trusted to
    /// pass a permutation of the current list.
    pub fn reorder(&self, course_id: &str, new_order: &[String]) -> CatalogResult<Course> {
        self.modify_exercises(course_id, |ids| *ids = new_order.to_vec())
    }

    fn modify_exercises<F>(&self, course_id: &str, change: F) -> CatalogResult<Course>
    where
        F: FnOnce(&mut Vec<String>),
    {
        let (key, mut course) = self.require(course_id)?;
        change(&mut course.exercise_ids);
        course.total_duration = self.total_duration(&course.exercise_ids)?;
        course.updated_at = Some(Utc::now());
        self.collection.put(key, &course)?;
        Ok(course)
    }

    fn require(&self, id: &str) -> CatalogResult<(i64, Course)> {
        let key = parse_key(id).ok_or_else(|| CatalogError::CourseNotFound(id.to_string()))?;
        let course = self.collection.get(key)?.ok_or_else(|| CatalogError::CourseNotFound(id.to_string()))?;
        Ok((key, course))
    }
}
