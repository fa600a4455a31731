use super::{Observable, SubscriptionId};
use crate::db::courses::Courses;
use crate::libs::auto_backup::AutoBackup;
use crate::libs::course::{Course, CoursePatch, NewCourse};
use crate::libs::error::{CatalogError, CatalogResult};
use crate::libs::ids::parse_key;
use rusqlite::Connection;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseState {
    pub courses: Vec<Course>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct CourseStore<'a> {
    courses: Courses<'a>,
    auto_backup: Option<Arc<AutoBackup>>,
    state: Observable<CourseState>,
}

impl<'a> CourseStore<'a> {
    pub fn new(conn: &'a Connection, auto_backup: Option<Arc<AutoBackup>>) -> Self {
        Self {
            courses: Courses::new(conn),
            auto_backup,
            state: Observable::default(),
        }
    }

    pub fn state(&self) -> &CourseState {
        self.state.get()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&CourseState) + 'static,
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
        match self.courses.list() {
            Ok(courses) => {
                self.state.update(|s| {
                    s.courses = courses;
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn create(&mut self, new: NewCourse) -> CatalogResult<Course> {
        let course = match self.courses.create(new) {
            Ok(course) => course,
            Err(e) => return self.fail(e),
        };
        let cached = course.clone();
        self.state.update(|s| s.courses.push(cached));
        self.schedule_backup();
        Ok(course)
    }

    pub fn update(&mut self, id: &str, patch: CoursePatch) -> CatalogResult<Course> {
        let result = self.courses.update(id, patch);
        self.apply_mutation(result)
    }

    pub fn delete(&mut self, id: &str) -> CatalogResult<bool> {
        let removed = match self.courses.delete(id) {
            Ok(removed) => removed,
            Err(e) => return self.fail(e),
        };
        if removed {
            let key = parse_key(id);
            self.state
                .update(|s| s.courses.retain(|c| c.id.as_deref().and_then(parse_key) != key));
            self.schedule_backup();
        }
        Ok(removed)
    }

    pub fn toggle_favorite(&mut self, id: &str) -> CatalogResult<Course> {
        let result = self.courses.toggle_favorite(id);
        self.apply_mutation(result)
    }

    pub fn add_exercise(&mut self, course_id: &str, exercise_id: &str) -> CatalogResult<Course> {
        let result = self.courses.add_exercise(course_id, exercise_id);
        self.apply_mutation(result)
    }

    pub fn remove_exercise(&mut self, course_id: &str, exercise_id: &str) -> CatalogResult<Course> {
        let result = self.courses.remove_exercise(course_id, exercise_id);
        self.apply_mutation(result)
    }

    pub fn reorder(&mut self, course_id: &str, new_order: &[String]) -> CatalogResult<Course> {
        let result = self.courses.reorder(course_id, new_order);
        self.apply_mutation(result)
    }

    pub fn clear_error(&mut self) {
        self.state.update(|s| s.error = None);
    }

    pub fn reset(&mut self) {
        self.state.set(CourseState::default());
    }

    pub fn favorites(&self) -> Vec<&Course> {
        self.state().courses.iter().filter(|c| c.is_favorite).collect()
    }

    fn apply_mutation(&mut self, result: CatalogResult<Course>) -> CatalogResult<Course> {
        let course = match result {
            Ok(course) => course,
            Err(e) => return self.fail(e),
        };
        self.state.update(|s| {
            for cached in s.courses.iter_mut().filter(|c| c.id == course.id) {
                *cached = course.clone();
            }
        });
        self.schedule_backup();
        Ok(course)
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
