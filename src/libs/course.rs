//! Course playlists: an ordered list of exercise references with a cached
//! total duration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids;

/// An ordered, named playlist of exercise references.
///
/// `exercise_ids` may hold dangling references after an exercise is deleted.
/// `total_duration` is derived from the referenced exercises and is rewritten
/// by every operation that changes `exercise_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none", deserialize_with = "ids::optional")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "ids::list")]
    pub exercise_ids: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    /// Minutes.
    #[serde(default)]
    pub total_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for [`crate::db::courses::Courses::create`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub exercise_ids: Vec<String>,
    pub is_favorite: Option<bool>,
}

impl NewCourse {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    pub fn with_exercises(mut self, ids: &[String]) -> Self {
        self.exercise_ids = ids.to_vec();
        self
    }
}

/// Partial update for a course. Supplying `exercise_ids` triggers a duration
/// recomputation.
#[derive(Debug, Clone, Default)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub exercise_ids: Option<Vec<String>>,
    pub is_favorite: Option<bool>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.tags.is_none() && self.exercise_ids.is_none() && self.is_favorite.is_none()
    }

    /// Shallow-merges the provided fields onto `course`. The caller is
    /// responsible for recomputing the duration when ids were replaced.
    pub fn apply(self, course: &mut Course) {
        if let Some(v) = self.title {
            course.title = v;
        }
        if let Some(v) = self.description {
            course.description = v;
        }
        if let Some(v) = self.tags {
            course.tags = v;
        }
        if let Some(v) = self.exercise_ids {
            course.exercise_ids = v;
        }
        if let Some(v) = self.is_favorite {
            course.is_favorite = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_exercise_ids_are_accepted() {
        let course: Course = serde_json::from_str(r#"{"_id": 3, "title": "Monday", "exerciseIds": [1, "2"], "totalDuration": 99}"#).unwrap();
        assert_eq!(course.id.as_deref(), Some("3"));
        assert_eq!(course.exercise_ids, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_missing_exercise_ids_default_to_empty() {
        let course: Course = serde_json::from_str(r#"{"title": "Empty"}"#).unwrap();
        assert!(course.exercise_ids.is_empty());
        assert_eq!(course.total_duration, 0);
    }
}
