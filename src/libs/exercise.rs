//! Exercise records and the value types used to create, patch and filter them.
//!
//! Difficulty and category labels are serialized with the French names used
//! by the original catalog so that older backup files load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids;

/// Difficulty level of an exercise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "Débutant")]
    Beginner,
    #[serde(rename = "Intermédiaire")]
    Intermediate,
    #[serde(rename = "Avancé")]
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced];

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Débutant",
            Difficulty::Intermediate => "Intermédiaire",
            Difficulty::Advanced => "Avancé",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Thematic category of an exercise.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Category {
    #[default]
    #[serde(rename = "Échauffement")]
    Warmup,
    #[serde(rename = "Improvisation")]
    Improvisation,
    #[serde(rename = "Expression corporelle")]
    BodyExpression,
    #[serde(rename = "Voix et diction")]
    VoiceAndDiction,
    #[serde(rename = "Concentration")]
    Concentration,
    #[serde(rename = "Émotion")]
    Emotion,
    #[serde(rename = "Personnage")]
    Character,
    #[serde(rename = "Groupe")]
    Group,
    #[serde(rename = "Solo")]
    Solo,
    #[serde(rename = "Relaxation")]
    Relaxation,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Warmup,
        Category::Improvisation,
        Category::BodyExpression,
        Category::VoiceAndDiction,
        Category::Concentration,
        Category::Emotion,
        Category::Character,
        Category::Group,
        Category::Solo,
        Category::Relaxation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Warmup => "Échauffement",
            Category::Improvisation => "Improvisation",
            Category::BodyExpression => "Expression corporelle",
            Category::VoiceAndDiction => "Voix et diction",
            Category::Concentration => "Concentration",
            Category::Emotion => "Émotion",
            Category::Character => "Personnage",
            Category::Group => "Groupe",
            Category::Solo => "Solo",
            Category::Relaxation => "Relaxation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single theater-practice unit.
///
/// `id` is the store-assigned key rendered as a string. It is never part of
/// the stored document; the object store attaches it on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none", deserialize_with = "ids::optional")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub instructions: String,
    /// Minutes.
    #[serde(default)]
    pub duration: u32,
    pub difficulty: Difficulty,
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objectives: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Exercise {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Case-insensitive substring match on title, description or any tag.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Input for [`crate::db::exercises::Exercises::create`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewExercise {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub duration: u32,
    pub difficulty: Difficulty,
    pub category: Category,
    pub tags: Vec<String>,
    pub materials: Option<Vec<String>>,
    pub objectives: Option<Vec<String>>,
    pub variations: Option<Vec<String>>,
    pub notes: Option<String>,
    pub participants: Option<String>,
    pub usage_count: Option<u32>,
    pub is_favorite: Option<bool>,
}

impl NewExercise {
    pub fn new(title: &str, duration: u32, difficulty: Difficulty, category: Category) -> Self {
        Self {
            title: title.to_string(),
            duration,
            difficulty,
            category,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = Some(true);
        self
    }
}

/// Partial update for an exercise. `None` leaves a field untouched; for the
/// optional record fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ExercisePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub duration: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub materials: Option<Option<Vec<String>>>,
    pub objectives: Option<Option<Vec<String>>>,
    pub variations: Option<Option<Vec<String>>>,
    pub notes: Option<Option<String>>,
    pub participants: Option<Option<String>>,
    pub usage_count: Option<u32>,
    pub is_favorite: Option<bool>,
    pub last_used: Option<Option<DateTime<Utc>>>,
}

impl ExercisePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.instructions.is_none()
            && self.duration.is_none()
            && self.difficulty.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.materials.is_none()
            && self.objectives.is_none()
            && self.variations.is_none()
            && self.notes.is_none()
            && self.participants.is_none()
            && self.usage_count.is_none()
            && self.is_favorite.is_none()
            && self.last_used.is_none()
    }

    /// Shallow-merges the provided fields onto `exercise`.
    pub fn apply(self, exercise: &mut Exercise) {
        if let Some(v) = self.title {
            exercise.title = v;
        }
        if let Some(v) = self.description {
            exercise.description = v;
        }
        if let Some(v) = self.instructions {
            exercise.instructions = v;
        }
        if let Some(v) = self.duration {
            exercise.duration = v;
        }
        if let Some(v) = self.difficulty {
            exercise.difficulty = v;
        }
        if let Some(v) = self.category {
            exercise.category = v;
        }
        if let Some(v) = self.tags {
            exercise.tags = v;
        }
        if let Some(v) = self.materials {
            exercise.materials = v;
        }
        if let Some(v) = self.objectives {
            exercise.objectives = v;
        }
        if let Some(v) = self.variations {
            exercise.variations = v;
        }
        if let Some(v) = self.notes {
            exercise.notes = v;
        }
        if let Some(v) = self.participants {
            exercise.participants = v;
        }
        if let Some(v) = self.usage_count {
            exercise.usage_count = v;
        }
        if let Some(v) = self.is_favorite {
            exercise.is_favorite = v;
        }
        if let Some(v) = self.last_used {
            exercise.last_used = v;
        }
    }
}

/// Inclusive duration bounds in minutes; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl DurationRange {
    pub fn contains(&self, duration: u32) -> bool {
        self.min.map_or(true, |min| duration >= min) && self.max.map_or(true, |max| duration <= max)
    }
}

/// Conjunctive exercise filter. Every criterion is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseFilter {
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
    /// The record must carry all of these.
    #[serde(default)]
    pub tags: Vec<String>,
    pub duration: Option<DurationRange>,
    pub is_favorite: Option<bool>,
}

impl ExerciseFilter {
    pub fn matches(&self, exercise: &Exercise) -> bool {
        if let Some(difficulty) = self.difficulty {
            if exercise.difficulty != difficulty {
                return false;
            }
        }
        if let Some(category) = self.category {
            if exercise.category != category {
                return false;
            }
        }
        if !self.tags.iter().all(|tag| exercise.has_tag(tag)) {
            return false;
        }
        if let Some(range) = &self.duration {
            if !range.contains(exercise.duration) {
                return false;
            }
        }
        if let Some(is_favorite) = self.is_favorite {
            if exercise.is_favorite != is_favorite {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(duration: u32, tags: &[&str]) -> Exercise {
        Exercise {
            id: Some("1".to_string()),
            title: "Mirror".to_string(),
            description: "Follow your partner".to_string(),
            instructions: String::new(),
            duration,
            difficulty: Difficulty::Beginner,
            category: Category::Group,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            materials: None,
            objectives: None,
            variations: None,
            notes: None,
            participants: None,
            usage_count: 0,
            is_favorite: false,
            last_used: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_duration_range_bounds() {
        let range = DurationRange { min: Some(5), max: Some(10) };
        assert!(range.contains(5));
        assert!(range.contains(10));
        assert!(!range.contains(4));
        assert!(!range.contains(11));

        let open_max = DurationRange { min: Some(5), max: None };
        assert!(open_max.contains(500));
        assert!(DurationRange::default().contains(0));
    }

    #[test]
    fn test_filter_requires_all_tags() {
        let exercise = sample(10, &["voice", "group"]);
        let filter = ExerciseFilter {
            tags: vec!["voice".to_string(), "group".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&exercise));

        let filter = ExerciseFilter {
            tags: vec!["voice".to_string(), "solo".to_string()],
            ..Default::default()
        };
        assert!(!filter.matches(&exercise));
    }

    #[test]
    fn test_labels_serialize_in_french() {
        let json = serde_json::to_string(&Category::VoiceAndDiction).unwrap();
        assert_eq!(json, "\"Voix et diction\"");
        let difficulty: Difficulty = serde_json::from_str("\"Avancé\"").unwrap();
        assert_eq!(difficulty, Difficulty::Advanced);
    }

    #[test]
    fn test_patch_clears_optional_fields() {
        let mut exercise = sample(10, &[]);
        exercise.notes = Some("old".to_string());
        ExercisePatch {
            notes: Some(None),
            duration: Some(20),
            ..Default::default()
        }
        .apply(&mut exercise);
        assert_eq!(exercise.notes, None);
        assert_eq!(exercise.duration, 20);
    }
}
