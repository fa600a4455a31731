//! Aggregate statistics over the exercise collection.

use super::exercise::{Category, Difficulty, Exercise};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const TOP_TAGS_LIMIT: usize = 10;
pub const RECENTLY_USED_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStats {
    pub total_exercises: usize,
    /// One bucket per difficulty, zero when empty.
    pub exercises_by_difficulty: BTreeMap<Difficulty, usize>,
    /// One bucket per category, zero when empty.
    pub exercises_by_category: BTreeMap<Category, usize>,
    pub most_used_tags: Vec<TagCount>,
    /// Minutes; 0 when there are no exercises.
    pub average_duration: f64,
    pub favorite_count: usize,
    pub recently_used: Vec<Exercise>,
}

impl ExerciseStats {
    pub fn compute(exercises: &[Exercise]) -> Self {
        let total = exercises.len();

        let mut by_difficulty: BTreeMap<Difficulty, usize> = Difficulty::ALL.iter().map(|d| (*d, 0)).collect();
        let mut by_category: BTreeMap<Category, usize> = Category::ALL.iter().map(|c| (*c, 0)).collect();
        let mut duration_sum: u64 = 0;
        for exercise in exercises {
            *by_difficulty.entry(exercise.difficulty).or_insert(0) += 1;
            *by_category.entry(exercise.category).or_insert(0) += 1;
            duration_sum += u64::from(exercise.duration);
        }

        let average_duration = if total > 0 { duration_sum as f64 / total as f64 } else { 0.0 };
        let favorite_count = exercises.iter().filter(|e| e.is_favorite).count();

        Self {
            total_exercises: total,
            exercises_by_difficulty: by_difficulty,
            exercises_by_category: by_category,
            most_used_tags: most_used_tags(exercises, TOP_TAGS_LIMIT),
            average_duration,
            favorite_count,
            recently_used: recently_used(exercises, RECENTLY_USED_LIMIT),
        }
    }
}

/// Tags by descending frequency; equal counts keep first-seen order.
pub fn most_used_tags(exercises: &[Exercise], limit: usize) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for tag in exercises.iter().flat_map(|e| e.tags.iter()) {
        match positions.get(tag.as_str()) {
            Some(&pos) => counts[pos].count += 1,
            None => {
                positions.insert(tag.as_str(), counts.len());
                counts.push(TagCount { tag: tag.clone(), count: 1 });
            }
        }
    }

    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Used exercises, most recent first. Never-used exercises are left out.
pub fn recently_used(exercises: &[Exercise], limit: usize) -> Vec<Exercise> {
    let mut used: Vec<Exercise> = exercises.iter().filter(|e| e.last_used.is_some()).cloned().collect();
    used.sort_by(|a, b| b.last_used.cmp(&a.last_used));
    used.truncate(limit);
    used
}
