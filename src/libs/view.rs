use super::course::Course;
use super::exercise::Exercise;
use super::formatter::{format_minutes, format_tags, format_timestamp};
use super::stats::ExerciseStats;
use anyhow::Result;
use chrono::{DateTime, Utc};
use prettytable::{row, Table};

pub struct View {}

fn favorite_mark(is_favorite: bool) -> &'static str {
    if is_favorite {
        "★"
    } else {
        ""
    }
}

fn or_dash(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".to_string())
}

impl View {
    pub fn exercises(exercises: &[Exercise]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "DURATION", "DIFFICULTY", "CATEGORY", "TAGS", "USED", "★"]);
        for exercise in exercises {
            table.add_row(row![
                exercise.id.as_deref().unwrap_or_default(),
                exercise.title,
                format_minutes(exercise.duration),
                exercise.difficulty,
                exercise.category,
                format_tags(&exercise.tags),
                exercise.usage_count,
                favorite_mark(exercise.is_favorite)
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn exercise(exercise: &Exercise) -> Result<()> {
        let mut table = Table::new();
        let join = |items: &Option<Vec<String>>| or_dash(items.as_ref().map(|v| v.join("; ")));

        table.add_row(row!["ID", exercise.id.as_deref().unwrap_or_default()]);
        table.add_row(row!["TITLE", exercise.title]);
        table.add_row(row!["DESCRIPTION", or_dash(Some(exercise.description.clone()))]);
        table.add_row(row!["INSTRUCTIONS", or_dash(Some(exercise.instructions.clone()))]);
        table.add_row(row!["DURATION", format_minutes(exercise.duration)]);
        table.add_row(row!["DIFFICULTY", exercise.difficulty]);
        table.add_row(row!["CATEGORY", exercise.category]);
        table.add_row(row!["TAGS", format_tags(&exercise.tags)]);
        table.add_row(row!["MATERIALS", join(&exercise.materials)]);
        table.add_row(row!["OBJECTIVES", join(&exercise.objectives)]);
        table.add_row(row!["VARIATIONS", join(&exercise.variations)]);
        table.add_row(row!["PARTICIPANTS", or_dash(exercise.participants.clone())]);
        table.add_row(row!["NOTES", or_dash(exercise.notes.clone())]);
        table.add_row(row!["USED", exercise.usage_count]);
        table.add_row(row!["LAST USED", format_timestamp(exercise.last_used)]);
        table.add_row(row!["FAVORITE", favorite_mark(exercise.is_favorite)]);
        table.add_row(row!["UPDATED", format_timestamp(exercise.updated_at)]);
        table.printstd();

        Ok(())
    }

    pub fn courses(courses: &[Course]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "EXERCISES", "DURATION", "TAGS", "★"]);
        for course in courses {
            table.add_row(row![
                course.id.as_deref().unwrap_or_default(),
                course.title,
                course.exercise_ids.len(),
                format_minutes(course.total_duration),
                format_tags(&course.tags),
                favorite_mark(course.is_favorite)
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Course programme in order. References to deleted exercises are shown
    /// as missing.
    pub fn course_plan(course: &Course, exercises: &[(String, Option<Exercise>)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "ID", "EXERCISE", "DURATION", "CATEGORY"]);
        for (position, (id, exercise)) in exercises.iter().enumerate() {
            match exercise {
                Some(exercise) => table.add_row(row![
                    position + 1,
                    id,
                    exercise.title,
                    format_minutes(exercise.duration),
                    exercise.category
                ]),
                None => table.add_row(row![position + 1, id, "(missing)", "-", "-"]),
            };
        }
        table.add_row(row!["", "", "TOTAL", format_minutes(course.total_duration), ""]);
        table.printstd();

        Ok(())
    }

    pub fn tags(tags: &[String]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TAG"]);
        for tag in tags {
            table.add_row(row![tag]);
        }
        table.printstd();

        Ok(())
    }

    pub fn stats(stats: &ExerciseStats) -> Result<()> {
        let mut summary = Table::new();
        summary.add_row(row!["EXERCISES", stats.total_exercises]);
        summary.add_row(row!["FAVORITES", stats.favorite_count]);
        summary.add_row(row!["AVERAGE DURATION", format!("{:.1} min", stats.average_duration)]);
        summary.printstd();

        let mut breakdown = Table::new();
        breakdown.add_row(row!["DIFFICULTY", "COUNT"]);
        for (difficulty, count) in &stats.exercises_by_difficulty {
            breakdown.add_row(row![difficulty, count]);
        }
        breakdown.add_row(row!["CATEGORY", "COUNT"]);
        for (category, count) in &stats.exercises_by_category {
            breakdown.add_row(row![category, count]);
        }
        breakdown.printstd();

        if !stats.most_used_tags.is_empty() {
            let mut tags = Table::new();
            tags.add_row(row!["TAG", "COUNT"]);
            for tag in &stats.most_used_tags {
                tags.add_row(row![tag.tag, tag.count]);
            }
            tags.printstd();
        }

        if !stats.recently_used.is_empty() {
            let mut recent = Table::new();
            recent.add_row(row!["RECENTLY USED", "LAST USED", "USED"]);
            for exercise in &stats.recently_used {
                recent.add_row(row![exercise.title, format_timestamp(exercise.last_used), exercise.usage_count]);
            }
            recent.printstd();
        }

        Ok(())
    }

    pub fn backup_status(last_backup: Option<DateTime<Utc>>, last_restore: Option<DateTime<Utc>>, auto_backup: &str) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["LAST BACKUP", format_timestamp(last_backup)]);
        table.add_row(row!["LAST RESTORE", format_timestamp(last_restore)]);
        table.add_row(row!["AUTO-BACKUP", auto_backup]);
        table.printstd();

        Ok(())
    }
}
