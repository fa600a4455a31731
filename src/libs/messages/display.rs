//! Text of every [`Message`].

use super::types::Message;
use crate::libs::formatter::format_minutes;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // === EXERCISE MESSAGES ===
            Message::ExerciseCreated(title, id) => format!("Exercise '{}' created with id {}", title, id),
            Message::ExerciseUpdated(title) => format!("Exercise '{}' updated", title),
            Message::ExerciseDeleted(title) => format!("Exercise '{}' deleted", title),
            Message::ExerciseNotFound(id) => format!("Exercise not found: {}", id),
            Message::ExerciseMarkedUsed(title) => format!("Exercise '{}' marked as used", title),
            Message::ExerciseListHeader(count, 0) => format!("Exercises ({})", count),
            Message::ExerciseListHeader(count, filters) => format!("Exercises ({}, {} filter(s) active)", count, filters),
            Message::NoExercisesFound => "No exercises found".to_string(),
            Message::ConfirmDeleteExercise(title) => {
                format!("Delete exercise '{}'? Courses keep a reference to it.", title)
            }
            Message::ExercisesExported(count, file) => format!("{} exercises exported to {}", count, file),
            Message::ExercisesImported(count) => format!("{} exercises imported", count),
            Message::ConfirmImportExercises(incoming, current) => format!(
                "Replace the {} current exercises with {} from the file? Existing ids will change.",
                current, incoming
            ),
            Message::ImportFileInvalid(reason) => format!("Not a list of exercises: {}", reason),
            Message::NoTagsFound => "No tags found".to_string(),

            // === COURSE MESSAGES ===
            Message::CourseCreated(title, id) => format!("Course '{}' created with id {}", title, id),
            Message::CourseUpdated(title) => format!("Course '{}' updated", title),
            Message::CourseDeleted(title) => format!("Course '{}' deleted", title),
            Message::CourseNotFound(id) => format!("Course not found: {}", id),
            Message::CourseHeader(title) => format!("Course: {}", title),
            Message::CourseListHeader(count) => format!("Courses ({})", count),
            Message::CourseDurationUpdated(title, minutes) => {
                format!("Course '{}' updated, total duration {}", title, format_minutes(*minutes))
            }
            Message::CourseReordered(title) => format!("Course '{}' reordered", title),
            Message::ReorderMismatch => "The new order must list exactly the course's current exercises".to_string(),
            Message::NoCoursesFound => "No courses found".to_string(),
            Message::ConfirmDeleteCourse(title) => format!("Delete course '{}'?", title),

            // === SHARED ===
            Message::FavoriteAdded(title) => format!("'{}' added to favorites", title),
            Message::FavoriteRemoved(title) => format!("'{}' removed from favorites", title),
            Message::NoChangesDetected => "No changes detected".to_string(),
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::StatsHeader => "Catalog statistics".to_string(),

            // === BACKUP MESSAGES ===
            Message::BackupWritten(path) => format!("Backup written to {}", path),
            Message::NotADirectory(path) => format!("{} is not a directory", path),
            Message::BackupValid(path) => format!("{} is a valid backup", path),
            Message::BackupInvalid(reason) => format!("Invalid backup: {}", reason),
            Message::BackupValidationWarning(reason) => {
                format!("This backup does not pass validation ({}); restoring it anyway may lose data", reason)
            }
            Message::RestoreCompleted(exercises, courses) => {
                format!("Restore completed: {} exercises and {} courses", exercises, courses)
            }
            Message::RestoreCancelled => "Restore cancelled, nothing was changed".to_string(),
            Message::RestoreDroppedReferences(count) => format!("{} course reference(s) dropped", count),
            Message::AutoBackupFlushed => "Pending auto-backup written".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration deleted".to_string(),
            Message::ConfigNotFound => "No configuration file to delete".to_string(),
            Message::ConfigModuleBackup => "Backup settings".to_string(),
            Message::ConfigModuleAutoBackup => "Auto-backup settings".to_string(),
            Message::PromptSelectModules => "Select settings to configure".to_string(),
            Message::PromptBackupPrefix => "Backup file prefix".to_string(),
            Message::PromptBackupDirectory => "Backup directory (empty for current directory)".to_string(),
            Message::PromptAutoBackupEnabled => "Enable auto-backup".to_string(),
            Message::PromptAutoBackupDelay => "Auto-backup delay (ms)".to_string(),
            Message::PromptAutoBackupDirectory => "Auto-backup directory (empty to only record the date)".to_string(),

            // === DATABASE MESSAGES ===
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
        };
        write!(f, "{}", s)
    }
}
