//! Versioned JSON backup, validation and destructive restore.
//!
//! ## Document format
//!
//! ```json
//! {
//!   "version": "2.0",
//!   "exportDate": "2025-01-15T14:30:22.000Z",
//!   "appVersion": "2.0.0",
//!   "data": { "exercises": [...], "courses": [...] },
//!   "metadata": { "exerciseCount": 12, "courseCount": 3, "totalDuration": 180 }
//! }
//! ```
//!
//! `metadata.totalDuration` sums exercise durations, not course totals.
//!
//! ## Restore
//!
//! Restoring clears both collections and re-inserts every exercise one by
//! one, building an old-id to new-id table as it goes. Course exercise lists
//! are rewritten through that table (references without a mapping are
//! dropped) and course durations are recomputed from the freshly inserted
//! exercises. The whole replacement runs in one transaction. Afterwards every
//! in-memory cache is stale and must be reloaded from the database.
//!
//! [`check_backup`] is a separate, stricter pre-flight check: it rejects any
//! dangling course reference that restore would silently drop.

use crate::db::settings::Settings;
use crate::db::store::{Collection, CollectionName, ID_FIELD};
use crate::libs::course::Course;
use crate::libs::error::{CatalogError, CatalogResult};
use crate::libs::exercise::Exercise;
use crate::libs::ids::{parse_key, value_to_id};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// The only document version this build reads.
pub const BACKUP_VERSION: &str = "2.0";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_FILE_PREFIX: &str = "tabli_backup";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: String,
    #[serde(default)]
    pub export_date: String,
    #[serde(default)]
    pub app_version: String,
    pub data: BackupData,
    #[serde(default)]
    pub metadata: BackupMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupData {
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupMetadata {
    pub exercise_count: usize,
    pub course_count: usize,
    pub total_duration: u64,
}

impl BackupDocument {
    pub fn new(exercises: Vec<Exercise>, courses: Vec<Course>, export_date: DateTime<Utc>) -> Self {
        let metadata = BackupMetadata {
            exercise_count: exercises.len(),
            course_count: courses.len(),
            total_duration: exercises.iter().map(|e| u64::from(e.duration)).sum(),
        };
        Self {
            version: BACKUP_VERSION.to_string(),
            export_date: export_date.to_rfc3339_opts(SecondsFormat::Millis, true),
            app_version: APP_VERSION.to_string(),
            data: BackupData { exercises, courses },
            metadata,
        }
    }

    pub fn to_json(&self) -> CatalogResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Yes/no gate in front of the destructive restore.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> CatalogResult<bool>;
}

/// Accepts every prompt (`--yes`, scripted restores).
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> CatalogResult<bool> {
        Ok(true)
    }
}

/// Declines every prompt.
pub struct NeverConfirm;

impl Confirmation for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> CatalogResult<bool> {
        Ok(false)
    }
}

/// Outcome of a completed restore.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreReport {
    pub exercises: usize,
    pub courses: usize,
    /// Course references dropped because their exercise was not in the backup.
    pub dropped_references: usize,
    pub restored_at: DateTime<Utc>,
}

/// Snapshots both collections and records the export date as the last backup.
pub fn export_document(conn: &Connection) -> CatalogResult<BackupDocument> {
    let exercises: Collection<Exercise> = Collection::new(conn, CollectionName::Exercises);
    let courses: Collection<Course> = Collection::new(conn, CollectionName::Courses);

    let document = BackupDocument::new(exercises.all()?, courses.all()?, Utc::now());
    Settings::new(conn).record_last_backup(&document.export_date);

    tracing::debug!(
        exercises = document.metadata.exercise_count,
        courses = document.metadata.course_count,
        "backup snapshot taken"
    );
    Ok(document)
}

/// `prefix_YYYY-MM-DD_HH-MM.json` in local time.
pub fn backup_file_name(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}_{}.json", prefix, at.format("%Y-%m-%d_%H-%M"))
}

/// Writes `document` as pretty JSON into `dir` and returns the file path.
pub fn write_document(document: &BackupDocument, dir: &Path, prefix: &str) -> CatalogResult<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(backup_file_name(prefix, Local::now()));
    fs::write(&path, document.to_json()?)?;
    Ok(path)
}

/// Exports the catalog and writes it to a timestamped file in `dir`.
pub fn write_backup(conn: &Connection, dir: &Path, prefix: &str) -> CatalogResult<PathBuf> {
    let document = export_document(conn)?;
    let path = write_document(&document, dir, prefix)?;
    tracing::info!(path = %path.display(), "backup written");
    Ok(path)
}

/// Parses a backup document, rejecting malformed JSON, documents without
/// `version` or `data`, and unsupported versions.
pub fn parse_document(text: &str) -> CatalogResult<BackupDocument> {
    let value: Value = serde_json::from_str(text).map_err(|e| CatalogError::InvalidFormat(e.to_string()))?;
    document_from_value(value)
}

pub fn read_backup_file(path: &Path) -> CatalogResult<BackupDocument> {
    let text = fs::read_to_string(path)?;
    parse_document(&text)
}

/// A backup prepared for restore together with the outcome of validating
/// the raw file.
#[derive(Debug)]
pub struct LoadedBackup {
    pub document: BackupDocument,
    /// Why [`check_backup`] rejected the file, if it did. Restore tolerates
    /// these problems, so this is advisory.
    pub warning: Option<CatalogError>,
}

/// Validates the raw JSON before serde defaults fill in absent arrays, then
/// builds the document. Only format errors are fatal.
pub fn load_for_restore(value: Value) -> CatalogResult<LoadedBackup> {
    let warning = check_backup(&value).err();
    let document = document_from_value(value)?;
    Ok(LoadedBackup { document, warning })
}

pub fn read_for_restore(path: &Path) -> CatalogResult<LoadedBackup> {
    let text = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text).map_err(|e| CatalogError::InvalidFormat(e.to_string()))?;
    load_for_restore(value)
}

pub fn document_from_value(value: Value) -> CatalogResult<BackupDocument> {
    let has_field = |field: &str| value.get(field).is_some_and(|v| !v.is_null());
    if !has_field("version") || !has_field("data") {
        return Err(CatalogError::InvalidFormat("missing version or data".to_string()));
    }

    let version = value.get("version").map(|v| value_to_id(Some(v))).unwrap_or_default();
    ensure_supported_version(&version)?;

    serde_json::from_value(value).map_err(|e| CatalogError::InvalidFormat(e.to_string()))
}

fn ensure_supported_version(version: &str) -> CatalogResult<()> {
    if version != BACKUP_VERSION {
        return Err(CatalogError::InvalidFormat(format!(
            "unsupported version {} (expected {})",
            version, BACKUP_VERSION
        )));
    }
    Ok(())
}

/// Text shown to the user before a restore overwrites their data.
pub fn restore_prompt(document: &BackupDocument) -> String {
    let exported = DateTime::parse_from_rfc3339(&document.export_date)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| document.export_date.clone());

    format!(
        "This will replace all current data.\n\nData to import:\n- {} exercises\n- {} courses\n- Backup from {}\n\nContinue?",
        document.data.exercises.len(),
        document.data.courses.len(),
        exported
    )
}

/// Replaces the whole catalog with the content of `document`.
///
/// Nothing is touched when the version is unsupported or the confirmation is
/// declined.
pub fn restore(conn: &Connection, document: BackupDocument, confirmation: &dyn Confirmation) -> CatalogResult<RestoreReport> {
    ensure_supported_version(&document.version)?;

    if !confirmation.confirm(&restore_prompt(&document))? {
        tracing::info!("restore declined");
        return Err(CatalogError::UserCancelled);
    }

    let tx = conn.unchecked_transaction()?;
    let exercises: Collection<Exercise> = Collection::new(&tx, CollectionName::Exercises);
    let courses: Collection<Course> = Collection::new(&tx, CollectionName::Courses);

    exercises.clear()?;
    courses.clear()?;

    // old id -> new id, scoped to this restore
    let mut id_map: HashMap<String, String> = HashMap::new();
    for exercise in &document.data.exercises {
        let old_id = exercise.id.clone().unwrap_or_default();
        let new_key = exercises.add(exercise)?;
        id_map.insert(old_id, new_key.to_string());
    }

    let mut dropped_references = 0;
    for course in document.data.courses {
        let mut mapped_ids = Vec::with_capacity(course.exercise_ids.len());
        for old_id in &course.exercise_ids {
            match id_map.get(old_id) {
                Some(new_id) => mapped_ids.push(new_id.clone()),
                None => {
                    dropped_references += 1;
                    tracing::debug!(course = %course.title, exercise = %old_id, "dropping reference absent from backup");
                }
            }
        }

        let mut total_duration = 0;
        for key in mapped_ids.iter().filter_map(|id| parse_key(id)) {
            if let Some(exercise) = exercises.get(key)? {
                total_duration += exercise.duration;
            }
        }

        courses.add(&Course {
            id: None,
            exercise_ids: mapped_ids,
            total_duration,
            ..course
        })?;
    }

    let report = RestoreReport {
        exercises: document.data.exercises.len(),
        courses: courses.count()?,
        dropped_references,
        restored_at: Utc::now(),
    };
    tx.commit()?;

    Settings::new(conn).record_last_restore(&report.restored_at.to_rfc3339_opts(SecondsFormat::Millis, true));
    tracing::info!(
        exercises = report.exercises,
        courses = report.courses,
        dropped = report.dropped_references,
        "restore completed"
    );
    Ok(report)
}

/// Parses `text` and restores it.
pub fn restore_from_str(conn: &Connection, text: &str, confirmation: &dyn Confirmation) -> CatalogResult<RestoreReport> {
    restore(conn, parse_document(text)?, confirmation)
}

/// Non-destructive pre-restore check of a raw backup document.
///
/// Requires the exact supported version, `data.exercises` and `data.courses`
/// arrays, and that every course reference names an exercise in the backup.
pub fn check_backup(value: &Value) -> CatalogResult<()> {
    let version = value.get("version").and_then(Value::as_str).unwrap_or_default();
    if version != BACKUP_VERSION {
        return Err(CatalogError::ValidationFailure(format!("incompatible backup version '{}'", version)));
    }

    let data = value.get("data");
    let exercises = data.and_then(|d| d.get("exercises")).and_then(Value::as_array);
    let courses = data.and_then(|d| d.get("courses")).and_then(Value::as_array);
    let (Some(exercises), Some(courses)) = (exercises, courses) else {
        return Err(CatalogError::ValidationFailure("invalid data structure".to_string()));
    };

    let known: HashSet<String> = exercises.iter().map(|e| value_to_id(e.get(ID_FIELD))).collect();
    for course in courses {
        let references = match course.get("exerciseIds") {
            None | Some(Value::Null) => continue,
            Some(Value::Array(ids)) => ids,
            Some(_) => {
                return Err(CatalogError::ValidationFailure("course exerciseIds is not a list".to_string()));
            }
        };
        for reference in references {
            let id = value_to_id(Some(reference));
            if !known.contains(&id) {
                let title = course.get("title").and_then(Value::as_str).unwrap_or_default();
                return Err(CatalogError::ValidationFailure(format!(
                    "course \"{}\" references a missing exercise: {}",
                    title, id
                )));
            }
        }
    }
    Ok(())
}

/// [`check_backup`] as a boolean; the rejection reason is logged.
pub fn validate_backup(value: &Value) -> bool {
    match check_backup(value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(reason = %e, "backup rejected by validation");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_backup_file_name_pattern() {
        let at = Local.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(backup_file_name("tabli_backup", at), "tabli_backup_2025-03-07_09-05.json");
    }

    #[test]
    fn test_parse_rejects_missing_data() {
        let err = parse_document(r#"{"version": "2.0"}"#).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidFormat(_)));
    }

    #[test]
    fn test_parse_rejects_old_version() {
        let err = parse_document(r#"{"version": "1.0", "data": {"exercises": [], "courses": []}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidFormat(_)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_document("not json").unwrap_err(), CatalogError::InvalidFormat(_)));
    }

    #[test]
    fn test_check_accepts_numeric_ids() {
        let value = json!({
            "version": "2.0",
            "data": {
                "exercises": [{"_id": 1, "title": "Mirror"}],
                "courses": [{"title": "Monday", "exerciseIds": ["1"]}]
            }
        });
        assert!(check_backup(&value).is_ok());
    }

    #[test]
    fn test_check_requires_arrays() {
        let value = json!({"version": "2.0", "data": {"exercises": []}});
        assert!(matches!(check_backup(&value).unwrap_err(), CatalogError::ValidationFailure(_)));
    }

    #[test]
    fn test_metadata_sums_exercise_durations() {
        let document = BackupDocument::new(Vec::new(), Vec::new(), Utc::now());
        assert_eq!(document.version, BACKUP_VERSION);
        assert_eq!(document.metadata, BackupMetadata::default());
        assert!(document.export_date.ends_with('Z'));
    }
}
