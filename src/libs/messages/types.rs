/// Every user-facing message of the application.
///
/// Text lives in the `Display` impl in [`super::display`]; variants carry the
/// values interpolated into it.
#[derive(Debug, Clone)]
pub enum Message {
    // === EXERCISE MESSAGES ===
    ExerciseCreated(String, String), // title, id
    ExerciseUpdated(String),
    ExerciseDeleted(String),
    ExerciseNotFound(String),
    ExerciseMarkedUsed(String),
    ExerciseListHeader(usize, usize), // shown, active filters
    NoExercisesFound,
    ConfirmDeleteExercise(String),
    ExercisesExported(usize, String), // count, file
    ExercisesImported(usize),
    ConfirmImportExercises(usize, usize), // incoming, current
    ImportFileInvalid(String),
    NoTagsFound,

    // === COURSE MESSAGES ===
    CourseCreated(String, String), // title, id
    CourseUpdated(String),
    CourseDeleted(String),
    CourseNotFound(String),
    CourseHeader(String),
    CourseListHeader(usize),
    CourseDurationUpdated(String, u32), // title, minutes
    CourseReordered(String),
    ReorderMismatch,
    NoCoursesFound,
    ConfirmDeleteCourse(String),

    // === SHARED ===
    FavoriteAdded(String),
    FavoriteRemoved(String),
    NoChangesDetected,
    OperationCancelled,
    StatsHeader,

    // === BACKUP MESSAGES ===
    BackupWritten(String),
    NotADirectory(String),
    BackupValid(String),
    BackupInvalid(String),
    BackupValidationWarning(String),
    RestoreCompleted(usize, usize), // exercises, courses
    RestoreCancelled,
    RestoreDroppedReferences(usize),
    AutoBackupFlushed,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleBackup,
    ConfigModuleAutoBackup,
    PromptSelectModules,
    PromptBackupPrefix,
    PromptBackupDirectory,
    PromptAutoBackupEnabled,
    PromptAutoBackupDelay,
    PromptAutoBackupDirectory,

    // === DATABASE MESSAGES ===
    DatabaseUpToDate,
    RunningMigration(u32, String), // version, name
}
