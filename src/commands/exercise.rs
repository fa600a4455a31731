use super::{confirm, Session};
use crate::{
    db::exercises::Exercises,
    libs::{
        exercise::{Category, Difficulty, Exercise, ExercisePatch, NewExercise},
        messages::Message,
        stores::{ExerciseStore, FilterStore, SearchStore},
        view::View,
    },
    msg_error, msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExerciseArgs {
    #[command(subcommand)]
    command: ExerciseCommand,
}

#[derive(Debug, Subcommand)]
enum ExerciseCommand {
    /// Create a new exercise
    Add {
        /// Exercise title
        title: String,
        /// Duration in minutes
        #[arg(short, long, default_value_t = 10)]
        duration: u32,
        #[arg(long, value_enum, default_value_t)]
        difficulty: Difficulty,
        #[arg(short, long, value_enum, default_value_t)]
        category: Category,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        instructions: String,
        /// Comma separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Mark as favorite
        #[arg(short, long)]
        favorite: bool,
    },
    /// List exercises, optionally searched and filtered
    List {
        /// Text searched in title, description and tags
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
        #[arg(short, long, value_enum)]
        category: Option<Category>,
        /// Exercises must carry all of these tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Minimum duration in minutes
        #[arg(long)]
        min: Option<u32>,
        /// Maximum duration in minutes
        #[arg(long)]
        max: Option<u32>,
        /// Only favorites
        #[arg(short, long)]
        favorites: bool,
    },
    /// Show an exercise
    Show { id: String },
    /// Edit an exercise
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        duration: Option<u32>,
        #[arg(long, value_enum)]
        difficulty: Option<Difficulty>,
        #[arg(short, long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        /// Replaces the tag list
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        #[arg(long)]
        notes: Option<String>,
        /// Remove the notes
        #[arg(long, conflicts_with = "notes")]
        clear_notes: bool,
    },
    /// Delete an exercise
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Toggle the favorite flag
    Favorite { id: String },
    /// Record that an exercise was used
    Use { id: String },
    /// List every tag in use
    Tags,
    /// Write all exercises to a JSON file
    Export { file: PathBuf },
    /// Replace all exercises with the content of a JSON file
    Import {
        file: PathBuf,
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn cmd(args: ExerciseArgs) -> Result<()> {
    let session = Session::open()?;
    let result = run(args.command, &session);
    session.finish();
    result
}

fn run(command: ExerciseCommand, session: &Session) -> Result<()> {
    let mut store = ExerciseStore::new(&session.db.conn, session.auto_backup.clone());
    store.load()?;

    match command {
        ExerciseCommand::Add {
            title,
            duration,
            difficulty,
            category,
            description,
            instructions,
            tags,
            notes,
            favorite,
        } => {
            let new = NewExercise {
                title,
                description,
                instructions,
                duration,
                difficulty,
                category,
                tags,
                notes,
                is_favorite: Some(favorite),
                ..Default::default()
            };
            let exercise = store.create(new)?;
            msg_success!(Message::ExerciseCreated(exercise.title.clone(), id_of(&exercise)));
        }
        ExerciseCommand::List {
            search,
            difficulty,
            category,
            tags,
            min,
            max,
            favorites,
        } => {
            let mut filters = FilterStore::new();
            filters.set_difficulty(difficulty);
            filters.set_category(category);
            filters.set_tags(tags);
            filters.set_duration_range(min, max);
            filters.set_favorites_only(favorites);

            let mut query = SearchStore::new();
            query.set_query(search.as_deref().unwrap_or_default());

            handle_list(&store, &filters, &query, session)?;
        }
        ExerciseCommand::Show { id } => match store.state().exercises.iter().find(|e| e.id.as_deref() == Some(id.as_str())) {
            Some(exercise) => View::exercise(exercise)?,
            None => msg_error!(Message::ExerciseNotFound(id)),
        },
        ExerciseCommand::Edit {
            id,
            title,
            duration,
            difficulty,
            category,
            description,
            instructions,
            tags,
            notes,
            clear_notes,
        } => {
            let patch = ExercisePatch {
                title,
                duration,
                difficulty,
                category,
                description,
                instructions,
                tags,
                notes: if clear_notes { Some(None) } else { notes.map(Some) },
                ..Default::default()
            };
            if patch.is_empty() {
                msg_info!(Message::NoChangesDetected);
            } else {
                let exercise = store.update(&id, patch)?;
                msg_success!(Message::ExerciseUpdated(exercise.title));
            }
        }
        ExerciseCommand::Delete { id, yes } => {
            let Some(title) = find_title(&store, &id) else {
                msg_error!(Message::ExerciseNotFound(id));
                return Ok(());
            };
            if yes || confirm(Message::ConfirmDeleteExercise(title.clone()))? {
                if store.delete(&id)? {
                    msg_success!(Message::ExerciseDeleted(title));
                }
            } else {
                msg_info!(Message::OperationCancelled);
            }
        }
        ExerciseCommand::Favorite { id } => {
            let exercise = store.toggle_favorite(&id)?;
            if exercise.is_favorite {
                msg_success!(Message::FavoriteAdded(exercise.title));
            } else {
                msg_success!(Message::FavoriteRemoved(exercise.title));
            }
        }
        ExerciseCommand::Use { id } => {
            let Some(title) = find_title(&store, &id) else {
                msg_error!(Message::ExerciseNotFound(id));
                return Ok(());
            };
            store.mark_as_used(&id)?;
            msg_success!(Message::ExerciseMarkedUsed(title));
        }
        ExerciseCommand::Tags => {
            let tags = store.all_tags();
            if tags.is_empty() {
                msg_info!(Message::NoTagsFound);
            } else {
                View::tags(&tags)?;
            }
        }
        ExerciseCommand::Export { file } => {
            let exercises = store.export()?;
            fs::write(&file, serde_json::to_string_pretty(&exercises)?)?;
            msg_success!(Message::ExercisesExported(exercises.len(), file.display().to_string()));
        }
        ExerciseCommand::Import { file, yes } => {
            let exercises: Vec<Exercise> = serde_json::from_str(&fs::read_to_string(&file)?)
                .map_err(|e| msg_error_anyhow!(Message::ImportFileInvalid(e.to_string())))?;
            let current = store.state().exercises.len();
            if yes || confirm(Message::ConfirmImportExercises(exercises.len(), current))? {
                let inserted = store.import(exercises)?;
                msg_success!(Message::ExercisesImported(inserted));
            } else {
                msg_info!(Message::OperationCancelled);
            }
        }
    }

    Ok(())
}

fn handle_list(store: &ExerciseStore, filters: &FilterStore, search: &SearchStore, session: &Session) -> Result<()> {
    let mut exercises: Vec<Exercise> = store.state().exercises.clone();

    if search.is_searching() {
        let matching: HashSet<Option<String>> = Exercises::new(&session.db.conn)
            .search(&search.state().query)?
            .into_iter()
            .map(|e| e.id)
            .collect();
        exercises.retain(|e| matching.contains(&e.id));
    }
    if filters.is_active() {
        let filter = filters.active_filters();
        exercises.retain(|e| filter.matches(e));
    }

    if exercises.is_empty() {
        msg_info!(Message::NoExercisesFound);
        return Ok(());
    }

    msg_print!(Message::ExerciseListHeader(exercises.len(), filters.active_filter_count()), true);
    View::exercises(&exercises)
}

fn find_title(store: &ExerciseStore, id: &str) -> Option<String> {
    store
        .state()
        .exercises
        .iter()
        .find(|e| e.id.as_deref() == Some(id))
        .map(|e| e.title.clone())
}

fn id_of(exercise: &Exercise) -> String {
    exercise.id.clone().unwrap_or_default()
}

