use super::{confirm, Session};
use crate::{
    db::exercises::Exercises,
    libs::{
        course::{Course, CoursePatch, NewCourse},
        messages::Message,
        stores::CourseStore,
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct CourseArgs {
    #[command(subcommand)]
    command: CourseCommand,
}

#[derive(Debug, Subcommand)]
enum CourseCommand {
    /// Create a new course
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Comma separated exercise ids, in order
        #[arg(short, long, value_delimiter = ',')]
        exercises: Vec<String>,
        #[arg(short, long)]
        favorite: bool,
    },
    /// List courses
    List {
        /// Only favorites
        #[arg(short, long)]
        favorites: bool,
    },
    /// Show a course and its exercises
    Show { id: String },
    /// Edit a course
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// Replaces the exercise list
        #[arg(short, long, value_delimiter = ',')]
        exercises: Option<Vec<String>>,
    },
    /// Delete a course
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Toggle the favorite flag
    Favorite { id: String },
    /// Append an exercise to a course
    AddExercise { course: String, exercise: String },
    /// Remove an exercise from a course
    RemoveExercise { course: String, exercise: String },
    /// Set the order of a course's exercises
    Reorder {
        course: String,
        /// Comma separated exercise ids in the new order
        #[arg(value_delimiter = ',', required = true)]
        order: Vec<String>,
    },
}

pub async fn cmd(args: CourseArgs) -> Result<()> {
    let session = Session::open()?;
    let result = run(args.command, &session);
    session.finish();
    result
}

fn run(command: CourseCommand, session: &Session) -> Result<()> {
    let mut store = CourseStore::new(&session.db.conn, session.auto_backup.clone());
    store.load()?;

    match command {
        CourseCommand::Add {
            title,
            description,
            tags,
            exercises,
            favorite,
        } => {
            let new = NewCourse {
                title,
                description,
                tags,
                exercise_ids: exercises,
                is_favorite: Some(favorite),
            };
            let course = store.create(new)?;
            msg_success!(Message::CourseCreated(course.title.clone(), course.id.clone().unwrap_or_default()));
        }
        CourseCommand::List { favorites } => {
            let courses: Vec<Course> = if favorites {
                store.favorites().into_iter().cloned().collect()
            } else {
                store.state().courses.clone()
            };
            if courses.is_empty() {
                msg_info!(Message::NoCoursesFound);
            } else {
                msg_print!(Message::CourseListHeader(courses.len()), true);
                View::courses(&courses)?;
            }
        }
        CourseCommand::Show { id } => {
            let Some(course) = find(&store, &id) else {
                msg_error!(Message::CourseNotFound(id));
                return Ok(());
            };
            let exercises = Exercises::new(&session.db.conn);
            let mut plan = Vec::with_capacity(course.exercise_ids.len());
            for exercise_id in &course.exercise_ids {
                plan.push((exercise_id.clone(), exercises.get(exercise_id)?));
            }
            msg_print!(Message::CourseHeader(course.title.clone()), true);
            View::course_plan(&course, &plan)?;
        }
        CourseCommand::Edit {
            id,
            title,
            description,
            tags,
            exercises,
        } => {
            let patch = CoursePatch {
                title,
                description,
                tags,
                exercise_ids: exercises,
                ..Default::default()
            };
            if patch.is_empty() {
                msg_info!(Message::NoChangesDetected);
            } else {
                let course = store.update(&id, patch)?;
                msg_success!(Message::CourseUpdated(course.title));
            }
        }
        CourseCommand::Delete { id, yes } => {
            let Some(course) = find(&store, &id) else {
                msg_error!(Message::CourseNotFound(id));
                return Ok(());
            };
            if yes || confirm(Message::ConfirmDeleteCourse(course.title.clone()))? {
                if store.delete(&id)? {
                    msg_success!(Message::CourseDeleted(course.title));
                }
            } else {
                msg_info!(Message::OperationCancelled);
            }
        }
        CourseCommand::Favorite { id } => {
            let course = store.toggle_favorite(&id)?;
            if course.is_favorite {
                msg_success!(Message::FavoriteAdded(course.title));
            } else {
                msg_success!(Message::FavoriteRemoved(course.title));
            }
        }
        CourseCommand::AddExercise { course, exercise } => {
            if Exercises::new(&session.db.conn).get(&exercise)?.is_none() {
                msg_error!(Message::ExerciseNotFound(exercise));
                return Ok(());
            }
            let updated = store.add_exercise(&course, &exercise)?;
            msg_success!(Message::CourseDurationUpdated(updated.title, updated.total_duration));
        }
        CourseCommand::RemoveExercise { course, exercise } => {
            let updated = store.remove_exercise(&course, &exercise)?;
            msg_success!(Message::CourseDurationUpdated(updated.title, updated.total_duration));
        }
        CourseCommand::Reorder { course, order } => {
            let Some(current) = find(&store, &course) else {
                msg_error!(Message::CourseNotFound(course));
                return Ok(());
            };
            if !is_permutation(&current.exercise_ids, &order) {
                msg_error!(Message::ReorderMismatch);
                return Ok(());
            }
            let updated = store.reorder(&course, &order)?;
            msg_success!(Message::CourseReordered(updated.title));
        }
    }

    Ok(())
}

fn find(store: &CourseStore, id: &str) -> Option<Course> {
    store.state().courses.iter().find(|c| c.id.as_deref() == Some(id)).cloned()
}

fn is_permutation(current: &[String], order: &[String]) -> bool {
    let mut a = current.to_vec();
    let mut b = order.to_vec();
    a.sort();
    b.sort();
    a == b
}
