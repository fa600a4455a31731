//! Backup commands: export, validate, restore and status.

use super::Session;
use crate::{
    db::settings::Settings,
    libs::{
        backup::{self, AlwaysConfirm, Confirmation},
        error::{CatalogError, CatalogResult},
        messages::Message,
        stores::{CourseStore, ExerciseStore},
        view::View,
    },
    msg_bail_anyhow, msg_error, msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    command: BackupCommand,
}

#[derive(Debug, Subcommand)]
enum BackupCommand {
    /// Write a full backup file
    Export {
        /// Target directory, defaults to the configured backup directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace all data with the content of a backup file
    Restore {
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Check a backup file without importing it
    Validate { file: PathBuf },
    /// Show the last backup and restore dates
    Status,
}

/// Asks on the terminal before a restore.
struct PromptConfirmation;

impl Confirmation for PromptConfirmation {
    fn confirm(&self, prompt: &str) -> CatalogResult<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| CatalogError::Io(std::io::Error::other(e.to_string())))
    }
}

pub async fn cmd(args: BackupArgs) -> Result<()> {
    let session = Session::open()?;
    let result = run(args.command, &session);
    session.finish();
    result
}

fn run(command: BackupCommand, session: &Session) -> Result<()> {
    match command {
        BackupCommand::Export { output } => {
            let dir = output.unwrap_or_else(|| session.config.backup.target_dir());
            if dir.is_file() {
                msg_bail_anyhow!(Message::NotADirectory(dir.display().to_string()));
            }
            let path = backup::write_backup(&session.db.conn, &dir, &session.config.backup.file_prefix)?;
            msg_success!(Message::BackupWritten(path.display().to_string()));
        }
        BackupCommand::Restore { file, yes } => handle_restore(session, file, yes)?,
        BackupCommand::Validate { file } => {
            let value: Value = match serde_json::from_str(&fs::read_to_string(&file)?) {
                Ok(value) => value,
                Err(e) => {
                    msg_error!(Message::BackupInvalid(e.to_string()));
                    return Ok(());
                }
            };
            match backup::check_backup(&value) {
                Ok(()) => msg_success!(Message::BackupValid(file.display().to_string())),
                Err(e) => msg_error!(Message::BackupInvalid(e.to_string())),
            }
        }
        BackupCommand::Status => {
            let settings = Settings::new(&session.db.conn);
            let auto_backup = match &session.auto_backup {
                Some(auto_backup) => format!("on ({} ms)", auto_backup.delay().as_millis()),
                None => "off".to_string(),
            };
            View::backup_status(settings.last_backup(), settings.last_restore(), &auto_backup)?;
        }
    }

    Ok(())
}

fn handle_restore(session: &Session, file: PathBuf, yes: bool) -> Result<()> {
    let loaded = match backup::read_for_restore(&file) {
        Ok(loaded) => loaded,
        Err(CatalogError::InvalidFormat(reason)) => {
            msg_error!(Message::BackupInvalid(reason));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(warning) = &loaded.warning {
        msg_warning!(Message::BackupValidationWarning(warning.to_string()));
    }
    let document = loaded.document;

    let confirmation: &dyn Confirmation = if yes { &AlwaysConfirm } else { &PromptConfirmation };
    let report = match backup::restore(&session.db.conn, document, confirmation) {
        Ok(report) => report,
        Err(CatalogError::UserCancelled) => {
            msg_info!(Message::RestoreCancelled);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // every id changed, so caches are rebuilt from the database
    let mut exercises = ExerciseStore::new(&session.db.conn, session.auto_backup.clone());
    let mut courses = CourseStore::new(&session.db.conn, session.auto_backup.clone());
    exercises.load()?;
    courses.load()?;

    msg_success!(Message::RestoreCompleted(
        exercises.state().exercises.len(),
        courses.state().courses.len()
    ));
    if report.dropped_references > 0 {
        msg_warning!(Message::RestoreDroppedReferences(report.dropped_references));
    }
    Ok(())
}
