//! Command-line interface for tabli.
//!
//! Each subcommand lives in its own module with a clap `Args` struct and a
//! `cmd` entry point. Commands that touch the catalog open a [`Session`],
//! which bundles the database, the configuration and the debounced
//! auto-backup. Any pending auto-backup is flushed before the process exits.

pub mod backup;
pub mod course;
pub mod exercise;
pub mod init;
pub mod stats;

use crate::db::db::Db;
use crate::libs::auto_backup::AutoBackup;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::msg_debug;
use anyhow::Result;
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::sync::Arc;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage exercises", arg_required_else_help = true)]
    Exercise(exercise::ExerciseArgs),
    #[command(about = "Manage courses", arg_required_else_help = true)]
    Course(course::CourseArgs),
    #[command(about = "Show catalog statistics")]
    Stats,
    #[command(about = "Export, validate and restore backups", arg_required_else_help = true)]
    Backup(backup::BackupArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Exercise(args) => exercise::cmd(args).await,
            Commands::Course(args) => course::cmd(args).await,
            Commands::Stats => stats::cmd().await,
            Commands::Backup(args) => backup::cmd(args).await,
        }
    }
}

/// Database, configuration and auto-backup for one command invocation.
pub struct Session {
    pub db: Db,
    pub config: Config,
    pub auto_backup: Option<Arc<AutoBackup>>,
}

impl Session {
    pub fn open() -> Result<Self> {
        let config = Config::read()?;
        let db = Db::new()?;
        let auto_backup = db
            .path()
            .and_then(|path| AutoBackup::from_config(&config.auto_backup, path.to_path_buf(), &config.backup.file_prefix));

        Ok(Session { db, config, auto_backup })
    }

    /// Runs any pending auto-backup now instead of losing it on exit.
    pub fn finish(self) {
        if let Some(auto_backup) = &self.auto_backup {
            if auto_backup.flush() {
                msg_debug!(Message::AutoBackupFlushed);
            }
        }
    }
}

/// Yes/no prompt for destructive operations, defaulting to no.
pub(crate) fn confirm(prompt: Message) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(false)
        .interact()?)
}
