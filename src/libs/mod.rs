//! Core library modules.
//!
//! Domain types ([`exercise`], [`course`], [`stats`]), the backup pipeline
//! ([`backup`], [`auto_backup`]), the reactive [`stores`], and the console
//! infrastructure shared by the commands ([`config`], [`messages`], [`view`]).

pub mod auto_backup;
pub mod backup;
pub mod config;
pub mod course;
pub mod data_storage;
pub mod error;
pub mod exercise;
pub mod formatter;
pub mod ids;
pub mod messages;
pub mod stats;
pub mod stores;
pub mod view;
