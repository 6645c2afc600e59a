//! The module contains the errors the migration engine can throw.
//!
//! Per-row faults (missing required key, duplicate natural key, unmapped
//! enum) are handled inside the migrators: the row is skipped and logged.
//! Only run-level faults surface here.
use sea_orm::DbErr;
use thiserror::Error;

/// Migration engine errors. All of them abort the run.
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("missing {0} connection url")]
    MissingConnection(&'static str),
    #[error("schema bootstrap failed: {0}")]
    Bootstrap(String),
    #[error("cannot read DDL script {path}: {reason}")]
    DdlScript { path: String, reason: String },
}
