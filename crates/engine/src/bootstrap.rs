//! Target-schema bootstrapping.
//!
//! The canonical schema is provisioned before any migrator runs. The normal
//! path runs the `schema` crate's migrator, whose `CREATE TABLE IF NOT
//! EXISTS` semantics make re-provisioning a no-op. Operators can also supply
//! a raw DDL script; it is executed verbatim as one batch, and an "already
//! exists" failure counts as success so a partially-provisioned target can
//! be completed by re-running.
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use schema::MigratorTrait;

use crate::{MigrateError, MigrateResult};

/// Provisions the canonical schema (idempotent).
pub async fn ensure_target_schema(db: &DatabaseConnection) -> MigrateResult<()> {
    schema::Migrator::up(db, None)
        .await
        .map_err(|err| MigrateError::Bootstrap(err.to_string()))?;
    Ok(())
}

/// Executes an operator-supplied DDL script as a single batch.
pub async fn apply_ddl_script(db: &DatabaseConnection, sql: &str) -> MigrateResult<()> {
    match db.execute_unprepared(sql).await {
        Ok(_) => Ok(()),
        Err(err) if is_already_exists(&err) => {
            tracing::info!("DDL script objects already exist, continuing");
            Ok(())
        }
        Err(err) => Err(MigrateError::Bootstrap(err.to_string())),
    }
}

fn is_already_exists(err: &DbErr) -> bool {
    let message = err.to_string();
    message.contains("already exists") || message.contains("duplicate column name")
}
