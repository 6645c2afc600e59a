//! One-shot migration engine for moving a denormalized remittance schema
//! into the canonical one: a unified `transactions` ledger plus per-type
//! detail tables, with reference and user data carried along.
//!
//! The [`Engine`] owns a read-only source connection and a writable target
//! connection; [`Engine::run_full_migration`] drives the phased run and
//! returns a [`RunReport`]. Every write is an idempotent upsert, so a
//! failed run is retried by running again.
pub mod bootstrap;
pub mod entities;
pub mod enums;
mod error;
mod migrators;
mod money;
mod orchestrator;
pub mod reconcile;
pub mod resolver;
pub mod source;

pub use error::MigrateError;
pub use migrators::Tally;
pub use money::{Amount, ParseAmountError};
pub use orchestrator::{EntityTally, Phase, RunReport, ValidationRow};
pub use reconcile::ReconciliationMap;
pub use resolver::{KeyKind, Resolver};

use sea_orm::{Database, DatabaseConnection};

pub type MigrateResult<T> = Result<T, MigrateError>;

const DEFAULT_BATCH_SIZE: usize = 500;

/// Handle on the two stores a migration run works across.
pub struct Engine {
    pub(crate) source: DatabaseConnection,
    pub(crate) target: DatabaseConnection,
    pub(crate) batch_size: usize,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Wraps already-established connections, mainly for tests.
    pub fn with_connections(source: DatabaseConnection, target: DatabaseConnection) -> Self {
        Self {
            source,
            target,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    source_url: Option<String>,
    target_url: Option<String>,
    batch_size: Option<usize>,
}

impl EngineBuilder {
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Connects to both stores and returns the assembled engine.
    pub async fn build(self) -> MigrateResult<Engine> {
        let source_url = self
            .source_url
            .ok_or(MigrateError::MissingConnection("source"))?;
        let target_url = self
            .target_url
            .ok_or(MigrateError::MissingConnection("target"))?;

        let source = Database::connect(&source_url).await?;
        let target = Database::connect(&target_url).await?;
        tracing::debug!("source and target connections established");

        Ok(Engine {
            source,
            target,
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
        })
    }
}
