pub use sea_orm_migration::prelude::*;

mod m20260210_000001_reference_tables;
mod m20260210_000002_user_tables;
mod m20260210_000003_transactions;
mod m20260210_000004_card_and_reinit;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260210_000001_reference_tables::Migration),
            Box::new(m20260210_000002_user_tables::Migration),
            Box::new(m20260210_000003_transactions::Migration),
            Box::new(m20260210_000004_card_and_reinit::Migration),
        ]
    }
}
