//! Reference-data migrators: countries, banks, wallet operators, staff.
//!
//! These run first; everything later in the run validates its foreign keys
//! against what these commit.
use std::collections::HashSet;

use sea_orm::{ActiveValue, EntityTrait, sea_query::OnConflict};

use crate::{
    Engine, MigrateResult, entities,
    migrators::{Tally, is_unique_violation},
    source,
};

const SELECT_COUNTRIES: &str = "SELECT CountryCode, CountryName, CurrencyCode, CurrencySymbol, \
     IsActive FROM tblCountries WHERE IsDeleted = 0";

const SELECT_BANKS: &str = "SELECT BankId, BankName, BankCode, CountryCode, IsActive \
     FROM tblBanks WHERE IsDeleted = 0";

const SELECT_WALLET_OPERATORS: &str = "SELECT OperatorId, OperatorName, OperatorCode, CountryCode, IsActive \
     FROM tblMobileWalletOperators WHERE IsDeleted = 0";

const SELECT_STAFF: &str =
    "SELECT AdminId, FirstName, LastName, Email, IsActive FROM tblAdminUsers WHERE IsDeleted = 0";

impl Engine {
    /// Migrates countries, upserting on the ISO code.
    pub async fn migrate_countries(&self) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_COUNTRIES).await?;
        let mut tally = Tally::default();

        for row in rows {
            let (Some(code), Some(name)) = (row.text("CountryCode"), row.text("CountryName"))
            else {
                tracing::warn!(entity = "country", "missing country code or name, row skipped");
                tally.skipped += 1;
                continue;
            };

            let model = entities::country::ActiveModel {
                code: ActiveValue::Set(code),
                name: ActiveValue::Set(name),
                currency_code: ActiveValue::Set(row.text("CurrencyCode").unwrap_or_default()),
                currency_symbol: ActiveValue::Set(row.text("CurrencySymbol")),
                is_active: ActiveValue::Set(row.flag("IsActive")),
            };
            let conflict = OnConflict::column(entities::country::Column::Code)
                .update_columns([
                    entities::country::Column::Name,
                    entities::country::Column::CurrencyCode,
                    entities::country::Column::CurrencySymbol,
                    entities::country::Column::IsActive,
                ])
                .to_owned();
            entities::country::Entity::insert(model)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(entity = "country", migrated = tally.migrated, skipped = tally.skipped);
        Ok(tally)
    }

    /// Migrates banks. A country code that does not exist in the target is
    /// stored as absent (optional-FK policy).
    pub async fn migrate_banks(&self, countries: &HashSet<String>) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_BANKS).await?;
        let mut tally = Tally::default();

        for row in rows {
            let (Some(id), Some(name)) = (row.int("BankId"), row.text("BankName")) else {
                tracing::warn!(entity = "bank", "missing bank id or name, row skipped");
                tally.skipped += 1;
                continue;
            };

            let country_code = row.text("CountryCode").filter(|c| countries.contains(c));
            let model = entities::bank::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name),
                code: ActiveValue::Set(row.text("BankCode")),
                country_code: ActiveValue::Set(country_code),
                is_active: ActiveValue::Set(row.flag("IsActive")),
            };
            let conflict = OnConflict::column(entities::bank::Column::Id)
                .update_columns([
                    entities::bank::Column::Name,
                    entities::bank::Column::Code,
                    entities::bank::Column::CountryCode,
                    entities::bank::Column::IsActive,
                ])
                .to_owned();
            entities::bank::Entity::insert(model)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(entity = "bank", migrated = tally.migrated, skipped = tally.skipped);
        Ok(tally)
    }

    /// Migrates mobile-money wallet operators.
    pub async fn migrate_wallet_operators(
        &self,
        countries: &HashSet<String>,
    ) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_WALLET_OPERATORS).await?;
        let mut tally = Tally::default();

        for row in rows {
            let (Some(id), Some(name)) = (row.int("OperatorId"), row.text("OperatorName")) else {
                tracing::warn!(
                    entity = "wallet_operator",
                    "missing operator id or name, row skipped"
                );
                tally.skipped += 1;
                continue;
            };

            let country_code = row.text("CountryCode").filter(|c| countries.contains(c));
            let model = entities::wallet_operator::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name),
                code: ActiveValue::Set(row.text("OperatorCode")),
                country_code: ActiveValue::Set(country_code),
                is_active: ActiveValue::Set(row.flag("IsActive")),
            };
            let conflict = OnConflict::column(entities::wallet_operator::Column::Id)
                .update_columns([
                    entities::wallet_operator::Column::Name,
                    entities::wallet_operator::Column::Code,
                    entities::wallet_operator::Column::CountryCode,
                    entities::wallet_operator::Column::IsActive,
                ])
                .to_owned();
            entities::wallet_operator::Entity::insert(model)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(
            entity = "wallet_operator",
            migrated = tally.migrated,
            skipped = tally.skipped
        );
        Ok(tally)
    }

    /// Migrates back-office staff from the legacy admin-user table.
    pub async fn migrate_staff(&self) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_STAFF).await?;
        let mut tally = Tally::default();

        for row in rows {
            let (Some(id), Some(first_name)) = (row.int("AdminId"), row.text("FirstName")) else {
                tracing::warn!(entity = "staff", "missing staff id or name, row skipped");
                tally.skipped += 1;
                continue;
            };
            let model = entities::staff::ActiveModel {
                id: ActiveValue::Set(id),
                first_name: ActiveValue::Set(first_name),
                last_name: ActiveValue::Set(row.text("LastName")),
                email: ActiveValue::Set(row.text("Email")),
                is_active: ActiveValue::Set(row.flag("IsActive")),
            };
            let conflict = OnConflict::column(entities::staff::Column::Id)
                .update_columns([
                    entities::staff::Column::FirstName,
                    entities::staff::Column::LastName,
                    entities::staff::Column::Email,
                    entities::staff::Column::IsActive,
                ])
                .to_owned();
            match entities::staff::Entity::insert(model)
                .on_conflict(conflict)
                .exec(&self.target)
                .await
            {
                Ok(_) => tally.migrated += 1,
                Err(err) if is_unique_violation(&err) => {
                    tracing::warn!(entity = "staff", id, "duplicate staff row skipped");
                    tally.duplicates += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::info!(entity = "staff", migrated = tally.migrated, skipped = tally.skipped);
        Ok(tally)
    }
}
