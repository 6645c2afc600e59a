//! User-data migrators: senders, sender logins, recipients, receiver
//! details.
use std::collections::HashSet;

use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait, sea_query::OnConflict};

use crate::{
    Engine, MigrateResult, entities,
    migrators::{Tally, full_name, is_unique_violation},
    resolver::{KeyKind, Resolver},
    source,
};

const SELECT_SENDERS: &str = "SELECT SenderId, AccountNo, FirstName, MiddleName, LastName, Email, Phone, \
     Address1, City, PostCode, CountryCode, IsBusiness, CreatedDate \
     FROM tblSenders WHERE IsDeleted = 0";

const SELECT_SENDER_LOGINS: &str =
    "SELECT SenderId, PasswordHash, LastLoginDate FROM tblSenderLogin";

const SELECT_RECIPIENTS: &str = "SELECT RecipientId, SenderId, FirstName, MiddleName, LastName, Phone, Email, \
     CountryCode FROM tblRecipients WHERE IsDeleted = 0";

const SELECT_RECEIVER_DETAILS: &str = "SELECT ReceiverId, SenderId, FirstName, MiddleName, LastName, Phone, Address, \
     City, CountryCode FROM tblReceiverDetails WHERE IsDeleted = 0";

impl Engine {
    /// Migrates senders, upserting on the legacy sender id.
    ///
    /// `account_no` is unique in the target; a legacy row that reuses an
    /// account number under a fresh id violates that index and is skipped
    /// as a duplicate.
    pub async fn migrate_senders(&self, countries: &HashSet<String>) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_SENDERS).await?;
        let mut tally = Tally::default();

        for row in rows {
            let (Some(id), Some(account_no), Some(first_name)) = (
                row.int("SenderId"),
                row.text("AccountNo"),
                row.text("FirstName"),
            ) else {
                tracing::warn!(entity = "sender", "missing id, account no or name, row skipped");
                tally.skipped += 1;
                continue;
            };

            let country_code = row.text("CountryCode").filter(|c| countries.contains(c));
            let model = entities::sender::ActiveModel {
                id: ActiveValue::Set(id),
                account_no: ActiveValue::Set(account_no.clone()),
                first_name: ActiveValue::Set(first_name),
                middle_name: ActiveValue::Set(row.text("MiddleName")),
                last_name: ActiveValue::Set(row.text("LastName")),
                email: ActiveValue::Set(row.text("Email")),
                phone: ActiveValue::Set(row.text("Phone")),
                address: ActiveValue::Set(row.text("Address1")),
                city: ActiveValue::Set(row.text("City")),
                postcode: ActiveValue::Set(row.text("PostCode")),
                country_code: ActiveValue::Set(country_code),
                is_business: ActiveValue::Set(row.flag("IsBusiness")),
                password_hash: ActiveValue::NotSet,
                last_login_at: ActiveValue::NotSet,
                created_at: ActiveValue::Set(row.date("CreatedDate")),
            };
            let conflict = OnConflict::column(entities::sender::Column::Id)
                .update_columns([
                    entities::sender::Column::AccountNo,
                    entities::sender::Column::FirstName,
                    entities::sender::Column::MiddleName,
                    entities::sender::Column::LastName,
                    entities::sender::Column::Email,
                    entities::sender::Column::Phone,
                    entities::sender::Column::Address,
                    entities::sender::Column::City,
                    entities::sender::Column::Postcode,
                    entities::sender::Column::CountryCode,
                    entities::sender::Column::IsBusiness,
                    entities::sender::Column::CreatedAt,
                ])
                .to_owned();
            match entities::sender::Entity::insert(model)
                .on_conflict(conflict)
                .exec(&self.target)
                .await
            {
                Ok(_) => tally.migrated += 1,
                Err(err) if is_unique_violation(&err) => {
                    tracing::warn!(
                        entity = "sender",
                        id,
                        account_no,
                        "duplicate account number, row skipped"
                    );
                    tally.duplicates += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::info!(
            entity = "sender",
            migrated = tally.migrated,
            skipped = tally.skipped,
            duplicates = tally.duplicates
        );
        Ok(tally)
    }

    /// Merges legacy login credentials into the already-migrated sender
    /// rows. The target schema keeps no separate login table.
    pub async fn migrate_sender_logins(&self, resolver: &Resolver) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_SENDER_LOGINS).await?;
        let mut tally = Tally::default();

        for row in rows {
            let Some(sender_id) = row.int("SenderId") else {
                tracing::warn!(entity = "sender_login", "missing sender id, row skipped");
                tally.skipped += 1;
                continue;
            };
            if !resolver.contains(KeyKind::Sender, sender_id) {
                tracing::warn!(
                    entity = "sender_login",
                    sender_id,
                    "sender missing in target, login skipped"
                );
                tally.skipped += 1;
                continue;
            }

            let model = entities::sender::ActiveModel {
                id: ActiveValue::Set(sender_id),
                password_hash: ActiveValue::Set(row.text("PasswordHash")),
                last_login_at: ActiveValue::Set(row.date("LastLoginDate")),
                ..Default::default()
            };
            model.update(&self.target).await?;
            tally.migrated += 1;
        }

        tracing::info!(
            entity = "sender_login",
            migrated = tally.migrated,
            skipped = tally.skipped
        );
        Ok(tally)
    }

    /// Migrates saved cash-pickup recipients. The sender reference is
    /// optional and is nulled when it does not resolve.
    pub async fn migrate_recipients(&self, resolver: &Resolver) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_RECIPIENTS).await?;
        let mut tally = Tally::default();

        for row in rows {
            let (Some(id), Some(first_name)) = (row.int("RecipientId"), row.text("FirstName"))
            else {
                tracing::warn!(entity = "recipient", "missing id or name, row skipped");
                tally.skipped += 1;
                continue;
            };

            let model = entities::recipient::ActiveModel {
                id: ActiveValue::Set(id),
                sender_id: ActiveValue::Set(resolver.optional(KeyKind::Sender, row.int("SenderId"))),
                first_name: ActiveValue::Set(first_name),
                middle_name: ActiveValue::Set(row.text("MiddleName")),
                last_name: ActiveValue::Set(row.text("LastName")),
                phone: ActiveValue::Set(row.text("Phone")),
                email: ActiveValue::Set(row.text("Email")),
                country_code: ActiveValue::Set(row.text("CountryCode")),
            };
            let conflict = OnConflict::column(entities::recipient::Column::Id)
                .update_columns([
                    entities::recipient::Column::SenderId,
                    entities::recipient::Column::FirstName,
                    entities::recipient::Column::MiddleName,
                    entities::recipient::Column::LastName,
                    entities::recipient::Column::Phone,
                    entities::recipient::Column::Email,
                    entities::recipient::Column::CountryCode,
                ])
                .to_owned();
            entities::recipient::Entity::insert(model)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(
            entity = "recipient",
            migrated = tally.migrated,
            skipped = tally.skipped
        );
        Ok(tally)
    }

    /// Migrates non-card receiver profiles, deriving the stored full name
    /// from the legacy name parts.
    pub async fn migrate_receiver_details(&self, resolver: &Resolver) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_RECEIVER_DETAILS).await?;
        let mut tally = Tally::default();

        for row in rows {
            let Some(id) = row.int("ReceiverId") else {
                tracing::warn!(entity = "receiver_detail", "missing id, row skipped");
                tally.skipped += 1;
                continue;
            };
            let Some(name) = full_name(&[
                row.text("FirstName"),
                row.text("MiddleName"),
                row.text("LastName"),
            ]) else {
                tracing::warn!(entity = "receiver_detail", id, "nameless receiver, row skipped");
                tally.skipped += 1;
                continue;
            };

            let model = entities::receiver_detail::ActiveModel {
                id: ActiveValue::Set(id),
                sender_id: ActiveValue::Set(resolver.optional(KeyKind::Sender, row.int("SenderId"))),
                full_name: ActiveValue::Set(name),
                phone: ActiveValue::Set(row.text("Phone")),
                address: ActiveValue::Set(row.text("Address")),
                city: ActiveValue::Set(row.text("City")),
                country_code: ActiveValue::Set(row.text("CountryCode")),
            };
            let conflict = OnConflict::column(entities::receiver_detail::Column::Id)
                .update_columns([
                    entities::receiver_detail::Column::SenderId,
                    entities::receiver_detail::Column::FullName,
                    entities::receiver_detail::Column::Phone,
                    entities::receiver_detail::Column::Address,
                    entities::receiver_detail::Column::City,
                    entities::receiver_detail::Column::CountryCode,
                ])
                .to_owned();
            entities::receiver_detail::Entity::insert(model)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(
            entity = "receiver_detail",
            migrated = tally.migrated,
            skipped = tally.skipped
        );
        Ok(tally)
    }
}
