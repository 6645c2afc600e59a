//! Reinitialized-transaction migrator: the audit trail linking an abandoned
//! receipt number to its replacement.
use sea_orm::{ActiveValue, EntityTrait, sea_query::OnConflict};

use crate::{
    Engine, MigrateResult, entities,
    migrators::Tally,
    resolver::{KeyKind, Resolver},
    source,
};

const SELECT_REINITIALIZED: &str = "SELECT ReinitId, OldReceiptNo, NewReceiptNo, ReinitializedBy, Reason, \
     ReinitializedDate FROM tblReinitializedTransactions WHERE IsDeleted = 0";

impl Engine {
    /// Migrates reinitialization audit rows. The acting staff reference is
    /// optional and is nulled when it does not resolve.
    pub async fn migrate_reinitialized(&self, resolver: &Resolver) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_REINITIALIZED).await?;
        let mut tally = Tally::default();

        for row in rows {
            let (Some(id), Some(old_receipt_no), Some(new_receipt_no)) = (
                row.int("ReinitId"),
                row.text("OldReceiptNo"),
                row.text("NewReceiptNo"),
            ) else {
                tracing::warn!(entity = "reinitialize", "missing id or receipt, row skipped");
                tally.skipped += 1;
                continue;
            };

            let model = entities::reinitialize::ActiveModel {
                id: ActiveValue::Set(id),
                old_receipt_no: ActiveValue::Set(old_receipt_no),
                new_receipt_no: ActiveValue::Set(new_receipt_no),
                reinitialized_by: ActiveValue::Set(
                    resolver.optional(KeyKind::Staff, row.int("ReinitializedBy")),
                ),
                reason: ActiveValue::Set(row.text("Reason")),
                reinitialized_at: ActiveValue::Set(row.date("ReinitializedDate")),
            };
            let conflict = OnConflict::column(entities::reinitialize::Column::Id)
                .update_columns([
                    entities::reinitialize::Column::OldReceiptNo,
                    entities::reinitialize::Column::NewReceiptNo,
                    entities::reinitialize::Column::ReinitializedBy,
                    entities::reinitialize::Column::Reason,
                    entities::reinitialize::Column::ReinitializedAt,
                ])
                .to_owned();
            entities::reinitialize::Entity::insert(model)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(
            entity = "reinitialize",
            migrated = tally.migrated,
            skipped = tally.skipped
        );
        Ok(tally)
    }
}
