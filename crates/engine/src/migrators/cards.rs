//! Card-payment migrator.
//!
//! Card rows reference up to three legacy transaction-id spaces; the
//! reconciliation map resolves them to the unified id. Rows that resolve to
//! nothing are migrated anyway with an absent transaction reference: card
//! history is never dropped because its parent transfer went missing.
use sea_orm::{ActiveValue, EntityTrait, sea_query::OnConflict};

use crate::{
    Engine, MigrateResult,
    enums::{CardPaymentStatus, CardProcessorApi},
    entities,
    migrators::{Tally, is_unique_violation},
    money::Amount,
    reconcile::ReconciliationMap,
    source,
};

// The card table predates the soft-delete convention.
const SELECT_CARD_PAYMENTS: &str = "SELECT CardPaymentId, CardTransactionId, NonCardTransactionId, \
     TopUpSomeoneElseTransactionId, CardType, LastFourDigits, ProcessorApi, \
     ProcessorReference, Amount, Currency, Status, PaymentDate FROM tblCardPayments";

impl Engine {
    /// Migrates card-payment records, resolving their unified transaction
    /// reference through the reconciliation map.
    pub async fn migrate_card_payments(&self, map: &ReconciliationMap) -> MigrateResult<Tally> {
        let rows = source::fetch_all(&self.source, SELECT_CARD_PAYMENTS).await?;
        let mut tally = Tally::default();

        for row in rows {
            let Some(id) = row.int("CardPaymentId") else {
                tracing::warn!(entity = "card_payment", "missing card payment id, row skipped");
                tally.skipped += 1;
                continue;
            };

            let card_id = row.int("CardTransactionId");
            let non_card_id = row.int("NonCardTransactionId");
            let top_up_id = row.int("TopUpSomeoneElseTransactionId");
            let transaction_id = map.resolve(card_id, non_card_id, top_up_id);
            if transaction_id.is_none() {
                tracing::warn!(
                    entity = "card_payment",
                    id,
                    "no legacy id resolved, migrated without transaction reference"
                );
            }

            let model = entities::card_payment::ActiveModel {
                id: ActiveValue::Set(id),
                transaction_id: ActiveValue::Set(transaction_id),
                card_transaction_id: ActiveValue::Set(card_id),
                non_card_transaction_id: ActiveValue::Set(non_card_id),
                top_up_transaction_id: ActiveValue::Set(top_up_id),
                card_type: ActiveValue::Set(row.text("CardType")),
                last_four: ActiveValue::Set(row.text("LastFourDigits")),
                processor_api: ActiveValue::Set(
                    row.int("ProcessorApi")
                        .and_then(CardProcessorApi::from_legacy)
                        .map(|p| p.as_str().to_string()),
                ),
                processor_reference: ActiveValue::Set(row.text("ProcessorReference")),
                amount_minor: ActiveValue::Set(
                    row.amount("Amount").unwrap_or(Amount::ZERO).minor(),
                ),
                currency: ActiveValue::Set(row.text("Currency")),
                status: ActiveValue::Set(
                    row.int("Status")
                        .and_then(CardPaymentStatus::from_legacy)
                        .map(|s| s.as_str().to_string()),
                ),
                paid_at: ActiveValue::Set(row.date("PaymentDate")),
            };
            let conflict = OnConflict::column(entities::card_payment::Column::Id)
                .update_columns([
                    entities::card_payment::Column::TransactionId,
                    entities::card_payment::Column::CardTransactionId,
                    entities::card_payment::Column::NonCardTransactionId,
                    entities::card_payment::Column::TopUpTransactionId,
                    entities::card_payment::Column::CardType,
                    entities::card_payment::Column::LastFour,
                    entities::card_payment::Column::ProcessorApi,
                    entities::card_payment::Column::ProcessorReference,
                    entities::card_payment::Column::AmountMinor,
                    entities::card_payment::Column::Currency,
                    entities::card_payment::Column::Status,
                    entities::card_payment::Column::PaidAt,
                ])
                .to_owned();
            match entities::card_payment::Entity::insert(model)
                .on_conflict(conflict)
                .exec(&self.target)
                .await
            {
                Ok(_) => tally.migrated += 1,
                Err(err) if is_unique_violation(&err) => {
                    tracing::warn!(entity = "card_payment", id, "duplicate row skipped");
                    tally.duplicates += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::info!(
            entity = "card_payment",
            migrated = tally.migrated,
            skipped = tally.skipped
        );
        Ok(tally)
    }
}
