//! Transaction identity reconciliation.
//!
//! The legacy transfer tables each minted their own integer transaction ids
//! with no global id space; the canonical schema has exactly one. The
//! receipt number is the only business key shared by both sides, so the map
//! is built by joining `(legacy id, receipt)` pairs from every legacy
//! transfer table against `(receipt, new id)` pairs already committed to the
//! target `transactions` table.
use std::collections::HashMap;

use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect};

use crate::{MigrateResult, entities, source};

const LEGACY_TRANSFER_SELECTS: [&str; 4] = [
    "SELECT TransactionId, ReceiptNo FROM tblBankDeposits WHERE IsDeleted = 0",
    "SELECT TransactionId, ReceiptNo FROM tblMobileMoneyTransfers WHERE IsDeleted = 0",
    "SELECT TransactionId, ReceiptNo FROM tblCashPickups WHERE IsDeleted = 0",
    // The KiiBank table has no soft-delete column.
    "SELECT TransactionId, ReceiptNo FROM tblKiiBankTransfers",
];

/// Legacy transaction id → unified transaction id.
#[derive(Debug, Default)]
pub struct ReconciliationMap {
    map: HashMap<i64, i64>,
}

impl ReconciliationMap {
    /// Resolves a card-payment row's legacy ids against the map.
    ///
    /// The three legacy id spaces are tried in fixed priority order: card,
    /// non-card, top-up; the first hit wins. `None` means the card row keeps
    /// no transaction reference, not that it is dropped.
    pub fn resolve(
        &self,
        card: Option<i64>,
        non_card: Option<i64>,
        top_up: Option<i64>,
    ) -> Option<i64> {
        [card, non_card, top_up]
            .into_iter()
            .flatten()
            .find_map(|legacy_id| self.map.get(&legacy_id).copied())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn insert_first(&mut self, legacy_id: i64, new_id: i64) {
        // Legacy ids are table-local, so distinct tables can collide on the
        // same number. First insertion wins; the tables are visited in
        // migration order, matching how the original system resolved these.
        if let Some(existing) = self.map.get(&legacy_id) {
            tracing::debug!(legacy_id, kept = existing, dropped = new_id, "legacy id collision");
            return;
        }
        self.map.insert(legacy_id, new_id);
    }
}

/// Builds the reconciliation map by joining on receipt numbers.
pub async fn build_reconciliation_map(
    source_db: &DatabaseConnection,
    target_db: &DatabaseConnection,
) -> MigrateResult<ReconciliationMap> {
    let committed: Vec<(i64, String)> = entities::transaction::Entity::find()
        .select_only()
        .column(entities::transaction::Column::Id)
        .column(entities::transaction::Column::ReceiptNo)
        .into_tuple()
        .all(target_db)
        .await?;
    let by_receipt: HashMap<String, i64> = committed
        .into_iter()
        .map(|(id, receipt)| (receipt, id))
        .collect();

    let mut map = ReconciliationMap::default();
    for select in LEGACY_TRANSFER_SELECTS {
        for row in source::fetch_all(source_db, select).await? {
            let (Some(legacy_id), Some(receipt)) = (row.int("TransactionId"), row.text("ReceiptNo"))
            else {
                continue;
            };
            if let Some(new_id) = by_receipt.get(&receipt) {
                map.insert_first(legacy_id, *new_id);
            }
        }
    }

    tracing::info!(entries = map.len(), "reconciliation map built");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_honors_priority_order() {
        let mut map = ReconciliationMap::default();
        map.insert_first(101, 1);
        map.insert_first(55, 2);
        map.insert_first(9, 3);

        // Card id wins over the other spaces when both resolve.
        assert_eq!(map.resolve(Some(101), Some(55), None), Some(1));
        // Falls through unresolvable ids in order.
        assert_eq!(map.resolve(Some(7777), Some(55), Some(9)), Some(2));
        assert_eq!(map.resolve(None, None, Some(9)), Some(3));
        assert_eq!(map.resolve(Some(7777), None, None), None);
        assert_eq!(map.resolve(None, None, None), None);
    }

    #[test]
    fn first_insertion_wins_on_collision() {
        let mut map = ReconciliationMap::default();
        map.insert_first(101, 1);
        map.insert_first(101, 9);
        assert_eq!(map.resolve(Some(101), None, None), Some(1));
    }
}
