//! Business-key resolver.
//!
//! Before a phase runs, the orchestrator snapshots the identifier sets that
//! the phase's migrators will validate foreign keys against. Snapshots are
//! read from the **target** store and are immutable: inserts made later in
//! the same phase are not visible, which is the staleness the sequential
//! design accepts (reference data is always committed a phase earlier).
use std::collections::HashSet;

use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect};

use crate::{MigrateResult, entities};

/// The identifier spaces migrators validate against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Staff,
    Sender,
    Bank,
    WalletOperator,
    Recipient,
}

/// Loads the set of valid keys for one entity kind from the target store.
pub async fn load_valid_keys(
    db: &DatabaseConnection,
    kind: KeyKind,
) -> MigrateResult<HashSet<i64>> {
    let ids: Vec<i64> = match kind {
        KeyKind::Staff => {
            entities::staff::Entity::find()
                .select_only()
                .column(entities::staff::Column::Id)
                .into_tuple()
                .all(db)
                .await?
        }
        KeyKind::Sender => {
            entities::sender::Entity::find()
                .select_only()
                .column(entities::sender::Column::Id)
                .into_tuple()
                .all(db)
                .await?
        }
        KeyKind::Bank => {
            entities::bank::Entity::find()
                .select_only()
                .column(entities::bank::Column::Id)
                .into_tuple()
                .all(db)
                .await?
        }
        KeyKind::WalletOperator => {
            entities::wallet_operator::Entity::find()
                .select_only()
                .column(entities::wallet_operator::Column::Id)
                .into_tuple()
                .all(db)
                .await?
        }
        KeyKind::Recipient => {
            entities::recipient::Entity::find()
                .select_only()
                .column(entities::recipient::Column::Id)
                .into_tuple()
                .all(db)
                .await?
        }
    };
    Ok(ids.into_iter().collect())
}

/// Country codes are string-keyed and sit outside [`KeyKind`]; bank, wallet
/// operator and sender migrators use this to null out dangling codes.
pub async fn load_country_codes(db: &DatabaseConnection) -> MigrateResult<HashSet<String>> {
    let codes: Vec<String> = entities::country::Entity::find()
        .select_only()
        .column(entities::country::Column::Code)
        .into_tuple()
        .all(db)
        .await?;
    Ok(codes.into_iter().collect())
}

/// Immutable per-phase snapshot of every key set the phase needs.
#[derive(Debug, Default)]
pub struct Resolver {
    staff: HashSet<i64>,
    senders: HashSet<i64>,
    banks: HashSet<i64>,
    wallet_operators: HashSet<i64>,
    recipients: HashSet<i64>,
}

impl Resolver {
    /// Snapshots the requested kinds from the target store.
    pub async fn load(db: &DatabaseConnection, kinds: &[KeyKind]) -> MigrateResult<Self> {
        let mut resolver = Self::default();
        for kind in kinds {
            let set = load_valid_keys(db, *kind).await?;
            match kind {
                KeyKind::Staff => resolver.staff = set,
                KeyKind::Sender => resolver.senders = set,
                KeyKind::Bank => resolver.banks = set,
                KeyKind::WalletOperator => resolver.wallet_operators = set,
                KeyKind::Recipient => resolver.recipients = set,
            }
        }
        Ok(resolver)
    }

    pub fn contains(&self, kind: KeyKind, id: i64) -> bool {
        match kind {
            KeyKind::Staff => self.staff.contains(&id),
            KeyKind::Sender => self.senders.contains(&id),
            KeyKind::Bank => self.banks.contains(&id),
            KeyKind::WalletOperator => self.wallet_operators.contains(&id),
            KeyKind::Recipient => self.recipients.contains(&id),
        }
    }

    /// Optional-FK policy: a reference that does not resolve becomes absent.
    pub fn optional(&self, kind: KeyKind, id: Option<i64>) -> Option<i64> {
        id.filter(|id| self.contains(kind, *id))
    }
}
