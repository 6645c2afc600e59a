use sea_orm::entity::prelude::*;

/// Card payment record.
///
/// Keeps the three legacy transaction-id columns for historical
/// traceability next to the reconciled unified id. A row whose legacy ids
/// resolve to nothing is still migrated, with `transaction_id` absent: card
/// history is never dropped because its parent transfer went missing.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "card_payment_information")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub transaction_id: Option<i64>,
    pub card_transaction_id: Option<i64>,
    pub non_card_transaction_id: Option<i64>,
    pub top_up_transaction_id: Option<i64>,
    pub card_type: Option<String>,
    pub last_four: Option<String>,
    pub processor_api: Option<String>,
    pub processor_reference: Option<String>,
    pub amount_minor: i64,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub paid_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
