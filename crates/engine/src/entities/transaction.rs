use sea_orm::entity::prelude::*;

/// Unified transaction row, one per transfer regardless of type.
///
/// `receipt_no` is the sole business key shared with the legacy store and
/// carries a unique index; upserts key on it. `id` is minted here: the
/// legacy transfer tables each had their own id space, reconciled back to
/// this one via the receipt number.
///
/// Amounts are integer minor units; `exchange_rate_micros` is the rate
/// scaled by 1e6. Enum columns store the canonical string forms from
/// [`crate::enums`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub receipt_no: String,
    pub sender_id: i64,
    pub sending_amount_minor: i64,
    pub receiving_amount_minor: Option<i64>,
    pub fee_minor: i64,
    pub total_amount_minor: i64,
    pub exchange_rate_micros: Option<i64>,
    pub sending_currency: String,
    pub receiving_currency: Option<String>,
    pub sending_country: Option<String>,
    pub receiving_country: Option<String>,
    pub status: String,
    pub payment_mode: Option<String>,
    pub module: String,
    pub reason: Option<String>,
    pub api_service: Option<String>,
    pub paying_staff_id: Option<i64>,
    pub compliance_approved_by: Option<i64>,
    pub updated_by_staff_id: Option<i64>,
    pub compliance_remark: Option<String>,
    pub transferred_at: Option<DateTimeUtc>,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
