use sea_orm::entity::prelude::*;

/// Audit link between an abandoned receipt number and its replacement.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reinitialize_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub old_receipt_no: String,
    pub new_receipt_no: String,
    pub reinitialized_by: Option<i64>,
    pub reason: Option<String>,
    pub reinitialized_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
