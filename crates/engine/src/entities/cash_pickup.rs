use sea_orm::entity::prelude::*;

/// Cash-pickup detail, keyed 1:1 by the unified transaction id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_pickups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: i64,
    pub recipient_id: Option<i64>,
    pub receiver_name: Option<String>,
    pub pickup_city: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
