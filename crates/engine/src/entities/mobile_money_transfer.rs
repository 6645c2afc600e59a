use sea_orm::entity::prelude::*;

/// Mobile-money detail, keyed 1:1 by the unified transaction id.
///
/// The wallet operator is mandatory here: a transfer whose operator cannot
/// be resolved keeps its parent transaction but gets no detail row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "mobile_money_transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: i64,
    pub wallet_operator_id: i64,
    pub mobile_no: String,
    pub receiver_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
