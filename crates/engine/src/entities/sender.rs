use sea_orm::entity::prelude::*;

/// Sending customer.
///
/// `account_no` carries a unique index; the legacy store occasionally reused
/// account numbers under fresh ids, and those rows are skipped as duplicates
/// during migration. Login credentials live on this row too: the legacy
/// `tblSenderLogin` table merges in during the user phase.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "senders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub account_no: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub country_code: Option<String>,
    pub is_business: bool,
    pub password_hash: Option<String>,
    pub last_login_at: Option<DateTimeUtc>,
    pub created_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
