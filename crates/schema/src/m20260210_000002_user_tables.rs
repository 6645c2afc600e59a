use sea_orm_migration::prelude::*;

use crate::m20260210_000001_reference_tables::Countries;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Senders {
    Table,
    Id,
    AccountNo,
    FirstName,
    MiddleName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    Postcode,
    CountryCode,
    IsBusiness,
    PasswordHash,
    LastLoginAt,
    CreatedAt,
}

#[derive(Iden)]
pub enum Recipients {
    Table,
    Id,
    SenderId,
    FirstName,
    MiddleName,
    LastName,
    Phone,
    Email,
    CountryCode,
}

#[derive(Iden)]
pub enum ReceiverDetails {
    Table,
    Id,
    SenderId,
    FullName,
    Phone,
    Address,
    City,
    CountryCode,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Senders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Senders::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Senders::AccountNo).string().not_null())
                    .col(ColumnDef::new(Senders::FirstName).string().not_null())
                    .col(ColumnDef::new(Senders::MiddleName).string())
                    .col(ColumnDef::new(Senders::LastName).string())
                    .col(ColumnDef::new(Senders::Email).string())
                    .col(ColumnDef::new(Senders::Phone).string())
                    .col(ColumnDef::new(Senders::Address).string())
                    .col(ColumnDef::new(Senders::City).string())
                    .col(ColumnDef::new(Senders::Postcode).string())
                    .col(ColumnDef::new(Senders::CountryCode).string())
                    .col(
                        ColumnDef::new(Senders::IsBusiness)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Senders::PasswordHash).string())
                    .col(ColumnDef::new(Senders::LastLoginAt).timestamp())
                    .col(ColumnDef::new(Senders::CreatedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-senders-country_code")
                            .from(Senders::Table, Senders::CountryCode)
                            .to(Countries::Table, Countries::Code),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-senders-account_no")
                    .table(Senders::Table)
                    .col(Senders::AccountNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recipients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recipients::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recipients::SenderId).big_integer())
                    .col(ColumnDef::new(Recipients::FirstName).string().not_null())
                    .col(ColumnDef::new(Recipients::MiddleName).string())
                    .col(ColumnDef::new(Recipients::LastName).string())
                    .col(ColumnDef::new(Recipients::Phone).string())
                    .col(ColumnDef::new(Recipients::Email).string())
                    .col(ColumnDef::new(Recipients::CountryCode).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-recipients-sender_id")
                            .from(Recipients::Table, Recipients::SenderId)
                            .to(Senders::Table, Senders::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReceiverDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReceiverDetails::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReceiverDetails::SenderId).big_integer())
                    .col(
                        ColumnDef::new(ReceiverDetails::FullName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReceiverDetails::Phone).string())
                    .col(ColumnDef::new(ReceiverDetails::Address).string())
                    .col(ColumnDef::new(ReceiverDetails::City).string())
                    .col(ColumnDef::new(ReceiverDetails::CountryCode).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-receiver_details-sender_id")
                            .from(ReceiverDetails::Table, ReceiverDetails::SenderId)
                            .to(Senders::Table, Senders::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReceiverDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipients::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uidx-senders-account_no")
                    .table(Senders::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Senders::Table).to_owned())
            .await?;
        Ok(())
    }
}
