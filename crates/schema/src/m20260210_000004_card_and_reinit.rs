use sea_orm_migration::prelude::*;

use crate::m20260210_000001_reference_tables::Staff;
use crate::m20260210_000003_transactions::Transactions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum CardPaymentInformation {
    Table,
    Id,
    TransactionId,
    CardTransactionId,
    NonCardTransactionId,
    TopUpTransactionId,
    CardType,
    LastFour,
    ProcessorApi,
    ProcessorReference,
    AmountMinor,
    Currency,
    Status,
    PaidAt,
}

#[derive(Iden)]
pub enum ReinitializeTransactions {
    Table,
    Id,
    OldReceiptNo,
    NewReceiptNo,
    ReinitializedBy,
    Reason,
    ReinitializedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CardPaymentInformation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CardPaymentInformation::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CardPaymentInformation::TransactionId).big_integer())
                    .col(ColumnDef::new(CardPaymentInformation::CardTransactionId).big_integer())
                    .col(
                        ColumnDef::new(CardPaymentInformation::NonCardTransactionId).big_integer(),
                    )
                    .col(ColumnDef::new(CardPaymentInformation::TopUpTransactionId).big_integer())
                    .col(ColumnDef::new(CardPaymentInformation::CardType).string())
                    .col(ColumnDef::new(CardPaymentInformation::LastFour).string())
                    .col(ColumnDef::new(CardPaymentInformation::ProcessorApi).string())
                    .col(ColumnDef::new(CardPaymentInformation::ProcessorReference).string())
                    .col(
                        ColumnDef::new(CardPaymentInformation::AmountMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CardPaymentInformation::Currency).string())
                    .col(ColumnDef::new(CardPaymentInformation::Status).string())
                    .col(ColumnDef::new(CardPaymentInformation::PaidAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-card_payment_information-transaction_id")
                            .from(
                                CardPaymentInformation::Table,
                                CardPaymentInformation::TransactionId,
                            )
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReinitializeTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReinitializeTransactions::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReinitializeTransactions::OldReceiptNo)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReinitializeTransactions::NewReceiptNo)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReinitializeTransactions::ReinitializedBy).big_integer())
                    .col(ColumnDef::new(ReinitializeTransactions::Reason).string())
                    .col(ColumnDef::new(ReinitializeTransactions::ReinitializedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reinitialize_transactions-reinitialized_by")
                            .from(
                                ReinitializeTransactions::Table,
                                ReinitializeTransactions::ReinitializedBy,
                            )
                            .to(Staff::Table, Staff::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ReinitializeTransactions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(CardPaymentInformation::Table).to_owned())
            .await?;
        Ok(())
    }
}
