use sea_orm_migration::prelude::*;

use crate::m20260210_000001_reference_tables::{Banks, Staff, WalletOperators};
use crate::m20260210_000002_user_tables::{Recipients, Senders};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Transactions {
    Table,
    Id,
    ReceiptNo,
    SenderId,
    SendingAmountMinor,
    ReceivingAmountMinor,
    FeeMinor,
    TotalAmountMinor,
    ExchangeRateMicros,
    SendingCurrency,
    ReceivingCurrency,
    SendingCountry,
    ReceivingCountry,
    Status,
    PaymentMode,
    Module,
    Reason,
    ApiService,
    PayingStaffId,
    ComplianceApprovedBy,
    UpdatedByStaffId,
    ComplianceRemark,
    TransferredAt,
    CreatedAt,
}

#[derive(Iden)]
pub enum BankAccountDeposits {
    Table,
    TransactionId,
    BankId,
    AccountNo,
    ReceiverName,
}

#[derive(Iden)]
pub enum MobileMoneyTransfers {
    Table,
    TransactionId,
    WalletOperatorId,
    MobileNo,
    ReceiverName,
}

#[derive(Iden)]
pub enum CashPickups {
    Table,
    TransactionId,
    RecipientId,
    ReceiverName,
    PickupCity,
    IdType,
    IdNumber,
}

#[derive(Iden)]
pub enum KiibankTransfers {
    Table,
    TransactionId,
    ReceiverAccountNo,
    ReceiverName,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::ReceiptNo).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::SenderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::SendingAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::ReceivingAmountMinor).big_integer())
                    .col(
                        ColumnDef::new(Transactions::FeeMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Transactions::TotalAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::ExchangeRateMicros).big_integer())
                    .col(
                        ColumnDef::new(Transactions::SendingCurrency)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transactions::ReceivingCurrency).string())
                    .col(ColumnDef::new(Transactions::SendingCountry).string())
                    .col(ColumnDef::new(Transactions::ReceivingCountry).string())
                    .col(ColumnDef::new(Transactions::Status).string().not_null())
                    .col(ColumnDef::new(Transactions::PaymentMode).string())
                    .col(ColumnDef::new(Transactions::Module).string().not_null())
                    .col(ColumnDef::new(Transactions::Reason).string())
                    .col(ColumnDef::new(Transactions::ApiService).string())
                    .col(ColumnDef::new(Transactions::PayingStaffId).big_integer())
                    .col(ColumnDef::new(Transactions::ComplianceApprovedBy).big_integer())
                    .col(ColumnDef::new(Transactions::UpdatedByStaffId).big_integer())
                    .col(ColumnDef::new(Transactions::ComplianceRemark).string())
                    .col(ColumnDef::new(Transactions::TransferredAt).timestamp())
                    .col(ColumnDef::new(Transactions::CreatedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-sender_id")
                            .from(Transactions::Table, Transactions::SenderId)
                            .to(Senders::Table, Senders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-paying_staff_id")
                            .from(Transactions::Table, Transactions::PayingStaffId)
                            .to(Staff::Table, Staff::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-transactions-receipt_no")
                    .table(Transactions::Table)
                    .col(Transactions::ReceiptNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankAccountDeposits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankAccountDeposits::TransactionId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankAccountDeposits::BankId).big_integer())
                    .col(
                        ColumnDef::new(BankAccountDeposits::AccountNo)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BankAccountDeposits::ReceiverName).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_account_deposits-transaction_id")
                            .from(
                                BankAccountDeposits::Table,
                                BankAccountDeposits::TransactionId,
                            )
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bank_account_deposits-bank_id")
                            .from(BankAccountDeposits::Table, BankAccountDeposits::BankId)
                            .to(Banks::Table, Banks::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MobileMoneyTransfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MobileMoneyTransfers::TransactionId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MobileMoneyTransfers::WalletOperatorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MobileMoneyTransfers::MobileNo)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MobileMoneyTransfers::ReceiverName).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mobile_money_transfers-transaction_id")
                            .from(
                                MobileMoneyTransfers::Table,
                                MobileMoneyTransfers::TransactionId,
                            )
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mobile_money_transfers-wallet_operator_id")
                            .from(
                                MobileMoneyTransfers::Table,
                                MobileMoneyTransfers::WalletOperatorId,
                            )
                            .to(WalletOperators::Table, WalletOperators::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CashPickups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashPickups::TransactionId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashPickups::RecipientId).big_integer())
                    .col(ColumnDef::new(CashPickups::ReceiverName).string())
                    .col(ColumnDef::new(CashPickups::PickupCity).string())
                    .col(ColumnDef::new(CashPickups::IdType).string())
                    .col(ColumnDef::new(CashPickups::IdNumber).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_pickups-transaction_id")
                            .from(CashPickups::Table, CashPickups::TransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cash_pickups-recipient_id")
                            .from(CashPickups::Table, CashPickups::RecipientId)
                            .to(Recipients::Table, Recipients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(KiibankTransfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KiibankTransfers::TransactionId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(KiibankTransfers::ReceiverAccountNo)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(KiibankTransfers::ReceiverName).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-kiibank_transfers-transaction_id")
                            .from(KiibankTransfers::Table, KiibankTransfers::TransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KiibankTransfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CashPickups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MobileMoneyTransfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccountDeposits::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uidx-transactions-receipt_no")
                    .table(Transactions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        Ok(())
    }
}
