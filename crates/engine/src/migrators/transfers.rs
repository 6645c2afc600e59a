//! Transfer migrators: one per legacy transfer table.
//!
//! Each migrator writes the parent `transactions` row and its type-specific
//! detail row together, so a rejected parent (invalid sender) never leaves
//! an orphan detail. The reverse is not symmetric: a rejected detail keeps
//! the already-written parent, and downstream consumers treat such a
//! transaction as "type detail unknown".
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter, sea_query::OnConflict};

use crate::{
    Engine, MigrateResult,
    enums::{ApiService, LegacySource, PaymentMode, TransferModule, TransferReason, TransferStatus},
    entities,
    migrators::{Tally, full_name, is_unique_violation},
    money::Amount,
    resolver::{KeyKind, Resolver},
    source::{SourceRow, fetch_all},
};

const SELECT_BANK_DEPOSITS: &str = "SELECT ReceiptNo, SenderId, BankId, AccountNo, ReceiverFirstName, \
     ReceiverMiddleName, ReceiverLastName, SendingAmount, ReceivingAmount, Fee, \
     TotalAmount, ExchangeRate, SendingCurrency, ReceivingCurrency, SendingCountry, \
     ReceivingCountry, Status, PaymentMode, ReasonForTransfer, ApiService, \
     PayingStaffId, ComplianceApprovedBy, UpdatedByStaffId, ComplianceRemark, \
     TransferDate, CreatedDate FROM tblBankDeposits WHERE IsDeleted = 0";

const SELECT_MOBILE_MONEY: &str = "SELECT ReceiptNo, SenderId, OperatorId, MobileNo, ReceiverFirstName, \
     ReceiverLastName, SendingAmount, ReceivingAmount, Fee, TotalAmount, \
     ExchangeRate, SendingCurrency, ReceivingCurrency, SendingCountry, \
     ReceivingCountry, Status, PaymentMode, ReasonForTransfer, ApiService, \
     TransferDate, CreatedDate FROM tblMobileMoneyTransfers WHERE IsDeleted = 0";

const SELECT_CASH_PICKUPS: &str = "SELECT ReceiptNo, SenderId, RecipientId, ReceiverFirstName, ReceiverMiddleName, \
     ReceiverLastName, PickupCity, IdType, IdNumber, SendingAmount, \
     ReceivingAmount, Fee, TotalAmount, ExchangeRate, SendingCurrency, \
     ReceivingCurrency, SendingCountry, ReceivingCountry, Status, PaymentMode, \
     ReasonForTransfer, PayingStaffId, ComplianceApprovedBy, ComplianceRemark, \
     TransferDate, CreatedDate FROM tblCashPickups WHERE IsDeleted = 0";

// The KiiBank table is the newest and the barest: in-network transfers have
// no exchange leg, no total column and no soft-delete flag.
const SELECT_KIIBANK: &str = "SELECT ReceiptNo, SenderId, ReceiverAccountNo, ReceiverFirstName, \
     ReceiverLastName, SendingAmount, Fee, SendingCurrency, Status, PaymentMode, \
     TransferDate, CreatedDate FROM tblKiiBankTransfers";

/// Parent-transaction fields shared by every transfer table. Columns a
/// given table lacks come back as `None` from the probing accessors.
struct ParentRow {
    receipt_no: String,
    sender_id: i64,
    sending: Amount,
    receiving: Option<Amount>,
    fee: Amount,
    total: Option<Amount>,
    exchange_rate_micros: Option<i64>,
    sending_currency: String,
    receiving_currency: Option<String>,
    sending_country: Option<String>,
    receiving_country: Option<String>,
    status: TransferStatus,
    payment_mode: Option<PaymentMode>,
    reason: Option<TransferReason>,
    api_service: Option<ApiService>,
    paying_staff_id: Option<i64>,
    compliance_approved_by: Option<i64>,
    updated_by_staff_id: Option<i64>,
    compliance_remark: Option<String>,
    transferred_at: Option<DateTime<Utc>>,
    created_at: Option<DateTime<Utc>>,
}

/// Outcome of the parent-transaction upsert; each arm lands in a different
/// tally counter.
enum ParentOutcome {
    Committed(i64),
    Rejected,
    Duplicate,
}

fn read_parent(row: &SourceRow, source: LegacySource) -> Option<ParentRow> {
    let receipt_no = row.text("ReceiptNo")?;
    let sender_id = row.int("SenderId")?;
    let sending = row.amount("SendingAmount")?;

    Some(ParentRow {
        receipt_no,
        sender_id,
        sending,
        receiving: row.amount("ReceivingAmount"),
        fee: row.amount("Fee").unwrap_or(Amount::ZERO),
        total: row.amount("TotalAmount"),
        exchange_rate_micros: row.rate_micros("ExchangeRate"),
        sending_currency: row.text("SendingCurrency").unwrap_or_default(),
        receiving_currency: row.text("ReceivingCurrency"),
        sending_country: row.text("SendingCountry"),
        receiving_country: row.text("ReceivingCountry"),
        status: TransferStatus::from_legacy(source, row.int("Status").unwrap_or(-1)),
        payment_mode: row.int("PaymentMode").and_then(PaymentMode::from_legacy),
        reason: row
            .int("ReasonForTransfer")
            .and_then(TransferReason::from_legacy),
        api_service: row.int("ApiService").and_then(ApiService::from_legacy),
        paying_staff_id: row.int("PayingStaffId"),
        compliance_approved_by: row.int("ComplianceApprovedBy"),
        updated_by_staff_id: row.int("UpdatedByStaffId"),
        compliance_remark: row.text("ComplianceRemark"),
        transferred_at: row.date("TransferDate"),
        created_at: row.date("CreatedDate"),
    })
}

impl Engine {
    /// Upserts the unified transaction row and reports how it went: the
    /// committed id, a rejection (missing sender), or a unique-violation
    /// duplicate.
    async fn upsert_transaction(
        &self,
        resolver: &Resolver,
        parent: ParentRow,
        module: TransferModule,
    ) -> MigrateResult<ParentOutcome> {
        // The sender is the one mandatory reference on a transaction.
        if !resolver.contains(KeyKind::Sender, parent.sender_id) {
            tracing::warn!(
                receipt_no = parent.receipt_no,
                sender_id = parent.sender_id,
                module = module.as_str(),
                "sender missing in target, transfer skipped"
            );
            return Ok(ParentOutcome::Rejected);
        }

        let total = parent
            .total
            .unwrap_or_else(|| parent.sending + parent.fee);

        let model = entities::transaction::ActiveModel {
            id: ActiveValue::NotSet,
            receipt_no: ActiveValue::Set(parent.receipt_no.clone()),
            sender_id: ActiveValue::Set(parent.sender_id),
            sending_amount_minor: ActiveValue::Set(parent.sending.minor()),
            receiving_amount_minor: ActiveValue::Set(parent.receiving.map(Amount::minor)),
            fee_minor: ActiveValue::Set(parent.fee.minor()),
            total_amount_minor: ActiveValue::Set(total.minor()),
            exchange_rate_micros: ActiveValue::Set(parent.exchange_rate_micros),
            sending_currency: ActiveValue::Set(parent.sending_currency),
            receiving_currency: ActiveValue::Set(parent.receiving_currency),
            sending_country: ActiveValue::Set(parent.sending_country),
            receiving_country: ActiveValue::Set(parent.receiving_country),
            status: ActiveValue::Set(parent.status.as_str().to_string()),
            payment_mode: ActiveValue::Set(
                parent.payment_mode.map(|m| m.as_str().to_string()),
            ),
            module: ActiveValue::Set(module.as_str().to_string()),
            reason: ActiveValue::Set(parent.reason.map(|r| r.as_str().to_string())),
            api_service: ActiveValue::Set(parent.api_service.map(|a| a.as_str().to_string())),
            paying_staff_id: ActiveValue::Set(
                resolver.optional(KeyKind::Staff, parent.paying_staff_id),
            ),
            compliance_approved_by: ActiveValue::Set(
                resolver.optional(KeyKind::Staff, parent.compliance_approved_by),
            ),
            updated_by_staff_id: ActiveValue::Set(
                resolver.optional(KeyKind::Staff, parent.updated_by_staff_id),
            ),
            compliance_remark: ActiveValue::Set(parent.compliance_remark),
            transferred_at: ActiveValue::Set(parent.transferred_at),
            created_at: ActiveValue::Set(parent.created_at),
        };

        let conflict = OnConflict::column(entities::transaction::Column::ReceiptNo)
            .update_columns([
                entities::transaction::Column::SenderId,
                entities::transaction::Column::SendingAmountMinor,
                entities::transaction::Column::ReceivingAmountMinor,
                entities::transaction::Column::FeeMinor,
                entities::transaction::Column::TotalAmountMinor,
                entities::transaction::Column::ExchangeRateMicros,
                entities::transaction::Column::SendingCurrency,
                entities::transaction::Column::ReceivingCurrency,
                entities::transaction::Column::SendingCountry,
                entities::transaction::Column::ReceivingCountry,
                entities::transaction::Column::Status,
                entities::transaction::Column::PaymentMode,
                entities::transaction::Column::Module,
                entities::transaction::Column::Reason,
                entities::transaction::Column::ApiService,
                entities::transaction::Column::PayingStaffId,
                entities::transaction::Column::ComplianceApprovedBy,
                entities::transaction::Column::UpdatedByStaffId,
                entities::transaction::Column::ComplianceRemark,
                entities::transaction::Column::TransferredAt,
                entities::transaction::Column::CreatedAt,
            ])
            .to_owned();

        match entities::transaction::Entity::insert(model)
            .on_conflict(conflict)
            .exec(&self.target)
            .await
        {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                tracing::warn!(
                    receipt_no = parent.receipt_no,
                    "transaction violates a unique rule, transfer dropped as duplicate"
                );
                return Ok(ParentOutcome::Duplicate);
            }
            Err(err) => return Err(err.into()),
        }

        // The upsert path gives no reliable last-insert id, so read the row
        // back by its business key.
        let committed = entities::transaction::Entity::find()
            .filter(entities::transaction::Column::ReceiptNo.eq(parent.receipt_no.as_str()))
            .one(&self.target)
            .await?;
        match committed {
            Some(tx) => Ok(ParentOutcome::Committed(tx.id)),
            None => Ok(ParentOutcome::Rejected),
        }
    }

    /// Migrates bank-account deposits (parent transaction + deposit detail).
    pub async fn migrate_bank_deposits(&self, resolver: &Resolver) -> MigrateResult<Tally> {
        let rows = fetch_all(&self.source, SELECT_BANK_DEPOSITS).await?;
        let mut tally = Tally::default();

        for row in rows {
            let Some(parent) = read_parent(&row, LegacySource::BankDeposit) else {
                tracing::warn!(entity = "bank_deposit", "unreadable transfer row skipped");
                tally.skipped += 1;
                continue;
            };
            let receipt_no = parent.receipt_no.clone();
            let transaction_id = match self
                .upsert_transaction(resolver, parent, TransferModule::BankDeposit)
                .await?
            {
                ParentOutcome::Committed(id) => id,
                ParentOutcome::Rejected => {
                    tally.skipped += 1;
                    continue;
                }
                ParentOutcome::Duplicate => {
                    tally.duplicates += 1;
                    continue;
                }
            };

            let Some(account_no) = row.text("AccountNo") else {
                tracing::warn!(
                    receipt_no,
                    "deposit without receiving account, detail skipped"
                );
                tally.skipped += 1;
                continue;
            };
            let detail = entities::bank_account_deposit::ActiveModel {
                transaction_id: ActiveValue::Set(transaction_id),
                bank_id: ActiveValue::Set(resolver.optional(KeyKind::Bank, row.int("BankId"))),
                account_no: ActiveValue::Set(account_no),
                receiver_name: ActiveValue::Set(full_name(&[
                    row.text("ReceiverFirstName"),
                    row.text("ReceiverMiddleName"),
                    row.text("ReceiverLastName"),
                ])),
            };
            let conflict =
                OnConflict::column(entities::bank_account_deposit::Column::TransactionId)
                    .update_columns([
                        entities::bank_account_deposit::Column::BankId,
                        entities::bank_account_deposit::Column::AccountNo,
                        entities::bank_account_deposit::Column::ReceiverName,
                    ])
                    .to_owned();
            entities::bank_account_deposit::Entity::insert(detail)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(
            entity = "bank_deposit",
            migrated = tally.migrated,
            skipped = tally.skipped,
            duplicates = tally.duplicates
        );
        Ok(tally)
    }

    /// Migrates mobile-money transfers. The wallet operator is mandatory
    /// for the detail row: when it does not resolve, the parent transaction
    /// stays and the detail is dropped.
    pub async fn migrate_mobile_money(&self, resolver: &Resolver) -> MigrateResult<Tally> {
        let rows = fetch_all(&self.source, SELECT_MOBILE_MONEY).await?;
        let mut tally = Tally::default();

        for row in rows {
            let Some(parent) = read_parent(&row, LegacySource::MobileMoney) else {
                tracing::warn!(entity = "mobile_money", "unreadable transfer row skipped");
                tally.skipped += 1;
                continue;
            };
            let receipt_no = parent.receipt_no.clone();
            let transaction_id = match self
                .upsert_transaction(resolver, parent, TransferModule::MobileMoney)
                .await?
            {
                ParentOutcome::Committed(id) => id,
                ParentOutcome::Rejected => {
                    tally.skipped += 1;
                    continue;
                }
                ParentOutcome::Duplicate => {
                    tally.duplicates += 1;
                    continue;
                }
            };

            let operator_id = row.int("OperatorId");
            let Some(operator_id) =
                operator_id.filter(|id| resolver.contains(KeyKind::WalletOperator, *id))
            else {
                tracing::warn!(
                    receipt_no,
                    operator_id,
                    "wallet operator missing in target, detail skipped"
                );
                tally.skipped += 1;
                continue;
            };
            let Some(mobile_no) = row.text("MobileNo") else {
                tracing::warn!(receipt_no, "transfer without mobile number, detail skipped");
                tally.skipped += 1;
                continue;
            };

            let detail = entities::mobile_money_transfer::ActiveModel {
                transaction_id: ActiveValue::Set(transaction_id),
                wallet_operator_id: ActiveValue::Set(operator_id),
                mobile_no: ActiveValue::Set(mobile_no),
                receiver_name: ActiveValue::Set(full_name(&[
                    row.text("ReceiverFirstName"),
                    row.text("ReceiverLastName"),
                ])),
            };
            let conflict =
                OnConflict::column(entities::mobile_money_transfer::Column::TransactionId)
                    .update_columns([
                        entities::mobile_money_transfer::Column::WalletOperatorId,
                        entities::mobile_money_transfer::Column::MobileNo,
                        entities::mobile_money_transfer::Column::ReceiverName,
                    ])
                    .to_owned();
            entities::mobile_money_transfer::Entity::insert(detail)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(
            entity = "mobile_money",
            migrated = tally.migrated,
            skipped = tally.skipped,
            duplicates = tally.duplicates
        );
        Ok(tally)
    }

    /// Migrates cash pickups. The saved recipient reference is optional.
    pub async fn migrate_cash_pickups(&self, resolver: &Resolver) -> MigrateResult<Tally> {
        let rows = fetch_all(&self.source, SELECT_CASH_PICKUPS).await?;
        let mut tally = Tally::default();

        for row in rows {
            let Some(parent) = read_parent(&row, LegacySource::CashPickup) else {
                tracing::warn!(entity = "cash_pickup", "unreadable transfer row skipped");
                tally.skipped += 1;
                continue;
            };
            let transaction_id = match self
                .upsert_transaction(resolver, parent, TransferModule::CashPickup)
                .await?
            {
                ParentOutcome::Committed(id) => id,
                ParentOutcome::Rejected => {
                    tally.skipped += 1;
                    continue;
                }
                ParentOutcome::Duplicate => {
                    tally.duplicates += 1;
                    continue;
                }
            };

            let detail = entities::cash_pickup::ActiveModel {
                transaction_id: ActiveValue::Set(transaction_id),
                recipient_id: ActiveValue::Set(
                    resolver.optional(KeyKind::Recipient, row.int("RecipientId")),
                ),
                receiver_name: ActiveValue::Set(full_name(&[
                    row.text("ReceiverFirstName"),
                    row.text("ReceiverMiddleName"),
                    row.text("ReceiverLastName"),
                ])),
                pickup_city: ActiveValue::Set(row.text("PickupCity")),
                id_type: ActiveValue::Set(row.text("IdType")),
                id_number: ActiveValue::Set(row.text("IdNumber")),
            };
            let conflict = OnConflict::column(entities::cash_pickup::Column::TransactionId)
                .update_columns([
                    entities::cash_pickup::Column::RecipientId,
                    entities::cash_pickup::Column::ReceiverName,
                    entities::cash_pickup::Column::PickupCity,
                    entities::cash_pickup::Column::IdType,
                    entities::cash_pickup::Column::IdNumber,
                ])
                .to_owned();
            entities::cash_pickup::Entity::insert(detail)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(
            entity = "cash_pickup",
            migrated = tally.migrated,
            skipped = tally.skipped,
            duplicates = tally.duplicates
        );
        Ok(tally)
    }

    /// Migrates KiiBank in-network wallet transfers.
    pub async fn migrate_kiibank_transfers(&self, resolver: &Resolver) -> MigrateResult<Tally> {
        let rows = fetch_all(&self.source, SELECT_KIIBANK).await?;
        let mut tally = Tally::default();

        for row in rows {
            let Some(parent) = read_parent(&row, LegacySource::KiiBank) else {
                tracing::warn!(entity = "kiibank", "unreadable transfer row skipped");
                tally.skipped += 1;
                continue;
            };
            let receipt_no = parent.receipt_no.clone();
            let transaction_id = match self
                .upsert_transaction(resolver, parent, TransferModule::KiiBank)
                .await?
            {
                ParentOutcome::Committed(id) => id,
                ParentOutcome::Rejected => {
                    tally.skipped += 1;
                    continue;
                }
                ParentOutcome::Duplicate => {
                    tally.duplicates += 1;
                    continue;
                }
            };

            let Some(receiver_account_no) = row.text("ReceiverAccountNo") else {
                tracing::warn!(receipt_no, "transfer without receiver account, detail skipped");
                tally.skipped += 1;
                continue;
            };
            let detail = entities::kiibank_transfer::ActiveModel {
                transaction_id: ActiveValue::Set(transaction_id),
                receiver_account_no: ActiveValue::Set(receiver_account_no),
                receiver_name: ActiveValue::Set(full_name(&[
                    row.text("ReceiverFirstName"),
                    row.text("ReceiverLastName"),
                ])),
            };
            let conflict = OnConflict::column(entities::kiibank_transfer::Column::TransactionId)
                .update_columns([
                    entities::kiibank_transfer::Column::ReceiverAccountNo,
                    entities::kiibank_transfer::Column::ReceiverName,
                ])
                .to_owned();
            entities::kiibank_transfer::Entity::insert(detail)
                .on_conflict(conflict)
                .exec(&self.target)
                .await?;
            tally.migrated += 1;
        }

        tracing::info!(
            entity = "kiibank",
            migrated = tally.migrated,
            skipped = tally.skipped,
            duplicates = tally.duplicates
        );
        Ok(tally)
    }
}
