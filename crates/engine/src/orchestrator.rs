//! Migration orchestrator.
//!
//! Phases run strictly in order because later phases validate foreign keys
//! against what earlier phases committed; migrators inside a phase run in
//! declared order for the same reason. A row-level fault never aborts a
//! phase; a store-level fault (connectivity, failed SELECT or DDL) aborts
//! the run and surfaces as a failed report carrying the tallies gathered so
//! far.
use chrono::{DateTime, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    Engine, MigrateResult, bootstrap, entities,
    migrators::Tally,
    reconcile,
    resolver::{self, KeyKind, Resolver},
    source,
};

/// Run progress, also the state machine of a run:
/// `NotStarted → ReferenceData → UserData → TransactionData → done`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ReferenceData,
    UserData,
    TransactionData,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReferenceData => "reference_data",
            Self::UserData => "user_data",
            Self::TransactionData => "transaction_data",
        }
    }
}

/// Tally of one migrator, labeled for the report.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct EntityTally {
    pub entity: &'static str,
    #[serde(flatten)]
    pub tally: Tally,
}

/// Result record of a full migration run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub error: Option<String>,
    pub counts: Vec<EntityTally>,
}

/// One row of the read-only validation report.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ValidationRow {
    pub entity: &'static str,
    pub source_rows: u64,
    pub target_rows: u64,
    pub matched: bool,
}

impl Engine {
    /// Runs the whole migration: schema bootstrap, then the three phases.
    ///
    /// Never returns an error: a fatal fault is folded into a failed
    /// [`RunReport`]. Re-running is the retry mechanism, since every write
    /// is an idempotent upsert.
    pub async fn run_full_migration(&self) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(%run_id, batch_size = self.batch_size, "migration run started");

        let mut counts = Vec::new();
        let outcome = self.run_phases(&mut counts).await;
        let finished_at = Utc::now();

        let (success, error) = match outcome {
            Ok(()) => {
                tracing::info!(%run_id, "migration run completed");
                (true, None)
            }
            Err(err) => {
                tracing::error!(%run_id, error = %err, "migration run failed");
                (false, Some(err.to_string()))
            }
        };

        RunReport {
            run_id,
            success,
            started_at,
            finished_at,
            duration_ms: (finished_at - started_at).num_milliseconds(),
            error,
            counts,
        }
    }

    async fn run_phases(&self, counts: &mut Vec<EntityTally>) -> MigrateResult<()> {
        bootstrap::ensure_target_schema(&self.target).await?;

        // Reference data: countries first, banks and operators reference
        // their codes.
        tracing::info!(phase = Phase::ReferenceData.as_str(), "phase started");
        counts.push(EntityTally {
            entity: "country",
            tally: self.migrate_countries().await?,
        });
        let countries = resolver::load_country_codes(&self.target).await?;
        counts.push(EntityTally {
            entity: "bank",
            tally: self.migrate_banks(&countries).await?,
        });
        counts.push(EntityTally {
            entity: "wallet_operator",
            tally: self.migrate_wallet_operators(&countries).await?,
        });
        counts.push(EntityTally {
            entity: "staff",
            tally: self.migrate_staff().await?,
        });

        // User data. The sender snapshot is taken after the sender migrator
        // and before the first migrator that consults it.
        tracing::info!(phase = Phase::UserData.as_str(), "phase started");
        counts.push(EntityTally {
            entity: "sender",
            tally: self.migrate_senders(&countries).await?,
        });
        let user_keys = Resolver::load(&self.target, &[KeyKind::Sender]).await?;
        counts.push(EntityTally {
            entity: "sender_login",
            tally: self.migrate_sender_logins(&user_keys).await?,
        });
        counts.push(EntityTally {
            entity: "recipient",
            tally: self.migrate_recipients(&user_keys).await?,
        });
        counts.push(EntityTally {
            entity: "receiver_detail",
            tally: self.migrate_receiver_details(&user_keys).await?,
        });

        // Transaction data: all key sets snapshot once, before any transfer
        // migrator runs.
        tracing::info!(phase = Phase::TransactionData.as_str(), "phase started");
        let keys = Resolver::load(
            &self.target,
            &[
                KeyKind::Sender,
                KeyKind::Staff,
                KeyKind::Bank,
                KeyKind::WalletOperator,
                KeyKind::Recipient,
            ],
        )
        .await?;
        counts.push(EntityTally {
            entity: "bank_deposit",
            tally: self.migrate_bank_deposits(&keys).await?,
        });
        counts.push(EntityTally {
            entity: "mobile_money",
            tally: self.migrate_mobile_money(&keys).await?,
        });
        counts.push(EntityTally {
            entity: "cash_pickup",
            tally: self.migrate_cash_pickups(&keys).await?,
        });
        counts.push(EntityTally {
            entity: "kiibank",
            tally: self.migrate_kiibank_transfers(&keys).await?,
        });

        // Cards come last: the reconciliation map joins against every
        // transaction committed above.
        let map = reconcile::build_reconciliation_map(&self.source, &self.target).await?;
        counts.push(EntityTally {
            entity: "card_payment",
            tally: self.migrate_card_payments(&map).await?,
        });
        counts.push(EntityTally {
            entity: "reinitialize",
            tally: self.migrate_reinitialized(&keys).await?,
        });

        Ok(())
    }

    /// Provisions the canonical schema without migrating anything.
    pub async fn create_schema(&self) -> MigrateResult<()> {
        bootstrap::ensure_target_schema(&self.target).await
    }

    /// Applies an operator-supplied DDL script to the target.
    pub async fn apply_ddl_file(&self, path: &str) -> MigrateResult<()> {
        let sql =
            std::fs::read_to_string(path).map_err(|err| crate::MigrateError::DdlScript {
                path: path.to_string(),
                reason: err.to_string(),
            })?;
        bootstrap::apply_ddl_script(&self.target, &sql).await
    }

    /// Read-only row-count comparison between source and target, per
    /// entity. Writes nothing.
    pub async fn validate(&self) -> MigrateResult<Vec<ValidationRow>> {
        let mut report = Vec::new();

        let pairs: [(&'static str, &'static str); 9] = [
            (
                "country",
                "SELECT COUNT(*) AS cnt FROM tblCountries WHERE IsDeleted = 0",
            ),
            (
                "bank",
                "SELECT COUNT(*) AS cnt FROM tblBanks WHERE IsDeleted = 0",
            ),
            (
                "wallet_operator",
                "SELECT COUNT(*) AS cnt FROM tblMobileWalletOperators WHERE IsDeleted = 0",
            ),
            (
                "staff",
                "SELECT COUNT(*) AS cnt FROM tblAdminUsers WHERE IsDeleted = 0",
            ),
            (
                "sender",
                "SELECT COUNT(*) AS cnt FROM tblSenders WHERE IsDeleted = 0",
            ),
            (
                "recipient",
                "SELECT COUNT(*) AS cnt FROM tblRecipients WHERE IsDeleted = 0",
            ),
            (
                "receiver_detail",
                "SELECT COUNT(*) AS cnt FROM tblReceiverDetails WHERE IsDeleted = 0",
            ),
            (
                "card_payment",
                "SELECT COUNT(*) AS cnt FROM tblCardPayments",
            ),
            (
                "reinitialize",
                "SELECT COUNT(*) AS cnt FROM tblReinitializedTransactions WHERE IsDeleted = 0",
            ),
        ];

        for (entity, sql) in pairs {
            let source_rows = self.source_count(sql).await?;
            let target_rows = self.target_count(entity).await?;
            report.push(ValidationRow {
                entity,
                source_rows,
                target_rows,
                matched: source_rows == target_rows,
            });
        }

        // Transactions unify four legacy tables; compare against their sum.
        let mut source_rows = 0;
        for sql in [
            "SELECT COUNT(*) AS cnt FROM tblBankDeposits WHERE IsDeleted = 0",
            "SELECT COUNT(*) AS cnt FROM tblMobileMoneyTransfers WHERE IsDeleted = 0",
            "SELECT COUNT(*) AS cnt FROM tblCashPickups WHERE IsDeleted = 0",
            "SELECT COUNT(*) AS cnt FROM tblKiiBankTransfers",
        ] {
            source_rows += self.source_count(sql).await?;
        }
        let target_rows = entities::transaction::Entity::find()
            .count(&self.target)
            .await?;
        report.push(ValidationRow {
            entity: "transaction",
            source_rows,
            target_rows,
            matched: source_rows == target_rows,
        });

        Ok(report)
    }

    async fn source_count(&self, sql: &str) -> MigrateResult<u64> {
        let rows = source::fetch_all(&self.source, sql).await?;
        Ok(rows
            .first()
            .and_then(|row| row.int("cnt"))
            .unwrap_or(0)
            .max(0) as u64)
    }

    async fn target_count(&self, entity: &'static str) -> MigrateResult<u64> {
        let count = match entity {
            "country" => entities::country::Entity::find().count(&self.target).await?,
            "bank" => entities::bank::Entity::find().count(&self.target).await?,
            "wallet_operator" => {
                entities::wallet_operator::Entity::find()
                    .count(&self.target)
                    .await?
            }
            "staff" => entities::staff::Entity::find().count(&self.target).await?,
            "sender" => entities::sender::Entity::find().count(&self.target).await?,
            "recipient" => {
                entities::recipient::Entity::find()
                    .count(&self.target)
                    .await?
            }
            "receiver_detail" => {
                entities::receiver_detail::Entity::find()
                    .count(&self.target)
                    .await?
            }
            "card_payment" => {
                entities::card_payment::Entity::find()
                    .count(&self.target)
                    .await?
            }
            "reinitialize" => {
                entities::reinitialize::Entity::find()
                    .count(&self.target)
                    .await?
            }
            _ => 0,
        };
        Ok(count)
    }
}
