//! Canonical enumerations and the legacy-code translators.
//!
//! The legacy schema keeps one numeric enumeration per source table, and the
//! same raw code means different things depending on which table it came
//! from. Everything funnels into the canonical enums below, stored as text
//! in the target schema.

/// Which legacy transfer table a raw code came from.
///
/// Status translation is parameterized by this because the per-table
/// enumerations share numeric codes with different meanings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegacySource {
    BankDeposit,
    MobileMoney,
    CashPickup,
    KiiBank,
}

impl LegacySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BankDeposit => "bank_deposit",
            Self::MobileMoney => "mobile_money",
            Self::CashPickup => "cash_pickup",
            Self::KiiBank => "kiibank",
        }
    }
}

/// Canonical transfer status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStatus {
    InProgress,
    OnHold,
    Completed,
    Cancelled,
    Failed,
    Refunded,
}

impl TransferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Translates a raw per-table status code.
    ///
    /// Unknown codes fall back to `InProgress`. The legacy engine behaved
    /// this way for undocumented codes (e.g. `9` in the deposit table) and
    /// the fallback is kept as observed, pending product-owner confirmation;
    /// the warning below is the audit trail for that gap.
    pub fn from_legacy(source: LegacySource, code: i64) -> Self {
        let mapped = match source {
            LegacySource::BankDeposit => match code {
                1 => Some(Self::InProgress),
                2 => Some(Self::OnHold),
                3 => Some(Self::Cancelled),
                4 => Some(Self::Completed),
                5 => Some(Self::Failed),
                6 => Some(Self::Refunded),
                _ => None,
            },
            LegacySource::MobileMoney => match code {
                0 => Some(Self::InProgress),
                1 => Some(Self::Completed),
                2 => Some(Self::Failed),
                3 => Some(Self::Cancelled),
                4 => Some(Self::OnHold),
                _ => None,
            },
            LegacySource::CashPickup => match code {
                1 => Some(Self::InProgress),
                2 => Some(Self::OnHold),
                3 => Some(Self::Completed),
                4 => Some(Self::Cancelled),
                _ => None,
            },
            LegacySource::KiiBank => match code {
                1 => Some(Self::InProgress),
                2 => Some(Self::Completed),
                3 => Some(Self::Refunded),
                4 => Some(Self::Failed),
                _ => None,
            },
        };

        mapped.unwrap_or_else(|| {
            tracing::warn!(
                source = source.as_str(),
                code,
                "unmapped legacy status code, defaulting to in_progress"
            );
            Self::InProgress
        })
    }
}

/// Transfer type in the canonical schema; assigned by the migrator, one per
/// legacy transfer table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferModule {
    BankDeposit,
    MobileMoney,
    CashPickup,
    KiiBank,
}

impl TransferModule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BankDeposit => "bank_deposit",
            Self::MobileMoney => "mobile_money",
            Self::CashPickup => "cash_pickup",
            Self::KiiBank => "kiibank",
        }
    }
}

/// How the sender funded the transfer. Optional in the canonical schema;
/// unknown legacy codes stay absent rather than guessed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentMode {
    Card,
    BankTransfer,
    Cash,
    Wallet,
}

impl PaymentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::Cash => "cash",
            Self::Wallet => "wallet",
        }
    }

    pub fn from_legacy(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Card),
            2 => Some(Self::BankTransfer),
            3 => Some(Self::Cash),
            4 => Some(Self::Wallet),
            _ => None,
        }
    }
}

/// Declared reason for the transfer (compliance field).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferReason {
    FamilySupport,
    Bills,
    Education,
    Medical,
    Business,
    Gift,
}

impl TransferReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FamilySupport => "family_support",
            Self::Bills => "bills",
            Self::Education => "education",
            Self::Medical => "medical",
            Self::Business => "business",
            Self::Gift => "gift",
        }
    }

    pub fn from_legacy(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::FamilySupport),
            2 => Some(Self::Bills),
            3 => Some(Self::Education),
            4 => Some(Self::Medical),
            5 => Some(Self::Business),
            6 => Some(Self::Gift),
            _ => None,
        }
    }
}

/// Card processor behind a card payment record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardProcessorApi {
    Stripe,
    Paystack,
    Flutterwave,
}

impl CardProcessorApi {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Paystack => "paystack",
            Self::Flutterwave => "flutterwave",
        }
    }

    pub fn from_legacy(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Stripe),
            2 => Some(Self::Paystack),
            3 => Some(Self::Flutterwave),
            _ => None,
        }
    }
}

/// Downstream payout API that executed the transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiService {
    Flutterwave,
    Monnify,
    Paga,
}

impl ApiService {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flutterwave => "flutterwave",
            Self::Monnify => "monnify",
            Self::Paga => "paga",
        }
    }

    pub fn from_legacy(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Flutterwave),
            2 => Some(Self::Monnify),
            3 => Some(Self::Paga),
            _ => None,
        }
    }
}

/// Settlement status of a card payment record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardPaymentStatus {
    Paid,
    Failed,
    Refunded,
}

impl CardPaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    pub fn from_legacy(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Paid),
            2 => Some(Self::Failed),
            3 => Some(Self::Refunded),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_depend_on_source_table() {
        // Raw code 3 collides across legacy tables with different meanings.
        assert_eq!(
            TransferStatus::from_legacy(LegacySource::BankDeposit, 3),
            TransferStatus::Cancelled
        );
        assert_eq!(
            TransferStatus::from_legacy(LegacySource::CashPickup, 3),
            TransferStatus::Completed
        );
        assert_eq!(
            TransferStatus::from_legacy(LegacySource::KiiBank, 3),
            TransferStatus::Refunded
        );
    }

    #[test]
    fn unknown_status_falls_back_to_in_progress() {
        assert_eq!(
            TransferStatus::from_legacy(LegacySource::BankDeposit, 99),
            TransferStatus::InProgress
        );
        assert_eq!(
            TransferStatus::from_legacy(LegacySource::MobileMoney, 9),
            TransferStatus::InProgress
        );
    }

    #[test]
    fn optional_enums_resolve_unknown_to_absent() {
        assert_eq!(PaymentMode::from_legacy(42), None);
        assert_eq!(TransferReason::from_legacy(0), None);
        assert_eq!(CardProcessorApi::from_legacy(-1), None);
        assert_eq!(ApiService::from_legacy(7), None);
    }
}
