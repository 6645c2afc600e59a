//! Typed access to legacy rows.
//!
//! The legacy schema is loosely typed: the same logical column may be a
//! 16/32/64-bit integer depending on the table, amounts may be stored as
//! decimal text, and some tables simply lack columns that their siblings
//! have. [`SourceRow`] wraps a raw [`QueryResult`] behind accessors that
//! normalize widths to `i64` at the read boundary and report anything
//! missing or unreadable as `None` instead of an error.
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, QueryResult, Statement};

use crate::money::{Amount, rate_micros};

/// One row read from the legacy store.
#[derive(Debug)]
pub struct SourceRow {
    row: QueryResult,
}

impl SourceRow {
    /// Integer column, normalized to `i64` regardless of the stored width.
    pub fn int(&self, col: &str) -> Option<i64> {
        if let Ok(value) = self.row.try_get::<Option<i64>>("", col) {
            return value;
        }
        if let Ok(value) = self.row.try_get::<Option<i32>>("", col) {
            return value.map(i64::from);
        }
        if let Ok(value) = self.row.try_get::<Option<i16>>("", col) {
            return value.map(i64::from);
        }
        if let Ok(value) = self.row.try_get::<Option<u32>>("", col) {
            return value.map(i64::from);
        }
        // A handful of legacy tables keep ids as text.
        self.text(col).and_then(|s| s.parse().ok())
    }

    /// Text column, trimmed; empty strings count as absent.
    pub fn text(&self, col: &str) -> Option<String> {
        let value = self.row.try_get::<Option<String>>("", col).ok()??;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Monetary column, converted to minor units.
    ///
    /// Legacy amounts are decimal text in most tables; a few store whole
    /// major units as integers, and the oldest ones use REAL columns. All
    /// three land on the same fixed-point representation here.
    pub fn amount(&self, col: &str) -> Option<Amount> {
        if let Some(text) = self.text(col) {
            return text.parse().ok();
        }
        if let Ok(Some(value)) = self.row.try_get::<Option<i64>>("", col) {
            return value.checked_mul(100).map(Amount::from_minor);
        }
        if let Ok(Some(value)) = self.row.try_get::<Option<f64>>("", col) {
            return format!("{value:.2}").parse().ok();
        }
        None
    }

    /// Exchange-rate column in micro-units.
    pub fn rate_micros(&self, col: &str) -> Option<i64> {
        if let Some(text) = self.text(col) {
            return rate_micros(&text);
        }
        if let Ok(Some(value)) = self.row.try_get::<Option<i64>>("", col) {
            return value.checked_mul(1_000_000);
        }
        if let Ok(Some(value)) = self.row.try_get::<Option<f64>>("", col) {
            return rate_micros(&format!("{value:.6}"));
        }
        None
    }

    /// Boolean-ish column: integers, text flags; absent counts as `false`.
    pub fn flag(&self, col: &str) -> bool {
        if let Some(value) = self.int(col) {
            return value != 0;
        }
        matches!(
            self.text(col).as_deref(),
            Some("true") | Some("TRUE") | Some("True") | Some("Y") | Some("y")
        )
    }

    /// Timestamp column. Legacy dates are text in a few close-but-different
    /// formats; all are interpreted as UTC.
    pub fn date(&self, col: &str) -> Option<DateTime<Utc>> {
        if let Ok(Some(value)) = self.row.try_get::<Option<DateTime<Utc>>>("", col) {
            return Some(value);
        }
        let text = self.text(col)?;
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&text) {
            return Some(parsed.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&text, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

impl From<QueryResult> for SourceRow {
    fn from(row: QueryResult) -> Self {
        Self { row }
    }
}

/// Runs one SELECT against the legacy store and wraps the rows.
///
/// Migrators always pass a fixed, explicit column list; `SELECT *` is never
/// issued against the legacy schema.
pub async fn fetch_all(db: &DatabaseConnection, sql: &str) -> Result<Vec<SourceRow>, DbErr> {
    let statement = Statement::from_string(db.get_database_backend(), sql);
    let rows = db.query_all(statement).await?;
    Ok(rows.into_iter().map(SourceRow::from).collect())
}
