//! Entity migrators, one per legacy source table.
//!
//! Every migrator follows the same contract: one SELECT with an explicit
//! column list against the legacy store (soft-delete filtered where the
//! table supports it), field transformation through [`crate::source`] and
//! [`crate::enums`], foreign-key validation against the phase's resolver
//! snapshot, and an idempotent upsert keyed by the entity's natural key.
//! Row-level faults are logged and skipped; only store-level faults
//! propagate.
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

mod cards;
mod reference;
mod reinit;
mod transfers;
mod users;

/// Per-migrator outcome, returned to the orchestrator and aggregated there.
/// Migrators share no mutable counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Rows upserted into the target store.
    pub migrated: u64,
    /// Rows skipped: missing required fields, missing required foreign keys,
    /// or a rejected detail row.
    pub skipped: u64,
    /// Rows dropped on a unique-constraint violation of a natural key.
    pub duplicates: u64,
}

/// Duplicate-natural-key policy: a unique violation is a warning, not a
/// fatal error.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Builds a receiver's full name by trimming and joining the name parts the
/// legacy row actually carries.
pub(crate) fn full_name(parts: &[Option<String>]) -> Option<String> {
    let joined = parts
        .iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() { None } else { Some(joined) }
}

#[cfg(test)]
mod tests {
    use super::full_name;

    #[test]
    fn full_name_trims_and_joins_present_parts() {
        assert_eq!(
            full_name(&[
                Some("  Ada ".to_string()),
                None,
                Some("Obi".to_string())
            ]),
            Some("Ada Obi".to_string())
        );
        assert_eq!(full_name(&[None, Some("   ".to_string()), None]), None);
        assert_eq!(full_name(&[]), None);
    }
}
