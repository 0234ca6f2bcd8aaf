//! # Mileage Repository
//!
//! Database operations for business mileage entries.
//!
//! ## Entry Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Mileage Entry Lifecycle                          │
//! │                                                                     │
//! │  1. CREATE                                                          │
//! │     └── validate → YTD sum for the trip's year → price trip         │
//! │         → insert with rate_applied + claim_amount persisted         │
//! │         (explicit claim override allowed here, rate still computed) │
//! │                                                                     │
//! │  2. EDIT                                                            │
//! │     └── validate → YTD sum EXCLUDING this entry → reprice           │
//! │         → update row (no override accepted, computed values win)    │
//! │                                                                     │
//! │  3. DELETE                                                          │
//! │     └── row removed; sibling entries are NOT recomputed             │
//! │         (accepted inconsistency, see DESIGN.md)                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing itself is pure (`autow_core::mileage`); this repository
//! supplies the year-to-date snapshot and persists the result. Values
//! are fully computed before any write runs, so a failed aggregate query
//! leaves no partially-priced row behind.

use chrono::{Datelike, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use autow_core::mileage::{calculate_claim, claim_for_creation};
use autow_core::validation::{validate_entry_update, validate_new_entry};
use autow_core::{MileageEntry, MileageEntryUpdate, NewMileageEntry};

/// Repository for mileage database operations.
#[derive(Debug, Clone)]
pub struct MileageRepository {
    pool: SqlitePool,
}

impl MileageRepository {
    /// Creates a new MileageRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MileageRepository { pool }
    }

    /// Sum of miles recorded in the given calendar year, optionally
    /// excluding one entry (the entry under edit).
    ///
    /// This is the snapshot the tier split is computed against. Two
    /// concurrent submissions can each see a sum that misses the other's
    /// insert; with a small staff team that misordering is accepted
    /// (the rate is advisory, the claim error is pennies).
    pub async fn ytd_miles(&self, year: i32, exclude_id: Option<&str>) -> DbResult<f64> {
        let year_key = format!("{year:04}");

        let total: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(miles), 0.0)
            FROM mileage_entries
            WHERE strftime('%Y', date) = ?1
              AND (?2 IS NULL OR id != ?2)
            "#,
        )
        .bind(&year_key)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Records a new trip.
    ///
    /// Prices the trip against the year-to-date miles at submission time
    /// and persists the derived fields. If `explicit_claim` is supplied
    /// it is stored as-is while the computed rate is still recorded for
    /// audit (documented allowed inconsistency).
    pub async fn create(&self, new: NewMileageEntry) -> DbResult<MileageEntry> {
        validate_new_entry(&new)?;

        let ytd = self.ytd_miles(new.date.year(), None).await?;
        let priced = claim_for_creation(new.miles, ytd, new.explicit_claim);

        let entry = MileageEntry {
            id: Uuid::new_v4().to_string(),
            date: new.date,
            vehicle: new.vehicle.trim().to_string(),
            start_location: new.start_location.trim().to_string(),
            destination: new.destination.trim().to_string(),
            purpose: new.purpose.trim().to_string(),
            miles: new.miles,
            rate_applied_pence: priced.rate.pence(),
            claim_amount_pence: priced.claim.pence(),
            notes: new.notes,
            invoice_id: new.invoice_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        debug!(
            id = %entry.id,
            miles = entry.miles,
            ytd_miles = ytd,
            rate = %entry.rate(),
            claim = %entry.claim(),
            "Recording mileage entry"
        );

        sqlx::query(
            r#"
            INSERT INTO mileage_entries (
                id, date, vehicle, start_location, destination, purpose,
                miles, rate_applied_pence, claim_amount_pence,
                notes, invoice_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.date)
        .bind(&entry.vehicle)
        .bind(&entry.start_location)
        .bind(&entry.destination)
        .bind(&entry.purpose)
        .bind(entry.miles)
        .bind(entry.rate_applied_pence)
        .bind(entry.claim_amount_pence)
        .bind(&entry.notes)
        .bind(&entry.invoice_id)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Edits an existing trip, repricing it from scratch.
    ///
    /// The year-to-date sum EXCLUDES the entry under edit, so moving a
    /// trip between years or resizing it lands in the same tier split it
    /// would have received as a fresh submission. No claim override is
    /// accepted here; the computed values always win.
    pub async fn update(&self, id: &str, update: MileageEntryUpdate) -> DbResult<MileageEntry> {
        validate_entry_update(&update)?;

        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Mileage entry", id))?;

        let ytd = self.ytd_miles(update.date.year(), Some(id)).await?;
        let priced = calculate_claim(update.miles, ytd);

        let entry = MileageEntry {
            id: existing.id,
            date: update.date,
            vehicle: update.vehicle.trim().to_string(),
            start_location: update.start_location.trim().to_string(),
            destination: update.destination.trim().to_string(),
            purpose: update.purpose.trim().to_string(),
            miles: update.miles,
            rate_applied_pence: priced.rate.pence(),
            claim_amount_pence: priced.claim.pence(),
            notes: update.notes,
            invoice_id: update.invoice_id,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        debug!(
            id = %entry.id,
            miles = entry.miles,
            ytd_miles = ytd,
            rate = %entry.rate(),
            claim = %entry.claim(),
            "Repricing mileage entry"
        );

        let result = sqlx::query(
            r#"
            UPDATE mileage_entries SET
                date = ?2,
                vehicle = ?3,
                start_location = ?4,
                destination = ?5,
                purpose = ?6,
                miles = ?7,
                rate_applied_pence = ?8,
                claim_amount_pence = ?9,
                notes = ?10,
                invoice_id = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(&entry.id)
        .bind(entry.date)
        .bind(&entry.vehicle)
        .bind(&entry.start_location)
        .bind(&entry.destination)
        .bind(&entry.purpose)
        .bind(entry.miles)
        .bind(entry.rate_applied_pence)
        .bind(entry.claim_amount_pence)
        .bind(&entry.notes)
        .bind(&entry.invoice_id)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Mileage entry", id));
        }

        Ok(entry)
    }

    /// Gets an entry by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MileageEntry>> {
        let entry = sqlx::query_as::<_, MileageEntry>(
            r#"
            SELECT id, date, vehicle, start_location, destination, purpose,
                   miles, rate_applied_pence, claim_amount_pence,
                   notes, invoice_id, created_at, updated_at
            FROM mileage_entries
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists all entries for a calendar year, newest trip first.
    pub async fn list_for_year(&self, year: i32) -> DbResult<Vec<MileageEntry>> {
        let year_key = format!("{year:04}");

        let entries = sqlx::query_as::<_, MileageEntry>(
            r#"
            SELECT id, date, vehicle, start_location, destination, purpose,
                   miles, rate_applied_pence, claim_amount_pence,
                   notes, invoice_id, created_at, updated_at
            FROM mileage_entries
            WHERE strftime('%Y', date) = ?1
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(&year_key)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Deletes an entry.
    ///
    /// Later entries of the same year keep the rate/claim they were
    /// priced with; there is no cascading recomputation.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM mileage_entries WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Mileage entry", id));
        }

        debug!(id = %id, "Deleted mileage entry");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use autow_core::Money;
    use chrono::NaiveDate;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn trip(date: (i32, u32, u32), miles: f64) -> NewMileageEntry {
        NewMileageEntry {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            vehicle: "Transit".to_string(),
            start_location: "Workshop".to_string(),
            destination: "Client site".to_string(),
            purpose: "Callout".to_string(),
            miles,
            notes: None,
            invoice_id: None,
            explicit_claim: None,
        }
    }

    #[tokio::test]
    async fn test_create_prices_against_ytd() {
        let db = test_db().await;
        let repo = db.mileage();

        // Push the year to 9,980 miles, then record a straddling trip.
        repo.create(trip((2026, 1, 10), 9_980.0)).await.unwrap();
        let entry = repo.create(trip((2026, 1, 15), 50.0)).await.unwrap();

        assert_eq!(entry.claim_amount_pence, 1650); // £16.50
        assert_eq!(entry.rate_applied_pence, 33); // blended £0.33/mile
    }

    #[tokio::test]
    async fn test_first_trip_of_year_is_tier1() {
        let db = test_db().await;
        let entry = db.mileage().create(trip((2026, 3, 1), 200.0)).await.unwrap();

        assert_eq!(entry.rate_applied_pence, 45);
        assert_eq!(entry.claim_amount_pence, 9000); // £90.00
    }

    #[tokio::test]
    async fn test_years_are_independent() {
        let db = test_db().await;
        let repo = db.mileage();

        repo.create(trip((2025, 12, 30), 11_000.0)).await.unwrap();
        // Last year's miles don't drag this trip into tier 2.
        let entry = repo.create(trip((2026, 1, 2), 100.0)).await.unwrap();

        assert_eq!(entry.rate_applied_pence, 45);
        assert_eq!(repo.ytd_miles(2026, None).await.unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_explicit_claim_override_at_creation() {
        let db = test_db().await;
        let repo = db.mileage();

        repo.create(trip((2026, 1, 10), 9_980.0)).await.unwrap();

        let mut overridden = trip((2026, 1, 15), 50.0);
        overridden.explicit_claim = Some(Money::from_pence(2000));
        let entry = repo.create(overridden).await.unwrap();

        // Override wins for the claim; computed rate kept for audit.
        assert_eq!(entry.claim_amount_pence, 2000);
        assert_eq!(entry.rate_applied_pence, 33);
    }

    #[tokio::test]
    async fn test_update_reprices_excluding_self() {
        let db = test_db().await;
        let repo = db.mileage();

        repo.create(trip((2026, 1, 5), 9_980.0)).await.unwrap();
        let entry = repo.create(trip((2026, 1, 15), 50.0)).await.unwrap();
        assert_eq!(entry.claim_amount_pence, 1650);

        // Resize the trip; the YTD snapshot must exclude the old miles
        // of the entry itself, so the split is 20 @ 45p + 80 @ 25p.
        let updated = repo
            .update(
                &entry.id,
                MileageEntryUpdate {
                    date: entry.date,
                    vehicle: entry.vehicle.clone(),
                    start_location: entry.start_location.clone(),
                    destination: entry.destination.clone(),
                    purpose: entry.purpose.clone(),
                    miles: 100.0,
                    notes: None,
                    invoice_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.claim_amount_pence, 2900); // £9.00 + £20.00
        assert_eq!(updated.rate_applied_pence, 29);

        // Persisted, not just returned.
        let reread = repo.get_by_id(&entry.id).await.unwrap().unwrap();
        assert_eq!(reread.claim_amount_pence, 2900);
    }

    #[tokio::test]
    async fn test_update_missing_entry_is_not_found() {
        let db = test_db().await;
        let err = db
            .mileage()
            .update(
                "no-such-id",
                MileageEntryUpdate {
                    date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
                    vehicle: "Transit".to_string(),
                    start_location: "A".to_string(),
                    destination: "B".to_string(),
                    purpose: String::new(),
                    miles: 10.0,
                    notes: None,
                    invoice_id: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_validation_failure_persists_nothing() {
        let db = test_db().await;
        let repo = db.mileage();

        let mut bad = trip((2026, 1, 15), -5.0);
        bad.vehicle = String::new();
        assert!(repo.create(bad).await.is_err());

        assert!(repo.list_for_year(2026).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_does_not_reprice_siblings() {
        let db = test_db().await;
        let repo = db.mileage();

        let first = repo.create(trip((2026, 1, 10), 9_980.0)).await.unwrap();
        let second = repo.create(trip((2026, 1, 15), 50.0)).await.unwrap();
        assert_eq!(second.rate_applied_pence, 33);

        repo.delete(&first.id).await.unwrap();

        // The survivor keeps its blended figures even though its year
        // now has headroom again.
        let survivor = repo.get_by_id(&second.id).await.unwrap().unwrap();
        assert_eq!(survivor.rate_applied_pence, 33);
        assert_eq!(survivor.claim_amount_pence, 1650);

        assert!(matches!(
            repo.delete(&first.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }
}
