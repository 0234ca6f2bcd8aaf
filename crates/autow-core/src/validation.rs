//! # Validation Module
//!
//! Input validation for trip and document payloads.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Frontend (TypeScript)                                     │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE (before any persistence)                      │
//! │  └── Required fields, non-negative miles, UUID shapes               │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  └── NOT NULL / UNIQUE / foreign key constraints                    │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The mileage calculator itself assumes valid non-negative inputs;
//! these functions are the precondition gate the repositories run before
//! invoking it. A validation failure means nothing was persisted.

use crate::error::ValidationError;
use crate::types::{MileageEntryUpdate, NewMileageEntry};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound on free-text fields (vehicle, locations, purpose).
pub const MAX_TEXT_LEN: usize = 200;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required free-text field.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most [`MAX_TEXT_LEN`] characters
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates a trip distance.
///
/// ## Rules
/// - Must be finite (no NaN/∞ smuggled in through JSON)
/// - Must be non-negative; zero is allowed (cancelled callout still logged)
///
/// ## Example
/// ```rust
/// use autow_core::validation::validate_miles;
///
/// assert!(validate_miles(50.0).is_ok());
/// assert!(validate_miles(0.0).is_ok());
/// assert!(validate_miles(-1.0).is_err());
/// assert!(validate_miles(f64::NAN).is_err());
/// ```
pub fn validate_miles(miles: f64) -> ValidationResult<()> {
    if !miles.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "miles".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if miles < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "miles".to_string(),
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use autow_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a new trip payload before it is priced and inserted.
///
/// Mirrors the required-field set of the booking form: date is enforced
/// by the type, vehicle/start/destination must be present, purpose may
/// be blank, miles must be a sane distance.
pub fn validate_new_entry(entry: &NewMileageEntry) -> ValidationResult<()> {
    validate_required_text("vehicle", &entry.vehicle)?;
    validate_required_text("start_location", &entry.start_location)?;
    validate_required_text("destination", &entry.destination)?;
    validate_miles(entry.miles)?;

    if let Some(claim) = entry.explicit_claim {
        if claim.is_negative() {
            return Err(ValidationError::MustBeNonNegative {
                field: "explicit_claim".to_string(),
            });
        }
    }

    Ok(())
}

/// Validates an edit payload before recomputation.
pub fn validate_entry_update(update: &MileageEntryUpdate) -> ValidationResult<()> {
    validate_required_text("vehicle", &update.vehicle)?;
    validate_required_text("start_location", &update.start_location)?;
    validate_required_text("destination", &update.destination)?;
    validate_miles(update.miles)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::NaiveDate;

    fn new_entry() -> NewMileageEntry {
        NewMileageEntry {
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            vehicle: "Transit".to_string(),
            start_location: "Workshop".to_string(),
            destination: "Client site".to_string(),
            purpose: "Callout".to_string(),
            miles: 50.0,
            notes: None,
            invoice_id: None,
            explicit_claim: None,
        }
    }

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("vehicle", "Transit").is_ok());
        assert!(validate_required_text("vehicle", "").is_err());
        assert!(validate_required_text("vehicle", "   ").is_err());
        assert!(validate_required_text("vehicle", &"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_miles() {
        assert!(validate_miles(0.0).is_ok());
        assert!(validate_miles(123.4).is_ok());
        assert!(validate_miles(-0.1).is_err());
        assert!(validate_miles(f64::NAN).is_err());
        assert!(validate_miles(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_new_entry() {
        assert!(validate_new_entry(&new_entry()).is_ok());

        let mut missing_vehicle = new_entry();
        missing_vehicle.vehicle = String::new();
        assert!(validate_new_entry(&missing_vehicle).is_err());

        let mut bad_miles = new_entry();
        bad_miles.miles = -5.0;
        assert!(validate_new_entry(&bad_miles).is_err());

        // Blank purpose is fine; the form allows it.
        let mut blank_purpose = new_entry();
        blank_purpose.purpose = String::new();
        assert!(validate_new_entry(&blank_purpose).is_ok());

        let mut negative_override = new_entry();
        negative_override.explicit_claim = Some(Money::from_pence(-100));
        assert!(validate_new_entry(&negative_override).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
