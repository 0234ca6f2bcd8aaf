//! # Domain Types
//!
//! Core domain types for the Autow business hub.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │  MileageEntry   │   │    Document     │   │   ShareToken    │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  opaque UUID    │   │
//! │  │  date, miles    │   │  kind           │   │  text, stable   │   │
//! │  │  rate_applied   │   │  number (INV-…) │   │  once issued    │   │
//! │  │  claim_amount   │   │  share_token    │   │                 │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where applicable (document number) - human-readable
//!
//! ## Closed Update Structs
//! Edits are expressed as explicit structs with named fields
//! ([`MileageEntryUpdate`]) rather than runtime-built field lists, so
//! the allowed field set is checked by the compiler.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::mileage::Rate;
use crate::money::Money;
use crate::numbering::DocumentKind;

// =============================================================================
// Mileage Entry
// =============================================================================

/// One recorded business trip.
///
/// The derived fields (`rate_applied_pence`, `claim_amount_pence`) are
/// computed once at creation from then-current year-to-date mileage and
/// persisted for audit; an edit recomputes them against the year's miles
/// excluding this entry. Deleting an entry does not recompute siblings
/// (accepted inconsistency, see DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MileageEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Calendar date of the trip; selects the tiering year.
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Vehicle used for the trip.
    pub vehicle: String,

    /// Where the trip started.
    pub start_location: String,

    /// Where the trip ended.
    pub destination: String,

    /// Business purpose (free text).
    pub purpose: String,

    /// Distance travelled in miles.
    pub miles: f64,

    /// Effective rate applied, in pence per mile (derived, audit).
    pub rate_applied_pence: i64,

    /// Claim amount in pence (derived, authoritative).
    pub claim_amount_pence: i64,

    /// Free-text notes.
    pub notes: Option<String>,

    /// Invoice this trip was billed against, if any.
    pub invoice_id: Option<String>,

    /// When the entry was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl MileageEntry {
    /// Returns the applied rate as a typed Rate.
    #[inline]
    pub fn rate(&self) -> Rate {
        Rate::from_pence(self.rate_applied_pence)
    }

    /// Returns the claim amount as Money.
    #[inline]
    pub fn claim(&self) -> Money {
        Money::from_pence(self.claim_amount_pence)
    }

    /// The calendar year this trip counts towards.
    #[inline]
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Payload for recording a new trip.
///
/// `explicit_claim` overrides the computed claim amount when set (the
/// computed rate is still stored for audit). Only accepted at creation;
/// edits always recompute.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMileageEntry {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub vehicle: String,
    pub start_location: String,
    pub destination: String,
    pub purpose: String,
    pub miles: f64,
    pub notes: Option<String>,
    pub invoice_id: Option<String>,
    /// Caller-supplied claim amount, overriding the computed figure.
    pub explicit_claim: Option<Money>,
}

/// Payload for editing an existing trip.
///
/// All descriptive fields are resubmitted in full; there is no claim
/// override here, the derived fields are always recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MileageEntryUpdate {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub vehicle: String,
    pub start_location: String,
    pub destination: String,
    pub purpose: String,
    pub miles: f64,
    pub notes: Option<String>,
    pub invoice_id: Option<String>,
}

// =============================================================================
// Share Token
// =============================================================================

/// Opaque token granting unauthenticated public read access to one
/// document via a share link.
///
/// Textual UUID v4 form (122 bits of CSPRNG entropy). Generated lazily
/// on the first share request (eagerly for disclaimers), then stable for
/// the life of the document. No expiry is modelled; revocation would be
/// a schema change (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct ShareToken(String);

impl ShareToken {
    /// Wraps a freshly generated UUID as a share token.
    ///
    /// The UUID must come from a cryptographically secure source; the
    /// issuing repository owns that call.
    #[inline]
    pub fn from_uuid(uuid: Uuid) -> Self {
        ShareToken(uuid.to_string())
    }

    /// Parses a token received from a public URL.
    ///
    /// Rejects anything that is not canonical UUID text, so malformed
    /// lookups fail before reaching the database.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        let uuid = Uuid::parse_str(raw).map_err(|_| ValidationError::InvalidFormat {
            field: "share_token".to_string(),
            reason: "must be a valid UUID".to_string(),
        })?;
        Ok(ShareToken(uuid.to_string()))
    }

    /// The token text, as it appears in share URLs.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Document Registry Record
// =============================================================================

/// Registry record for a numbered document.
///
/// Holds the identity concerns shared by every document kind: the
/// assigned number and the share token. Kind-specific payloads
/// (line items, report photos, signatures) belong to their own layers.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Document {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Document kind (selects numbering scheme and share URL segment).
    pub kind: DocumentKind,

    /// Assigned document number, e.g. `INV-0048` or `DS-20260115-003`.
    /// Unique, never reassigned.
    pub number: String,

    /// Customer the document is addressed to, if known.
    pub customer_name: Option<String>,

    /// Vehicle registration the document concerns, if any.
    pub vehicle_reg: Option<String>,

    /// Public share token; `None` until first issued.
    pub share_token: Option<ShareToken>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a new document.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewDocument {
    pub kind: DocumentKind,
    pub customer_name: Option<String>,
    pub vehicle_reg: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mileage_entry_helpers() {
        let entry = MileageEntry {
            id: "e1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            vehicle: "Transit".to_string(),
            start_location: "Workshop".to_string(),
            destination: "Client site".to_string(),
            purpose: "Callout".to_string(),
            miles: 50.0,
            rate_applied_pence: 33,
            claim_amount_pence: 1650,
            notes: None,
            invoice_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(entry.rate(), Rate::from_pence(33));
        assert_eq!(entry.claim(), Money::from_pence(1650));
        assert_eq!(entry.year(), 2026);
    }

    #[test]
    fn test_share_token_parse() {
        let token = ShareToken::from_uuid(Uuid::new_v4());
        let reparsed = ShareToken::parse(token.as_str()).unwrap();
        assert_eq!(token, reparsed);

        assert!(ShareToken::parse("not-a-token").is_err());
        assert!(ShareToken::parse("").is_err());
    }

    #[test]
    fn test_share_token_parse_trims_whitespace() {
        let token = ShareToken::from_uuid(Uuid::new_v4());
        let padded = format!("  {}  ", token.as_str());
        assert_eq!(ShareToken::parse(&padded).unwrap(), token);
    }
}
