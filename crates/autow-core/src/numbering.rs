//! # Document Numbering
//!
//! Formatting and parsing for human-readable document numbers.
//!
//! ## Two Numbering Styles
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  DAILY SEQUENCE (disclaimers, jotter notes)                         │
//! │                                                                     │
//! │    DS-20260115-001, DS-20260115-002, ... resets next day            │
//! │    └┬┘ └───┬───┘ └┬┘                                                │
//! │  prefix  date   3-digit per-day counter                             │
//! │                                                                     │
//! │  RUNNING SEQUENCE (estimates, invoices, vehicle reports)            │
//! │                                                                     │
//! │    INV-0001, INV-0002, ... increases forever                        │
//! │    └┬┘ └─┬┘                                                         │
//! │  prefix 4-digit running counter                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module is the pure half of the generator: prefix tables,
//! formatting, and strict parsing. Sequence allocation against the
//! database lives in `autow-db`'s `DocumentRepository`, which feeds the
//! period key and counter value computed here.
//!
//! Numbers are never reassigned or reused once issued, even if the
//! owning document is deleted; the padded width is a floor, not a cap
//! (`INV-9999` is followed by `INV-10000`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Document Kind
// =============================================================================

/// The kinds of numbered documents in the system.
///
/// ## Dual-Key Identity Pattern
/// Every document has an `id` (UUID v4, immutable, used for relations)
/// and a business number from this scheme (human-readable, printed on
/// paperwork).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Repair estimate sent to a client before work starts.
    Estimate,
    /// Invoice raised after work completes.
    Invoice,
    /// Vehicle condition report.
    VehicleReport,
    /// Liability disclaimer signed before risky procedures.
    Disclaimer,
    /// Smart-jotter intake note.
    JotterNote,
}

/// Which counting scheme a document kind uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NumberStyle {
    /// Counter resets every calendar day; date is embedded in the number.
    Daily,
    /// Counter persists and increases indefinitely.
    Running,
}

impl DocumentKind {
    /// The prefix printed at the start of every number of this kind.
    pub const fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Estimate => "EST",
            DocumentKind::Invoice => "INV",
            DocumentKind::VehicleReport => "VR",
            DocumentKind::Disclaimer => "DS",
            DocumentKind::JotterNote => "JN",
        }
    }

    /// The counting scheme for this kind.
    pub const fn style(&self) -> NumberStyle {
        match self {
            DocumentKind::Estimate | DocumentKind::Invoice | DocumentKind::VehicleReport => {
                NumberStyle::Running
            }
            DocumentKind::Disclaimer | DocumentKind::JotterNote => NumberStyle::Daily,
        }
    }

    /// Zero-pad width of the counting portion.
    pub const fn pad_width(&self) -> usize {
        match self.style() {
            NumberStyle::Daily => 3,
            NumberStyle::Running => 4,
        }
    }

    /// The URL path segment used for public share links of this kind.
    pub const fn share_segment(&self) -> &'static str {
        match self {
            DocumentKind::Estimate => "estimate",
            DocumentKind::Invoice => "invoice",
            DocumentKind::VehicleReport => "vehicle-report",
            DocumentKind::Disclaimer => "disclaimer",
            DocumentKind::JotterNote => "note",
        }
    }

    /// Whether a share token is issued eagerly at creation.
    ///
    /// Disclaimers are signed remotely, so their share link must exist
    /// the moment the document does. Everything else gets a token lazily
    /// on the first share request.
    pub const fn shares_eagerly(&self) -> bool {
        matches!(self, DocumentKind::Disclaimer)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentKind::Estimate => "estimate",
            DocumentKind::Invoice => "invoice",
            DocumentKind::VehicleReport => "vehicle_report",
            DocumentKind::Disclaimer => "disclaimer",
            DocumentKind::JotterNote => "jotter_note",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats a document number for the given kind and sequence value.
///
/// For daily-style kinds `date` selects the embedded `YYYYMMDD` portion;
/// for running-style kinds it is ignored.
///
/// ## Example
/// ```rust
/// use autow_core::numbering::{format_number, DocumentKind};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// assert_eq!(format_number(DocumentKind::Disclaimer, 3, day), "DS-20260115-003");
/// assert_eq!(format_number(DocumentKind::Invoice, 48, day), "INV-0048");
/// ```
pub fn format_number(kind: DocumentKind, seq: i64, date: NaiveDate) -> String {
    match kind.style() {
        NumberStyle::Daily => format!(
            "{}-{}-{:0width$}",
            kind.prefix(),
            date.format("%Y%m%d"),
            seq,
            width = kind.pad_width()
        ),
        NumberStyle::Running => {
            format!("{}-{:0width$}", kind.prefix(), seq, width = kind.pad_width())
        }
    }
}

/// The period key under which a kind's counter is kept.
///
/// Daily kinds count per calendar day (`"20260115"`); running kinds
/// share a single all-time period (`""`).
pub fn period_key(kind: DocumentKind, date: NaiveDate) -> String {
    match kind.style() {
        NumberStyle::Daily => date.format("%Y%m%d").to_string(),
        NumberStyle::Running => String::new(),
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses the sequence value out of a running-style number.
///
/// Accepts only the canonical shape `PREFIX-<digits>` and returns `None`
/// for anything else. Used when seeding the sequence counters from
/// numbers issued before the counter table existed.
///
/// ## Example
/// ```rust
/// use autow_core::numbering::{parse_running_seq, DocumentKind};
///
/// assert_eq!(parse_running_seq(DocumentKind::Invoice, "INV-0047"), Some(47));
/// assert_eq!(parse_running_seq(DocumentKind::Invoice, "INV-0047-A"), None);
/// assert_eq!(parse_running_seq(DocumentKind::Invoice, "EST-0047"), None);
/// ```
pub fn parse_running_seq(kind: DocumentKind, number: &str) -> Option<i64> {
    if kind.style() != NumberStyle::Running {
        return None;
    }
    let digits = number.strip_prefix(kind.prefix())?.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Parses the per-day sequence value out of a daily-style number, for
/// the given day only.
pub fn parse_daily_seq(kind: DocumentKind, date: NaiveDate, number: &str) -> Option<i64> {
    if kind.style() != NumberStyle::Daily {
        return None;
    }
    let day_prefix = format!("{}-{}-", kind.prefix(), date.format("%Y%m%d"));
    let digits = number.strip_prefix(&day_prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    #[test]
    fn test_daily_format() {
        assert_eq!(
            format_number(DocumentKind::Disclaimer, 3, day()),
            "DS-20260115-003"
        );
        assert_eq!(
            format_number(DocumentKind::JotterNote, 12, day()),
            "JN-20260115-012"
        );
        // Padding is a floor, not a cap.
        assert_eq!(
            format_number(DocumentKind::Disclaimer, 1234, day()),
            "DS-20260115-1234"
        );
    }

    #[test]
    fn test_running_format() {
        assert_eq!(format_number(DocumentKind::Invoice, 48, day()), "INV-0048");
        assert_eq!(format_number(DocumentKind::Estimate, 1, day()), "EST-0001");
        assert_eq!(
            format_number(DocumentKind::VehicleReport, 7, day()),
            "VR-0007"
        );
        assert_eq!(
            format_number(DocumentKind::Invoice, 10000, day()),
            "INV-10000"
        );
    }

    #[test]
    fn test_period_key() {
        assert_eq!(period_key(DocumentKind::Disclaimer, day()), "20260115");
        assert_eq!(period_key(DocumentKind::Invoice, day()), "");
    }

    #[test]
    fn test_parse_running_seq() {
        assert_eq!(
            parse_running_seq(DocumentKind::Invoice, "INV-0047"),
            Some(47)
        );
        assert_eq!(
            parse_running_seq(DocumentKind::Invoice, "INV-10000"),
            Some(10000)
        );

        // Wrong prefix, trailing junk, missing digits, daily kind.
        assert_eq!(parse_running_seq(DocumentKind::Invoice, "EST-0047"), None);
        assert_eq!(parse_running_seq(DocumentKind::Invoice, "INV-0047-A"), None);
        assert_eq!(parse_running_seq(DocumentKind::Invoice, "INV-"), None);
        assert_eq!(
            parse_running_seq(DocumentKind::Disclaimer, "DS-20260115-001"),
            None
        );
    }

    #[test]
    fn test_parse_daily_seq() {
        assert_eq!(
            parse_daily_seq(DocumentKind::Disclaimer, day(), "DS-20260115-002"),
            Some(2)
        );
        // Other days don't match.
        assert_eq!(
            parse_daily_seq(DocumentKind::Disclaimer, day(), "DS-20260114-002"),
            None
        );
        assert_eq!(
            parse_daily_seq(DocumentKind::Disclaimer, day(), "DS-20260115-"),
            None
        );
    }

    #[test]
    fn test_prefixes_are_distinct() {
        let kinds = [
            DocumentKind::Estimate,
            DocumentKind::Invoice,
            DocumentKind::VehicleReport,
            DocumentKind::Disclaimer,
            DocumentKind::JotterNote,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.prefix(), b.prefix());
            }
        }
    }
}
