//! # Mileage Rate Calculator
//!
//! Prices a business trip under the two-tier HMRC mileage scheme.
//!
//! ## The Two-Tier Scheme (2025/26 rates)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Cumulative miles in calendar year                                  │
//! │                                                                     │
//! │  0 ───────────────────── 10,000 ──────────────────────────► ∞       │
//! │  │        45p/mile         │           25p/mile                     │
//! │  └────────── Tier 1 ───────┴──────────── Tier 2 ─────────────       │
//! │                                                                     │
//! │  A trip that straddles the threshold is split:                      │
//! │                                                                     │
//! │  YTD = 9,980 miles, trip = 50 miles                                 │
//! │       ├── 20 miles × £0.45 = £9.00   (up to 10,000)                 │
//! │       └── 30 miles × £0.25 = £7.50   (beyond 10,000)                │
//! │                              ──────                                 │
//! │       claim = £16.50, blended rate = 16.50 / 50 = £0.33/mile        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Guarantee
//! The same pure function prices a trip at creation and at later
//! recalculation (edit) time. The caller supplies the year-to-date miles
//! snapshot; when editing, the entry under edit is excluded from that sum.
//!
//! ## Rounding Invariant
//! The stored claim is the rounded two-part sum, NOT `rate × miles`.
//! The blended rate is advisory (display/audit); re-multiplying the
//! rounded rate by the distance would drift by up to half a penny per
//! mile.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Scheme Constants
// =============================================================================

/// Cumulative annual mileage at which the reimbursement rate drops.
pub const TIER_THRESHOLD_MILES: f64 = 10_000.0;

/// Rate for the first [`TIER_THRESHOLD_MILES`] miles per calendar year.
pub const TIER1_RATE: Rate = Rate::from_pence(45);

/// Rate beyond [`TIER_THRESHOLD_MILES`] miles per calendar year.
pub const TIER2_RATE: Rate = Rate::from_pence(25);

// =============================================================================
// Rate
// =============================================================================

/// A per-mile reimbursement rate in pence per mile.
///
/// ## Why Integer Pence?
/// Rates are persisted to 2 decimal places of pounds, which is exactly
/// integer pence. 45 = £0.45/mile. Blended rates produced by a tier
/// split (e.g. £0.33/mile) are representable without float storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(i64);

impl Rate {
    /// Creates a rate from pence per mile.
    #[inline]
    pub const fn from_pence(pence: i64) -> Self {
        Rate(pence)
    }

    /// Creates a rate from decimal pounds per mile, rounding half-up to
    /// the penny (the persisted 2dp form).
    #[inline]
    pub fn from_pounds(pounds_per_mile: f64) -> Self {
        Rate((pounds_per_mile * 100.0).round() as i64)
    }

    /// Returns the rate in pence per mile.
    #[inline]
    pub const fn pence(&self) -> i64 {
        self.0
    }

    /// Returns the rate in decimal pounds per mile (for display only).
    #[inline]
    pub fn pounds(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "£{}.{:02}/mile", self.0 / 100, (self.0 % 100).abs())
    }
}

// =============================================================================
// Mileage Claim
// =============================================================================

/// The priced outcome for one trip: the applied (possibly blended) rate
/// and the authoritative claim amount.
///
/// Both values are already currency-rounded and ready to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MileageClaim {
    /// Effective rate applied, rounded to the penny. Advisory: for a
    /// straddling trip this is the blended average, not a scheme rate.
    pub rate: Rate,

    /// Amount to reimburse, rounded to the penny. Authoritative.
    pub claim: Money,
}

/// Computes the reimbursement rate and claim for a trip.
///
/// ## Arguments
/// * `trip_miles` - distance of the trip being priced (must be ≥ 0;
///   validation is the caller's responsibility, see [`crate::validation`])
/// * `ytd_miles` - miles already recorded in the trip's calendar year,
///   excluding the trip itself (and, on edit, excluding the entry under
///   edit)
///
/// ## Algorithm
/// 1. `ytd_miles ≥ 10,000`: whole trip at tier 2.
/// 2. `ytd_miles + trip_miles ≤ 10,000`: whole trip at tier 1.
/// 3. Otherwise split at the threshold; the claim is the exact two-part
///    sum and the rate is back-derived (`claim / trip_miles`) before
///    rounding. The split branch implies `trip_miles > 0`, so the
///    division cannot be by zero.
///
/// ## Example
/// ```rust
/// use autow_core::mileage::calculate_claim;
///
/// let priced = calculate_claim(50.0, 9_980.0);
/// assert_eq!(priced.claim.pence(), 1650); // 20×45p + 30×25p = £16.50
/// assert_eq!(priced.rate.pence(), 33);    // blended £0.33/mile
/// ```
pub fn calculate_claim(trip_miles: f64, ytd_miles: f64) -> MileageClaim {
    if ytd_miles >= TIER_THRESHOLD_MILES {
        // Entire trip beyond the threshold.
        return MileageClaim {
            rate: TIER2_RATE,
            claim: Money::from_pounds(trip_miles * TIER2_RATE.pounds()),
        };
    }

    if ytd_miles + trip_miles <= TIER_THRESHOLD_MILES {
        // Entire trip within the first tier. A zero-mile trip always
        // lands here with a zero claim.
        return MileageClaim {
            rate: TIER1_RATE,
            claim: Money::from_pounds(trip_miles * TIER1_RATE.pounds()),
        };
    }

    // Straddling trip: split at the threshold.
    let miles_at_tier1 = TIER_THRESHOLD_MILES - ytd_miles;
    let miles_at_tier2 = trip_miles - miles_at_tier1;
    let exact_claim =
        miles_at_tier1 * TIER1_RATE.pounds() + miles_at_tier2 * TIER2_RATE.pounds();

    // Rate is derived from the UNROUNDED claim, then rounded itself.
    // The claim is rounded independently so the stored amount is the
    // true two-part sum.
    MileageClaim {
        rate: Rate::from_pounds(exact_claim / trip_miles),
        claim: Money::from_pounds(exact_claim),
    }
}

/// Prices a trip at creation time, honouring an explicit claim override.
///
/// The booking form lets staff key a claim amount directly (e.g. a
/// pre-agreed figure). When `explicit_claim` is provided it replaces the
/// computed claim as stored, but the computed rate is still recorded for
/// audit. This can persist `rate × miles ≠ claim`; that inconsistency is
/// deliberate and documented (DESIGN.md). At edit time no override is
/// accepted and the computed value always wins; use
/// [`calculate_claim`] directly there.
pub fn claim_for_creation(
    trip_miles: f64,
    ytd_miles: f64,
    explicit_claim: Option<Money>,
) -> MileageClaim {
    let computed = calculate_claim(trip_miles, ytd_miles);
    MileageClaim {
        rate: computed.rate,
        claim: explicit_claim.unwrap_or(computed.claim),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_tier1() {
        // 200 miles with no prior mileage: all at 45p.
        let priced = calculate_claim(200.0, 0.0);
        assert_eq!(priced.rate, TIER1_RATE);
        assert_eq!(priced.claim.pence(), 9000); // £90.00
    }

    #[test]
    fn test_fully_tier2() {
        // Exactly at the threshold counts as beyond it.
        let priced = calculate_claim(100.0, 10_000.0);
        assert_eq!(priced.rate, TIER2_RATE);
        assert_eq!(priced.claim.pence(), 2500); // £25.00

        let deep = calculate_claim(40.0, 15_000.0);
        assert_eq!(deep.rate, TIER2_RATE);
        assert_eq!(deep.claim.pence(), 1000); // £10.00
    }

    #[test]
    fn test_straddling_trip_splits_at_threshold() {
        // 20 miles at 45p + 30 miles at 25p = £9.00 + £7.50 = £16.50.
        let priced = calculate_claim(50.0, 9_980.0);
        assert_eq!(priced.claim.pence(), 1650);
        assert_eq!(priced.rate.pence(), 33); // 16.50 / 50 = 0.33
    }

    #[test]
    fn test_trip_ending_exactly_at_threshold_is_tier1() {
        let priced = calculate_claim(20.0, 9_980.0);
        assert_eq!(priced.rate, TIER1_RATE);
        assert_eq!(priced.claim.pence(), 900);
    }

    #[test]
    fn test_claim_is_two_part_sum_not_rate_times_miles() {
        // 16 miles straddling: exact claim differs from the product of
        // the rounded blended rate and the distance.
        let priced = calculate_claim(16.0, 9_990.0);
        // 10 × 0.45 + 6 × 0.25 = 4.50 + 1.50 = £6.00
        assert_eq!(priced.claim.pence(), 600);
        // 6.00 / 16 = 0.375 → £0.38/mile half-up
        assert_eq!(priced.rate.pence(), 38);
        // Rounding-order invariant: 38p × 16 = 608p ≠ 600p.
        let drifted = Money::from_pounds(priced.rate.pounds() * 16.0);
        assert_ne!(drifted, priced.claim);
    }

    #[test]
    fn test_zero_mile_trip() {
        let priced = calculate_claim(0.0, 500.0);
        assert_eq!(priced.rate, TIER1_RATE);
        assert!(priced.claim.is_zero());

        let beyond = calculate_claim(0.0, 12_000.0);
        assert_eq!(beyond.rate, TIER2_RATE);
        assert!(beyond.claim.is_zero());
    }

    #[test]
    fn test_pure_function_idempotence() {
        let a = calculate_claim(123.4, 9_950.0);
        let b = calculate_claim(123.4, 9_950.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_creation_override_keeps_computed_rate() {
        let priced = claim_for_creation(50.0, 9_980.0, Some(Money::from_pence(2000)));
        assert_eq!(priced.claim.pence(), 2000); // override wins for the claim
        assert_eq!(priced.rate.pence(), 33); // computed rate still recorded
    }

    #[test]
    fn test_creation_without_override_matches_calculator() {
        let priced = claim_for_creation(50.0, 9_980.0, None);
        assert_eq!(priced, calculate_claim(50.0, 9_980.0));
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(TIER1_RATE.to_string(), "£0.45/mile");
        assert_eq!(Rate::from_pence(133).to_string(), "£1.33/mile");
    }
}
