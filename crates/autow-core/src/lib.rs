//! # autow-core: Pure Business Logic for the Autow Business Hub
//!
//! This crate is the **heart** of the Autow mobile-mechanic business
//! application. It contains all business logic as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Autow Architecture                            │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │          API surface (routing, auth, PDF, email)            │   │
//! │  │                 (external consumers)                        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │              ★ autow-core (THIS CRATE) ★                    │   │
//! │  │                                                             │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌────────────┐      │   │
//! │  │  │  money  │ │ mileage │ │ numbering │ │ validation │      │   │
//! │  │  │  Money  │ │  tiers  │ │  formats  │ │   rules    │      │   │
//! │  │  └─────────┘ └─────────┘ └───────────┘ └────────────┘      │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────┬───────────────────────────────┘   │
//! │                                │                                    │
//! │  ┌─────────────────────────────▼───────────────────────────────┐   │
//! │  │                 autow-db (Database Layer)                   │   │
//! │  │         SQLite queries, migrations, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MileageEntry, Document, ShareToken, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`mileage`] - Two-tier mileage rate calculator
//! - [`numbering`] - Document number formatting and parsing
//! - [`validation`] - Business rule validation
//! - [`config`] - Explicit application configuration
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in pence (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use autow_core::mileage::calculate_claim;
//!
//! // Price a 50-mile trip with 9,980 miles already recorded this year
//! let priced = calculate_claim(50.0, 9_980.0);
//!
//! // 20 miles × 45p + 30 miles × 25p = £16.50, blended £0.33/mile
//! assert_eq!(priced.claim.pence(), 1650);
//! assert_eq!(priced.rate.pence(), 33);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod mileage;
pub mod money;
pub mod numbering;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use autow_core::Money` instead of
// `use autow_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use mileage::{MileageClaim, Rate, TIER1_RATE, TIER2_RATE, TIER_THRESHOLD_MILES};
pub use money::Money;
pub use numbering::{DocumentKind, NumberStyle};
pub use types::*;
