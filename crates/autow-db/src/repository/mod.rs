//! # Repository Layer
//!
//! Typed data access over the SQLite pool, one repository per concern:
//!
//! - [`mileage`] - trip records with HMRC claim pricing at write time
//! - [`document`] - the document registry and its number counters
//! - [`share`] - share token issuance and public-link resolution
//!
//! Repositories are cheap clones around the pool; handlers grab a fresh
//! one per request via the [`Database`](crate::pool::Database) accessors.

pub mod document;
pub mod mileage;
pub mod share;
