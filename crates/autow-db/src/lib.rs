//! # Autow DB
//!
//! SQLite persistence for the Autow business hub.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         autow-db                                    │
//! │                                                                     │
//! │  ┌──────────────┐                                                   │
//! │  │   Database   │ ← pool + migrations, entry point                  │
//! │  └──────┬───────┘                                                   │
//! │         │                                                           │
//! │         ├── mileage()       → MileageRepository                     │
//! │         ├── documents()     → DocumentRepository                    │
//! │         └── share_tokens()  → ShareTokenRepository                  │
//! │                                                                     │
//! │  Domain math (rates, number formats, validation) lives in           │
//! │  autow-core; this crate decides WHEN it runs and makes the          │
//! │  results durable.                                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write-Time Derivation
//! Claim amounts and document numbers are computed inside the write
//! that persists them, never by the caller:
//! - a trip's rate and claim come from the year-to-date aggregate in
//!   the same repository call that inserts the row
//! - a document's number comes from an atomic counter upsert in the
//!   same transaction as its insert
//! - a share token lands via a set-if-null UPDATE, so issuance is
//!   idempotent under concurrency
//!
//! ## Usage
//! ```rust,ignore
//! use autow_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("/var/lib/autow/autow.db")).await?;
//! let entry = db.mileage().create(new_entry).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// Re-export main types
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::document::DocumentRepository;
pub use repository::mileage::MileageRepository;
pub use repository::share::ShareTokenRepository;
