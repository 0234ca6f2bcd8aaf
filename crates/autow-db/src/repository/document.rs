//! # Document Repository
//!
//! Number allocation and registry operations for estimates, invoices,
//! vehicle reports, disclaimers and jotter notes.
//!
//! ## Atomic Numbering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  OLD SYSTEM (race-prone)            THIS CRATE                      │
//! │                                                                     │
//! │  COUNT(*) today's rows  ──┐         one UPSERT:                     │
//! │  ... another request      │           last_seq = last_seq + 1       │
//! │      counts the same ─────┤           RETURNING last_seq            │
//! │  both insert NNN+1  ✗ dup │         allocation and increment are    │
//! │                           │         a single statement  ✓           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Counters live in `document_sequences`, one row per (kind, period):
//! running-style kinds use the all-time period `''`, daily-style kinds a
//! `YYYYMMDD` period, so the per-day reset falls out of the key.
//!
//! Allocation happens inside the same transaction as the document
//! insert. If either statement fails the transaction rolls back: no row
//! without a number, and a burned counter value at worst (gaps are
//! acceptable, duplicates are not).

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use autow_core::numbering::{format_number, parse_running_seq, period_key, NumberStyle};
use autow_core::{Document, DocumentKind, NewDocument, ShareToken};

/// Repository for document registry operations.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    /// Creates a new DocumentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Registers a new document, allocating its number.
    ///
    /// Number allocation and row insert run in one transaction
    /// (fail-closed: a failed allocation creates no document).
    /// Disclaimers additionally receive their share token eagerly, so
    /// the signing link exists the moment the document does.
    pub async fn create(&self, new: NewDocument) -> DbResult<Document> {
        let now = Utc::now();
        let today = now.date_naive();
        let period = period_key(new.kind, today);

        let mut tx = self.pool.begin().await?;

        let seq = allocate_seq(&mut *tx, new.kind, &period).await?;
        let number = format_number(new.kind, seq, today);

        let share_token = if new.kind.shares_eagerly() {
            Some(ShareToken::from_uuid(Uuid::new_v4()))
        } else {
            None
        };

        let document = Document {
            id: Uuid::new_v4().to_string(),
            kind: new.kind,
            number,
            customer_name: new.customer_name,
            vehicle_reg: new.vehicle_reg.map(|reg| reg.trim().to_uppercase()),
            share_token,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %document.id, number = %document.number, "Registering document");

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, kind, number, customer_name, vehicle_reg,
                share_token, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&document.id)
        .bind(document.kind)
        .bind(&document.number)
        .bind(&document.customer_name)
        .bind(&document.vehicle_reg)
        .bind(&document.share_token)
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(document)
    }

    /// Allocates and consumes the next number for a kind, dated today.
    ///
    /// Used when the number must exist before the full document row does
    /// (e.g. printing paperwork ahead of data entry). The value is
    /// burned even if never attached to a document.
    pub async fn next_number(&self, kind: DocumentKind) -> DbResult<String> {
        self.next_number_on(kind, Utc::now().date_naive()).await
    }

    /// As [`next_number`](Self::next_number), for an explicit reference
    /// date (backdated paperwork). Only meaningful for daily-style
    /// kinds; running-style numbers carry no date.
    pub async fn next_number_on(
        &self,
        kind: DocumentKind,
        reference_date: chrono::NaiveDate,
    ) -> DbResult<String> {
        let period = period_key(kind, reference_date);
        let seq = allocate_seq(&self.pool, kind, &period).await?;
        Ok(format_number(kind, seq, reference_date))
    }

    /// Previews the next number for a kind without consuming it.
    ///
    /// This is what the creation form shows before submission. Purely
    /// advisory: another creation between preview and submit will take
    /// the shown value.
    pub async fn peek_next_number(&self, kind: DocumentKind) -> DbResult<String> {
        let today = Utc::now().date_naive();
        let period = period_key(kind, today);

        let last: Option<i64> = sqlx::query_scalar(
            "SELECT last_seq FROM document_sequences WHERE kind = ?1 AND period = ?2",
        )
        .bind(kind)
        .bind(&period)
        .fetch_optional(&self.pool)
        .await?;

        Ok(format_number(kind, last.unwrap_or(0) + 1, today))
    }

    /// Seeds a running-style counter from numbers issued before the
    /// counter table existed (legacy import).
    ///
    /// Scans every number of the kind, takes the maximum canonical
    /// `PREFIX-NNNN` suffix and raises the counter to at least that
    /// value. Non-canonical numbers (hand-typed legacy oddities) are
    /// skipped, matching the old pattern-filtered max query. Counters
    /// only move up, so re-seeding after live allocations is safe.
    ///
    /// Daily-style kinds are a no-op: their periods reset each day and
    /// start clean.
    pub async fn seed_sequence(&self, kind: DocumentKind) -> DbResult<i64> {
        if kind.style() != NumberStyle::Running {
            return Ok(0);
        }

        let numbers: Vec<String> =
            sqlx::query_scalar("SELECT number FROM documents WHERE kind = ?1")
                .bind(kind)
                .fetch_all(&self.pool)
                .await?;

        let max_seq = numbers
            .iter()
            .filter_map(|number| parse_running_seq(kind, number))
            .max()
            .unwrap_or(0);

        sqlx::query(
            r#"
            INSERT INTO document_sequences (kind, period, last_seq)
            VALUES (?1, '', ?2)
            ON CONFLICT (kind, period) DO UPDATE SET
                last_seq = MAX(last_seq, excluded.last_seq)
            "#,
        )
        .bind(kind)
        .bind(max_seq)
        .execute(&self.pool)
        .await?;

        debug!(kind = %kind, last_seq = max_seq, "Seeded sequence counter");
        Ok(max_seq)
    }

    /// Gets a document by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, kind, number, customer_name, vehicle_reg,
                   share_token, created_at, updated_at
            FROM documents
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    /// Gets a document by its assigned number.
    pub async fn get_by_number(&self, number: &str) -> DbResult<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, kind, number, customer_name, vehicle_reg,
                   share_token, created_at, updated_at
            FROM documents
            WHERE number = ?1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    /// Lists documents of one kind, newest first.
    pub async fn list_by_kind(&self, kind: DocumentKind) -> DbResult<Vec<Document>> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, kind, number, customer_name, vehicle_reg,
                   share_token, created_at, updated_at
            FROM documents
            WHERE kind = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }

    /// Deletes a document.
    ///
    /// The number stays burned: the sequence counter never moves
    /// backwards, so a later creation cannot reuse it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Document", id));
        }

        Ok(())
    }
}

/// Atomically increments and returns a (kind, period) counter.
///
/// A single UPSERT with RETURNING: concurrent callers serialize on the
/// row and each observe a distinct value. Works against the pool or an
/// open transaction.
async fn allocate_seq<'e, E>(executor: E, kind: DocumentKind, period: &str) -> DbResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let seq: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO document_sequences (kind, period, last_seq)
        VALUES (?1, ?2, 1)
        ON CONFLICT (kind, period) DO UPDATE SET last_seq = last_seq + 1
        RETURNING last_seq
        "#,
    )
    .bind(kind)
    .bind(period)
    .fetch_one(executor)
    .await?;

    Ok(seq)
}

// =============================================================================
// Unit Tests
// =============================================================================
