//! # Share Token Repository
//!
//! Issues and resolves the opaque tokens behind public document links.
//!
//! ## Issuance Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  issue(document_id)                                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  candidate = fresh UUID v4 (122 bits of randomness)                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  UPDATE documents SET share_token = candidate                       │
//! │  WHERE id = ?  AND  share_token IS NULL   ← the atomic guard        │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SELECT share_token  ← whoever won, this is THE token               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two concurrent callers may both generate a candidate, but only one
//! UPDATE matches the NULL guard; the loser's candidate is discarded and
//! both read back the same stored token. A token, once set, is never
//! replaced, so links already sent to customers keep working.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use autow_core::{Document, ShareToken};

/// Repository for share token issuance and resolution.
#[derive(Debug, Clone)]
pub struct ShareTokenRepository {
    pool: SqlitePool,
}

impl ShareTokenRepository {
    /// Creates a new ShareTokenRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShareTokenRepository { pool }
    }

    /// Returns the document's share token, issuing one if absent.
    ///
    /// Idempotent: every call for the same document returns the same
    /// token, including concurrent first calls (set-if-null guard in
    /// the UPDATE).
    pub async fn issue(&self, document_id: &str) -> DbResult<ShareToken> {
        let candidate = ShareToken::from_uuid(Uuid::new_v4());

        let result = sqlx::query(
            r#"
            UPDATE documents
            SET share_token = ?1, updated_at = ?2
            WHERE id = ?3 AND share_token IS NULL
            "#,
        )
        .bind(&candidate)
        .bind(Utc::now())
        .bind(document_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            debug!(document_id = %document_id, "Issued share token");
        }

        // Read back rather than trusting the candidate: if the guard
        // matched nothing, an earlier token already holds the slot.
        let stored: Option<Option<ShareToken>> =
            sqlx::query_scalar("SELECT share_token FROM documents WHERE id = ?1")
                .bind(document_id)
                .fetch_optional(&self.pool)
                .await?;

        match stored {
            None => Err(DbError::not_found("Document", document_id)),
            Some(None) => Err(DbError::Internal(format!(
                "share token missing after issuance for document {document_id}"
            ))),
            Some(Some(token)) => Ok(token),
        }
    }

    /// Returns the document's share token without issuing one.
    pub async fn get(&self, document_id: &str) -> DbResult<Option<ShareToken>> {
        let stored: Option<Option<ShareToken>> =
            sqlx::query_scalar("SELECT share_token FROM documents WHERE id = ?1")
                .bind(document_id)
                .fetch_optional(&self.pool)
                .await?;

        match stored {
            None => Err(DbError::not_found("Document", document_id)),
            Some(token) => Ok(token),
        }
    }

    /// Resolves a token from a public link back to its document.
    ///
    /// This is the only lookup the unauthenticated share surface
    /// performs; an unknown token yields `None`, never an error, so
    /// guessing reveals nothing.
    pub async fn find_by_token(&self, token: &ShareToken) -> DbResult<Option<Document>> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, kind, number, customer_name, vehicle_reg,
                   share_token, created_at, updated_at
            FROM documents
            WHERE share_token = ?1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use autow_core::{DocumentKind, NewDocument};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn make_document(db: &Database, kind: DocumentKind) -> Document {
        db.documents()
            .create(NewDocument {
                kind,
                customer_name: Some("J. Smith".to_string()),
                vehicle_reg: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_issue_is_idempotent() {
        let db = test_db().await;
        let doc = make_document(&db, DocumentKind::VehicleReport).await;
        let repo = db.share_tokens();

        let first = repo.issue(&doc.id).await.unwrap();
        let second = repo.issue(&doc.id).await.unwrap();
        let third = repo.issue(&doc.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[tokio::test]
    async fn test_concurrent_issue_converges_on_one_token() {
        let db = test_db().await;
        let doc = make_document(&db, DocumentKind::VehicleReport).await;

        let repo_a = db.share_tokens();
        let repo_b = db.share_tokens();
        let id_a = doc.id.clone();
        let id_b = doc.id.clone();

        let (a, b) = tokio::join!(
            tokio::spawn(async move { repo_a.issue(&id_a).await }),
            tokio::spawn(async move { repo_b.issue(&id_b).await }),
        );

        let token_a = a.unwrap().unwrap();
        let token_b = b.unwrap().unwrap();
        assert_eq!(token_a, token_b);

        let stored = db.share_tokens().get(&doc.id).await.unwrap().unwrap();
        assert_eq!(stored, token_a);
    }

    #[tokio::test]
    async fn test_issue_keeps_eager_disclaimer_token() {
        let db = test_db().await;
        let doc = make_document(&db, DocumentKind::Disclaimer).await;
        let eager = doc.share_token.clone().unwrap();

        let issued = db.share_tokens().issue(&doc.id).await.unwrap();
        assert_eq!(issued, eager);
    }

    #[tokio::test]
    async fn test_issue_unknown_document() {
        let db = test_db().await;

        let err = db.share_tokens().issue("no-such-id").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_by_token() {
        let db = test_db().await;
        let doc = make_document(&db, DocumentKind::Estimate).await;
        let repo = db.share_tokens();

        let token = repo.issue(&doc.id).await.unwrap();

        let found = repo.find_by_token(&token).await.unwrap().unwrap();
        assert_eq!(found.id, doc.id);

        let bogus = ShareToken::from_uuid(Uuid::new_v4());
        assert!(repo.find_by_token(&bogus).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_does_not_issue() {
        let db = test_db().await;
        let doc = make_document(&db, DocumentKind::Invoice).await;
        let repo = db.share_tokens();

        assert!(repo.get(&doc.id).await.unwrap().is_none());
        assert!(repo.get(&doc.id).await.unwrap().is_none());

        let token = repo.issue(&doc.id).await.unwrap();
        assert_eq!(repo.get(&doc.id).await.unwrap(), Some(token));
    }
}
