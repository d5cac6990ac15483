//! PostgreSQL-backed notification record store.
//!
//! Table structure (managed by the surrounding application's
//! migrations):
//!
//! ```sql
//! CREATE TABLE notifications (
//!     id           UUID PRIMARY KEY,
//!     recipient_id BIGINT      NOT NULL,
//!     kind         TEXT        NOT NULL,
//!     title        TEXT        NOT NULL,
//!     message      TEXT        NOT NULL,
//!     priority     TEXT        NOT NULL,
//!     status       TEXT        NOT NULL,
//!     payload      JSONB       NOT NULL,
//!     read_at      TIMESTAMPTZ,
//!     sent_at      TIMESTAMPTZ,
//!     created_at   TIMESTAMPTZ NOT NULL,
//!     updated_at   TIMESTAMPTZ NOT NULL
//! );
//! CREATE INDEX notifications_recipient_created_idx
//!     ON notifications (recipient_id, created_at DESC, id DESC);
//! ```
//!
//! Rows whose `kind`, `priority` or `status` no longer map onto the
//! closed enums (legacy data) are skipped with a warning on list paths
//! and surface as a decode error on single-row fetches.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::catalog::NotificationKind;
use crate::error::StoreError;

use super::store::{MarkReadOutcome, NotificationStore};
use super::types::{NotificationRecord, NotificationStatus, Priority, RecordFilter};

const COLUMNS: &str = "id, recipient_id, kind, title, message, priority, status, payload, \
                       read_at, sent_at, created_at, updated_at";

/// PostgreSQL record store.
pub struct PostgresNotificationStore {
    pool: PgPool,
}

impl PostgresNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_id: i64,
    kind: String,
    title: String,
    message: String,
    priority: String,
    status: String,
    payload: serde_json::Value,
    read_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl NotificationRow {
    fn decode(self) -> Result<NotificationRecord, String> {
        let kind = NotificationKind::parse(&self.kind)
            .ok_or_else(|| format!("unknown kind {:?}", self.kind))?;
        let priority = Priority::parse(&self.priority)
            .ok_or_else(|| format!("unknown priority {:?}", self.priority))?;
        let status = NotificationStatus::parse(&self.status)
            .ok_or_else(|| format!("unknown status {:?}", self.status))?;
        Ok(NotificationRecord {
            id: self.id,
            recipient_id: self.recipient_id,
            kind,
            title: self.title,
            message: self.message,
            priority,
            status,
            payload: self.payload,
            read_at: self.read_at,
            sent_at: self.sent_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Decode a batch, skipping rows that no longer map onto the closed
/// enums rather than failing the whole call.
fn decode_rows(rows: Vec<NotificationRow>) -> Vec<NotificationRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match row.decode() {
                Ok(record) => Some(record),
                Err(reason) => {
                    tracing::warn!(id = %id, reason = %reason, "skipping undecodable notification row");
                    None
                }
            }
        })
        .collect()
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &RecordFilter) {
    if let Some(kind) = filter.kind {
        qb.push(" AND kind = ").push_bind(kind.as_str());
    }
    if let Some(priority) = filter.priority {
        qb.push(" AND priority = ").push_bind(priority.as_str());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(read) = filter.read {
        qb.push(if read {
            " AND read_at IS NOT NULL"
        } else {
            " AND read_at IS NULL"
        });
    }
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn insert(&self, record: NotificationRecord) -> Result<NotificationRecord, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO notifications
                (id, recipient_id, kind, title, message, priority, status, payload,
                 read_at, sent_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(record.id)
        .bind(record.recipient_id)
        .bind(record.kind.as_str())
        .bind(&record.title)
        .bind(&record.message)
        .bind(record.priority.as_str())
        .bind(record.status.as_str())
        .bind(&record.payload)
        .bind(record.read_at)
        .bind(record.sent_at)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NotificationRecord>, StoreError> {
        let row: Option<NotificationRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            None => Ok(None),
            Some(row) => {
                let id = row.id;
                row.decode()
                    .map(Some)
                    .map_err(|reason| StoreError::Decode { id, reason })
            }
        }
    }

    async fn find_many(
        &self,
        recipient_id: i64,
        filter: &RecordFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationRecord>, StoreError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM notifications WHERE recipient_id = "
        ));
        qb.push_bind(recipient_id);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows: Vec<NotificationRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(decode_rows(rows))
    }

    async fn count(&self, recipient_id: i64, filter: &RecordFilter) -> Result<u64, StoreError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM notifications WHERE recipient_id = ");
        qb.push_bind(recipient_id);
        push_filter(&mut qb, filter);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn mark_read(
        &self,
        id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<MarkReadOutcome, StoreError> {
        let updated: Option<NotificationRow> = sqlx::query_as(&format!(
            r#"
            UPDATE notifications
            SET status = $2, read_at = $3, updated_at = $3
            WHERE id = $1 AND read_at IS NULL
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(NotificationStatus::Read.as_str())
        .bind(read_at)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = updated {
            let id = row.id;
            let record = row
                .decode()
                .map_err(|reason| StoreError::Decode { id, reason })?;
            return Ok(MarkReadOutcome::Updated(record));
        }

        // No unread row matched: either already read or missing.
        match self.find_by_id(id).await? {
            Some(record) => Ok(MarkReadOutcome::AlreadyRead(record)),
            None => Ok(MarkReadOutcome::Missing),
        }
    }

    async fn mark_all_read(
        &self,
        recipient_id: i64,
        read_at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        // One bulk UPDATE: a record created mid-sweep is either fully
        // included or fully excluded, never half-written.
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET status = $2, read_at = COALESCE(read_at, $3), updated_at = $3
            WHERE recipient_id = $1 AND status <> $2
            "#,
        )
        .bind(recipient_id)
        .bind(NotificationStatus::Read.as_str())
        .bind(read_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_with_placeholders(&self) -> Result<Vec<NotificationRecord>, StoreError> {
        // Cheap prefilter on the brace; the engine re-checks candidates
        // with the exact token scanner.
        let rows: Vec<NotificationRow> = sqlx::query_as(&format!(
            r#"
            SELECT {COLUMNS} FROM notifications
            WHERE title LIKE '%{{%' OR message LIKE '%{{%'
            ORDER BY created_at ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(decode_rows(rows))
    }

    async fn update_content(
        &self,
        id: Uuid,
        title: &str,
        message: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE notifications SET title = $2, message = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(title)
        .bind(message)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row() -> NotificationRow {
        let now = Utc::now();
        NotificationRow {
            id: Uuid::new_v4(),
            recipient_id: 7,
            kind: "EVENT_REMINDER".to_string(),
            title: "Rappel d'événement".to_string(),
            message: "Votre événement Jazz Night commence dans 2h".to_string(),
            priority: "HIGH".to_string(),
            status: "PENDING".to_string(),
            payload: json!({"event_title": "Jazz Night"}),
            read_at: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_decodes_into_record() {
        let record = row().decode().unwrap();
        assert_eq!(record.kind, NotificationKind::EventReminder);
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.status, NotificationStatus::Pending);
    }

    #[test]
    fn test_legacy_kind_is_skipped_not_fatal() {
        let mut legacy = row();
        legacy.kind = "TELEGRAM_PING".to_string();
        let decoded = decode_rows(vec![legacy, row()]);
        assert_eq!(decoded.len(), 1);
    }
}
