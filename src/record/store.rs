//! Backend trait for notification record storage.
//!
//! Abstracts the persistence collaborator so the engine can run against
//! PostgreSQL in production and the in-memory store in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;

use super::types::{NotificationRecord, RecordFilter};

/// Result of a conditional mark-read update.
#[derive(Debug)]
pub enum MarkReadOutcome {
    /// The record was unread and has now been marked.
    Updated(NotificationRecord),
    /// The record already carried a read timestamp; nothing changed.
    AlreadyRead(NotificationRecord),
    /// No record with that id.
    Missing,
}

/// Backend trait for notification record storage.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the engine is shared across
/// request handlers.
///
/// # Error Handling
///
/// All fallible operations return `Result<T, StoreError>`. The store
/// never retries; failures surface to the engine immediately.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a new record. The caller provides the fully-formed
    /// record (id and timestamps included).
    async fn insert(&self, record: NotificationRecord) -> Result<NotificationRecord, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NotificationRecord>, StoreError>;

    /// Fetch a page of a recipient's records matching the filter,
    /// ordered by creation time descending, ties broken by id, so
    /// pagination is stable. The ordering is exact, not approximate;
    /// the UI depends on it.
    async fn find_many(
        &self,
        recipient_id: i64,
        filter: &RecordFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationRecord>, StoreError>;

    /// Count a recipient's records matching the filter.
    async fn count(&self, recipient_id: i64, filter: &RecordFilter) -> Result<u64, StoreError>;

    /// Mark one record read, if it was not already. Distinguishes
    /// "updated", "was already read" and "missing" so the engine can
    /// keep re-marking idempotent without a second fetch on the hot
    /// path.
    async fn mark_read(
        &self,
        id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<MarkReadOutcome, StoreError>;

    /// Mark every record of the recipient whose status is not READ.
    /// Must be a single store-level bulk update, not a read-then-write
    /// loop; a record created mid-sweep is either fully included or
    /// fully excluded. Returns the number of records updated.
    async fn mark_all_read(
        &self,
        recipient_id: i64,
        read_at: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// Hard delete. Returns whether a record existed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Candidates for the repair sweep: records whose title or message
    /// still contains a `{placeholder}` token. Implementations may
    /// over-approximate (e.g. match on a brace); the engine re-checks
    /// with the exact scanner.
    async fn find_with_placeholders(&self) -> Result<Vec<NotificationRecord>, StoreError>;

    /// Overwrite a record's rendered title and message in place.
    async fn update_content(&self, id: Uuid, title: &str, message: &str)
        -> Result<(), StoreError>;
}
