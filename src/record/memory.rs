//! In-memory notification record store using DashMap.
//!
//! Backs tests and single-node development; records are lost on
//! restart. Semantics mirror the PostgreSQL store, including the
//! bulk-update behavior of `mark_all_read` (the sweep mutates under
//! the map's shard locks, so a concurrent insert is either fully
//! included or fully excluded).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::StoreError;
use crate::render;

use super::store::{MarkReadOutcome, NotificationStore};
use super::types::{NotificationRecord, NotificationStatus, RecordFilter};

/// In-memory record store.
#[derive(Default)]
pub struct MemoryNotificationStore {
    records: DashMap<Uuid, NotificationRecord>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, record: NotificationRecord) -> Result<NotificationRecord, StoreError> {
        self.records.insert(record.id, record.clone());
        tracing::trace!(id = %record.id, recipient_id = record.recipient_id, "notification stored");
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NotificationRecord>, StoreError> {
        Ok(self.records.get(&id).map(|r| r.clone()))
    }

    async fn find_many(
        &self,
        recipient_id: i64,
        filter: &RecordFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationRecord>, StoreError> {
        let mut matching: Vec<NotificationRecord> = self
            .records
            .iter()
            .filter(|entry| entry.recipient_id == recipient_id && filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, recipient_id: i64, filter: &RecordFilter) -> Result<u64, StoreError> {
        let count = self
            .records
            .iter()
            .filter(|entry| entry.recipient_id == recipient_id && filter.matches(entry.value()))
            .count();
        Ok(count as u64)
    }

    async fn mark_read(
        &self,
        id: Uuid,
        read_at: DateTime<Utc>,
    ) -> Result<MarkReadOutcome, StoreError> {
        let Some(mut entry) = self.records.get_mut(&id) else {
            return Ok(MarkReadOutcome::Missing);
        };
        if entry.read_at.is_some() {
            return Ok(MarkReadOutcome::AlreadyRead(entry.clone()));
        }
        entry.status = NotificationStatus::Read;
        entry.read_at = Some(read_at);
        entry.updated_at = read_at;
        Ok(MarkReadOutcome::Updated(entry.clone()))
    }

    async fn mark_all_read(
        &self,
        recipient_id: i64,
        read_at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut updated = 0;
        for mut entry in self.records.iter_mut() {
            if entry.recipient_id != recipient_id
                || entry.status == NotificationStatus::Read
            {
                continue;
            }
            entry.status = NotificationStatus::Read;
            if entry.read_at.is_none() {
                entry.read_at = Some(read_at);
            }
            entry.updated_at = read_at;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.records.remove(&id).is_some())
    }

    async fn find_with_placeholders(&self) -> Result<Vec<NotificationRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|entry| {
                render::has_placeholders(&entry.title) || render::has_placeholders(&entry.message)
            })
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn update_content(
        &self,
        id: Uuid,
        title: &str,
        message: &str,
    ) -> Result<(), StoreError> {
        let Some(mut entry) = self.records.get_mut(&id) else {
            return Err(StoreError::Unavailable(format!(
                "record {id} vanished during update"
            )));
        };
        entry.title = title.to_string();
        entry.message = message.to_string();
        entry.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::catalog::NotificationKind;
    use crate::record::Priority;

    use super::*;

    fn record(recipient_id: i64, created_at: DateTime<Utc>) -> NotificationRecord {
        NotificationRecord {
            id: Uuid::new_v4(),
            recipient_id,
            kind: NotificationKind::NewComment,
            title: "Nouveau commentaire".to_string(),
            message: "Ana a commenté votre événement Jazz Night".to_string(),
            priority: Priority::Low,
            status: NotificationStatus::Pending,
            payload: json!({}),
            read_at: None,
            sent_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_find_many_orders_newest_first() {
        let store = MemoryNotificationStore::new();
        let base = Utc::now();
        for i in 0..3 {
            store
                .insert(record(1, base + chrono::Duration::seconds(i)))
                .await
                .unwrap();
        }

        let page = store
            .find_many(1, &RecordFilter::default(), 50, 0)
            .await
            .unwrap();
        assert_eq!(page.len(), 3);
        assert!(page[0].created_at > page[1].created_at);
        assert!(page[1].created_at > page[2].created_at);
    }

    #[tokio::test]
    async fn test_mark_all_read_skips_already_read() {
        let store = MemoryNotificationStore::new();
        let now = Utc::now();
        let a = store.insert(record(1, now)).await.unwrap();
        store.insert(record(1, now)).await.unwrap();
        store.insert(record(2, now)).await.unwrap();

        store.mark_read(a.id, now).await.unwrap();
        let updated = store.mark_all_read(1, Utc::now()).await.unwrap();
        assert_eq!(updated, 1);
        assert_eq!(store.mark_all_read(1, Utc::now()).await.unwrap(), 0);
        // other recipient untouched
        assert_eq!(store.count(2, &RecordFilter::unread()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_with_placeholders() {
        let store = MemoryNotificationStore::new();
        let now = Utc::now();
        let mut broken = record(1, now);
        broken.message = "Ana a commenté votre événement {event_title}".to_string();
        let broken = store.insert(broken).await.unwrap();
        store.insert(record(1, now)).await.unwrap();

        let candidates = store.find_with_placeholders().await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, broken.id);
    }
}
