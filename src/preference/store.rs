//! Backend trait for preference storage.

use async_trait::async_trait;

use crate::error::StoreError;

use super::types::{NotificationPreference, PreferenceUpdate};

/// Backend trait for per-recipient preference rows.
///
/// At most one row per recipient; `upsert` creates the row from the
/// permissive defaults on first write and merges the patch over the
/// existing row afterwards.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get_by_recipient(
        &self,
        recipient_id: i64,
    ) -> Result<Option<NotificationPreference>, StoreError>;

    async fn upsert(
        &self,
        recipient_id: i64,
        update: PreferenceUpdate,
    ) -> Result<NotificationPreference, StoreError>;
}
