//! The notification engine: the function-level API the rest of the
//! application calls.
//!
//! Orchestrates the template catalog, the placeholder renderer, the
//! preference gate and the record store. Every operation is a
//! short-lived call that runs to completion; the store is the single
//! source of truth, so no in-process state is coordinated here.

mod aliases;
mod repair;

pub use repair::RepairSummary;

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::catalog::{self, NotificationKind};
use crate::config::NotificationConfig;
use crate::error::{NotificationError, Result};
use crate::metrics;
use crate::preference::{PreferenceGate, PreferenceStore};
use crate::record::{
    ListQuery, MarkReadOutcome, NotificationRecord, NotificationStatus, NotificationStore,
    Priority, RecordFilter,
};
use crate::render;

/// Result of a preference-checked create.
///
/// Suppression is an intentional outcome, not an error: the recipient
/// opted out of the kind's category and no record was written.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(NotificationRecord),
    Suppressed,
}

impl CreateOutcome {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, CreateOutcome::Suppressed)
    }

    pub fn into_record(self) -> Option<NotificationRecord> {
        match self {
            CreateOutcome::Created(record) => Some(record),
            CreateOutcome::Suppressed => None,
        }
    }
}

/// Notification engine over injected storage backends.
pub struct NotificationEngine {
    records: Arc<dyn NotificationStore>,
    gate: PreferenceGate,
    config: NotificationConfig,
}

impl NotificationEngine {
    pub fn new(
        records: Arc<dyn NotificationStore>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self::with_config(records, preferences, NotificationConfig::default())
    }

    pub fn with_config(
        records: Arc<dyn NotificationStore>,
        preferences: Arc<dyn PreferenceStore>,
        config: NotificationConfig,
    ) -> Self {
        Self {
            records,
            gate: PreferenceGate::new(preferences),
            config,
        }
    }

    pub(crate) fn records(&self) -> &Arc<dyn NotificationStore> {
        &self.records
    }

    /// Low-level create: persists a PENDING record with the given
    /// text. No preference check, no template — callers that already
    /// rendered their content use this directly.
    pub async fn create(
        &self,
        recipient_id: i64,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        priority: Option<Priority>,
        payload: Option<Value>,
    ) -> Result<NotificationRecord> {
        let now = Utc::now();
        let record = NotificationRecord {
            id: Uuid::new_v4(),
            recipient_id,
            kind,
            title: title.into(),
            message: message.into(),
            priority: priority.unwrap_or_default(),
            status: NotificationStatus::Pending,
            payload: payload.unwrap_or(Value::Null),
            read_at: None,
            sent_at: None,
            created_at: now,
            updated_at: now,
        };

        let record = self
            .records
            .insert(record)
            .await
            .map_err(|e| NotificationError::store("create", e))?;

        metrics::NOTIFICATIONS_CREATED_TOTAL
            .with_label_values(&[catalog::lookup(kind).category.as_str()])
            .inc();
        tracing::debug!(
            recipient_id,
            kind = %kind,
            id = %record.id,
            priority = %record.priority,
            "notification created"
        );
        Ok(record)
    }

    /// Render the kind's template with the given variables and persist
    /// the result with the template's default priority. The only place
    /// templates and the renderer meet.
    pub async fn create_from_template(
        &self,
        recipient_id: i64,
        kind: NotificationKind,
        variables: &Map<String, Value>,
        payload: Option<Value>,
    ) -> Result<NotificationRecord> {
        let template = catalog::lookup(kind);
        let title = render::render(template.title, variables);
        let message = render::render(template.message, variables);

        // Without an explicit payload the variables are stored as the
        // record's context, which is what the repair sweep mines later.
        let payload = payload.unwrap_or_else(|| Value::Object(variables.clone()));

        self.create(
            recipient_id,
            kind,
            title,
            message,
            Some(template.priority),
            Some(payload),
        )
        .await
    }

    /// Template create gated by the recipient's category preferences.
    ///
    /// A failing preference lookup fails OPEN: the notification is
    /// created anyway. Over-notifying on a broken preference store
    /// beats silently losing messages; do not "fix" this into
    /// fail-closed.
    pub async fn create_with_preference_check(
        &self,
        recipient_id: i64,
        kind: NotificationKind,
        variables: &Map<String, Value>,
        payload: Option<Value>,
    ) -> Result<CreateOutcome> {
        match self.gate.should_send(recipient_id, kind).await {
            Ok(true) => {}
            Ok(false) => {
                metrics::NOTIFICATIONS_SUPPRESSED_TOTAL
                    .with_label_values(&[catalog::lookup(kind).category.as_str()])
                    .inc();
                tracing::debug!(
                    recipient_id,
                    kind = %kind,
                    "notification suppressed by recipient preferences"
                );
                return Ok(CreateOutcome::Suppressed);
            }
            Err(e) => {
                metrics::PREFERENCE_FAILOPEN_TOTAL.inc();
                tracing::warn!(
                    recipient_id,
                    kind = %kind,
                    error = %e,
                    "preference check failed, creating notification anyway"
                );
            }
        }

        let record = self
            .create_from_template(recipient_id, kind, variables, payload)
            .await?;
        Ok(CreateOutcome::Created(record))
    }

    /// A page of the recipient's records, newest-created first.
    /// Limit defaults to the configured page size and is clamped to
    /// the configured maximum; offset defaults to 0.
    pub async fn list(
        &self,
        recipient_id: i64,
        query: ListQuery,
    ) -> Result<Vec<NotificationRecord>> {
        let limit = query
            .limit
            .unwrap_or(self.config.default_page_size)
            .clamp(1, self.config.max_page_size);
        let offset = query.offset.unwrap_or(0).max(0);

        self.records
            .find_many(recipient_id, &query.filter, limit, offset)
            .await
            .map_err(|e| NotificationError::store("list", e))
    }

    /// Mark one record read. Idempotent: re-marking an already-read
    /// record returns it unchanged.
    pub async fn mark_read(&self, id: Uuid) -> Result<NotificationRecord> {
        match self
            .records
            .mark_read(id, Utc::now())
            .await
            .map_err(|e| NotificationError::store("mark_read", e))?
        {
            MarkReadOutcome::Updated(record) => {
                metrics::NOTIFICATIONS_READ_TOTAL.inc();
                Ok(record)
            }
            MarkReadOutcome::AlreadyRead(record) => Ok(record),
            MarkReadOutcome::Missing => Err(NotificationError::NotFound(id)),
        }
    }

    /// Mark every not-yet-read record of the recipient in one bulk
    /// store update. Returns the number of records updated.
    pub async fn mark_all_read(&self, recipient_id: i64) -> Result<u64> {
        let updated = self
            .records
            .mark_all_read(recipient_id, Utc::now())
            .await
            .map_err(|e| NotificationError::store("mark_all_read", e))?;

        if updated > 0 {
            metrics::NOTIFICATIONS_READ_TOTAL.inc_by(updated);
        }
        tracing::debug!(recipient_id, updated, "marked all notifications read");
        Ok(updated)
    }

    /// Count of records never read. Shares its definition with
    /// `list`'s unread filter (`read_at` null), so the two cannot
    /// drift apart.
    pub async fn unread_count(&self, recipient_id: i64) -> Result<u64> {
        self.records
            .count(recipient_id, &RecordFilter::unread())
            .await
            .map_err(|e| NotificationError::store("unread_count", e))
    }

    /// Hard delete, no tombstone.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self
            .records
            .delete(id)
            .await
            .map_err(|e| NotificationError::store("delete", e))?;
        if !deleted {
            return Err(NotificationError::NotFound(id));
        }
        tracing::debug!(id = %id, "notification deleted");
        Ok(())
    }
}
