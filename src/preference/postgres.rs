//! PostgreSQL-backed preference store.
//!
//! Table structure (managed by the surrounding application's
//! migrations):
//!
//! ```sql
//! CREATE TABLE notification_preferences (
//!     recipient_id         BIGINT PRIMARY KEY,
//!     email_enabled        BOOLEAN NOT NULL DEFAULT TRUE,
//!     push_enabled         BOOLEAN NOT NULL DEFAULT TRUE,
//!     sms_enabled          BOOLEAN NOT NULL DEFAULT TRUE,
//!     in_app_enabled       BOOLEAN NOT NULL DEFAULT TRUE,
//!     planning_enabled     BOOLEAN NOT NULL DEFAULT TRUE,
//!     booking_enabled      BOOLEAN NOT NULL DEFAULT TRUE,
//!     social_enabled       BOOLEAN NOT NULL DEFAULT TRUE,
//!     performance_enabled  BOOLEAN NOT NULL DEFAULT TRUE,
//!     system_enabled       BOOLEAN NOT NULL DEFAULT TRUE,
//!     commercial_enabled   BOOLEAN NOT NULL DEFAULT TRUE,
//!     personalized_enabled BOOLEAN NOT NULL DEFAULT TRUE,
//!     urgent_enabled       BOOLEAN NOT NULL DEFAULT TRUE,
//!     created_at           TIMESTAMPTZ NOT NULL,
//!     updated_at           TIMESTAMPTZ NOT NULL
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::StoreError;

use super::store::PreferenceStore;
use super::types::{NotificationPreference, PreferenceUpdate};

const COLUMNS: &str = "recipient_id, email_enabled, push_enabled, sms_enabled, in_app_enabled, \
                       planning_enabled, booking_enabled, social_enabled, performance_enabled, \
                       system_enabled, commercial_enabled, personalized_enabled, urgent_enabled, \
                       created_at, updated_at";

/// PostgreSQL preference store.
pub struct PostgresPreferenceStore {
    pool: PgPool,
}

impl PostgresPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PreferenceRow {
    recipient_id: i64,
    email_enabled: bool,
    push_enabled: bool,
    sms_enabled: bool,
    in_app_enabled: bool,
    planning_enabled: bool,
    booking_enabled: bool,
    social_enabled: bool,
    performance_enabled: bool,
    system_enabled: bool,
    commercial_enabled: bool,
    personalized_enabled: bool,
    urgent_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PreferenceRow> for NotificationPreference {
    fn from(row: PreferenceRow) -> Self {
        NotificationPreference {
            recipient_id: row.recipient_id,
            email_enabled: row.email_enabled,
            push_enabled: row.push_enabled,
            sms_enabled: row.sms_enabled,
            in_app_enabled: row.in_app_enabled,
            planning_enabled: row.planning_enabled,
            booking_enabled: row.booking_enabled,
            social_enabled: row.social_enabled,
            performance_enabled: row.performance_enabled,
            system_enabled: row.system_enabled,
            commercial_enabled: row.commercial_enabled,
            personalized_enabled: row.personalized_enabled,
            urgent_enabled: row.urgent_enabled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PreferenceStore for PostgresPreferenceStore {
    async fn get_by_recipient(
        &self,
        recipient_id: i64,
    ) -> Result<Option<NotificationPreference>, StoreError> {
        let row: Option<PreferenceRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM notification_preferences WHERE recipient_id = $1"
        ))
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(NotificationPreference::from))
    }

    async fn upsert(
        &self,
        recipient_id: i64,
        update: PreferenceUpdate,
    ) -> Result<NotificationPreference, StoreError> {
        // First write creates the row from the permissive defaults;
        // later writes merge the patch over the stored values.
        let row: PreferenceRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO notification_preferences
                (recipient_id, email_enabled, push_enabled, sms_enabled, in_app_enabled,
                 planning_enabled, booking_enabled, social_enabled, performance_enabled,
                 system_enabled, commercial_enabled, personalized_enabled, urgent_enabled,
                 created_at, updated_at)
            VALUES ($1,
                    COALESCE($2, TRUE),  COALESCE($3, TRUE),  COALESCE($4, TRUE),
                    COALESCE($5, TRUE),  COALESCE($6, TRUE),  COALESCE($7, TRUE),
                    COALESCE($8, TRUE),  COALESCE($9, TRUE),  COALESCE($10, TRUE),
                    COALESCE($11, TRUE), COALESCE($12, TRUE), COALESCE($13, TRUE),
                    $14, $14)
            ON CONFLICT (recipient_id) DO UPDATE SET
                email_enabled        = COALESCE($2,  notification_preferences.email_enabled),
                push_enabled         = COALESCE($3,  notification_preferences.push_enabled),
                sms_enabled          = COALESCE($4,  notification_preferences.sms_enabled),
                in_app_enabled       = COALESCE($5,  notification_preferences.in_app_enabled),
                planning_enabled     = COALESCE($6,  notification_preferences.planning_enabled),
                booking_enabled      = COALESCE($7,  notification_preferences.booking_enabled),
                social_enabled       = COALESCE($8,  notification_preferences.social_enabled),
                performance_enabled  = COALESCE($9,  notification_preferences.performance_enabled),
                system_enabled       = COALESCE($10, notification_preferences.system_enabled),
                commercial_enabled   = COALESCE($11, notification_preferences.commercial_enabled),
                personalized_enabled = COALESCE($12, notification_preferences.personalized_enabled),
                urgent_enabled       = COALESCE($13, notification_preferences.urgent_enabled),
                updated_at           = $14
            RETURNING {COLUMNS}
            "#
        ))
        .bind(recipient_id)
        .bind(update.email_enabled)
        .bind(update.push_enabled)
        .bind(update.sms_enabled)
        .bind(update.in_app_enabled)
        .bind(update.planning_enabled)
        .bind(update.booking_enabled)
        .bind(update.social_enabled)
        .bind(update.performance_enabled)
        .bind(update.system_enabled)
        .bind(update.commercial_enabled)
        .bind(update.personalized_enabled)
        .bind(update.urgent_enabled)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
