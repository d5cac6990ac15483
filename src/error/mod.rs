//! Error types shared across the notification core.
//!
//! `StoreError` is what the persistence collaborators (record store,
//! preference store) surface; `NotificationError` is what the engine
//! returns to the surrounding application, always carrying the name of
//! the operation that failed so callers can log something meaningful.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the persistence collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row no longer maps onto the closed enums (legacy data).
    #[error("Stored row {id} could not be decoded: {reason}")]
    Decode { id: Uuid, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by the notification engine.
///
/// The engine never catches and hides a store failure, with one
/// documented exception: the preference check inside
/// `create_with_preference_check` fails open (see `engine`).
#[derive(Debug, Error)]
pub enum NotificationError {
    /// A wire-format kind string that is not part of the closed set.
    /// Catalog lookup itself is total over the enum; this only occurs
    /// when parsing external input.
    #[error("Unknown notification kind: {0}")]
    UnknownKind(String),

    #[error("Notification {0} not found")]
    NotFound(Uuid),

    #[error("Store failure during {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl NotificationError {
    /// Attach the failing operation's name to a store error.
    pub(crate) fn store(operation: &'static str, source: StoreError) -> Self {
        Self::Store { operation, source }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, NotificationError>;
