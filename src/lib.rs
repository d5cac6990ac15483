//! Notification templating and delivery-preference engine for the
//! events platform.
//!
//! The surrounding REST application calls the [`engine::NotificationEngine`]
//! operations directly; this crate decides *whether* and *what* to
//! persist as a notification record, never how it is delivered.
//! Host applications should call [`catalog::validate`] once at boot so
//! a catalog gap surfaces before any request does.

// Infrastructure (shared components)
pub mod config;
pub mod error;
pub mod metrics;
pub mod postgres;
pub mod telemetry;

// Domain
pub mod catalog;
pub mod engine;
pub mod preference;
pub mod record;
pub mod render;

pub use catalog::{Category, NotificationKind, NotificationTemplate};
pub use engine::{CreateOutcome, NotificationEngine, RepairSummary};
pub use error::{NotificationError, Result, StoreError};
pub use preference::{NotificationPreference, PreferenceGate, PreferenceStore, PreferenceUpdate};
pub use record::{
    ListQuery, NotificationRecord, NotificationStatus, NotificationStore, Priority, RecordFilter,
};
