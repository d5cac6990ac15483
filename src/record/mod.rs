//! Notification records and their storage backends.

mod memory;
mod postgres;
mod store;
mod types;

pub use memory::MemoryNotificationStore;
pub use postgres::PostgresNotificationStore;
pub use store::{MarkReadOutcome, NotificationStore};
pub use types::{ListQuery, NotificationRecord, NotificationStatus, Priority, RecordFilter};
