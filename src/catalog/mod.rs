//! Static catalog binding every notification kind to its template.

mod kinds;
mod templates;

pub use kinds::{Category, NotificationKind};
pub use templates::{all, lookup, validate, NotificationTemplate};
