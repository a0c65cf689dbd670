//! Calendar sync engine: fetch upcoming events from Google, parse their
//! heterogeneous date shapes, and upsert them into local records.

pub mod api;
pub mod parse;
pub mod sync;

pub use api::CalendarApi;
pub use sync::{CalendarSyncEngine, SyncOutcome};
