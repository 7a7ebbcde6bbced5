pub mod cache;
pub mod sync;

pub use cache::{load_notifications, save_notifications, Cache, FileCache};
pub use sync::{sync, sync_with_report, SyncReport};
