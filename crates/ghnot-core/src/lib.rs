pub mod actions;
pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod models;
pub mod remote;
pub mod rules;
pub mod runtime;
pub mod store;
pub mod tracing_setup;

// Re-export the pipeline entry points at crate root for convenience
pub use actions::{Action, ActionRegistry};
pub use config::Config;
pub use error::{ActionError, CacheError, ConfigError, FilterError, RemoteError, RuleError};
pub use models::{Meta, Notification, Notifications, RefreshStrategy};
pub use remote::{GithubClient, RemoteSource};
pub use rules::{apply, ApplyReport, Rule};
pub use runtime::CoreRuntime;
pub use store::{sync, Cache, FileCache, SyncReport};
