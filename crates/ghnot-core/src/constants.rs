//! Application-wide constants
//!
//! Centralized location for default paths, endpoints and environment
//! variable names shared by the core and both binaries.

/// Default GitHub REST API base URL
pub const API_URL: &str = "https://api.github.com";

/// Accept header sent with every API request
pub const API_ACCEPT: &str = "application/vnd.github+json";

/// API version pinned in the `X-GitHub-Api-Version` header
pub const API_VERSION: &str = "2022-11-28";

/// User agent (GitHub rejects requests without one)
pub const USER_AGENT: &str = concat!("ghnot/", env!("CARGO_PKG_VERSION"));

// Pagination defaults
pub const DEFAULT_PER_PAGE: u32 = 50;
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Cache time-to-live in hours
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 1;

/// Directory name used under the platform config/cache dirs
pub const APP_DIR: &str = "ghnot";
pub const CONFIG_FILE: &str = "config.json";
pub const CACHE_FILE: &str = "notifications.json";

// Environment variables
pub const ENV_TOKEN: &str = "GHNOT_TOKEN";
pub const ENV_TOKEN_FALLBACK: &str = "GITHUB_TOKEN";
pub const ENV_LOG_FILE: &str = "GHNOT_LOG_FILE";
