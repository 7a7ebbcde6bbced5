//! Error types for each stage of the pipeline.
//!
//! Fatality is decided by the caller: cache, remote-fetch and filter errors
//! abort a run, action errors are logged per notification.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode cache document: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode cache document: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },
    /// Response had no body where JSON was expected.
    #[error("unexpected end of JSON input")]
    EmptyBody,
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("no API token found (set GHNOT_TOKEN or GITHUB_TOKEN)")]
    MissingToken,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("parse error at {position}: {message}")]
    Parse { position: usize, message: String },
    #[error("unknown field {field:?}")]
    UnknownField { field: String },
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    #[error("invalid regex {pattern:?}: {message}")]
    Regex { pattern: String, message: String },
    /// `halt` was evaluated; stops the pass without being an error.
    #[error("halt")]
    Halt,
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("no assignees provided")]
    NoAssignees,
    #[error("notification {id} has no {what}")]
    MissingUrl { id: String, what: &'static str },
    #[error("failed to open browser: {0}")]
    Browser(#[source] std::io::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("rule {rule:?}: filter {filter:?}: {source}")]
    Filter {
        rule: String,
        filter: String,
        #[source]
        source: FilterError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no config directory available on this platform")]
    NoConfigDir,
}
