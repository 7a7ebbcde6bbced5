//! File-backed cache for the local notification set.
//!
//! The cache is one JSON document rewritten on every run. A missing file is
//! a cache miss (empty and expired), never an error; any other I/O failure is.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::CacheError;
use crate::models::Notifications;

pub trait Cache {
    /// Raw document bytes; empty when no cache exists yet.
    fn read(&self) -> Result<Vec<u8>, CacheError>;
    fn write(&self, bytes: &[u8]) -> Result<(), CacheError>;
    /// True when the cache is missing or older than its TTL.
    fn expired(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
    ttl: Duration,
}

impl FileCache {
    pub fn new<P: AsRef<Path>>(path: P, ttl: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ttl,
        }
    }

    pub fn with_ttl_hours<P: AsRef<Path>>(path: P, hours: u64) -> Self {
        Self::new(path, Duration::from_secs(hours.saturating_mul(60 * 60)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Cache for FileCache {
    fn read(&self) -> Result<Vec<u8>, CacheError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("cache: no file at {}, starting empty", self.path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Write-to-temp-then-rename so an interrupted run never leaves a torn document.
    fn write(&self, bytes: &[u8]) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let temp_file = self.path.with_extension("json.tmp");
        std::fs::write(&temp_file, bytes).map_err(|e| self.io_error(e))?;
        std::fs::rename(&temp_file, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn expired(&self) -> bool {
        let modified = match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return true,
        };

        match modified.checked_add(self.ttl) {
            Some(deadline) => deadline <= SystemTime::now(),
            None => false,
        }
    }
}

pub fn load_notifications(cache: &dyn Cache) -> Result<Notifications, CacheError> {
    let bytes = cache.read()?;
    Notifications::from_json_bytes(&bytes).map_err(CacheError::Decode)
}

pub fn save_notifications(cache: &dyn Cache, notifications: &Notifications) -> Result<(), CacheError> {
    let bytes = notifications.to_json_bytes().map_err(CacheError::Encode)?;
    cache.write(&bytes)
}
