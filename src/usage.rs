// File: ./src/usage.rs
// Day-keyed cache of phone-usage minutes, plus the capability used to fill it.
use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const USAGE_DIR: &str = "usage_stats";

/// Platform access to aggregate app-usage statistics.
///
/// Implemented by the host (Android `UsageStatsManager` through the mobile
/// bridge, or a fake in tests). The cache never calls it; the controller does.
pub trait UsageQuery: Send + Sync {
    /// Whether the process currently holds usage-access permission.
    fn has_permission(&self) -> bool;

    /// Total foreground time across all apps on `date`, in minutes.
    fn query_minutes(&self, date: NaiveDate) -> Result<u64>;
}

pub struct UsageCache;

impl UsageCache {
    pub fn dir(root: &Path) -> PathBuf {
        root.join(USAGE_DIR)
    }

    /// `<root>/usage_stats/<date>.txt`
    pub fn path_for(root: &Path, date: NaiveDate) -> PathBuf {
        Self::dir(root).join(format!("{}.txt", date))
    }

    /// Best-effort write; failures are logged and dropped.
    pub fn save(root: &Path, date: NaiveDate, minutes: u64) {
        let path = Self::path_for(root, date);
        let result = fs::create_dir_all(Self::dir(root))
            .and_then(|_| fs::write(&path, minutes.to_string()));

        match result {
            Ok(()) => debug!("Cached {} usage minutes for {}", minutes, date),
            Err(e) => warn!("Failed to cache usage for {} at {}: {}", date, path.display(), e),
        }
    }

    /// Cached minutes for `date`. Missing, unreadable or garbled files are `None`.
    pub fn read(root: &Path, date: NaiveDate) -> Option<u64> {
        let path = Self::path_for(root, date);
        if !path.exists() {
            return None;
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| warn!("Failed to read usage cache {}: {}", path.display(), e))
            .ok()?;
        content
            .trim()
            .parse::<u64>()
            .map_err(|e| warn!("Ignoring unparsable usage cache {}: {}", path.display(), e))
            .ok()
    }
}
