// File: ./src/diary.rs
//! Per-date flat-text diary files.
//!
//! Layout: `<root>/<YYYY-MM-DD>.txt`. Each entry is terminated by a blank
//! line (`\n\n`). Entries are appended oldest-first and listed newest-first.
//!
//! Every operation collapses failures at this boundary: reads yield an empty
//! list, writes yield `false`. Errors are logged, never returned.
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Record delimiter between stored entries.
pub const ENTRY_DELIMITER: &str = "\n\n";
pub const DIARY_EXTENSION: &str = "txt";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct DiaryStore;

impl DiaryStore {
    /// `<root>/<date>.txt`
    pub fn path_for(root: &Path, date: NaiveDate) -> PathBuf {
        root.join(format!("{}.{}", date, DIARY_EXTENSION))
    }

    /// Entries for `date`, most recently appended first.
    pub fn list_entries(root: &Path, date: NaiveDate) -> Vec<String> {
        let path = Self::path_for(root, date);
        if !path.exists() {
            return vec![];
        }
        match fs::read_to_string(&path) {
            Ok(content) => Self::split_entries(&content),
            Err(e) => {
                warn!("Failed to read diary file {}: {}", path.display(), e);
                vec![]
            }
        }
    }

    /// Appends `text` verbatim. The caller owns the trailing delimiter.
    pub fn append_entry(root: &Path, date: NaiveDate, text: &str) -> bool {
        let path = Self::path_for(root, date);
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut f| f.write_all(text.as_bytes()));

        match result {
            Ok(()) => {
                debug!("Appended {} bytes to {}", text.len(), path.display());
                true
            }
            Err(e) => {
                warn!("Failed to append to diary file {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Truncates the file for `date`, creating it empty if absent.
    pub fn clear_file(root: &Path, date: NaiveDate) -> bool {
        let path = Self::path_for(root, date);
        match fs::write(&path, "") {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to clear diary file {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Dates that have a diary file with at least one entry, ascending.
    pub fn written_dates(root: &Path) -> Vec<NaiveDate> {
        let dir = match fs::read_dir(root) {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Failed to scan diary directory {}: {}", root.display(), e);
                return vec![];
            }
        };

        let mut dates: Vec<NaiveDate> = dir
            .flatten()
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .filter(|p| p.extension().is_some_and(|ext| ext == DIARY_EXTENSION))
            .filter_map(|p| {
                let stem = p.file_stem()?.to_str()?;
                NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
            })
            .filter(|date| !Self::list_entries(root, *date).is_empty())
            .collect();

        dates.sort();
        dates
    }

    fn split_entries(content: &str) -> Vec<String> {
        let mut entries: Vec<String> = content
            .split(ENTRY_DELIMITER)
            .map(str::trim)
            .filter(|fragment| !fragment.is_empty())
            .map(String::from)
            .collect();
        entries.reverse();
        entries
    }
}

/// Today's calendar date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current local time as `YYYY-MM-DD HH:MM`.
pub fn format_timestamp_now() -> String {
    format_timestamp(&Local::now().naive_local())
}

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Builds the on-disk record `"<timestamp>\n<text>\n\n"`.
///
/// Blank lines inside `text` are collapsed so the body can never contain the
/// delimiter. Returns `None` for blank text.
pub fn compose_entry(timestamp: &str, text: &str) -> Option<String> {
    let body = text
        .trim()
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if body.is_empty() {
        return None;
    }
    Some(format!("{}\n{}{}", timestamp, body, ENTRY_DELIMITER))
}
