// File: src/controller.rs
//! Central controller for diary and usage operations.
//! Every front end (CLI, mobile) goes through this type so that blocking file
//! work always runs on the background pool and failures collapse the same way.
use crate::config::Config;
use crate::context::SharedContext;
use crate::diary::{self, DiaryStore};
use crate::usage::{UsageCache, UsageQuery};
use chrono::{Days, NaiveDate};
use futures::stream::{self, StreamExt};
use log::warn;
use std::path::Path;
use std::sync::Arc;

/// Async façade over [`DiaryStore`] and [`UsageCache`].
///
/// Dropping one of its futures abandons the result only. A file call that was
/// already dispatched to the blocking pool still runs to completion.
#[derive(Clone)]
pub struct DiaryController {
    pub ctx: SharedContext,
    pub config: Config,
    usage: Option<Arc<dyn UsageQuery>>,
}

impl DiaryController {
    pub fn new(ctx: SharedContext, config: Config) -> Self {
        Self {
            ctx,
            config,
            usage: None,
        }
    }

    pub fn with_usage_query(mut self, usage: Arc<dyn UsageQuery>) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Runs `f` against the data directory on the blocking pool.
    /// Returns `fallback` when the directory can't be resolved or the task dies.
    async fn on_data_dir<T, F>(&self, fallback: T, f: F) -> T
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> T + Send + 'static,
    {
        let ctx = self.ctx.clone();
        let task = tokio::task::spawn_blocking(move || match ctx.get_data_dir() {
            Ok(root) => Some(f(&root)),
            Err(e) => {
                warn!("Diary storage unavailable: {:#}", e);
                None
            }
        });

        match task.await {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(e) => {
                warn!("Background storage task failed: {}", e);
                fallback
            }
        }
    }

    pub async fn entries(&self, date: NaiveDate) -> Vec<String> {
        self.on_data_dir(vec![], move |root| DiaryStore::list_entries(root, date))
            .await
    }

    /// Stamps `text` with the current time and appends it to `date`.
    /// Blank text is refused without touching the file.
    pub async fn add_entry(&self, date: NaiveDate, text: &str) -> bool {
        let Some(record) = diary::compose_entry(&diary::format_timestamp_now(), text) else {
            return false;
        };
        self.on_data_dir(false, move |root| {
            DiaryStore::append_entry(root, date, &record)
        })
        .await
    }

    pub async fn clear(&self, date: NaiveDate) -> bool {
        self.on_data_dir(false, move |root| DiaryStore::clear_file(root, date))
            .await
    }

    pub async fn written_dates(&self) -> Vec<NaiveDate> {
        self.on_data_dir(vec![], |root| DiaryStore::written_dates(root))
            .await
    }

    pub fn has_usage_permission(&self) -> bool {
        self.usage.as_ref().is_some_and(|q| q.has_permission())
    }

    /// Usage minutes for `date`, from the cache or a fresh platform query.
    ///
    /// The platform is queried when nothing is cached, or when `date` is today
    /// and `refresh_today_usage` is set. A fresh value is written back to the
    /// cache. Without permission, or if the query fails, the cached value
    /// (possibly `None`) is returned.
    pub async fn usage_minutes(&self, date: NaiveDate) -> Option<u64> {
        let cached = self
            .on_data_dir(None, move |root| UsageCache::read(root, date))
            .await;

        let today = diary::today();
        if date > today {
            return cached;
        }
        let wants_fresh =
            cached.is_none() || (date == today && self.config.refresh_today_usage);
        if !wants_fresh {
            return cached;
        }
        let Some(query) = self.usage.clone() else {
            return cached;
        };

        let fresh = tokio::task::spawn_blocking(move || {
            if !query.has_permission() {
                log::debug!("No usage-access permission; serving cache for {}", date);
                return None;
            }
            query
                .query_minutes(date)
                .map_err(|e| warn!("Usage query for {} failed: {:#}", date, e))
                .ok()
        })
        .await
        .unwrap_or_else(|e| {
            warn!("Usage query task failed: {}", e);
            None
        });

        match fresh {
            Some(minutes) => {
                self.on_data_dir((), move |root| UsageCache::save(root, date, minutes))
                    .await;
                Some(minutes)
            }
            None => cached,
        }
    }

    /// Display value: zero when nothing is known.
    pub async fn usage_minutes_or_zero(&self, date: NaiveDate) -> u64 {
        self.usage_minutes(date).await.unwrap_or(0)
    }

    /// The `days` dates ending at `end`, oldest first, with their usage.
    /// Days are resolved one after another.
    pub async fn usage_history(&self, end: NaiveDate, days: u32) -> Vec<(NaiveDate, Option<u64>)> {
        let dates: Vec<NaiveDate> = (0..days as u64)
            .rev()
            .filter_map(|back| end.checked_sub_days(Days::new(back)))
            .collect();

        stream::iter(dates)
            .then(|date| async move { (date, self.usage_minutes(date).await) })
            .collect()
            .await
    }
}
