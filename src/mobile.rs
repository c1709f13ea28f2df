/* daybook/src/mobile.rs
 *
 * UniFFI interface exposing the diary core to mobile platforms (Android).
 */

use crate::config::Config;
use crate::context::{SharedContext, StandardContext};
use crate::controller::DiaryController;
use crate::diary;
use crate::sensor::{LightSensor, LightSensorHub, LightSubscription};
use crate::usage::UsageQuery;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};
use tokio::task::JoinHandle;

#[derive(Debug, uniffi::Error)]
#[uniffi(flat_error)]
pub enum MobileError {
    Generic(String),
}
impl From<String> for MobileError {
    fn from(e: String) -> Self {
        Self::Generic(e)
    }
}
impl From<&str> for MobileError {
    fn from(e: &str) -> Self {
        Self::Generic(e.to_string())
    }
}
impl From<anyhow::Error> for MobileError {
    fn from(e: anyhow::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
impl std::fmt::Display for MobileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MobileError::Generic(s) => s,
            }
        )
    }
}
impl std::error::Error for MobileError {}

/// Implemented in Kotlin on top of `UsageStatsManager` / `AppOpsManager`.
#[uniffi::export(with_foreign)]
pub trait UsageProvider: Send + Sync {
    fn has_usage_permission(&self) -> bool;
    /// Total foreground minutes for `date_iso` (`YYYY-MM-DD`), `None` on failure.
    fn query_usage_minutes(&self, date_iso: String) -> Option<u64>;
}

/// Receives ambient light readings while a [`LightWatch`] is running.
#[uniffi::export(with_foreign)]
pub trait LightListener: Send + Sync {
    fn on_light(&self, lux: f32);
}

#[derive(uniffi::Record)]
pub struct MobileUsageDay {
    pub date_iso: String,
    pub minutes: Option<u64>,
}

#[derive(uniffi::Record)]
pub struct MobileConfig {
    pub refresh_today_usage: bool,
    pub usage_history_days: u32,
    pub show_light_sensor: bool,
}

impl From<&Config> for MobileConfig {
    fn from(c: &Config) -> Self {
        Self {
            refresh_today_usage: c.refresh_today_usage,
            usage_history_days: c.usage_history_days,
            show_light_sensor: c.show_light_sensor,
        }
    }
}

struct ProviderQuery(Arc<dyn UsageProvider>);

impl UsageQuery for ProviderQuery {
    fn has_permission(&self) -> bool {
        self.0.has_usage_permission()
    }

    fn query_minutes(&self, date: NaiveDate) -> anyhow::Result<u64> {
        self.0
            .query_usage_minutes(date.to_string())
            .ok_or_else(|| anyhow::anyhow!("Platform usage query returned nothing for {}", date))
    }
}

fn parse_date(date_iso: &str) -> Result<NaiveDate, MobileError> {
    NaiveDate::parse_from_str(date_iso.trim(), "%Y-%m-%d")
        .map_err(|e| MobileError::from(format!("Invalid date '{}': {}", date_iso, e)))
}

/// Handle returned by `watch_light`. Stopping (or dropping) it releases the
/// sensor subscription.
#[derive(uniffi::Object)]
pub struct LightWatch {
    task: Mutex<Option<JoinHandle<()>>>,
}

#[uniffi::export]
impl LightWatch {
    pub fn stop(&self) {
        if let Ok(mut task) = self.task.lock()
            && let Some(handle) = task.take()
        {
            handle.abort();
        }
    }
}

impl Drop for LightWatch {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(uniffi::Object)]
pub struct DaybookMobile {
    ctx: SharedContext,
    usage: Arc<dyn UsageQuery>,
    config: RwLock<Config>,
    light: Arc<LightSensorHub>,
}

impl DaybookMobile {
    fn controller(&self) -> DiaryController {
        let config = self.config.read().map(|c| c.clone()).unwrap_or_default();
        DiaryController::new(self.ctx.clone(), config).with_usage_query(self.usage.clone())
    }
}

#[uniffi::export(async_runtime = "tokio")]
impl DaybookMobile {
    #[uniffi::constructor]
    pub fn new(android_files_dir: String, usage_provider: Arc<dyn UsageProvider>) -> Self {
        #[cfg(target_os = "android")]
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Debug)
                .with_tag("DaybookRust"),
        );
        let ctx: SharedContext =
            Arc::new(StandardContext::new(Some(PathBuf::from(android_files_dir))));
        let config = Config::load_or_init(ctx.as_ref());
        Self {
            ctx,
            usage: Arc::new(ProviderQuery(usage_provider)),
            config: RwLock::new(config),
            light: Arc::new(LightSensorHub::new()),
        }
    }

    pub fn format_timestamp_now(&self) -> String {
        diary::format_timestamp_now()
    }

    pub fn today_iso(&self) -> String {
        diary::today().to_string()
    }

    pub async fn get_entries(&self, date_iso: String) -> Result<Vec<String>, MobileError> {
        let date = parse_date(&date_iso)?;
        Ok(self.controller().entries(date).await)
    }

    /// `false` when the text is blank or the write failed.
    pub async fn add_entry(&self, date_iso: String, text: String) -> Result<bool, MobileError> {
        let date = parse_date(&date_iso)?;
        Ok(self.controller().add_entry(date, &text).await)
    }

    pub async fn clear_day(&self, date_iso: String) -> Result<bool, MobileError> {
        let date = parse_date(&date_iso)?;
        Ok(self.controller().clear(date).await)
    }

    pub async fn get_written_days(&self) -> Vec<String> {
        self.controller()
            .written_dates()
            .await
            .into_iter()
            .map(|d| d.to_string())
            .collect()
    }

    pub fn has_usage_permission(&self) -> bool {
        self.usage.has_permission()
    }

    pub async fn get_usage_minutes(&self, date_iso: String) -> Result<Option<u64>, MobileError> {
        let date = parse_date(&date_iso)?;
        Ok(self.controller().usage_minutes(date).await)
    }

    /// The configured number of days ending today, oldest first.
    pub async fn get_usage_history(&self) -> Vec<MobileUsageDay> {
        let controller = self.controller();
        let days = controller.config.usage_history_days;
        controller
            .usage_history(diary::today(), days)
            .await
            .into_iter()
            .map(|(date, minutes)| MobileUsageDay {
                date_iso: date.to_string(),
                minutes,
            })
            .collect()
    }

    /// Called from the platform `SensorEventListener`.
    pub fn publish_light(&self, lux: f32) {
        self.light.publish(lux);
    }

    pub fn latest_light(&self) -> Option<f32> {
        self.light.last_reading()
    }

    /// Forwards readings to `listener` until the returned watch is stopped.
    pub async fn watch_light(
        &self,
        listener: Arc<dyn LightListener>,
    ) -> Result<Arc<LightWatch>, MobileError> {
        let sensor: Arc<dyn LightSensor> = self.light.clone();
        let mut subscription = LightSubscription::subscribe(sensor, 16)?;
        let task = tokio::spawn(async move {
            while let Some(lux) = subscription.next_lux().await {
                listener.on_light(lux);
            }
        });
        Ok(Arc::new(LightWatch {
            task: Mutex::new(Some(task)),
        }))
    }

    pub fn get_config(&self) -> MobileConfig {
        self.config
            .read()
            .map(|c| MobileConfig::from(&*c))
            .unwrap_or_else(|_| MobileConfig::from(&Config::default()))
    }

    pub fn save_config(&self, config: MobileConfig) -> Result<(), MobileError> {
        let updated = Config {
            refresh_today_usage: config.refresh_today_usage,
            usage_history_days: config.usage_history_days,
            show_light_sensor: config.show_light_sensor,
        }
        .clamped();
        updated.save(self.ctx.as_ref())?;
        let mut current = self
            .config
            .write()
            .map_err(|_| MobileError::from("Config lock poisoned"))?;
        *current = updated;
        Ok(())
    }
}
