// File: ./src/sensor.rs
//! Ambient light readings.
//!
//! The platform pushes lux values; consumers hold a [`LightSubscription`]
//! for as long as they are on screen. The subscription unregisters itself on
//! every exit path, so a closed screen never leaves a listener behind.
use anyhow::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Push-style light sensor.
pub trait LightSensor: Send + Sync {
    /// Starts delivering readings into `sink`. Returns a registration id.
    fn register(&self, sink: mpsc::Sender<f32>) -> Result<u64>;

    fn unregister(&self, id: u64);
}

/// Scoped registration with a [`LightSensor`].
pub struct LightSubscription {
    sensor: Arc<dyn LightSensor>,
    id: Option<u64>,
    rx: mpsc::Receiver<f32>,
    latest: Option<f32>,
}

impl LightSubscription {
    pub fn subscribe(sensor: Arc<dyn LightSensor>, capacity: usize) -> Result<Self> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let id = sensor.register(tx)?;
        log::debug!("Light sensor subscription {} registered", id);
        Ok(Self {
            sensor,
            id: Some(id),
            rx,
            latest: None,
        })
    }

    /// Waits for the next reading. `None` once the sensor stops delivering.
    pub async fn next_lux(&mut self) -> Option<f32> {
        let lux = self.rx.recv().await?;
        self.latest = Some(lux);
        Some(lux)
    }

    /// Last reading returned by `next_lux`.
    pub fn latest(&self) -> Option<f32> {
        self.latest
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.sensor.unregister(id);
            self.rx.close();
            log::debug!("Light sensor subscription {} released", id);
        }
    }
}

impl Drop for LightSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// In-process sensor fed by the platform listener through [`publish`](Self::publish).
#[derive(Default)]
pub struct LightSensorHub {
    next_id: AtomicU64,
    sinks: Mutex<HashMap<u64, mpsc::Sender<f32>>>,
    last: Mutex<Option<f32>>,
}

impl LightSensorHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fans `lux` out to every live sink. Negative or non-finite values are dropped.
    /// Full sinks miss this reading; closed sinks are pruned.
    pub fn publish(&self, lux: f32) {
        if !lux.is_finite() || lux < 0.0 {
            log::debug!("Ignoring invalid light reading: {}", lux);
            return;
        }
        if let Ok(mut last) = self.last.lock() {
            *last = Some(lux);
        }
        if let Ok(mut sinks) = self.sinks.lock() {
            sinks.retain(|_, sink| match sink.try_send(lux) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => true,
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            });
        }
    }

    pub fn last_reading(&self) -> Option<f32> {
        self.last.lock().ok().and_then(|last| *last)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl LightSensor for LightSensorHub {
    fn register(&self, sink: mpsc::Sender<f32>) -> Result<u64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.sinks
            .lock()
            .map_err(|_| anyhow::anyhow!("Light sensor registry poisoned"))?
            .insert(id, sink);
        Ok(id)
    }

    fn unregister(&self, id: u64) {
        if let Ok(mut sinks) = self.sinks.lock() {
            sinks.remove(&id);
        }
    }
}
