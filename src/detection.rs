use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use log::info;
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::surface::Surface;

/// Snooze presets offered by the tray.
pub const PAUSE_PRESETS_MINUTES: [u64; 3] = [5, 15, 60];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionState {
    pub paused: bool,
    pub auto_resume_pending: bool,
}

/// Operator switch that makes the core ignore camera frames entirely.
///
/// The session countdown is untouched while detection is paused. Each return
/// to active detection bumps [`epoch`](Self::epoch), telling frame consumers
/// that whatever they tracked before the pause is stale.
#[derive(Clone)]
pub struct DetectionSwitch {
    paused: Arc<AtomicBool>,
    epoch: Arc<AtomicU64>,
    revert: Arc<Mutex<Option<JoinHandle<()>>>>,
    surface: Arc<dyn Surface>,
}

impl DetectionSwitch {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(false)),
            epoch: Arc::new(AtomicU64::new(0)),
            revert: Arc::new(Mutex::new(None)),
            surface,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub async fn state(&self) -> DetectionState {
        let auto_resume_pending = self
            .revert
            .lock()
            .await
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false);
        DetectionState {
            paused: self.is_paused(),
            auto_resume_pending,
        }
    }

    /// Pauses detection and re-enables it after `duration`.
    pub async fn pause_for(&self, duration: Duration) {
        let mut revert = self.revert.lock().await;
        if let Some(handle) = revert.take() {
            handle.abort();
        }
        self.set_paused(true);
        info!("detection paused for {}s", duration.as_secs());

        let paused = self.paused.clone();
        let epoch = self.epoch.clone();
        let surface = self.surface.clone();
        *revert = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            epoch.fetch_add(1, Ordering::AcqRel);
            paused.store(false, Ordering::Release);
            info!("detection pause elapsed, resuming");
            surface.status("Detection resumed.");
        }));
    }

    /// Pauses detection until [`enable`](Self::enable) is called.
    pub async fn disable(&self) {
        self.cancel_revert().await;
        self.set_paused(true);
        info!("detection disabled until re-enabled");
    }

    pub async fn enable(&self) {
        self.cancel_revert().await;
        if !self.is_paused() {
            return;
        }
        // Bump before clearing the flag so no frame is seen under the old epoch.
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.paused.store(false, Ordering::Release);
        info!("detection re-enabled");
        self.surface.status("Detection resumed.");
    }

    fn set_paused(&self, paused: bool) {
        let was_paused = self.paused.swap(paused, Ordering::AcqRel);
        if paused && !was_paused {
            self.surface.status("Detection paused.");
        }
    }

    async fn cancel_revert(&self) {
        if let Some(handle) = self.revert.lock().await.take() {
            handle.abort();
        }
    }
}
