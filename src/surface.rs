use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::timer::SessionSnapshot;

/// Longest an utterance may hold the speech gate without a finish report.
pub const SPEECH_RELEASE_AFTER: Duration = Duration::from_secs(15);

/// Everything the core shows or says goes through here.
pub trait Surface: Send + Sync {
    fn status(&self, message: &str);
    fn session(&self, snapshot: &SessionSnapshot);
    /// Transient full-text overlay; the view hides it after `hide_after`.
    fn overlay(&self, text: &str, hide_after: Duration);
    fn speak(&self, utterance: &str);
    fn camera_selected(&self, _device_id: Option<&str>) {}
}

/// Speech gate: at most one utterance in flight, later requests are dropped.
///
/// The view plays each `speak` request and reports back through
/// [`finished`](Self::finished) (the `speech_finished` command) when the
/// utterance ends or errors. A gate that is never released opens again after
/// `release_after`.
#[derive(Clone)]
pub struct Speaker {
    surface: Arc<dyn Surface>,
    in_flight: Arc<Mutex<Option<Instant>>>,
    release_after: Duration,
}

impl Speaker {
    pub fn new(surface: Arc<dyn Surface>) -> Self {
        Self::with_release_after(surface, SPEECH_RELEASE_AFTER)
    }

    pub fn with_release_after(surface: Arc<dyn Surface>, release_after: Duration) -> Self {
        Self {
            surface,
            in_flight: Arc::new(Mutex::new(None)),
            release_after,
        }
    }

    /// Returns `false` when the utterance was dropped.
    pub fn say(&self, utterance: &str) -> bool {
        let now = Instant::now();
        {
            let mut in_flight = self.lock();
            if let Some(started) = *in_flight {
                if now.saturating_duration_since(started) < self.release_after {
                    debug!("speech busy, dropping utterance: {utterance}");
                    return false;
                }
                warn!(
                    "no speech finish reported after {}s, releasing gate",
                    self.release_after.as_secs()
                );
            }
            *in_flight = Some(now);
        }
        self.surface.speak(utterance);
        true
    }

    pub fn finished(&self) {
        *self.lock() = None;
    }

    pub fn is_speaking(&self) -> bool {
        self.lock()
            .map(|started| started.elapsed() < self.release_after)
            .unwrap_or(false)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Instant>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(feature = "desktop")]
mod tauri_surface {
    use std::time::Duration;

    use serde::Serialize;
    use tauri::{AppHandle, Emitter, Runtime};

    use super::Surface;
    use crate::timer::SessionSnapshot;

    #[derive(Serialize, Clone)]
    struct StatusEvent<'a> {
        message: &'a str,
    }

    #[derive(Serialize, Clone)]
    #[serde(rename_all = "camelCase")]
    struct OverlayEvent<'a> {
        text: &'a str,
        hide_after_ms: u64,
    }

    #[derive(Serialize, Clone)]
    struct SpeakEvent<'a> {
        utterance: &'a str,
    }

    #[derive(Serialize, Clone)]
    #[serde(rename_all = "camelCase")]
    struct CameraEvent<'a> {
        device_id: Option<&'a str>,
    }

    impl<R: Runtime> Surface for AppHandle<R> {
        fn status(&self, message: &str) {
            let _ = self.emit("status-changed", StatusEvent { message });
        }

        fn session(&self, snapshot: &SessionSnapshot) {
            let _ = self.emit("session-changed", snapshot.clone());
        }

        fn overlay(&self, text: &str, hide_after: Duration) {
            let payload = OverlayEvent {
                text,
                hide_after_ms: hide_after.as_millis() as u64,
            };
            let _ = self.emit("overlay-shown", payload);
        }

        fn speak(&self, utterance: &str) {
            let _ = self.emit("speak", SpeakEvent { utterance });
        }

        fn camera_selected(&self, device_id: Option<&str>) {
            let _ = self.emit("select-camera", CameraEvent { device_id });
        }
    }
}
