pub mod clock;
pub mod weather;

use std::{sync::Arc, time::Duration};

use chrono::Local;
use log::{error, info};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    settings::OverlaySettings,
    surface::{Speaker, Surface},
};

use clock::time_announcement;
use weather::{WeatherClient, WeatherReport};

pub const WEATHER_FAILED: &str = "Failed to fetch weather.";

/// Side effects for recognized gestures.
#[derive(Clone)]
pub struct GestureActions {
    surface: Arc<dyn Surface>,
    speaker: Speaker,
    weather: WeatherClient,
    time_overlay: Duration,
    weather_overlay: Duration,
}

impl GestureActions {
    pub fn new(
        surface: Arc<dyn Surface>,
        speaker: Speaker,
        weather: WeatherClient,
        overlay: &OverlaySettings,
    ) -> Self {
        Self {
            surface,
            speaker,
            weather,
            time_overlay: Duration::from_millis(overlay.time_overlay_ms),
            weather_overlay: Duration::from_millis(overlay.weather_overlay_ms),
        }
    }

    /// Thumbs-up: show and speak the local time.
    pub fn announce_time(&self) {
        let announcement = time_announcement(Local::now().time());
        self.surface.overlay(&announcement.display, self.time_overlay);
        self.surface.status("Time shown");
        if !self.speaker.say(&announcement.utterance) {
            info!("time announcement not spoken, speech in progress");
        }
    }

    /// Three fingers: location then weather, off the frame path.
    ///
    /// The result is discarded if `cancel` fires first, so a torn down camera
    /// stream never gets a late update.
    pub fn announce_weather(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let actions = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("weather lookup cancelled with its camera stream");
                }
                result = actions.weather.current() => match result {
                    Ok(report) => actions.show_weather(&report),
                    Err(err) => {
                        error!("weather announcement failed: {err}");
                        actions.surface.status(WEATHER_FAILED);
                    }
                },
            }
        })
    }

    fn show_weather(&self, report: &WeatherReport) {
        let time = clock::format_time(Local::now().time());
        self.surface.status(&report.info_line());
        self.surface
            .overlay(&report.overlay_text(&time), self.weather_overlay);
        if !self.speaker.say(&report.utterance(&time)) {
            info!("weather announcement not spoken, speech in progress");
        }
    }
}
