use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

use crate::{
    actions::{weather::WeatherClient, GestureActions},
    camera::FrameStreamController,
    detection::DetectionSwitch,
    dispatch::FrameDispatcher,
    presence::PresenceTracker,
    settings::UserSettings,
    surface::{Speaker, Surface},
    timer::TimerController,
};

/// Owns all core state: session, presence, gesture holds (via the stream
/// loop), the detection switch and the speech gate.
pub struct CoreContext {
    pub timer: TimerController,
    pub detection: DetectionSwitch,
    pub speaker: Speaker,
    pub dispatcher: Arc<FrameDispatcher>,
    pub streams: Arc<Mutex<FrameStreamController>>,
}

impl CoreContext {
    pub fn new(settings: &UserSettings, surface: Arc<dyn Surface>) -> Result<Self> {
        let speaker = Speaker::new(surface.clone());
        let timer = TimerController::new(
            settings.pomodoro.durations(),
            surface.clone(),
            speaker.clone(),
        );
        let detection = DetectionSwitch::new(surface.clone());
        let actions = GestureActions::new(
            surface.clone(),
            speaker.clone(),
            WeatherClient::new(&settings.weather)?,
            &settings.overlay,
        );

        let dispatcher = Arc::new(FrameDispatcher::new(
            timer.clone(),
            detection.clone(),
            actions,
            surface,
            PresenceTracker::new(settings.detection.absence_grace()),
            settings.detection.hold_thresholds(),
        ));
        let streams = Arc::new(Mutex::new(FrameStreamController::new(dispatcher.clone())));

        Ok(Self {
            timer,
            detection,
            speaker,
            dispatcher,
            streams,
        })
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.streams.lock().await.stop_stream().await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::settings::WeatherSettings;
    use crate::surface::recording::RecordingSurface;

    /// Context wired to a recording surface and an unreachable weather host.
    pub fn context() -> (CoreContext, Arc<RecordingSurface>) {
        let surface = Arc::new(RecordingSurface::default());
        let settings = UserSettings {
            weather: WeatherSettings {
                location_url: "http://127.0.0.1:9/json/".into(),
                request_timeout_secs: 2,
                ..WeatherSettings::default()
            },
            ..UserSettings::default()
        };
        let context = CoreContext::new(&settings, surface.clone()).unwrap();
        (context, surface)
    }
}
