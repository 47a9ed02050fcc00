use std::{sync::Arc, time::Instant};

use log::{debug, info};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    actions::GestureActions,
    detection::DetectionSwitch,
    gesture::{DetectionFrame, GestureRecognizer, HoldThresholds},
    presence::{PresenceEdge, PresenceTracker},
    surface::Surface,
    timer::TimerController,
};

use super::events::DetectionEvent;

const PRESENT_STATUS: &str = "You are present (pomodoro running)";

/// Gesture holds of one camera stream, tagged with the detection epoch they
/// were accumulated under.
pub struct StreamGestures {
    recognizer: GestureRecognizer,
    detection_epoch: u64,
}

struct PresenceSlot {
    tracker: PresenceTracker,
    detection_epoch: u64,
}

/// Single entry point from camera frames into the timer and gesture actions.
pub struct FrameDispatcher {
    timer: TimerController,
    detection: DetectionSwitch,
    actions: GestureActions,
    surface: Arc<dyn Surface>,
    presence: Mutex<PresenceSlot>,
    thresholds: HoldThresholds,
}

impl FrameDispatcher {
    pub fn new(
        timer: TimerController,
        detection: DetectionSwitch,
        actions: GestureActions,
        surface: Arc<dyn Surface>,
        presence: PresenceTracker,
        thresholds: HoldThresholds,
    ) -> Self {
        let detection_epoch = detection.epoch();
        Self {
            timer,
            detection,
            actions,
            surface,
            presence: Mutex::new(PresenceSlot {
                tracker: presence,
                detection_epoch,
            }),
            thresholds,
        }
    }

    /// Gesture holds belong to one camera stream; presence outlives it.
    pub fn stream_gestures(&self) -> StreamGestures {
        StreamGestures {
            recognizer: GestureRecognizer::new(self.thresholds),
            detection_epoch: self.detection.epoch(),
        }
    }

    pub async fn is_present(&self) -> bool {
        self.presence.lock().await.tracker.is_present()
    }

    /// Turns one frame into events and dispatches them in order.
    /// Frames are dropped untouched while detection is paused.
    pub async fn process_frame(
        &self,
        frame: &DetectionFrame,
        gestures: &mut StreamGestures,
        now: Instant,
        stream_token: &CancellationToken,
    ) -> Vec<DetectionEvent> {
        if self.detection.is_paused() {
            return Vec::new();
        }

        // Holds never span a detection pause.
        let epoch = self.detection.epoch();
        if gestures.detection_epoch != epoch {
            gestures.recognizer.reset();
            gestures.detection_epoch = epoch;
        }

        let mut events = vec![DetectionEvent::face(frame.face_detected)];
        events.extend(DetectionEvent::from_recognition(
            gestures.recognizer.observe(frame.primary_hand(), now),
        ));

        for event in &events {
            self.dispatch(*event, now, stream_token).await;
        }
        events
    }

    pub async fn dispatch(&self, event: DetectionEvent, now: Instant, stream_token: &CancellationToken) {
        match event {
            DetectionEvent::FaceDetected | DetectionEvent::FaceNotDetected => {
                let edge = {
                    let mut presence = self.presence.lock().await;
                    let epoch = self.detection.epoch();
                    if presence.detection_epoch != epoch {
                        presence.tracker.clear_pending_absence();
                        presence.detection_epoch = epoch;
                    }
                    presence
                        .tracker
                        .on_face_frame(event == DetectionEvent::FaceDetected, now)
                };
                match edge {
                    Some(PresenceEdge::Gained) => {
                        info!("presence gained");
                        self.timer.presence_gained().await;
                        self.surface.status(PRESENT_STATUS);
                    }
                    Some(PresenceEdge::Lost) => {
                        info!("presence lost");
                        self.timer.presence_lost().await;
                    }
                    None => {}
                }
            }
            DetectionEvent::GestureHoldStarted(kind) => {
                debug!("{kind:?} hold started");
                self.surface.status(kind.hold_message());
            }
            DetectionEvent::ThumbsUpHeld => {
                info!("thumbs up held, announcing time");
                self.surface.status("Thumbs up 👍 detected!");
                self.actions.announce_time();
            }
            DetectionEvent::ThreeFingersHeld => {
                info!("three fingers held, fetching weather");
                self.surface.status("Fetching weather...");
                self.actions.announce_weather(stream_token.child_token());
            }
        }
    }
}
