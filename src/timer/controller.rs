use std::{sync::Arc, time::Duration};

use log::{debug, info};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant},
};

use crate::surface::{Speaker, Surface};

use super::state::{
    SessionDurations, SessionMode, SessionPhase, SessionSnapshot, SessionState, TickOutcome,
    Transition, Trigger,
};

const ANNOUNCE_STARTED: &str = "Pomodoro started. Stay focused!";
const ANNOUNCE_PAUSED: &str = "Pomodoro paused.";
const ANNOUNCE_RESUMED: &str = "Resuming Pomodoro.";

/// Owns the session state and the 1 Hz countdown task.
///
/// Every mutation goes through the state mutex, so ticks, manual commands and
/// presence edges are applied one at a time in arrival order.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<SessionState>>,
    surface: Arc<dyn Surface>,
    speaker: Speaker,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(durations: SessionDurations, surface: Arc<dyn Surface>, speaker: Speaker) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new(durations))),
            surface,
            speaker,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn start(&self) -> bool {
        self.apply(Trigger::Start).await
    }

    pub async fn pause(&self) -> bool {
        self.apply(Trigger::Pause).await
    }

    pub async fn resume(&self) -> bool {
        self.apply(Trigger::Resume).await
    }

    pub async fn reset(&self) -> bool {
        self.apply(Trigger::Reset).await
    }

    pub async fn presence_gained(&self) -> bool {
        self.apply(Trigger::PresenceGained).await
    }

    pub async fn presence_lost(&self) -> bool {
        self.apply(Trigger::PresenceLost).await
    }

    pub async fn set_durations(&self, durations: SessionDurations) {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.set_durations(durations);
            state.snapshot()
        };
        info!(
            "session durations set to {}s work / {}s break",
            durations.work_seconds, durations.break_seconds
        );
        self.surface.session(&snapshot);
    }

    async fn apply(&self, trigger: Trigger) -> bool {
        // The ticker is swapped while the state guard is held, so concurrent
        // triggers cannot leave a Running session without its countdown.
        // Lock order is always state, then ticker.
        let transition = {
            let mut state = self.state.lock().await;
            let Some(transition) = state.apply(trigger) else {
                debug!("{trigger:?} ignored, nothing to do");
                return false;
            };
            match transition.snapshot.phase {
                SessionPhase::Running => self.spawn_ticker().await,
                SessionPhase::Paused | SessionPhase::Idle => self.cancel_ticker().await,
            }
            transition
        };

        info!(
            "session {:?} -> {:?} ({:?}, {}s left)",
            transition.from,
            transition.snapshot.phase,
            transition.trigger,
            transition.snapshot.remaining_seconds
        );

        self.announce(&transition);
        true
    }

    fn announce(&self, transition: &Transition) {
        // The dispatcher reports presence gains on every edge.
        let (status, utterance) = match transition.trigger {
            Trigger::Start => (Some("Pomodoro started."), Some(ANNOUNCE_STARTED)),
            Trigger::Pause => (Some("Pomodoro paused."), Some(ANNOUNCE_PAUSED)),
            Trigger::PresenceLost => {
                (Some("Face not found. Pomodoro paused!"), Some(ANNOUNCE_PAUSED))
            }
            Trigger::Resume => (Some("Pomodoro resumed."), Some(ANNOUNCE_RESUMED)),
            Trigger::PresenceGained => (None, Some(ANNOUNCE_RESUMED)),
            Trigger::Reset => (Some("Pomodoro reset."), None),
        };

        self.surface.session(&transition.snapshot);
        if let Some(status) = status {
            self.surface.status(status);
        }
        if let Some(utterance) = utterance {
            self.speaker.say(utterance);
        }
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let surface = self.surface.clone();
        let speaker = self.speaker.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            // First tick lands one full period after (re)starting.
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            loop {
                interval.tick().await;

                let outcome = {
                    let mut guard = state.lock().await;
                    if !guard.is_running() {
                        break;
                    }
                    guard.tick()
                };

                match outcome {
                    TickOutcome::Counting(snapshot) => surface.session(&snapshot),
                    TickOutcome::Rolled { finished, snapshot } => {
                        info!("{finished:?} session complete, switching to {:?}", snapshot.mode);
                        let (status, utterance) = match finished {
                            SessionMode::Work => {
                                ("Break time.", "Pomodoro complete. Time for a break!")
                            }
                            SessionMode::Break => ("Back to work.", "Break over. Back to work!"),
                        };
                        surface.session(&snapshot);
                        surface.status(status);
                        speaker.say(utterance);
                    }
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub(crate) async fn ticker_active(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}
