use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Idle,
    Running,
    Paused,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionMode {
    Work,
    Break,
}

impl Default for SessionMode {
    fn default() -> Self {
        SessionMode::Work
    }
}

impl SessionMode {
    pub fn opposite(self) -> Self {
        match self {
            SessionMode::Work => SessionMode::Break,
            SessionMode::Break => SessionMode::Work,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDurations {
    pub work_seconds: u64,
    pub break_seconds: u64,
}

impl Default for SessionDurations {
    fn default() -> Self {
        Self {
            work_seconds: 25 * 60,
            break_seconds: 5 * 60,
        }
    }
}

impl SessionDurations {
    pub fn for_mode(&self, mode: SessionMode) -> u64 {
        match mode {
            SessionMode::Work => self.work_seconds,
            SessionMode::Break => self.break_seconds,
        }
    }
}

/// What asked for a phase change. Manual and presence-driven triggers share
/// transitions; only the wording shown to the user differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    Pause,
    Resume,
    Reset,
    PresenceGained,
    PresenceLost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub trigger: Trigger,
    pub from: SessionPhase,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Counting(SessionSnapshot),
    /// `finished` ran out; the snapshot is already in the next mode.
    Rolled {
        finished: SessionMode,
        snapshot: SessionSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: SessionMode,
    pub phase: SessionPhase,
    pub remaining_seconds: u64,
    pub display: String,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub mode: SessionMode,
    pub phase: SessionPhase,
    pub remaining_seconds: u64,
    pub durations: SessionDurations,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionDurations::default())
    }
}

impl SessionState {
    pub fn new(durations: SessionDurations) -> Self {
        Self {
            mode: SessionMode::Work,
            phase: SessionPhase::Idle,
            remaining_seconds: durations.work_seconds,
            durations,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            display: format_clock(self.remaining_seconds),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Applies a trigger. `None` means the trigger does not apply in the
    /// current phase and nothing changed.
    pub fn apply(&mut self, trigger: Trigger) -> Option<Transition> {
        let from = self.phase;
        match (trigger, from) {
            (Trigger::Start, SessionPhase::Idle) => {
                self.phase = SessionPhase::Running;
                self.remaining_seconds = self.durations.for_mode(self.mode);
            }
            (Trigger::Pause | Trigger::PresenceLost, SessionPhase::Running) => {
                self.phase = SessionPhase::Paused;
            }
            (
                Trigger::Resume | Trigger::PresenceGained,
                SessionPhase::Paused | SessionPhase::Idle,
            ) => {
                self.phase = SessionPhase::Running;
            }
            (Trigger::Reset, _) => {
                *self = Self::new(self.durations);
            }
            _ => return None,
        }

        Some(Transition {
            trigger,
            from,
            snapshot: self.snapshot(),
        })
    }

    /// One second of countdown. Only meaningful while running.
    pub fn tick(&mut self) -> TickOutcome {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::Counting(self.snapshot());
        }

        let finished = self.mode;
        self.mode = finished.opposite();
        self.remaining_seconds = self.durations.for_mode(self.mode);
        TickOutcome::Rolled {
            finished,
            snapshot: self.snapshot(),
        }
    }

    /// New durations apply to the next session; an idle timer shows them now.
    pub fn set_durations(&mut self, durations: SessionDurations) {
        self.durations = durations;
        if self.phase == SessionPhase::Idle {
            self.remaining_seconds = durations.for_mode(self.mode);
        }
    }
}

/// `MM:SS`, minutes are not wrapped into hours.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
