use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::{gesture::HoldThresholds, timer::SessionDurations};

const WEATHER_KEY_ENV: &str = "TIMEQUACKER_WEATHER_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomodoroSettings {
    pub work_duration_secs: u64,
    pub break_duration_secs: u64,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration_secs: 25 * 60,
            break_duration_secs: 5 * 60,
        }
    }
}

impl PomodoroSettings {
    pub fn durations(&self) -> SessionDurations {
        SessionDurations {
            work_seconds: self.work_duration_secs,
            break_seconds: self.break_duration_secs,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.work_duration_secs > 0, "work duration must be greater than zero");
        ensure!(self.break_duration_secs > 0, "break duration must be greater than zero");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub face_absent_grace_ms: u64,
    pub thumbs_up_hold_ms: u64,
    pub three_fingers_hold_ms: u64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            face_absent_grace_ms: 5000,
            thumbs_up_hold_ms: 1500,
            three_fingers_hold_ms: 1200,
        }
    }
}

impl DetectionSettings {
    pub fn absence_grace(&self) -> Duration {
        Duration::from_millis(self.face_absent_grace_ms)
    }

    pub fn hold_thresholds(&self) -> HoldThresholds {
        HoldThresholds {
            thumbs_up: Duration::from_millis(self.thumbs_up_hold_ms),
            three_fingers: Duration::from_millis(self.three_fingers_hold_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub api_key: String,
    pub location_url: String,
    pub weather_url: String,
    pub request_timeout_secs: u64,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            location_url: "https://ipapi.co/json/".into(),
            weather_url: "https://api.openweathermap.org/data/2.5/weather".into(),
            request_timeout_secs: 10,
        }
    }
}

impl WeatherSettings {
    /// The environment variable wins over the stored key.
    pub fn resolved_api_key(&self) -> String {
        std::env::var(WEATHER_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| self.api_key.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub time_overlay_ms: u64,
    pub weather_overlay_ms: u64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            time_overlay_ms: 5000,
            weather_overlay_ms: 7000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub pomodoro: PomodoroSettings,
    pub detection: DetectionSettings,
    pub weather: WeatherSettings,
    pub overlay: OverlaySettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring malformed settings at {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn pomodoro(&self) -> PomodoroSettings {
        self.read().pomodoro.clone()
    }

    pub fn update_pomodoro(&self, settings: PomodoroSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        guard.pomodoro = settings;
        self.persist(&guard)
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let settings = store.snapshot();
        assert_eq!(settings, UserSettings::default());
        assert_eq!(settings.pomodoro.durations(), SessionDurations::default());
        assert_eq!(settings.detection.absence_grace(), Duration::from_millis(5000));
    }

    #[test]
    fn pomodoro_update_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        store
            .update_pomodoro(PomodoroSettings {
                work_duration_secs: 50 * 60,
                break_duration_secs: 10 * 60,
            })
            .unwrap();

        let reloaded = SettingsStore::new(path).unwrap();
        assert_eq!(reloaded.pomodoro().work_duration_secs, 3000);
        assert_eq!(reloaded.pomodoro().break_duration_secs, 600);
    }

    #[test]
    fn zero_durations_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let result = store.update_pomodoro(PomodoroSettings {
            work_duration_secs: 0,
            break_duration_secs: 300,
        });
        assert!(result.is_err());
        assert_eq!(store.pomodoro(), PomodoroSettings::default());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"detection":{"thumbs_up_hold_ms":2000}}"#).unwrap();

        let settings = SettingsStore::new(path).unwrap().snapshot();
        assert_eq!(settings.detection.thumbs_up_hold_ms, 2000);
        assert_eq!(settings.detection.three_fingers_hold_ms, 1200);
        assert_eq!(settings.overlay.weather_overlay_ms, 7000);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(SettingsStore::new(path).unwrap().snapshot(), UserSettings::default());
    }
}
