use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static BUILT_IN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)integrated|built[-\s]?in").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraDevice {
    pub device_id: String,
    #[serde(default)]
    pub label: String,
}

impl CameraDevice {
    /// Browsers hide labels until camera permission is granted.
    pub fn display_label(&self) -> String {
        if !self.label.trim().is_empty() {
            return self.label.clone();
        }
        let chars: Vec<char> = self.device_id.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("Camera ({tail})")
    }

    fn is_built_in(&self) -> bool {
        BUILT_IN_PATTERN.is_match(&self.label)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraRegistry {
    devices: Vec<CameraDevice>,
    selected: Option<String>,
}

impl CameraRegistry {
    pub fn devices(&self) -> &[CameraDevice] {
        &self.devices
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Replaces the device list and picks a default: a built-in camera if
    /// there is one, otherwise the first device.
    pub fn update(&mut self, devices: Vec<CameraDevice>) -> Option<&str> {
        let devices: Vec<CameraDevice> = devices
            .into_iter()
            .map(|device| CameraDevice {
                label: device.display_label(),
                ..device
            })
            .collect();
        self.selected = devices
            .iter()
            .find(|device| device.is_built_in())
            .or_else(|| devices.first())
            .map(|device| device.device_id.clone());
        self.devices = devices;
        self.selected()
    }

    /// Returns `false` for ids that are not in the current list.
    pub fn select(&mut self, device_id: &str) -> bool {
        if !self.devices.iter().any(|d| d.device_id == device_id) {
            return false;
        }
        self.selected = Some(device_id.to_string());
        true
    }
}
