use serde::{Deserialize, Serialize};

pub const MIN_CONFIDENCE_THRESHOLD: f64 = 0.5;
pub const MAX_CONFIDENCE_THRESHOLD: f64 = 1.0;
/// Thresholds move in steps of 1/20.
const THRESHOLD_STEPS_PER_UNIT: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub confidence_threshold: f64,
    pub auto_save_history: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            confidence_threshold: 0.6,
            auto_save_history: true,
        }
    }
}

impl AppSettings {
    /// Clamps the threshold into its range and snaps it to the 0.05 grid.
    pub fn normalized(mut self) -> Self {
        let t = if self.confidence_threshold.is_finite() {
            self.confidence_threshold
        } else {
            AppSettings::default().confidence_threshold
        };
        let t = t.clamp(MIN_CONFIDENCE_THRESHOLD, MAX_CONFIDENCE_THRESHOLD);
        self.confidence_threshold = (t * THRESHOLD_STEPS_PER_UNIT).round() / THRESHOLD_STEPS_PER_UNIT;
        self
    }

    pub fn theme(&self) -> Theme {
        if self.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}
