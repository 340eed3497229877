use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Disease label the inference service uses for a leaf without issues.
pub const HEALTHY: &str = "healthy";

pub const DEFAULT_CROP: &str = "Unknown Crop";
pub const DEFAULT_DISEASE: &str = "Unknown Disease";
pub const DEFAULT_TREATMENT: &str = "No treatment info";
pub const DEFAULT_SAFETY: &str = "No safety info";
pub const DEFAULT_NOT_AVAILABLE: &str = "N/A";
pub const PRO_TIP: &str = "Ensure proper sunlight and watering schedule.";

/// One completed diagnosis, as shown to the user and kept in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub id: String,
    pub timestamp: i64,
    pub image: String,
    pub crop_name: String,
    pub disease_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    pub confidence: f64,
    pub treatment: String,
    pub safety: String,
    pub estimated_cost: String,
    pub sustainability_tip: String,
    pub pro_tip: String,
    pub has_issue: bool,
}

/// Body of a `POST /scan` answer. Every field is optional and may carry any
/// JSON type; anything unusable falls back to its default in `into_result`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResponse {
    pub crop: Option<String>,
    pub disease: Option<String>,
    pub confidence: Option<f64>,
    pub treatment: Option<String>,
    pub safety: Option<String>,
    pub cost_option: Option<String>,
    pub sustainability: Option<String>,
}

impl ScanResponse {
    /// Returns `None` when the body is not a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            crop: text("crop"),
            disease: text("disease"),
            confidence: obj.get("confidence").and_then(Value::as_f64),
            treatment: text("treatment"),
            safety: text("safety"),
            cost_option: text("cost_option"),
            sustainability: text("sustainability"),
        })
    }

    pub fn has_issue(&self) -> bool {
        self.disease.as_deref() != Some(HEALTHY)
    }

    pub fn into_result(self, id: String, timestamp: i64, image: String) -> ScanResult {
        let has_issue = self.has_issue();
        ScanResult {
            id,
            timestamp,
            image,
            crop_name: self.crop.unwrap_or_else(|| DEFAULT_CROP.to_string()),
            disease_name: self.disease.unwrap_or_else(|| DEFAULT_DISEASE.to_string()),
            scientific_name: None,
            confidence: self.confidence.unwrap_or(0.0),
            treatment: self.treatment.unwrap_or_else(|| DEFAULT_TREATMENT.to_string()),
            safety: self.safety.unwrap_or_else(|| DEFAULT_SAFETY.to_string()),
            estimated_cost: self.cost_option.unwrap_or_else(|| DEFAULT_NOT_AVAILABLE.to_string()),
            sustainability_tip: self
                .sustainability
                .unwrap_or_else(|| DEFAULT_NOT_AVAILABLE.to_string()),
            pro_tip: PRO_TIP.to_string(),
            has_issue,
        }
    }
}
