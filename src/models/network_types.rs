use serde::Serialize;

/// Result of the latest liveness probe. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    pub is_connected: bool,
    pub model_ready: bool,
    pub latency: Option<u64>,
    pub last_checked: i64,
}

impl NetworkStatus {
    pub fn online(latency_ms: u64, checked_at: i64) -> Self {
        // The liveness route is the only readiness signal the backend offers.
        Self {
            is_connected: true,
            model_ready: true,
            latency: Some(latency_ms),
            last_checked: checked_at,
        }
    }

    pub fn offline(checked_at: i64) -> Self {
        Self {
            is_connected: false,
            model_ready: false,
            latency: None,
            last_checked: checked_at,
        }
    }
}
