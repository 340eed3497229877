use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::network_types::NetworkStatus;
use crate::models::scan_types::ScanResult;
use crate::models::settings_types::AppSettings;
use crate::services::health_monitor::HealthMonitor;
use crate::services::history::HistoryManager;
use crate::services::inference_client::{AbortSignal, InferenceClient, ScanRequest};
use crate::services::settings::SettingsManager;
use crate::services::store::Store;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

pub const STORE_FILE_NAME: &str = "farm-lens.db";

/// What the user sees after a successful scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub result: ScanResult,
    pub saved: bool,
}

/// Everything a screen needs. Settings and history are only changed through
/// the methods here, which persist before returning.
pub struct AppState {
    config: AppConfig,
    settings: SettingsManager,
    history: Mutex<HistoryManager>,
    client: InferenceClient,
    monitor: HealthMonitor,
}

impl AppState {
    pub fn open(config: AppConfig) -> Result<Self, AppError> {
        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir)?;
        let store = Store::open(data_dir.join(STORE_FILE_NAME))?;
        Self::open_with_store(config, store)
    }

    pub fn open_with_store(config: AppConfig, store: Store) -> Result<Self, AppError> {
        let settings = SettingsManager::load(store.clone())?;
        let history = HistoryManager::load(store)?;

        let http = InferenceClient::build_http_client(config.scan_timeout())
            .map_err(|e| AppError::Other(format!("Failed to build HTTP client: {}", e)))?;
        let client = InferenceClient::new(http.clone(), &config.base_url);
        let monitor = HealthMonitor::new(http, &config.base_url, config.probe_interval());

        tracing::debug!(
            base_url = %config.base_url,
            history = history.len(),
            "application state ready"
        );

        Ok(Self {
            config,
            settings,
            history: Mutex::new(history),
            client,
            monitor,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn history_lock(&self) -> Result<MutexGuard<'_, HistoryManager>, AppError> {
        self.history
            .lock()
            .map_err(|_| AppError::from("history lock poisoned"))
    }

    /// Runs one scan with the current threshold and, if accepted, offers the
    /// result to history under the current auto-save preference.
    pub async fn scan(
        &self,
        request: ScanRequest<'_>,
        abort: &AbortSignal,
    ) -> Result<ScanOutcome, AppError> {
        let threshold = self.settings.current().confidence_threshold;
        let result = self.client.scan(request, threshold, abort).await?;

        // Read again: the preference may have changed while the scan ran.
        let auto_save = self.settings.current().auto_save_history;
        let saved = self.history_lock()?.record(result.clone(), auto_save)?;
        Ok(ScanOutcome { result, saved })
    }

    pub fn settings(&self) -> AppSettings {
        self.settings.current()
    }

    pub fn update_settings<F>(&self, mutator: F) -> Result<AppSettings, AppError>
    where
        F: FnOnce(&mut AppSettings),
    {
        self.settings.update(mutator)
    }

    pub fn subscribe_settings(&self) -> watch::Receiver<AppSettings> {
        self.settings.subscribe()
    }

    pub fn history(&self) -> Result<Vec<ScanResult>, AppError> {
        Ok(self.history_lock()?.entries().to_vec())
    }

    pub fn clear_history(&self) -> Result<(), AppError> {
        self.history_lock()?.clear()
    }

    pub fn network_status(&self) -> NetworkStatus {
        self.monitor.status()
    }

    pub fn subscribe_network(&self) -> watch::Receiver<NetworkStatus> {
        self.monitor.subscribe()
    }

    pub async fn probe_once(&self) -> NetworkStatus {
        self.monitor.probe_once().await
    }

    pub fn start_monitor(&self) {
        self.monitor.start();
    }

    pub fn stop_monitor(&self) {
        self.monitor.stop();
    }
}
