use crate::models::network_types::NetworkStatus;
use reqwest::Client;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(5000);

/// Polls the backend's liveness route and publishes the derived status.
///
/// Each tick spawns its own probe, so a slow probe can still be in flight when
/// the next one starts. Whichever finishes last sets the published status.
pub struct HealthMonitor {
    client: Client,
    liveness_url: String,
    interval: Duration,
    tx: watch::Sender<NetworkStatus>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl HealthMonitor {
    pub fn new(client: Client, base_url: &str, interval: Duration) -> Self {
        let (tx, _) = watch::channel(NetworkStatus::offline(now_millis()));
        Self {
            client,
            liveness_url: format!("{}/", base_url.trim_end_matches('/')),
            interval,
            tx,
            ticker: Mutex::new(None),
        }
    }

    pub fn liveness_url(&self) -> &str {
        &self.liveness_url
    }

    pub fn status(&self) -> NetworkStatus {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .map(|t| t.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Runs one probe now and publishes its outcome.
    pub async fn probe_once(&self) -> NetworkStatus {
        let status = probe(&self.client, &self.liveness_url).await;
        self.tx.send_replace(status);
        status
    }

    /// Starts polling: one probe immediately, then one per interval. Calling it
    /// while already running is a no-op. Must be called inside a Tokio runtime.
    pub fn start(&self) {
        let Ok(mut ticker) = self.ticker.lock() else {
            return;
        };
        if ticker.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let client = self.client.clone();
        let url = self.liveness_url.clone();
        let tx = self.tx.clone();
        let period = self.interval;

        tracing::info!(url = %url, interval_ms = period.as_millis() as u64, "health monitor started");

        *ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let client = client.clone();
                let url = url.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    tx.send_replace(probe(&client, &url).await);
                });
            }
        }));
    }

    /// Cancels the timer. Probes already in flight still complete and publish.
    pub fn stop(&self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            if let Some(handle) = ticker.take() {
                handle.abort();
                tracing::info!("health monitor stopped");
            }
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn probe(client: &Client, url: &str) -> NetworkStatus {
    let started = Instant::now();
    let outcome = client.get(url).send().await;
    let elapsed = started.elapsed().as_millis() as u64;

    let status = match outcome {
        Ok(resp) if resp.status().is_success() => NetworkStatus::online(elapsed, now_millis()),
        Ok(resp) => {
            tracing::debug!(status = resp.status().as_u16(), "liveness probe failed");
            NetworkStatus::offline(now_millis())
        }
        Err(e) => {
            tracing::debug!(error = %e, "liveness probe unreachable");
            NetworkStatus::offline(now_millis())
        }
    };

    tracing::debug!(
        connected = status.is_connected,
        latency_ms = ?status.latency,
        "liveness probe finished"
    );
    status
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liveness_url_is_the_root_route() {
        let monitor = HealthMonitor::new(Client::new(), "http://127.0.0.1:8000/", DEFAULT_PROBE_INTERVAL);
        assert_eq!(monitor.liveness_url(), "http://127.0.0.1:8000/");
        let monitor = HealthMonitor::new(Client::new(), "http://127.0.0.1:8000", DEFAULT_PROBE_INTERVAL);
        assert_eq!(monitor.liveness_url(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn starts_offline_and_idle() {
        let monitor = HealthMonitor::new(Client::new(), "http://127.0.0.1:8000", DEFAULT_PROBE_INTERVAL);
        let status = monitor.status();
        assert!(!status.is_connected);
        assert!(!status.model_ready);
        assert_eq!(status.latency, None);
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn stop_without_start_is_harmless() {
        let monitor = HealthMonitor::new(Client::new(), "http://127.0.0.1:8000", DEFAULT_PROBE_INTERVAL);
        monitor.stop();
        monitor.stop();
        assert!(!monitor.is_running());
    }
}
