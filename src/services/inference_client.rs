use crate::error::ScanError;
use crate::models::scan_types::{ScanResponse, ScanResult};
use crate::services::media;
use reqwest::{multipart, Client};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Cooperative cancellation for a scan in flight.
#[derive(Clone, Default)]
pub struct AbortSignal {
    aborted: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    pub async fn aborted(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_aborted() {
                return;
            }
            notified.await;
        }
    }
}

/// An image handed to the inference service.
pub struct ScanRequest<'a> {
    pub bytes: Vec<u8>,
    pub mime_type: &'a str,
    pub file_name: &'a str,
    /// Stored as `ScanResult::image`.
    pub image_ref: String,
}

#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    scan_url: String,
}

static SCAN_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_scan_id(timestamp: i64) -> String {
    let seq = SCAN_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{:x}-{:x}", timestamp, seq)
}

impl InferenceClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            scan_url: format!("{}/scan", base_url.trim_end_matches('/')),
        }
    }

    pub fn build_http_client(timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    pub fn scan_url(&self) -> &str {
        &self.scan_url
    }

    /// Submits one image and maps the answer. Results whose confidence is
    /// below `threshold` are reported as `LowConfidence`; equal is accepted.
    pub async fn scan(
        &self,
        request: ScanRequest<'_>,
        threshold: f64,
        abort: &AbortSignal,
    ) -> Result<ScanResult, ScanError> {
        if request.bytes.is_empty() {
            return Err(ScanError::InvalidInput("image is empty".into()));
        }
        if !media::is_image_mime(request.mime_type) {
            return Err(ScanError::InvalidInput(format!(
                "{} is not an image type",
                request.mime_type
            )));
        }
        if abort.is_aborted() {
            return Err(ScanError::Cancelled);
        }

        let part = multipart::Part::bytes(request.bytes)
            .file_name(request.file_name.to_string())
            .mime_str(request.mime_type)
            .map_err(|e| ScanError::InvalidInput(format!("unusable content type: {}", e)))?;
        let form = multipart::Form::new().part("file", part);

        tracing::debug!(url = %self.scan_url, file = request.file_name, "submitting scan");

        let body = tokio::select! {
            res = self.submit(form) => res?,
            _ = abort.aborted() => {
                tracing::info!(file = request.file_name, "scan cancelled");
                return Err(ScanError::Cancelled);
            }
        };

        let response = ScanResponse::from_value(&body)
            .ok_or_else(|| ScanError::Decode("response body is not a JSON object".into()))?;

        let timestamp = chrono::Utc::now().timestamp_millis();
        let result = response.into_result(next_scan_id(timestamp), timestamp, request.image_ref);

        if result.confidence < threshold {
            tracing::info!(
                confidence = result.confidence,
                threshold,
                disease = %result.disease_name,
                "scan rejected for low confidence"
            );
            return Err(ScanError::LowConfidence {
                confidence: result.confidence,
                threshold,
            });
        }

        tracing::info!(
            crop = %result.crop_name,
            disease = %result.disease_name,
            confidence = result.confidence,
            has_issue = result.has_issue,
            "scan accepted"
        );
        Ok(result)
    }

    async fn submit(&self, form: multipart::Form) -> Result<Value, ScanError> {
        let resp = self
            .client
            .post(&self.scan_url)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "inference service rejected scan");
            return Err(ScanError::Service {
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ScanError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> InferenceClient {
        // Nothing listens here; tests below must fail before any request.
        InferenceClient::new(Client::new(), "http://127.0.0.1:9/")
    }

    fn request(bytes: Vec<u8>, mime_type: &str) -> ScanRequest<'_> {
        ScanRequest {
            bytes,
            mime_type,
            file_name: "leaf",
            image_ref: "leaf".into(),
        }
    }

    #[test]
    fn scan_url_has_single_slash() {
        assert_eq!(client().scan_url(), "http://127.0.0.1:9/scan");
    }

    #[tokio::test]
    async fn non_image_type_is_invalid_input() {
        let err = client()
            .scan(request(vec![1, 2, 3], "text/plain"), 0.6, &AbortSignal::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn empty_image_is_invalid_input() {
        let err = client()
            .scan(request(Vec::new(), "image/png"), 0.6, &AbortSignal::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn pre_aborted_signal_cancels_before_sending() {
        let abort = AbortSignal::new();
        abort.abort();
        let err = client()
            .scan(request(vec![0xff, 0xd8], "image/jpeg"), 0.6, &abort)
            .await
            .unwrap_err();
        assert_eq!(err, ScanError::Cancelled);
    }

    #[test]
    fn scan_ids_are_unique() {
        assert_ne!(next_scan_id(5), next_scan_id(5));
    }
}
