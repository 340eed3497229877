use crate::error::AppError;
use crate::models::scan_types::ScanResult;
use crate::services::store::{Store, HISTORY_KEY};

/// Accepted scans, newest first.
pub struct HistoryManager {
    store: Store,
    entries: Vec<ScanResult>,
}

impl HistoryManager {
    /// Loads the persisted list. An absent blob is an empty history; an
    /// unreadable one is treated the same way and left in place until the next
    /// write replaces it.
    pub fn load(store: Store) -> Result<Self, AppError> {
        let entries = match store.get(HISTORY_KEY)? {
            None => Vec::new(),
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable scan history");
                Vec::new()
            }),
        };

        Ok(Self { store, entries })
    }

    pub fn entries(&self) -> &[ScanResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepends `result` and persists the full list. Returns whether it was kept.
    pub fn record(&mut self, result: ScanResult, auto_save: bool) -> Result<bool, AppError> {
        if !auto_save {
            tracing::debug!(id = %result.id, "auto-save disabled, scan not kept");
            return Ok(false);
        }

        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(result);
        next.extend(self.entries.iter().cloned());

        self.store.set(HISTORY_KEY, &serde_json::to_string(&next)?)?;
        self.entries = next;
        Ok(true)
    }

    /// Empties the list and deletes the persisted blob.
    pub fn clear(&mut self) -> Result<(), AppError> {
        self.store.remove(HISTORY_KEY)?;
        self.entries.clear();
        tracing::info!("scan history cleared");
        Ok(())
    }
}
