use crate::error::AppError;
use crate::models::settings_types::AppSettings;
use crate::services::store::{Store, SETTINGS_KEY};
use tokio::sync::watch;

/// Owns the user's preferences. Every committed change is written through to
/// the store and published to subscribers.
pub struct SettingsManager {
    store: Store,
    tx: watch::Sender<AppSettings>,
}

impl SettingsManager {
    /// Reads the persisted settings. A missing blob yields the defaults, and so
    /// does an unreadable one.
    pub fn load(store: Store) -> Result<Self, AppError> {
        let settings = match store.get(SETTINGS_KEY)? {
            None => AppSettings::default(),
            Some(raw) => match serde_json::from_str::<AppSettings>(&raw) {
                Ok(s) => s.normalized(),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding unreadable settings, using defaults");
                    AppSettings::default()
                }
            },
        };

        let (tx, _) = watch::channel(settings);
        Ok(Self { store, tx })
    }

    pub fn current(&self) -> AppSettings {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppSettings> {
        self.tx.subscribe()
    }

    /// Applies `mutator` to a copy of the settings, persists the whole object and
    /// only then publishes it. On a store failure nothing changes.
    pub fn update<F>(&self, mutator: F) -> Result<AppSettings, AppError>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut next = self.current();
        mutator(&mut next);
        let next = next.normalized();

        self.store.set(SETTINGS_KEY, &serde_json::to_string(&next)?)?;
        tracing::info!(
            dark_mode = next.dark_mode,
            confidence_threshold = next.confidence_threshold,
            auto_save_history = next.auto_save_history,
            "settings updated"
        );

        self.tx.send_replace(next.clone());
        Ok(next)
    }
}
