pub mod history;
pub mod network;
pub mod scan;
pub mod settings;

use crate::cli::{Commands, HistoryCommand, SettingsCommand};
use crate::error::AppError;
use crate::services::theme::{Palette, ThemeBinding};
use crate::state::AppState;
use serde::Serialize;

/// Terminal presentation: text styled by the current theme, or JSON.
pub struct Ui {
    json: bool,
    theme: ThemeBinding,
}

impl Ui {
    pub fn new(state: &AppState, json: bool) -> Self {
        Self {
            json,
            theme: ThemeBinding::new(state.subscribe_settings()),
        }
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn palette(&mut self) -> Palette {
        self.theme.refresh();
        self.theme.palette()
    }

    pub fn theme(&mut self) -> &mut ThemeBinding {
        &mut self.theme
    }

    pub fn emit<T: Serialize>(&self, value: &T) -> Result<(), AppError> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

pub async fn dispatch(state: &AppState, command: Commands, ui: &mut Ui) -> Result<(), AppError> {
    match command {
        Commands::Scan { path } => scan::scan_file(state, ui, &path).await,
        Commands::History(HistoryCommand::List) => history::list_history(state, ui),
        Commands::History(HistoryCommand::Clear) => history::clear_history(state, ui),
        Commands::Settings(SettingsCommand::Show) => settings::show_settings(state, ui),
        Commands::Settings(SettingsCommand::Set(args)) => settings::set_settings(state, ui, args),
        Commands::Status => network::check_status(state, ui).await,
        Commands::Monitor => network::monitor(state, ui).await,
    }
}

pub(crate) fn format_time(epoch_millis: i64, pattern: &str) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_millis)
        .map(|t| t.with_timezone(&chrono::Local).format(pattern).to_string())
        .unwrap_or_else(|| "-".to_string())
}
