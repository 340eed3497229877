use super::Ui;
use crate::cli::SettingsArgs;
use crate::error::AppError;
use crate::models::settings_types::AppSettings;
use crate::state::AppState;

pub fn show_settings(state: &AppState, ui: &mut Ui) -> Result<(), AppError> {
    print_settings(ui, &state.settings())
}

pub fn set_settings(state: &AppState, ui: &mut Ui, args: SettingsArgs) -> Result<(), AppError> {
    if args.is_empty() {
        return print_settings(ui, &state.settings());
    }

    let updated = state.update_settings(|s| {
        if let Some(dark_mode) = args.dark_mode {
            s.dark_mode = dark_mode;
        }
        if let Some(threshold) = args.threshold {
            s.confidence_threshold = threshold;
        }
        if let Some(auto_save) = args.auto_save {
            s.auto_save_history = auto_save;
        }
    })?;

    if let Some(theme) = ui.theme().refresh() {
        if !ui.json() {
            println!("Theme switched to {:?}.", theme);
        }
    }
    print_settings(ui, &updated)
}

fn print_settings(ui: &mut Ui, settings: &AppSettings) -> Result<(), AppError> {
    if ui.json() {
        return ui.emit(settings);
    }

    let palette = ui.palette();
    let on_off = |b: bool| if b { "on" } else { "off" };
    println!("{}", palette.accent("Settings"));
    println!("  Dark mode             {}", on_off(settings.dark_mode));
    println!(
        "  Confidence threshold  {:.0}%",
        settings.confidence_threshold * 100.0
    );
    println!("  Auto-save history     {}", on_off(settings.auto_save_history));
    Ok(())
}
