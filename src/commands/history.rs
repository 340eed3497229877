use super::{format_time, Ui};
use crate::error::AppError;
use crate::state::AppState;

pub fn list_history(state: &AppState, ui: &mut Ui) -> Result<(), AppError> {
    let history = state.history()?;
    if ui.json() {
        return ui.emit(&history);
    }

    let palette = ui.palette();
    if history.is_empty() {
        println!("{}", palette.muted("No scans yet. Your diagnosis history will appear here."));
        return Ok(());
    }

    println!("{}", palette.accent(&format!("Recent scans ({})", history.len())));
    for item in &history {
        let tag = if item.has_issue {
            palette.alert("ALERT")
        } else {
            palette.clean("CLEAN")
        };
        println!(
            "  {}  {:<5}  {:<12} {:<24} {:>3.0}% conf.",
            format_time(item.timestamp, "%Y-%m-%d"),
            tag,
            item.crop_name,
            item.disease_name,
            item.confidence * 100.0
        );
    }
    Ok(())
}

pub fn clear_history(state: &AppState, ui: &mut Ui) -> Result<(), AppError> {
    state.clear_history()?;
    if ui.json() {
        return ui.emit(&serde_json::json!({ "cleared": true }));
    }
    println!("{}", ui.palette().muted("History cleared."));
    Ok(())
}
