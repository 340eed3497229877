use super::{format_time, Ui};
use crate::error::AppError;
use crate::models::network_types::NetworkStatus;
use crate::state::AppState;

pub async fn check_status(state: &AppState, ui: &mut Ui) -> Result<(), AppError> {
    let status = state.probe_once().await;
    print_status(ui, &status)
}

/// Polls until Ctrl-C, printing every status the monitor publishes.
pub async fn monitor(state: &AppState, ui: &mut Ui) -> Result<(), AppError> {
    let mut rx = state.subscribe_network();
    let _ = rx.borrow_and_update();

    if !ui.json() {
        let interval = state.config().probe_interval().as_secs_f64();
        println!(
            "{}",
            ui.palette()
                .muted(&format!("Auto-refresh every {} seconds. Ctrl-C to stop.", interval))
        );
    }
    state.start_monitor();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = *rx.borrow_and_update();
                print_status(ui, &status)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    state.stop_monitor();
    Ok(())
}

fn print_status(ui: &mut Ui, status: &NetworkStatus) -> Result<(), AppError> {
    if ui.json() {
        return ui.emit(status);
    }

    let palette = ui.palette();
    let flag = |active: bool, text: &str| {
        if active {
            palette.clean(text)
        } else {
            palette.alert(text)
        }
    };
    let latency = status
        .latency
        .map(|ms| format!("{} ms", ms))
        .unwrap_or_else(|| "N/A".to_string());

    println!(
        "[{}] Backend {}  Model {}  Latency {}",
        format_time(status.last_checked, "%H:%M:%S"),
        flag(status.is_connected, if status.is_connected { "Online" } else { "Offline" }),
        flag(status.model_ready, if status.model_ready { "Ready" } else { "Not Loaded" }),
        latency
    );
    Ok(())
}
