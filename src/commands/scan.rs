use super::Ui;
use crate::error::{AppError, ScanError};
use crate::models::scan_types::ScanResult;
use crate::services::inference_client::{AbortSignal, ScanRequest};
use crate::services::media;
use crate::state::{AppState, ScanOutcome};
use std::path::Path;

pub async fn scan_file(state: &AppState, ui: &mut Ui, path: &Path) -> Result<(), AppError> {
    let mime_type = media::declared_mime_type(path);
    if !media::is_image_mime(mime_type) {
        return report_failure(ui, ScanError::InvalidInput(format!("{} is not an image", path.display())));
    }

    let bytes = match tokio::fs::read(path).await {
        Ok(b) => b,
        Err(e) => {
            return report_failure(
                ui,
                ScanError::InvalidInput(format!("cannot read {}: {}", path.display(), e)),
            )
        }
    };

    let image_ref = tokio::fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .to_string();
    let file_name = media::file_name(path);

    // Ctrl-C while waiting on the backend abandons the scan.
    let abort = AbortSignal::new();
    let on_interrupt = abort.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.abort();
        }
    });

    if !ui.json() {
        println!("{}", ui.palette().muted(&format!("Analyzing {}...", file_name)));
    }

    let request = ScanRequest {
        bytes,
        mime_type,
        file_name: &file_name,
        image_ref,
    };
    let outcome = state.scan(request, &abort).await;
    interrupt.abort();

    match outcome {
        Ok(outcome) => report_success(ui, &outcome),
        Err(AppError::Scan(e)) => report_failure(ui, e),
        Err(e) => Err(e),
    }
}

fn report_success(ui: &mut Ui, outcome: &ScanOutcome) -> Result<(), AppError> {
    if ui.json() {
        return ui.emit(&serde_json::json!({
            "result": outcome.result,
            "saved": outcome.saved,
        }));
    }

    print_result_card(ui, &outcome.result);
    if !outcome.saved {
        println!("{}", ui.palette().muted("Auto-save is off; this scan was not added to history."));
    }
    Ok(())
}

fn print_result_card(ui: &mut Ui, result: &ScanResult) {
    let palette = ui.palette();
    let verdict = if result.has_issue {
        palette.alert("Issue detected")
    } else {
        palette.clean("Healthy")
    };

    println!();
    println!("{}  {}", palette.accent(&result.crop_name), verdict);
    println!("  Diagnosis      {}", result.disease_name);
    if let Some(name) = result.scientific_name.as_deref().filter(|n| !n.is_empty()) {
        println!("  Scientific     {}", name);
    }
    println!("  Confidence     {:.0}%", result.confidence * 100.0);
    println!("  Treatment      {}", result.treatment);
    println!("  Safety         {}", result.safety);
    println!("  Est. cost      {}", result.estimated_cost);
    println!("  Sustainability {}", result.sustainability_tip);
    println!("  {}", palette.muted(&format!("Pro tip: {}", result.pro_tip)));
}

/// Scan failures are shown to the user and leave the command successful.
fn report_failure(ui: &mut Ui, err: ScanError) -> Result<(), AppError> {
    tracing::debug!(error = %err, "scan failed");
    if ui.json() {
        return ui.emit(&serde_json::json!({
            "error": err,
            "message": err.user_message(),
        }));
    }
    println!("{}", ui.palette().alert(err.user_message()));
    Ok(())
}
