//! Image analysis command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::session::AnalysisSession;
use anyhow::Result;
use std::path::Path;

/// Run the image command.
pub async fn run_image(file: &str, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Image) {
        Output::error(&format!("{}", e));
        Output::info("Run 'granska doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let path = Path::new(file);
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", file, e))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", file))?;

    let session = AnalysisSession::new(settings)?;

    let spinner = Output::spinner("Analyzing image...");
    let record = session.analyze_image(&bytes, extension).await?;
    spinner.finish_and_clear();

    println!("\n{}\n", record.result_text);
    if let Some(source) = &record.source_ref {
        Output::kv("Saved copy", source);
    }

    Ok(())
}
