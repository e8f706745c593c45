//! Video analysis command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::session::AnalysisSession;
use anyhow::Result;
use std::path::Path;

/// Run the video command.
pub async fn run_video(file: &str, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Video) {
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

    let spinner = Output::spinner("Extracting frame and transcribing audio...");
    let analysis = session.analyze_video(&bytes, extension).await?;
    spinner.finish_and_clear();

    match &analysis.thumbnail {
        Some(thumb) => Output::kv("Thumbnail", &thumb.display().to_string()),
        None => Output::warning("No frame could be decoded from the video."),
    }
    if let Some(transcript) = &analysis.record.transcript {
        Output::header("Transcription");
        println!("{}", transcript);
    }

    Output::header("Analysis");
    println!("{}\n", analysis.record.result_text);

    Ok(())
}
