//! Web search command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::session::AnalysisSession;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Search) {
        Output::error(&format!("{}", e));
        Output::info("Run 'granska doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let session = AnalysisSession::new(settings)?;

    let spinner = Output::spinner("Searching and analyzing...");
    let result = session.search_and_analyze(query).await;
    spinner.finish_and_clear();

    match result {
        Ok(record) => {
            println!("\n{}\n", record.result_text);
            Ok(())
        }
        Err(e) => {
            // Search backend failures are not converted to sentinels
            Output::error(&format!("Search failed: {}", e));
            Err(e.into())
        }
    }
}
