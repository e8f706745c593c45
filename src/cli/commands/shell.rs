//! Interactive analysis session command.
//!
//! Runs all four workflows against one long-lived session, so past
//! analyses accumulate and can be listed or queried as a knowledge base.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::GranskaError;
use crate::session::AnalysisSession;
use console::style;
use std::io::{self, BufRead, Write};
use std::path::Path;

const HELP: &str = "Commands:
  image <path>     Analyze an image file (png, jpg, jpeg)
  video <path>     Analyze a video file (mp4, mov, avi)
  search <query>   Run a web search and analyze the results
  ask <question>   Ask a question about past analyses
  list             Show past analyses from this session
  help             Show this help
  exit             Quit";

/// Run the interactive shell command.
pub async fn run_shell(settings: Settings) -> anyhow::Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Image) {
        Output::error(&format!("{}", e));
        Output::info("Run 'granska doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let session = AnalysisSession::new(settings)?;

    println!("\n{}", style("Granska Shell").bold().cyan());
    println!("{}\n", style("Type 'help' for commands, 'exit' to quit.").dim());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("granska>").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (input, ""),
        };

        match command.to_lowercase().as_str() {
            "exit" | "quit" => {
                Output::info("Goodbye!");
                break;
            }
            "help" => println!("{}", HELP),
            "list" => list_records(&session),
            "image" => analyze_media(&session, rest, false).await,
            "video" => analyze_media(&session, rest, true).await,
            "search" => run_search(&session, rest).await,
            "ask" => run_ask(&session, rest).await,
            other => {
                Output::warning(&format!("Unknown command: {}", other));
                println!("{}", HELP);
            }
        }
    }

    Ok(())
}

/// Run the image or video workflow on a local file.
async fn analyze_media(session: &AnalysisSession, file: &str, video: bool) {
    if file.is_empty() {
        Output::warning("Usage: image <path> | video <path>");
        return;
    }

    if video {
        if let Err(e) = preflight::check(Operation::Video) {
            Output::error(&format!("{}", e));
            return;
        }
    }

    let path = Path::new(file);
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            Output::error(&format!("Cannot read {}: {}", file, e));
            return;
        }
    };
    let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
        Output::error(&format!("File has no extension: {}", file));
        return;
    };

    let spinner = Output::spinner("Analyzing...");
    if video {
        match session.analyze_video(&bytes, extension).await {
            Ok(analysis) => {
                spinner.finish_and_clear();
                Output::record(&analysis.record);
            }
            Err(e) => {
                spinner.finish_and_clear();
                Output::error(&format!("{}", e));
            }
        }
    } else {
        match session.analyze_image(&bytes, extension).await {
            Ok(record) => {
                spinner.finish_and_clear();
                Output::record(&record);
            }
            Err(e) => {
                spinner.finish_and_clear();
                Output::error(&format!("{}", e));
            }
        }
    }
}

/// Run the web search workflow.
async fn run_search(session: &AnalysisSession, query: &str) {
    if query.is_empty() {
        Output::warning("Usage: search <query>");
        return;
    }

    let spinner = Output::spinner("Searching and analyzing...");
    match session.search_and_analyze(query).await {
        Ok(record) => {
            spinner.finish_and_clear();
            Output::record(&record);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Search failed: {}", e));
        }
    }
}

/// Run a knowledge base query.
async fn run_ask(session: &AnalysisSession, question: &str) {
    if question.is_empty() {
        Output::warning("Usage: ask <question>");
        return;
    }

    if let Err(e) = preflight::check(Operation::Knowledge) {
        Output::error(&format!("{}", e));
        return;
    }

    let spinner = Output::spinner("Searching knowledge base...");
    match session.query_knowledge(question).await {
        Ok(answer) => {
            spinner.finish_and_clear();
            println!("\n{}\n", answer);
        }
        Err(GranskaError::NoPastAnalyses) => {
            spinner.finish_and_clear();
            Output::warning("No past analyses available for knowledge search.");
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("{}", e));
        }
    }
}

/// Show past analyses in append order.
fn list_records(session: &AnalysisSession) {
    let records = session.records();
    if records.is_empty() {
        Output::info("No past analyses yet.");
        return;
    }

    Output::header("Past Analyses");
    for record in &records {
        Output::record(record);
    }
}
