//! CLI module for Granska.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Granska - Multimodal Media Analysis
///
/// A local-first CLI tool for analyzing images, videos, and web searches with
/// generative AI. The name "Granska" comes from the Swedish word for "examine."
#[derive(Parser, Debug)]
#[command(name = "granska")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize Granska and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Analyze an image file
    Image {
        /// Path to an image file (png, jpg, jpeg)
        file: String,
    },

    /// Analyze a video file using its first frame and audio transcription
    Video {
        /// Path to a video file (mp4, mov, avi)
        file: String,
    },

    /// Run a web search and analyze the results
    Search {
        /// Search query
        query: String,
    },

    /// Start an interactive analysis session
    ///
    /// Past analyses accumulate for the lifetime of the session and can be
    /// listed or queried as a knowledge base.
    Shell,

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "analysis.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
