//! Granska - Multimodal Media Analysis
//!
//! A local-first CLI tool for analyzing images, videos, and web search results
//! with generative AI, backed by an in-session knowledge base of past analyses.
//!
//! The name "Granska" comes from the Swedish word for "examine" or "scrutinize."
//!
//! # Overview
//!
//! Granska allows you to:
//! - Analyze images and get a detailed AI-generated description
//! - Analyze videos using a first-frame thumbnail plus an audio transcription
//! - Run a web search and get an AI analysis of the results
//! - Ask questions answered from your past analyses in the current session
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt templates
//! - `media` - Uploaded asset storage, frame extraction, audio extraction
//! - `transcription` - Speech-to-text transcription
//! - `analysis` - Content analysis, the analysis log, and knowledge queries
//! - `search` - Web search backends
//! - `session` - Workflow coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use granska::config::Settings;
//! use granska::session::AnalysisSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let session = AnalysisSession::new(settings)?;
//!
//!     let bytes = std::fs::read("photo.jpg")?;
//!     let record = session.analyze_image(&bytes, "jpg").await?;
//!     println!("{}", record.result_text);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;
pub mod openai;
pub mod search;
pub mod session;
pub mod transcription;

pub use error::{GranskaError, Result};
