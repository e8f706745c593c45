//! Configuration module for Granska.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnalysisPrompts, KnowledgePrompts, Prompts, SearchPrompts};
pub use settings::{
    AnalysisSettings, GeneralSettings, KnowledgeSettings, PromptSettings, SearchSettings,
    Settings, TranscriptionSettings,
};
