//! Content analysis for Granska.
//!
//! Holds the generative-AI analyzer, the in-session analysis log, and the
//! knowledge base query handler that answers questions from past analyses.

mod analyzer;
mod knowledge;
mod log;

pub use analyzer::ContentAnalyzer;
pub use knowledge::KnowledgeBase;
pub use log::{AnalysisKind, AnalysisLog, AnalysisRecord};
