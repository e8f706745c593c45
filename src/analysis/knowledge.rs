//! Knowledge base queries over past analyses.
//!
//! The "knowledge base" is not an index: it is the concatenated result text
//! of every past analysis in the session, fed back to the analyzer as
//! context for the user's question.

use super::{AnalysisLog, AnalysisRecord, ContentAnalyzer};
use crate::config::Prompts;
use crate::error::{GranskaError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Answers questions from the session's analysis log.
pub struct KnowledgeBase {
    analyzer: Arc<ContentAnalyzer>,
    prompts: Prompts,
    max_context_chars: usize,
}

impl KnowledgeBase {
    /// Create a knowledge base handler with a context budget.
    pub fn new(analyzer: Arc<ContentAnalyzer>, prompts: Prompts, max_context_chars: usize) -> Self {
        Self {
            analyzer,
            prompts,
            max_context_chars,
        }
    }

    /// Answer a question using all past analyses as context.
    ///
    /// An empty log is a recoverable no-data condition: no backend call is
    /// made and `NoPastAnalyses` is returned for the caller to render as a
    /// warning.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn query(&self, log: &AnalysisLog, question: &str) -> Result<String> {
        let records = log.records();
        if records.is_empty() {
            return Err(GranskaError::NoPastAnalyses);
        }

        let context = build_context(&records, self.max_context_chars);
        info!("Answering from {} past analyses", records.len());

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context);

        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.knowledge.template, &vars);

        Ok(self.analyzer.analyze(&prompt, None, None).await)
    }
}

/// Concatenate record kind labels and result text in append order.
///
/// Oldest records are dropped first once the blob would exceed `budget`
/// characters; the newest record is always kept whole.
fn build_context(records: &[AnalysisRecord], budget: usize) -> String {
    const SEP: &str = "\n\n";

    let entries: Vec<String> = records
        .iter()
        .map(|r| format!("{}:\n{}", r.kind, r.result_text))
        .collect();

    let mut start = 0;
    while start + 1 < entries.len() {
        let len: usize = entries[start..]
            .iter()
            .map(|e| e.len() + SEP.len())
            .sum::<usize>()
            .saturating_sub(SEP.len());
        if len <= budget {
            break;
        }
        start += 1;
    }

    if start > 0 {
        warn!(
            "Dropped {} oldest analyses to fit the {}-character context budget",
            start, budget
        );
    }

    entries[start..].join(SEP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisKind;

    fn record(kind: AnalysisKind, result: &str) -> AnalysisRecord {
        let log = AnalysisLog::new();
        log.append(kind, None, None, result.to_string())
    }

    #[tokio::test]
    async fn test_empty_log_is_no_data() {
        let kb = KnowledgeBase::new(Arc::new(ContentAnalyzer::new()), Prompts::default(), 1000);
        let log = AnalysisLog::new();

        match kb.query(&log, "what did I analyze?").await {
            Err(GranskaError::NoPastAnalyses) => {}
            other => panic!("expected NoPastAnalyses, got {other:?}"),
        }
    }

    #[test]
    fn test_context_keeps_append_order_and_labels() {
        let records = vec![
            record(AnalysisKind::Image, "a sunset photo"),
            record(AnalysisKind::WebSearch, "search findings"),
        ];

        let context = build_context(&records, 10_000);
        assert_eq!(context, "Image:\na sunset photo\n\nWeb Search:\nsearch findings");
    }

    #[test]
    fn test_context_drops_oldest_first() {
        let records = vec![
            record(AnalysisKind::Image, &"x".repeat(100)),
            record(AnalysisKind::Image, &"y".repeat(100)),
            record(AnalysisKind::Video, "newest"),
        ];

        let context = build_context(&records, 130);
        assert!(!context.contains('x'));
        assert!(context.contains('y'));
        assert!(context.ends_with("Video:\nnewest"));
    }

    #[test]
    fn test_context_always_keeps_newest() {
        let records = vec![record(AnalysisKind::Image, &"z".repeat(500))];
        let context = build_context(&records, 10);
        assert!(context.contains('z'));
    }
}
