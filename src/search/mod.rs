//! Web search for Granska.
//!
//! A search backend returns a plain-text results blob; the adapter wraps
//! the blob in an analysis prompt and hands it to the content analyzer.

mod duckduckgo;

pub use duckduckgo::DuckDuckGoSearch;

use crate::analysis::ContentAnalyzer;
use crate::config::Prompts;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// Trait for web search backends.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name for diagnostics.
    fn name(&self) -> &str;

    /// Submit a query and return a plain-text results blob.
    async fn search(&self, query: &str) -> Result<String>;
}

/// Runs a web search and analyzes the results.
pub struct WebSearchAdapter {
    backend: Arc<dyn SearchBackend>,
    analyzer: Arc<ContentAnalyzer>,
    prompts: Prompts,
}

impl WebSearchAdapter {
    /// Create an adapter over a backend and analyzer.
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        analyzer: Arc<ContentAnalyzer>,
        prompts: Prompts,
    ) -> Self {
        Self {
            backend,
            analyzer,
            prompts,
        }
    }

    /// Search for `query` and return an AI analysis of the results.
    ///
    /// Search backend failures propagate to the caller. Analysis failures
    /// do not; they come back as the analyzer's sentinel text.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search_and_analyze(&self, query: &str) -> Result<String> {
        let results = self.backend.search(query).await?;
        let prompt = self.build_prompt(query, &results);
        Ok(self.analyzer.analyze(&prompt, None, None).await)
    }

    /// Wrap raw search results in the fixed analysis prompt.
    fn build_prompt(&self, query: &str, results: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("query".to_string(), query.to_string());
        vars.insert("results".to_string(), results.to_string());
        self.prompts
            .render_with_custom(&self.prompts.search.template, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GranskaError;

    struct StubBackend {
        blob: &'static str,
    }

    #[async_trait]
    impl SearchBackend for StubBackend {
        fn name(&self) -> &str {
            "stub"
        }

        async fn search(&self, _query: &str) -> Result<String> {
            Ok(self.blob.to_string())
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl SearchBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        async fn search(&self, _query: &str) -> Result<String> {
            Err(GranskaError::Search("backend unavailable".into()))
        }
    }

    fn adapter(backend: Arc<dyn SearchBackend>) -> WebSearchAdapter {
        WebSearchAdapter::new(backend, Arc::new(ContentAnalyzer::new()), Prompts::default())
    }

    #[test]
    fn test_prompt_contains_query_and_results() {
        let adapter = adapter(Arc::new(StubBackend { blob: "cat facts" }));
        let prompt = adapter.build_prompt("cats", "cat facts");

        assert!(prompt.contains("cats"));
        assert!(prompt.contains("cat facts"));
        assert!(prompt.contains("Provide a comprehensive analysis."));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let adapter = adapter(Arc::new(FailingBackend));

        match adapter.search_and_analyze("anything").await {
            Err(GranskaError::Search(msg)) => assert!(msg.contains("unavailable")),
            other => panic!("expected search error, got {other:?}"),
        }
    }
}
