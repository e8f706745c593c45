//! DuckDuckGo search backend.
//!
//! Uses the DuckDuckGo HTML endpoint and scrapes result titles, URLs,
//! and snippets into a plain-text blob.

use super::SearchBackend;
use crate::error::{GranskaError, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// DuckDuckGo HTML search URL.
const DDG_SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Returned when the engine produced no usable results.
const NO_RESULTS: &str = "No good DuckDuckGo Search Result was found";

/// A single parsed search result.
struct SearchHit {
    title: String,
    url: String,
    snippet: Option<String>,
}

/// Search backend using DuckDuckGo HTML search.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    max_results: usize,
    region: String,
}

impl DuckDuckGoSearch {
    /// Create a new DuckDuckGo backend.
    pub fn new(max_results: usize, region: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_results,
            region: region.to_string(),
        }
    }

    /// Parse search results from the HTML response.
    fn parse_results(&self, html: &str) -> Result<Vec<SearchHit>> {
        let document = Html::parse_document(html);

        // Each result is an <a class="result__a"> with a sibling
        // <a class="result__snippet"> inside a div.result container.
        let container_selector = Selector::parse("div.result")
            .map_err(|e| GranskaError::Search(format!("Failed to parse selector: {e:?}")))?;
        let title_selector = Selector::parse("a.result__a")
            .map_err(|e| GranskaError::Search(format!("Failed to parse selector: {e:?}")))?;
        let snippet_selector = Selector::parse("a.result__snippet")
            .map_err(|e| GranskaError::Search(format!("Failed to parse selector: {e:?}")))?;

        let mut hits = Vec::new();

        for container in document.select(&container_selector) {
            if hits.len() >= self.max_results {
                break;
            }

            let Some(anchor) = container.select(&title_selector).next() else {
                continue;
            };
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Some(url) = extract_url(href) else {
                continue;
            };

            let title = anchor.text().collect::<String>().trim().to_string();
            let snippet = container
                .select(&snippet_selector)
                .next()
                .map(|s| s.text().collect::<String>().trim().to_string())
                .filter(|s| !s.is_empty());

            hits.push(SearchHit {
                title,
                url,
                snippet,
            });
        }

        debug!("Parsed {} results from DuckDuckGo", hits.len());
        Ok(hits)
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> Result<String> {
        debug!("DuckDuckGo search: {}", query);

        let response = self
            .client
            .post(DDG_SEARCH_URL)
            .form(&[("q", query), ("kl", self.region.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GranskaError::Search(format!(
                "DuckDuckGo returned {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        let hits = self.parse_results(&html)?;

        if hits.is_empty() {
            return Ok(NO_RESULTS.to_string());
        }

        Ok(format_results(&hits))
    }
}

/// Extract the actual URL from DuckDuckGo's redirect URL.
fn extract_url(href: &str) -> Option<String> {
    // DuckDuckGo sometimes uses direct URLs, sometimes redirects
    if href.contains("duckduckgo.com/l/") {
        if let Some(uddg_start) = href.find("uddg=") {
            let encoded = &href[uddg_start + 5..];
            let end = encoded.find('&').unwrap_or(encoded.len());
            urlencoding::decode(&encoded[..end])
                .ok()
                .map(|s| s.into_owned())
        } else {
            None
        }
    } else if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else if href.starts_with("//") {
        Some(format!("https:{}", href))
    } else {
        None
    }
}

/// Flatten hits into the results blob handed to the analyzer.
fn format_results(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| match &hit.snippet {
            Some(snippet) => format!("{} ({})\n{}", hit.title, hit.url, snippet),
            None => format!("{} ({})", hit.title, hit.url),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_direct_url() {
        let url = extract_url("https://example.org/cats");
        assert_eq!(url, Some("https://example.org/cats".to_string()));
    }

    #[test]
    fn extract_protocol_relative_url() {
        let url = extract_url("//example.org/cats");
        assert_eq!(url, Some("https://example.org/cats".to_string()));
    }

    #[test]
    fn extract_redirect_url() {
        let url = extract_url("//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.org%2Fcats&rut=abc");
        assert_eq!(url, Some("https://example.org/cats".to_string()));
    }

    #[test]
    fn extract_rejects_relative_paths() {
        assert_eq!(extract_url("/html/?q=next"), None);
    }

    #[test]
    fn parse_results_from_fixture() {
        let html = r#"
            <html><body>
              <div class="result">
                <a class="result__a" href="https://example.org/cats">All About Cats</a>
                <a class="result__snippet" href="https://example.org/cats">Cats are small carnivores.</a>
              </div>
              <div class="result">
                <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.org%2Fdogs">Dogs</a>
              </div>
            </body></html>
        "#;

        let backend = DuckDuckGoSearch::new(8, "us-en");
        let hits = backend.parse_results(html).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "All About Cats");
        assert_eq!(hits[0].url, "https://example.org/cats");
        assert_eq!(hits[0].snippet.as_deref(), Some("Cats are small carnivores."));
        assert_eq!(hits[1].url, "https://example.org/dogs");
        assert_eq!(hits[1].snippet, None);
    }

    #[test]
    fn parse_results_respects_max() {
        let item = r#"<div class="result"><a class="result__a" href="https://e.org/x">X</a></div>"#;
        let html = format!("<html><body>{}</body></html>", item.repeat(5));

        let backend = DuckDuckGoSearch::new(3, "us-en");
        let hits = backend.parse_results(&html).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn format_results_blob() {
        let hits = vec![
            SearchHit {
                title: "A".into(),
                url: "https://a".into(),
                snippet: Some("alpha".into()),
            },
            SearchHit {
                title: "B".into(),
                url: "https://b".into(),
                snippet: None,
            },
        ];

        let blob = format_results(&hits);
        assert_eq!(blob, "A (https://a)\nalpha\n\nB (https://b)");
    }
}
