//! The in-session analysis log.
//!
//! An append-only, process-lifetime sequence of analysis records. There is
//! no capacity bound, no deduplication, and no persistence across restarts;
//! the log is owned by its session and dies with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;
use uuid::Uuid;

/// Kind of workflow that produced an analysis record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Image,
    Video,
    WebSearch,
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::Image => write!(f, "Image"),
            AnalysisKind::Video => write!(f, "Video"),
            AnalysisKind::WebSearch => write!(f, "Web Search"),
        }
    }
}

/// One completed analysis. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    /// 1-based position in the log, shown to the user.
    pub sequence: u64,
    pub kind: AnalysisKind,
    /// Path of the analyzed asset or thumbnail, or the search query.
    pub source_ref: Option<String>,
    /// Transcription text for video analyses (sentinels included).
    pub transcript: Option<String>,
    /// The generated analysis. Never empty; failure sentinels count.
    pub result_text: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only log of analysis records for one session.
///
/// Interior locking lets the HTTP surface share the log across handlers;
/// within a session only one workflow runs at a time, so there is never
/// write contention.
#[derive(Debug)]
pub struct AnalysisLog {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl AnalysisLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Append a completed analysis and return the stored record.
    ///
    /// Sequence numbers come from the log itself, in append order.
    pub fn append(
        &self,
        kind: AnalysisKind,
        source_ref: Option<String>,
        transcript: Option<String>,
        result_text: String,
    ) -> AnalysisRecord {
        debug_assert!(!result_text.is_empty(), "analysis result must be displayable");

        let mut records = self.records.write().unwrap();
        let record = AnalysisRecord {
            id: Uuid::new_v4(),
            sequence: records.len() as u64 + 1,
            kind,
            source_ref,
            transcript,
            result_text,
            created_at: Utc::now(),
        };
        records.push(record.clone());
        record
    }

    /// Snapshot of all records in append order.
    pub fn records(&self) -> Vec<AnalysisRecord> {
        self.records.read().unwrap().clone()
    }

    /// Number of records in the log.
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// True if nothing has been analyzed yet.
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }
}

impl Default for AnalysisLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order_and_kinds() {
        let log = AnalysisLog::new();

        log.append(AnalysisKind::Image, Some("/tmp/a.jpg".into()), None, "first".into());
        log.append(
            AnalysisKind::Video,
            Some("/tmp/b.mp4_thumb.jpg".into()),
            Some("hello".into()),
            "second".into(),
        );
        log.append(AnalysisKind::WebSearch, Some("cats".into()), None, "third".into());

        let records = log.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].kind, AnalysisKind::Image);
        assert_eq!(records[1].kind, AnalysisKind::Video);
        assert_eq!(records[2].kind, AnalysisKind::WebSearch);
        assert_eq!(
            records.iter().map(|r| r.sequence).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(records[2].result_text, "third");
    }

    #[test]
    fn test_records_are_snapshots() {
        let log = AnalysisLog::new();
        let before = log.records();
        log.append(AnalysisKind::Image, None, None, "result".into());

        assert!(before.is_empty());
        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(AnalysisKind::Image.to_string(), "Image");
        assert_eq!(AnalysisKind::Video.to_string(), "Video");
        assert_eq!(AnalysisKind::WebSearch.to_string(), "Web Search");
    }
}
