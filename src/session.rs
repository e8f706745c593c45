//! Workflow coordination for Granska.
//!
//! An `AnalysisSession` owns every pipeline component plus the analysis
//! log, and runs the four user-facing workflows: image analysis, video
//! analysis, web search analysis, and knowledge queries. Workflows are
//! strictly linear with no retries; external failures either become
//! sentinel text (analysis, transcription) or propagate (search, storage).

use crate::analysis::{AnalysisKind, AnalysisLog, AnalysisRecord, ContentAnalyzer, KnowledgeBase};
use crate::config::{Prompts, Settings};
use crate::error::{GranskaError, Result};
use crate::media::{extract_first_frame, MediaKind, TempFileStore};
use crate::search::{DuckDuckGoSearch, SearchBackend, WebSearchAdapter};
use crate::transcription::{Transcriber, WhisperTranscriber};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// Outcome of a video workflow: the appended record plus the thumbnail
/// shown to the user (`None` when no frame could be decoded).
#[derive(Debug)]
pub struct VideoAnalysis {
    pub record: AnalysisRecord,
    pub thumbnail: Option<PathBuf>,
}

/// One user session: pipeline components plus the session's analysis log.
pub struct AnalysisSession {
    settings: Settings,
    prompts: Prompts,
    store: TempFileStore,
    analyzer: Arc<ContentAnalyzer>,
    transcriber: Arc<dyn Transcriber>,
    search: WebSearchAdapter,
    knowledge: KnowledgeBase,
    log: AnalysisLog,
}

impl AnalysisSession {
    /// Create a session with components built from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let analyzer = Arc::new(ContentAnalyzer::with_config(
            &settings.analysis.model,
            settings.analysis.temperature,
        ));

        let transcriber: Arc<dyn Transcriber> =
            Arc::new(WhisperTranscriber::with_model(&settings.transcription.model));

        let backend: Arc<dyn SearchBackend> = Arc::new(DuckDuckGoSearch::new(
            settings.search.max_results,
            &settings.search.region,
        ));

        Self::with_components(settings, prompts, analyzer, transcriber, backend)
    }

    /// Create a session with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        analyzer: Arc<ContentAnalyzer>,
        transcriber: Arc<dyn Transcriber>,
        backend: Arc<dyn SearchBackend>,
    ) -> Result<Self> {
        let store = TempFileStore::new(settings.temp_dir())?;
        let search = WebSearchAdapter::new(backend, analyzer.clone(), prompts.clone());
        let knowledge = KnowledgeBase::new(
            analyzer.clone(),
            prompts.clone(),
            settings.knowledge.max_context_chars,
        );

        Ok(Self {
            settings,
            prompts,
            store,
            analyzer,
            transcriber,
            search,
            knowledge,
            log: AnalysisLog::new(),
        })
    }

    /// Analyze an uploaded image and append the result to the log.
    #[instrument(skip_all, fields(extension = %extension))]
    pub async fn analyze_image(&self, bytes: &[u8], extension: &str) -> Result<AnalysisRecord> {
        if MediaKind::from_extension(extension) != Some(MediaKind::Image) {
            return Err(GranskaError::InvalidInput(format!(
                "Not a supported image extension: {}",
                extension
            )));
        }

        let image_path = self.store.save(bytes, extension)?;
        info!("Analyzing image {}", image_path.display());

        let result = self
            .analyzer
            .analyze(&self.prompts.analysis.image, Some(&image_path), None)
            .await;

        Ok(self.log.append(
            AnalysisKind::Image,
            Some(image_path.display().to_string()),
            None,
            result,
        ))
    }

    /// Analyze an uploaded video and append the result to the log.
    ///
    /// A missing thumbnail or a sentinel transcript still proceeds to
    /// analysis; there is no partial-result recovery.
    #[instrument(skip_all, fields(extension = %extension))]
    pub async fn analyze_video(&self, bytes: &[u8], extension: &str) -> Result<VideoAnalysis> {
        if MediaKind::from_extension(extension) != Some(MediaKind::Video) {
            return Err(GranskaError::InvalidInput(format!(
                "Not a supported video extension: {}",
                extension
            )));
        }

        let video_path = self.store.save(bytes, extension)?;
        info!("Analyzing video {}", video_path.display());

        let thumbnail = extract_first_frame(&video_path).await?;
        let transcript = self.transcriber.transcribe(&video_path).await;

        let result = self
            .analyzer
            .analyze(
                &self.prompts.analysis.video,
                thumbnail.as_deref(),
                Some(&transcript),
            )
            .await;

        let record = self.log.append(
            AnalysisKind::Video,
            thumbnail.as_ref().map(|p| p.display().to_string()),
            Some(transcript),
            result,
        );

        Ok(VideoAnalysis { record, thumbnail })
    }

    /// Run a web search, analyze the results, and append them to the log.
    pub async fn search_and_analyze(&self, query: &str) -> Result<AnalysisRecord> {
        let result = self.search.search_and_analyze(query).await?;

        Ok(self
            .log
            .append(AnalysisKind::WebSearch, Some(query.to_string()), None, result))
    }

    /// Answer a question from the session's past analyses.
    pub async fn query_knowledge(&self, question: &str) -> Result<String> {
        self.knowledge.query(&self.log, question).await
    }

    /// Snapshot of past analyses in append order.
    pub fn records(&self) -> Vec<AnalysisRecord> {
        self.log.records()
    }

    /// Session settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AnalysisSession {
        let mut settings = Settings::default();
        let dir = tempfile::tempdir().unwrap();
        settings.general.temp_dir = dir.path().to_string_lossy().to_string();
        // Leak the tempdir guard so the directory outlives the test setup
        std::mem::forget(dir);
        AnalysisSession::new(settings).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_unsupported_image_extension() {
        let session = session();
        match session.analyze_image(b"data", "gif").await {
            Err(GranskaError::InvalidInput(msg)) => assert!(msg.contains("gif")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejects_unsupported_video_extension() {
        let session = session();
        assert!(matches!(
            session.analyze_video(b"data", "mkv").await,
            Err(GranskaError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_new_session_has_empty_log() {
        let session = session();
        assert!(session.records().is_empty());

        match session.query_knowledge("anything?").await {
            Err(GranskaError::NoPastAnalyses) => {}
            other => panic!("expected NoPastAnalyses, got {other:?}"),
        }
    }
}
