use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::{
    application::{
        error::{UploadError, ValidationError, ANALYSIS_FALLBACK_MESSAGE, NO_FILE_MESSAGE},
        services::{AnalysisClient, AnalysisRequest, FileSource, ImageDecoder, Renderer, SelectedFile},
    },
    domain::{
        config::upload::UploadConfig,
        models::{
            analysis::{AnalysisOutcome, AnalysisResult, ResultView},
            file::{format_file_size, FileData, FileInfo},
        },
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    FileSelected,
    Submitting,
    Result,
    Error,
}

#[derive(Debug)]
struct ControllerState {
    phase: UploadPhase,
    staged: Option<SelectedFile>,
    /// Bumped on every staging so a late decode for a replaced file is dropped.
    generation: u64,
}

/// Restores the submit control and leaves `Submitting` however the submission
/// ends, including when the future is dropped or the client panics.
struct SubmitGuard {
    renderer: Arc<dyn Renderer>,
    state: Arc<Mutex<ControllerState>>,
    phase: UploadPhase,
}

impl SubmitGuard {
    fn finish(&mut self, phase: UploadPhase) {
        self.phase = phase;
    }
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.phase = self.phase;
        drop(state);
        self.renderer.set_submitting(false);
    }
}

pub fn validate_file(config: &UploadConfig, info: &FileInfo) -> Result<(), ValidationError> {
    if !config.accepts(&info.mime_type) {
        return Err(ValidationError::UnsupportedType(info.mime_type.clone()));
    }

    if !info.validate_size(config.max_size) {
        return Err(ValidationError::TooLarge {
            size: info.size,
            max_size: config.max_size,
        });
    }

    Ok(())
}

pub struct UploadController {
    config: UploadConfig,
    renderer: Arc<dyn Renderer>,
    client: Arc<dyn AnalysisClient>,
    decoder: Arc<dyn ImageDecoder>,
    state: Arc<Mutex<ControllerState>>,
}

impl UploadController {
    pub fn new(
        config: UploadConfig,
        renderer: Arc<dyn Renderer>,
        client: Arc<dyn AnalysisClient>,
        decoder: Arc<dyn ImageDecoder>,
    ) -> Self {
        Self {
            config,
            renderer,
            client,
            decoder,
            state: Arc::new(Mutex::new(ControllerState {
                phase: UploadPhase::Idle,
                staged: None,
                generation: 0,
            })),
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.state.lock().unwrap().phase
    }

    pub fn staged_file(&self) -> Option<FileInfo> {
        self.state
            .lock()
            .unwrap()
            .staged
            .as_ref()
            .map(|file| file.info.clone())
    }

    pub fn drag_enter(&self) {
        self.renderer.set_drop_highlight(true);
    }

    pub fn drag_leave(&self) {
        self.renderer.set_drop_highlight(false);
    }

    /// Files dropped on the drop area. Only the first one is considered.
    pub fn drop_files(
        &self,
        files: Vec<Arc<dyn FileSource>>,
    ) -> Result<Option<JoinHandle<()>>, ValidationError> {
        self.renderer.set_drop_highlight(false);
        self.select(files)
    }

    /// Files from a change of the file input. Only the first one is considered.
    pub fn pick_files(
        &self,
        files: Vec<Arc<dyn FileSource>>,
    ) -> Result<Option<JoinHandle<()>>, ValidationError> {
        self.select(files)
    }

    /// Stages the first file if it passes validation. The returned handle
    /// resolves once the best-effort dimension decode has finished.
    fn select(
        &self,
        files: Vec<Arc<dyn FileSource>>,
    ) -> Result<Option<JoinHandle<()>>, ValidationError> {
        let Some(source) = files.into_iter().next() else {
            debug!("Selection carried no files");
            return Ok(None);
        };

        let selected = SelectedFile::new(source);

        if let Err(e) = validate_file(&self.config, &selected.info) {
            warn!(
                "Rejected file '{}' ({}, {} bytes): {:?}",
                selected.info.name, selected.info.mime_type, selected.info.size, e
            );
            self.renderer.show_error(&e.to_string());
            return Err(e);
        }

        self.renderer.hide_error();

        let generation = {
            let mut state = self.state.lock().unwrap();
            state.staged = Some(selected.clone());
            state.generation += 1;
            if state.phase != UploadPhase::Submitting {
                state.phase = UploadPhase::FileSelected;
            }
            state.generation
        };

        info!(
            "Staged file '{}' ({}, {} bytes)",
            selected.info.name, selected.info.mime_type, selected.info.size
        );

        self.renderer
            .show_preview(&selected.info.name, &format_file_size(selected.info.size));

        Ok(Some(self.spawn_decode(selected, generation)))
    }

    fn spawn_decode(&self, selected: SelectedFile, generation: u64) -> JoinHandle<()> {
        let renderer = self.renderer.clone();
        let decoder = self.decoder.clone();
        let state = self.state.clone();

        tokio::spawn(async move {
            let content = match selected.source.read().await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Could not read '{}' for preview: {}", selected.info.name, e);
                    return;
                }
            };

            let Some((width, height)) = decoder.dimensions(content).await else {
                debug!("No dimensions available for '{}'", selected.info.name);
                return;
            };

            if state.lock().unwrap().generation != generation {
                debug!("Discarding dimensions of replaced file '{}'", selected.info.name);
                return;
            }

            renderer.show_dimensions(width, height);
        })
    }

    /// Sends the staged file for analysis and renders whatever comes back.
    pub async fn submit(&self) -> Result<AnalysisResult, UploadError> {
        let selected = {
            let mut state = self.state.lock().unwrap();

            if state.phase == UploadPhase::Submitting {
                warn!("Submit ignored while an analysis is in flight");
                return Err(UploadError::Busy);
            }

            match state.staged.clone() {
                Some(selected) => {
                    state.phase = UploadPhase::Submitting;
                    selected
                }
                None => {
                    drop(state);
                    self.renderer.show_error(NO_FILE_MESSAGE);
                    return Err(UploadError::NoFileSelected);
                }
            }
        };

        // Interrupted submissions fall back to the staged file.
        let mut guard = SubmitGuard {
            renderer: self.renderer.clone(),
            state: self.state.clone(),
            phase: UploadPhase::FileSelected,
        };

        self.renderer.set_submitting(true);
        info!("Submitting '{}' for analysis", selected.info.name);

        let outcome = self.send(&selected).await;

        let (phase, result) = match outcome {
            Ok(AnalysisOutcome::Success(result)) => {
                info!(
                    "Analysis of '{}' returned '{}' ({:.3})",
                    selected.info.name, result.label, result.confidence
                );
                self.renderer.show_result(&ResultView::from(&result));
                (UploadPhase::Result, Ok(result))
            }
            Ok(AnalysisOutcome::Failure { message }) => {
                let message = message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| ANALYSIS_FALLBACK_MESSAGE.to_string());
                warn!("Analysis rejected by server: {}", message);
                self.renderer.show_error(&message);
                (UploadPhase::Error, Err(UploadError::Application(message)))
            }
            Err(e) => {
                error!("Analysis request failed: {:?}", e);
                self.renderer.show_error(&e.user_message());
                (UploadPhase::Error, Err(e))
            }
        };

        guard.finish(phase);
        result
    }

    async fn send(&self, selected: &SelectedFile) -> Result<AnalysisOutcome, UploadError> {
        let content = selected.source.read().await?;

        let request = AnalysisRequest {
            file: FileData::new(
                content,
                selected.info.name.clone(),
                selected.info.mime_type.clone(),
            ),
            csrf_token: self.renderer.csrf_token(),
        };

        self.client.analyze(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;
    use tokio::sync::Notify;

    use super::*;
    use crate::{
        adapters::{files::MemoryFile, renderers::ViewStateRenderer},
        application::error::NETWORK_ERROR_MESSAGE,
        domain::models::analysis::AnalysisDetails,
    };

    struct StubClient {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        outcome: Mutex<Option<Result<AnalysisOutcome, UploadError>>>,
        requests: Mutex<Vec<AnalysisRequest>>,
        gate: Option<Arc<Notify>>,
    }

    impl StubClient {
        fn returning(outcome: Result<AnalysisOutcome, UploadError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                outcome: Mutex::new(Some(outcome)),
                requests: Mutex::new(Vec::new()),
                gate: None,
            }
        }

        fn gated(outcome: Result<AnalysisOutcome, UploadError>, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::returning(outcome)
            }
        }
    }

    #[async_trait]
    impl AnalysisClient for StubClient {
        async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, UploadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);

            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.outcome
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(AnalysisOutcome::Failure { message: None }))
        }
    }

    struct FixedDecoder(Option<(u32, u32)>);

    #[async_trait]
    impl ImageDecoder for FixedDecoder {
        async fn dimensions(&self, _content: Bytes) -> Option<(u32, u32)> {
            self.0
        }
    }

    fn success(label: &str, confidence: f64) -> AnalysisOutcome {
        AnalysisOutcome::Success(AnalysisResult {
            label: label.to_string(),
            confidence,
            details: AnalysisDetails {
                size: 2_097_152,
                width: 800,
                height: 600,
                filename: "a.jpg".to_string(),
            },
        })
    }

    fn jpeg(size: usize) -> Arc<dyn FileSource> {
        Arc::new(MemoryFile::new("a.jpg", "image/jpeg", vec![0u8; size]))
    }

    fn controller(
        client: Arc<StubClient>,
        renderer: Arc<ViewStateRenderer>,
    ) -> UploadController {
        UploadController::new(
            UploadConfig::default(),
            renderer,
            client,
            Arc::new(FixedDecoder(Some((800, 600)))),
        )
    }

    #[tokio::test]
    async fn test_unsupported_type_is_rejected_before_any_request() {
        let client = Arc::new(StubClient::returning(Ok(success("Real Image", 0.9))));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = controller(client.clone(), renderer.clone());

        let gif: Arc<dyn FileSource> = Arc::new(MemoryFile::new("a.gif", "image/gif", vec![0u8; 10]));
        let err = controller.pick_files(vec![gif]).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType(_)));

        let submit = controller.submit().await.unwrap_err();
        assert!(matches!(submit, UploadError::NoFileSelected));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.phase(), UploadPhase::Idle);
        assert_eq!(
            renderer.snapshot().error.as_deref(),
            Some("Please select an image to analyze.")
        );
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected_and_keeps_previous_staging() {
        let client = Arc::new(StubClient::returning(Ok(success("Real Image", 0.9))));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = controller(client, renderer.clone());

        controller.pick_files(vec![jpeg(1024)]).unwrap();
        let huge: Arc<dyn FileSource> =
            Arc::new(MemoryFile::new("huge.png", "image/png", vec![0u8; 10_485_761]));
        let err = controller.drop_files(vec![huge]).unwrap_err();

        assert!(matches!(err, ValidationError::TooLarge { .. }));
        assert_eq!(
            renderer.snapshot().error.as_deref(),
            Some("File is too large. Maximum size is 10MB.")
        );
        assert_eq!(controller.staged_file().unwrap().name, "a.jpg");
        assert_eq!(controller.phase(), UploadPhase::FileSelected);
    }

    #[tokio::test]
    async fn test_only_first_dropped_file_is_staged() {
        let client = Arc::new(StubClient::returning(Ok(success("Real Image", 0.9))));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = controller(client, renderer.clone());

        let first: Arc<dyn FileSource> = Arc::new(MemoryFile::new("one.png", "image/png", vec![0u8; 512]));
        let second: Arc<dyn FileSource> = Arc::new(MemoryFile::new("two.gif", "image/gif", vec![0u8; 512]));

        controller.drag_enter();
        assert!(renderer.snapshot().drop_highlighted);

        let decode = controller.drop_files(vec![first, second]).unwrap().unwrap();
        decode.await.unwrap();

        let view = renderer.snapshot();
        assert!(!view.drop_highlighted);
        assert_eq!(view.file_name.as_deref(), Some("Name: one.png"));
        assert_eq!(view.file_size.as_deref(), Some("Size: 512 bytes"));
        assert_eq!(view.dimensions.as_deref(), Some("Dimensions: 800×600"));
        assert!(view.submit_enabled);
    }

    #[tokio::test]
    async fn test_empty_selection_is_ignored() {
        let client = Arc::new(StubClient::returning(Ok(success("Real Image", 0.9))));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = controller(client, renderer);

        assert!(controller.pick_files(Vec::new()).unwrap().is_none());
        assert_eq!(controller.phase(), UploadPhase::Idle);
    }

    #[tokio::test]
    async fn test_successful_submission_renders_result() {
        let client = Arc::new(StubClient::returning(Ok(success("Real Image", 0.92))));
        let renderer = Arc::new(ViewStateRenderer::new().with_csrf_token("token-123"));
        let controller = controller(client.clone(), renderer.clone());

        controller.pick_files(vec![jpeg(2_097_152)]).unwrap();
        let result = controller.submit().await.unwrap();

        assert_eq!(result.label, "Real Image");
        assert_eq!(controller.phase(), UploadPhase::Result);

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].file.size(), 2_097_152);
        assert_eq!(requests[0].csrf_token.as_deref(), Some("token-123"));

        let view = renderer.snapshot();
        let shown = view.result.unwrap();
        assert_eq!(shown.confidence_text, "Confidence: 92.0%");
        assert_eq!(shown.label_class, "real");
        assert_eq!(shown.dimensions_text, "800×600");
        assert!(view.submit_enabled);
        assert_eq!(view.submit_label, "Analyze Image");
        assert_eq!(view.scroll_count, 1);
    }

    #[tokio::test]
    async fn test_server_failure_uses_message_or_fallback() {
        let client = Arc::new(StubClient::returning(Ok(AnalysisOutcome::Failure {
            message: Some("Rate limit exceeded. Please wait before trying again.".to_string()),
        })));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = controller(client, renderer.clone());

        controller.pick_files(vec![jpeg(100)]).unwrap();
        let err = controller.submit().await.unwrap_err();
        assert!(matches!(err, UploadError::Application(_)));
        assert_eq!(
            renderer.snapshot().error.as_deref(),
            Some("Rate limit exceeded. Please wait before trying again.")
        );

        // The stub falls back to a message-less failure on the second call.
        controller.submit().await.unwrap_err();
        let view = renderer.snapshot();
        assert_eq!(view.error.as_deref(), Some("An error occurred during analysis."));
        assert!(view.submit_enabled);
        assert_eq!(controller.phase(), UploadPhase::Error);
    }

    #[tokio::test]
    async fn test_network_failure_restores_submit_control() {
        let client = Arc::new(StubClient::returning(Err(UploadError::Network(
            "connection refused".to_string(),
        ))));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = controller(client, renderer.clone());

        controller.pick_files(vec![jpeg(100)]).unwrap();
        let err = controller.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::Network(_)));
        let view = renderer.snapshot();
        assert_eq!(view.error.as_deref(), Some(NETWORK_ERROR_MESSAGE));
        assert!(view.submit_enabled);
        assert_eq!(view.submit_label, "Analyze Image");
        assert_eq!(controller.staged_file().unwrap().name, "a.jpg");
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_refused() {
        let gate = Arc::new(Notify::new());
        let client = Arc::new(StubClient::gated(Ok(success("AI Generated", 0.6)), gate.clone()));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = Arc::new(controller(client.clone(), renderer.clone()));

        controller.pick_files(vec![jpeg(100)]).unwrap();

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };

        while controller.phase() != UploadPhase::Submitting {
            tokio::task::yield_now().await;
        }
        assert!(!renderer.snapshot().submit_enabled);
        assert_eq!(renderer.snapshot().submit_label, "Analyzing...");

        let second = controller.submit().await.unwrap_err();
        assert!(matches!(second, UploadError::Busy));

        gate.notify_one();
        let result = first.await.unwrap().unwrap();
        assert_eq!(result.verdict().css_class(), "ai");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_latest_result_replaces_previous() {
        let client = Arc::new(StubClient::returning(Ok(success("Real Image", 0.92))));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = controller(client.clone(), renderer.clone());

        controller.pick_files(vec![jpeg(100)]).unwrap();
        controller.submit().await.unwrap();
        assert_eq!(renderer.snapshot().result.unwrap().bar_class, "bg-success");

        *client.outcome.lock().unwrap() = Some(Ok(success("AI Generated", 0.873)));
        controller.submit().await.unwrap();

        let shown = renderer.snapshot().result.unwrap();
        assert_eq!(shown.bar_class, "bg-danger");
        assert_eq!(shown.label_class, "ai");
        assert_eq!(shown.bar_width, "87.3%");
    }

    #[tokio::test]
    async fn test_undecodable_image_still_submits() {
        let client = Arc::new(StubClient::returning(Ok(success("Real Image", 0.5))));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = UploadController::new(
            UploadConfig::default(),
            renderer.clone(),
            client.clone(),
            Arc::new(FixedDecoder(None)),
        );

        let decode = controller.pick_files(vec![jpeg(64)]).unwrap().unwrap();
        decode.await.unwrap();
        assert!(renderer.snapshot().dimensions.is_none());

        controller.submit().await.unwrap();
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    /// Never answers the first call; answers every later one.
    struct HangsOnceClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AnalysisClient for HangsOnceClient {
        async fn analyze(&self, _request: AnalysisRequest) -> Result<AnalysisOutcome, UploadError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(success("Real Image", 0.92))
        }
    }

    #[tokio::test]
    async fn test_cancelled_submit_restores_control() {
        let client = Arc::new(HangsOnceClient {
            calls: AtomicUsize::new(0),
        });
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = UploadController::new(
            UploadConfig::default(),
            renderer.clone(),
            client.clone(),
            Arc::new(FixedDecoder(None)),
        );

        controller.pick_files(vec![jpeg(100)]).unwrap();
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(50), controller.submit()).await;
        assert!(timed_out.is_err());

        let view = renderer.snapshot();
        assert_eq!(controller.phase(), UploadPhase::FileSelected);
        assert!(view.submit_enabled);
        assert_eq!(view.submit_label, "Analyze Image");

        let result = controller.submit().await.unwrap();
        assert_eq!(result.label, "Real Image");
        assert_eq!(controller.phase(), UploadPhase::Result);
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_valid_file_clears_previous_error() {
        let client = Arc::new(StubClient::returning(Ok(success("Real Image", 0.9))));
        let renderer = Arc::new(ViewStateRenderer::new());
        let controller = controller(client, renderer.clone());

        let gif: Arc<dyn FileSource> =
            Arc::new(MemoryFile::new("a.gif", "image/gif", vec![0u8; 10]));
        controller.pick_files(vec![gif]).unwrap_err();
        assert!(renderer.snapshot().error.is_some());

        controller.pick_files(vec![jpeg(100)]).unwrap();
        assert!(renderer.snapshot().error.is_none());
        assert_eq!(controller.phase(), UploadPhase::FileSelected);
    }
}
