use super::state::{SessionState, Stage};
use crate::error::{BoothError, Result};
use crate::photo::ValidatedImage;
use crate::publish::{Artifact, Publication};
use crate::style::StyleCatalog;

/// Handle for one pipeline run, returned when a session enters `Processing`.
///
/// Every stage result must be recorded with the run's `id`; results from a
/// run that has been superseded (by `retake_image`) are discarded.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub id: u64,
    pub style_id: String,
    pub image: ValidatedImage,
}

/// One user's run through the style → capture → result workflow.
///
/// `Session` is a pure state machine: it performs no I/O. The pipeline
/// driver calls the external collaborators between transitions and reports
/// back through [`Session::record_description`], [`Session::record_result`],
/// [`Session::complete`] and [`Session::fail`].
///
/// Invariants:
/// - `result_image` is only set once `description` is set
/// - `publication` is only set once `result_image` is set
/// - at most one pipeline run is in flight at any time
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    state: SessionState,
    selected_style: Option<String>,
    source_image: Option<ValidatedImage>,
    description: Option<String>,
    result_image: Option<Artifact>,
    publication: Option<Publication>,
    error: Option<String>,
    failed_stage: Option<Stage>,
    /// Id of the most recent run; bumped on every entry into `Processing`
    /// and on every retake.
    current_run: u64,
    /// Id of the run whose external calls have not returned yet.
    in_flight: Option<u64>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: SessionState::SelectingStyle,
            selected_style: None,
            source_image: None,
            description: None,
            result_image: None,
            publication: None,
            error: None,
            failed_stage: None,
            current_run: 0,
            in_flight: None,
        }
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selected_style(&self) -> Option<&str> {
        self.selected_style.as_deref()
    }

    pub fn source_image(&self) -> Option<&ValidatedImage> {
        self.source_image.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Raw synthesized bytes, available for direct download even when
    /// publishing failed.
    pub fn result_image(&self) -> Option<&[u8]> {
        self.result_image.as_ref().map(Artifact::bytes)
    }

    /// The generated image with the file name it was published under.
    pub fn result_artifact(&self) -> Option<&Artifact> {
        self.result_image.as_ref()
    }

    pub fn publication(&self) -> Option<&Publication> {
        self.publication.as_ref()
    }

    pub fn published_reference(&self) -> Option<&str> {
        self.publication.as_ref().map(|p| p.reference.as_str())
    }

    pub fn scannable_code(&self) -> Option<&[u8]> {
        self.publication.as_ref().map(|p| p.scannable_code.as_slice())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        self.failed_stage
    }

    /// Whether external calls for some run are still outstanding.
    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    // ============================================================================
    // User transitions
    // ============================================================================

    /// `SelectingStyle` → `AwaitingImage`.
    ///
    /// Re-selecting while `AwaitingImage` replaces the choice.
    pub fn select_style(&mut self, catalog: &StyleCatalog, style_id: &str) -> Result<()> {
        match self.state {
            SessionState::SelectingStyle | SessionState::AwaitingImage => {}
            other => return Err(BoothError::invalid_transition(other, "select a style")),
        }
        catalog.require(style_id)?;

        self.selected_style = Some(style_id.to_string());
        self.state = SessionState::AwaitingImage;
        self.error = None;
        Ok(())
    }

    /// `AwaitingImage` → `SelectingStyle`, clearing the selection.
    pub fn go_back(&mut self) -> Result<()> {
        if self.state != SessionState::AwaitingImage {
            return Err(BoothError::invalid_transition(self.state, "go back"));
        }

        self.selected_style = None;
        self.state = SessionState::SelectingStyle;
        self.error = None;
        Ok(())
    }

    /// Checks whether a photo may be submitted right now.
    ///
    /// Callers run this before validating the photo so an in-flight session
    /// rejects with `AlreadyProcessing` without decoding anything.
    pub fn ensure_can_submit(&self) -> Result<()> {
        if self.in_flight.is_some() || self.state == SessionState::Processing {
            return Err(BoothError::AlreadyProcessing);
        }
        if self.selected_style.is_none() {
            return Err(BoothError::NoStyleSelected);
        }
        if self.state != SessionState::AwaitingImage {
            return Err(BoothError::invalid_transition(self.state, "submit an image"));
        }
        Ok(())
    }

    /// `AwaitingImage` → `Processing`, recording the validated photo.
    pub fn submit_image(&mut self, image: ValidatedImage) -> Result<PipelineRun> {
        self.ensure_can_submit()?;
        let style_id = self
            .selected_style
            .clone()
            .ok_or(BoothError::NoStyleSelected)?;

        self.source_image = Some(image.clone());
        Ok(self.begin_run(style_id, image))
    }

    /// `Failed` → `Processing`, re-running the full chain from the stored photo.
    pub fn retry(&mut self) -> Result<PipelineRun> {
        if self.in_flight.is_some() {
            return Err(BoothError::AlreadyProcessing);
        }
        if self.state != SessionState::Failed {
            return Err(BoothError::invalid_transition(self.state, "retry"));
        }
        let style_id = self
            .selected_style
            .clone()
            .ok_or(BoothError::NoStyleSelected)?;
        let image = self
            .source_image
            .clone()
            .ok_or_else(|| BoothError::internal("failed session has no source image"))?;

        Ok(self.begin_run(style_id, image))
    }

    /// `Complete`/`Failed` → `SelectingStyle`, discarding all session data.
    pub fn reset(&mut self) -> Result<()> {
        match self.state {
            SessionState::Complete | SessionState::Failed => {}
            other => return Err(BoothError::invalid_transition(other, "start over")),
        }

        self.selected_style = None;
        self.clear_capture();
        self.state = SessionState::SelectingStyle;
        Ok(())
    }

    /// `AwaitingImage`/`Processing`/`Complete` → `AwaitingImage`, keeping the style.
    ///
    /// Retaking while a run is in flight does not cancel the external call;
    /// the run is superseded and its results are dropped when they arrive.
    pub fn retake_image(&mut self) -> Result<()> {
        match self.state {
            SessionState::AwaitingImage | SessionState::Processing | SessionState::Complete => {}
            other => return Err(BoothError::invalid_transition(other, "retake the photo")),
        }

        if self.state == SessionState::Processing {
            self.current_run += 1;
        }
        self.clear_capture();
        self.state = SessionState::AwaitingImage;
        Ok(())
    }

    // ============================================================================
    // Pipeline reports
    // ============================================================================

    /// Records the describer's output. Returns `false` if `run` is stale.
    pub fn record_description(&mut self, run: u64, description: String) -> bool {
        if !self.is_current(run) {
            return false;
        }
        self.description = Some(description);
        true
    }

    /// Records the synthesized image. Returns `false` if `run` is stale.
    pub fn record_result(&mut self, run: u64, artifact: Artifact) -> Result<bool> {
        if !self.is_current(run) {
            return Ok(false);
        }
        if self.description.is_none() {
            return Err(BoothError::internal("result recorded before description"));
        }
        self.result_image = Some(artifact);
        Ok(true)
    }

    /// `Processing` → `Complete`, ending the run.
    pub fn complete(&mut self, run: u64, publication: Publication) -> Result<bool> {
        self.release(run);
        if !self.is_current(run) {
            return Ok(false);
        }
        if self.result_image.is_none() {
            return Err(BoothError::internal("publication recorded before result image"));
        }

        self.publication = Some(publication);
        self.error = None;
        self.failed_stage = None;
        self.state = SessionState::Complete;
        Ok(true)
    }

    /// `Processing` → `Failed`, ending the run.
    ///
    /// The message is stored verbatim. A publish failure keeps the result
    /// image so it can still be downloaded directly; earlier failures leave
    /// no result behind.
    pub fn fail(&mut self, run: u64, stage: Stage, message: impl Into<String>) -> bool {
        self.release(run);
        if !self.is_current(run) {
            return false;
        }

        if stage != Stage::Publish {
            self.result_image = None;
        }
        self.publication = None;
        self.error = Some(message.into());
        self.failed_stage = Some(stage);
        self.state = SessionState::Failed;
        true
    }

    /// Ends a run without changing state. Used when a stale run stops early.
    pub fn release(&mut self, run: u64) {
        if self.in_flight == Some(run) {
            self.in_flight = None;
        }
    }

    fn is_current(&self, run: u64) -> bool {
        self.state == SessionState::Processing && self.current_run == run
    }

    fn begin_run(&mut self, style_id: String, image: ValidatedImage) -> PipelineRun {
        self.description = None;
        self.result_image = None;
        self.publication = None;
        self.error = None;
        self.failed_stage = None;
        self.current_run += 1;
        self.in_flight = Some(self.current_run);
        self.state = SessionState::Processing;

        tracing::debug!(
            "[Session] {} entered processing (run {}, style {})",
            self.id,
            self.current_run,
            style_id
        );

        PipelineRun {
            id: self.current_run,
            style_id,
            image,
        }
    }

    fn clear_capture(&mut self) {
        self.source_image = None;
        self.description = None;
        self.result_image = None;
        self.publication = None;
        self.error = None;
        self.failed_stage = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::ImageValidator;
    use image::{DynamicImage, GrayImage, ImageFormat};
    use std::io::Cursor;

    fn photo() -> ValidatedImage {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(GrayImage::new(16, 16))
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        ImageValidator::default().validate(buffer.into_inner()).unwrap()
    }

    fn artifact(bytes: Vec<u8>) -> Artifact {
        Artifact::new(bytes, "🎌 Anime", chrono::Local::now())
    }

    fn publication(reference: &str) -> Publication {
        Publication {
            strategy: "test".to_string(),
            reference: reference.to_string(),
            scannable_code: vec![1, 2, 3],
        }
    }

    fn awaiting_session() -> Session {
        let mut session = Session::new("s1");
        session
            .select_style(&StyleCatalog::builtin(), "anime")
            .unwrap();
        session
    }

    fn completed_session() -> Session {
        let mut session = awaiting_session();
        let run = session.submit_image(photo()).unwrap();
        assert!(session.record_description(run.id, "a person smiling".into()));
        assert!(session.record_result(run.id, artifact(vec![9u8, 9, 9])).unwrap());
        assert!(session.complete(run.id, publication("https://host/a.png")).unwrap());
        session
    }

    #[test]
    fn test_new_session_starts_selecting_style() {
        let session = Session::new("s1");
        assert_eq!(session.state(), SessionState::SelectingStyle);
        assert!(session.selected_style().is_none());
        assert!(!session.is_processing());
    }

    #[test]
    fn test_select_unknown_style_leaves_state_untouched() {
        let mut session = Session::new("s1");
        let err = session
            .select_style(&StyleCatalog::builtin(), "vaporwave")
            .unwrap_err();

        assert_eq!(err, BoothError::InvalidStyle("vaporwave".into()));
        assert_eq!(session.state(), SessionState::SelectingStyle);
        assert!(session.selected_style().is_none());
    }

    #[test]
    fn test_go_back_clears_selection() {
        let mut session = awaiting_session();
        session.go_back().unwrap();

        assert_eq!(session.state(), SessionState::SelectingStyle);
        assert!(session.selected_style().is_none());
    }

    #[test]
    fn test_submit_without_style_fails() {
        let mut session = Session::new("s1");
        let err = session.submit_image(photo()).unwrap_err();
        assert_eq!(err, BoothError::NoStyleSelected);
        assert!(session.source_image().is_none());
    }

    #[test]
    fn test_submit_while_processing_is_rejected() {
        let mut session = awaiting_session();
        let first = photo();
        session.submit_image(first.clone()).unwrap();

        let err = session.submit_image(photo()).unwrap_err();
        assert_eq!(err, BoothError::AlreadyProcessing);
        assert_eq!(session.source_image(), Some(&first));
    }

    #[test]
    fn test_successful_run_completes() {
        let session = completed_session();

        assert_eq!(session.state(), SessionState::Complete);
        assert_eq!(session.description(), Some("a person smiling"));
        assert_eq!(session.result_image(), Some(&[9u8, 9, 9][..]));
        assert_eq!(session.published_reference(), Some("https://host/a.png"));
        assert!(!session.is_processing());
    }

    #[test]
    fn test_result_requires_description() {
        let mut session = awaiting_session();
        let run = session.submit_image(photo()).unwrap();
        assert!(session.record_result(run.id, artifact(vec![1u8])).is_err());
        assert!(session.result_image().is_none());
    }

    #[test]
    fn test_publication_requires_result() {
        let mut session = awaiting_session();
        let run = session.submit_image(photo()).unwrap();
        session.record_description(run.id, "text".into());
        assert!(session.complete(run.id, publication("ref")).is_err());
        assert!(session.published_reference().is_none());
    }

    #[test]
    fn test_synthesize_failure_leaves_no_result() {
        let mut session = awaiting_session();
        let run = session.submit_image(photo()).unwrap();
        session.record_description(run.id, "a person smiling".into());
        assert!(session.fail(run.id, Stage::Synthesize, "rate limit"));

        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.error(), Some("rate limit"));
        assert_eq!(session.failed_stage(), Some(Stage::Synthesize));
        assert!(session.result_image().is_none());
        assert!(!session.is_processing());
    }

    #[test]
    fn test_publish_failure_keeps_result_for_direct_download() {
        let mut session = awaiting_session();
        let run = session.submit_image(photo()).unwrap();
        session.record_description(run.id, "text".into());
        let result = artifact(vec![7u8, 7]);
        let file_name = result.file_name().to_string();
        session.record_result(run.id, result).unwrap();
        session.fail(run.id, Stage::Publish, "all hosts down");

        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.result_image(), Some(&[7u8, 7][..]));
        assert_eq!(session.result_artifact().unwrap().file_name(), file_name);
        assert!(session.published_reference().is_none());
    }

    #[test]
    fn test_retry_clears_error_and_derived_fields() {
        let mut session = awaiting_session();
        let source = photo();
        let run = session.submit_image(source.clone()).unwrap();
        session.record_description(run.id, "text".into());
        session.record_result(run.id, artifact(vec![7u8])).unwrap();
        session.fail(run.id, Stage::Publish, "down");

        let retry = session.retry().unwrap();
        assert_ne!(retry.id, run.id);
        assert_eq!(retry.image, source);
        assert_eq!(session.state(), SessionState::Processing);
        assert!(session.error().is_none());
        assert!(session.result_image().is_none());
        assert!(session.description().is_none());
        assert!(session.published_reference().is_none());
        assert_eq!(session.source_image(), Some(&source));
    }

    #[test]
    fn test_retry_only_from_failed() {
        let mut session = completed_session();
        assert!(matches!(
            session.retry(),
            Err(BoothError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_reset_from_complete_clears_everything() {
        let mut session = completed_session();
        session.reset().unwrap();

        assert_eq!(session.state(), SessionState::SelectingStyle);
        assert!(session.selected_style().is_none());
        assert!(session.source_image().is_none());
        assert!(session.description().is_none());
        assert!(session.result_image().is_none());
        assert!(session.published_reference().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_reset_not_allowed_mid_workflow() {
        let mut session = awaiting_session();
        assert!(session.reset().is_err());
        assert_eq!(session.state(), SessionState::AwaitingImage);
    }

    #[test]
    fn test_retake_from_complete_keeps_style() {
        let mut session = completed_session();
        session.retake_image().unwrap();

        assert_eq!(session.state(), SessionState::AwaitingImage);
        assert_eq!(session.selected_style(), Some("anime"));
        assert!(session.source_image().is_none());
        assert!(session.description().is_none());
        assert!(session.result_image().is_none());
        assert!(session.published_reference().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_retake_during_run_discards_late_results() {
        let mut session = awaiting_session();
        let run = session.submit_image(photo()).unwrap();
        session.retake_image().unwrap();

        assert!(session.is_processing());
        assert!(!session.record_description(run.id, "late".into()));
        assert!(session.description().is_none());

        assert_eq!(
            session.submit_image(photo()).unwrap_err(),
            BoothError::AlreadyProcessing
        );

        assert!(!session.fail(run.id, Stage::Describe, "late failure"));
        assert_eq!(session.state(), SessionState::AwaitingImage);
        assert!(session.error().is_none());
        assert!(!session.is_processing());
        assert!(session.submit_image(photo()).is_ok());
    }
}
