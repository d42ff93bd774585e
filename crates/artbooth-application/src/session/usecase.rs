//! BoothSession - one user's path through the booth.
//!
//! Wraps the pure `Session` state machine and drives the external calls
//! between its transitions. The session lock is only held while reading or
//! recording state, never across a describe, synthesize or publish call, so
//! snapshots stay responsive while a run is in flight.

use super::context::BoothContext;
use artbooth_core::error::{BoothError, Result, StageFailure};
use artbooth_core::prompt::{MAX_PROMPT_CHARS, compose_prompt};
use artbooth_core::publish::{Artifact, Publication};
use artbooth_core::session::{PipelineRun, Session, SessionSnapshot, Stage};
use chrono::Local;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A stage error together with the stage that raised it.
struct StageError {
    stage: Stage,
    error: BoothError,
}

impl StageError {
    fn new(stage: Stage, error: BoothError) -> Self {
        Self { stage, error }
    }
}

/// Use case for a single booth session.
///
/// Mutators map one-to-one onto the session transitions. `submit_image`
/// and `retry` run the whole pipeline before returning; hosts that need a
/// responsive UI spawn them and poll [`BoothSession::snapshot`].
pub struct BoothSession {
    id: String,
    session: Arc<Mutex<Session>>,
    context: Arc<BoothContext>,
}

impl BoothSession {
    pub fn new(id: impl Into<String>, context: Arc<BoothContext>) -> Self {
        let id = id.into();
        Self {
            session: Arc::new(Mutex::new(Session::new(id.clone()))),
            id,
            context,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn context(&self) -> &BoothContext {
        &self.context
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from(&*self.session.lock().await)
    }

    /// The generated image. Also available after a publish failure.
    pub async fn result_image(&self) -> Option<Vec<u8>> {
        self.session.lock().await.result_image().map(<[u8]>::to_vec)
    }

    pub async fn published_reference(&self) -> Option<String> {
        self.session
            .lock()
            .await
            .published_reference()
            .map(str::to_string)
    }

    pub async fn scannable_code(&self) -> Option<Vec<u8>> {
        self.session.lock().await.scannable_code().map(<[u8]>::to_vec)
    }

    pub async fn publication(&self) -> Option<Publication> {
        self.session.lock().await.publication().cloned()
    }

    /// The result packaged for direct download, bypassing publishing.
    ///
    /// This is the artifact handed to the publisher, so its file name
    /// matches the published one.
    pub async fn download_artifact(&self) -> Option<Artifact> {
        self.session.lock().await.result_artifact().cloned()
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    pub async fn select_style(&self, style_id: &str) -> Result<SessionSnapshot> {
        let mut session = self.session.lock().await;
        session.select_style(&self.context.catalog, style_id)?;
        tracing::info!("[BoothSession] {} selected style '{}'", self.id, style_id);
        Ok(SessionSnapshot::from(&*session))
    }

    pub async fn go_back(&self) -> Result<SessionSnapshot> {
        let mut session = self.session.lock().await;
        session.go_back()?;
        Ok(SessionSnapshot::from(&*session))
    }

    pub async fn reset(&self) -> Result<SessionSnapshot> {
        let mut session = self.session.lock().await;
        session.reset()?;
        tracing::info!("[BoothSession] {} reset", self.id);
        Ok(SessionSnapshot::from(&*session))
    }

    /// Discards the current photo and any results, keeping the style.
    ///
    /// An in-flight run is not cancelled; its results are dropped on arrival.
    pub async fn retake_image(&self) -> Result<SessionSnapshot> {
        let mut session = self.session.lock().await;
        let was_processing = session.is_processing();
        session.retake_image()?;
        if was_processing {
            tracing::info!("[BoothSession] {} retake superseded the in-flight run", self.id);
        }
        Ok(SessionSnapshot::from(&*session))
    }

    /// Validates the photo and runs describe → synthesize → publish.
    ///
    /// Validation errors leave the session untouched. A stage failure moves
    /// the session to `Failed` and is also returned as the error.
    pub async fn submit_image(&self, bytes: Vec<u8>) -> Result<SessionSnapshot> {
        self.session.lock().await.ensure_can_submit()?;
        let image = self.context.validator.validate(bytes)?;
        let (width, height) = image.dimensions();

        let run = self.session.lock().await.submit_image(image)?;
        tracing::info!(
            "[BoothSession] {} run {} started ({}x{} {}, style '{}')",
            self.id,
            run.id,
            width,
            height,
            run.image.mime_type(),
            run.style_id
        );

        self.drive(run).await
    }

    /// Re-runs the full pipeline from the stored photo after a failure.
    pub async fn retry(&self) -> Result<SessionSnapshot> {
        let run = self.session.lock().await.retry()?;
        tracing::info!("[BoothSession] {} retrying as run {}", self.id, run.id);
        self.drive(run).await
    }

    // ============================================================================
    // Pipeline
    // ============================================================================

    async fn drive(&self, run: PipelineRun) -> Result<SessionSnapshot> {
        let outcome = self.execute(&run).await;
        let mut session = self.session.lock().await;

        match outcome {
            Ok(Some(publication)) => {
                if session.complete(run.id, publication)? {
                    tracing::info!("[BoothSession] {} run {} complete", self.id, run.id);
                } else {
                    tracing::debug!("[BoothSession] {} dropped stale run {}", self.id, run.id);
                }
                Ok(SessionSnapshot::from(&*session))
            }
            Ok(None) => {
                session.release(run.id);
                tracing::debug!("[BoothSession] {} dropped stale run {}", self.id, run.id);
                Ok(SessionSnapshot::from(&*session))
            }
            Err(StageError { stage, error }) => {
                if session.fail(run.id, stage, error.user_message()) {
                    tracing::warn!(
                        "[BoothSession] {} run {} failed at {}: {}",
                        self.id,
                        run.id,
                        stage,
                        error
                    );
                    Err(error)
                } else {
                    tracing::debug!("[BoothSession] {} dropped stale run {}", self.id, run.id);
                    Ok(SessionSnapshot::from(&*session))
                }
            }
        }
    }

    /// Runs the stages in order. `Ok(None)` means the run was superseded.
    async fn execute(&self, run: &PipelineRun) -> std::result::Result<Option<Publication>, StageError> {
        let timeouts = self.context.timeouts;

        let description = with_timeout(
            timeouts.describe(),
            "Image analysis",
            self.context.describer.describe(&run.image),
        )
        .await
        .map_err(|failure| StageError::new(Stage::Describe, BoothError::DescribeFailed(failure)))?;
        tracing::debug!("[BoothSession] {} description: {}", self.id, description);

        if !self
            .session
            .lock()
            .await
            .record_description(run.id, description.clone())
        {
            return Ok(None);
        }

        let style = self
            .context
            .catalog
            .require(&run.style_id)
            .map_err(|err| StageError::new(Stage::Synthesize, err))?;
        let prompt = compose_prompt(&style.synthesis_prompt, &description, MAX_PROMPT_CHARS);

        let bytes = with_timeout(
            timeouts.synthesize(),
            "Image generation",
            self.context.synthesizer.synthesize(&prompt),
        )
        .await
        .and_then(|bytes| {
            if bytes.is_empty() {
                Err(StageFailure::empty_output("No image was generated"))
            } else {
                Ok(bytes)
            }
        })
        .map_err(|failure| StageError::new(Stage::Synthesize, BoothError::SynthesizeFailed(failure)))?;
        let artifact = Artifact::new(bytes, style.display_name.clone(), Local::now());

        let recorded = self
            .session
            .lock()
            .await
            .record_result(run.id, artifact.clone())
            .map_err(|err| StageError::new(Stage::Synthesize, err))?;
        if !recorded {
            return Ok(None);
        }

        let publication = self
            .context
            .publisher
            .publish_artifact(&artifact)
            .await
            .map_err(|err| StageError::new(Stage::Publish, err))?;

        Ok(Some(publication))
    }
}

async fn with_timeout<T, F>(limit: Duration, what: &str, call: F) -> std::result::Result<T, StageFailure>
where
    F: Future<Output = std::result::Result<T, StageFailure>>,
{
    tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
        Err(StageFailure::timeout(format!(
            "{} timed out after {}s",
            what,
            limit.as_secs()
        )))
    })
}
