use crate::publisher::ArtifactPublisher;
use artbooth_core::config::TimeoutConfig;
use artbooth_core::photo::ImageValidator;
use artbooth_core::style::StyleCatalog;
use artbooth_core::vision::{StyleSynthesizer, VisionDescriber};
use std::sync::Arc;

/// Process-wide collaborators, read-only after construction.
///
/// Every `BoothSession` holds an `Arc` to the same context.
pub struct BoothContext {
    pub catalog: StyleCatalog,
    pub validator: ImageValidator,
    pub describer: Arc<dyn VisionDescriber>,
    pub synthesizer: Arc<dyn StyleSynthesizer>,
    pub publisher: ArtifactPublisher,
    pub timeouts: TimeoutConfig,
}

impl BoothContext {
    pub fn new(
        catalog: StyleCatalog,
        validator: ImageValidator,
        describer: Arc<dyn VisionDescriber>,
        synthesizer: Arc<dyn StyleSynthesizer>,
        publisher: ArtifactPublisher,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self {
            catalog,
            validator,
            describer,
            synthesizer,
            publisher,
            timeouts,
        }
    }
}
