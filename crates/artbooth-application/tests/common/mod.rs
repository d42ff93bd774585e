#![allow(dead_code)]

use artbooth_application::{ArtifactPublisher, BoothContext};
use artbooth_core::config::{CodeConfig, TimeoutConfig};
use artbooth_core::error::StageFailure;
use artbooth_core::photo::{ImageLimits, ImageValidator, ValidatedImage};
use artbooth_core::publish::{Artifact, PublishStrategy, StrategyError};
use artbooth_core::style::StyleCatalog;
use artbooth_core::vision::{StyleSynthesizer, VisionDescriber};
use async_trait::async_trait;
use image::{ImageFormat, RgbImage};
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

/// Plays back scripted responses; the last one repeats.
struct Script<T: Clone> {
    responses: Mutex<VecDeque<Result<T, StageFailure>>>,
}

impl<T: Clone> Script<T> {
    fn new(responses: Vec<Result<T, StageFailure>>) -> Self {
        assert!(!responses.is_empty());
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    fn next(&self) -> Result<T, StageFailure> {
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap()
        }
    }
}

pub struct MockDescriber {
    script: Script<String>,
    gate: Option<Arc<Notify>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockDescriber {
    pub fn returning(description: &str) -> Arc<Self> {
        Self::scripted(vec![Ok(description.to_string())])
    }

    pub fn scripted(responses: Vec<Result<String, StageFailure>>) -> Arc<Self> {
        Arc::new(Self {
            script: Script::new(responses),
            gate: None,
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    /// Waits on `gate` before answering.
    pub fn gated(description: &str, gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            script: Script::new(vec![Ok(description.to_string())]),
            gate: Some(gate),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn sleeping(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Script::new(vec![Ok("too late".to_string())]),
            gate: None,
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionDescriber for MockDescriber {
    async fn describe(&self, _image: &ValidatedImage) -> Result<String, StageFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.script.next()
    }
}

pub struct MockSynthesizer {
    script: Script<Vec<u8>>,
    prompts: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    pub fn returning(bytes: &[u8]) -> Arc<Self> {
        Self::scripted(vec![Ok(bytes.to_vec())])
    }

    pub fn scripted(responses: Vec<Result<Vec<u8>, StageFailure>>) -> Arc<Self> {
        Arc::new(Self {
            script: Script::new(responses),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl StyleSynthesizer for MockSynthesizer {
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, StageFailure> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.script.next()
    }
}

pub struct MockStrategy {
    name: &'static str,
    result: Result<String, StrategyError>,
    calls: AtomicUsize,
    labels: Mutex<Vec<String>>,
    file_names: Mutex<Vec<String>>,
}

impl MockStrategy {
    pub fn succeeding(name: &'static str, reference: &str) -> Arc<Self> {
        Self::with_result(name, Ok(reference.to_string()))
    }

    pub fn failing(name: &'static str, error: StrategyError) -> Arc<Self> {
        Self::with_result(name, Err(error))
    }

    fn with_result(name: &'static str, result: Result<String, StrategyError>) -> Arc<Self> {
        Arc::new(Self {
            name,
            result,
            calls: AtomicUsize::new(0),
            labels: Mutex::new(Vec::new()),
            file_names: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().unwrap().clone()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.file_names.lock().unwrap().clone()
    }
}

#[async_trait]
impl PublishStrategy for MockStrategy {
    fn name(&self) -> &str {
        self.name
    }

    async fn publish(&self, artifact: &Artifact) -> Result<String, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.labels.lock().unwrap().push(artifact.label().to_string());
        self.file_names
            .lock()
            .unwrap()
            .push(artifact.file_name().to_string());
        self.result.clone()
    }
}

pub fn context(
    describer: Arc<dyn VisionDescriber>,
    synthesizer: Arc<dyn StyleSynthesizer>,
    strategies: Vec<Arc<dyn PublishStrategy>>,
) -> Arc<BoothContext> {
    let timeouts = TimeoutConfig::default();
    Arc::new(BoothContext::new(
        StyleCatalog::builtin(),
        ImageValidator::new(ImageLimits::default()),
        describer,
        synthesizer,
        ArtifactPublisher::new(strategies, timeouts.publish(), CodeConfig::default()),
        timeouts,
    ))
}
