use chrono::{DateTime, Local};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Access level requested from storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    PublicRead,
    Private,
}

/// A generated image ready to be published.
#[derive(Debug, Clone)]
pub struct Artifact {
    bytes: Arc<[u8]>,
    label: String,
    file_name: String,
    content_type: &'static str,
}

impl Artifact {
    /// Creates an artifact named after `label` and the given timestamp.
    ///
    /// The file name is `styled_{slug}_{YYYYmmddHHMMSS}.{ext}`; the extension
    /// and content type follow the sniffed image format, PNG when unknown.
    pub fn new(bytes: impl Into<Arc<[u8]>>, label: impl Into<String>, at: DateTime<Local>) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        let label = label.into();
        let format = image::guess_format(&bytes).unwrap_or(ImageFormat::Png);
        let extension = format.extensions_str().first().copied().unwrap_or("png");
        let file_name = format!(
            "styled_{}_{}.{}",
            slugify(&label),
            at.format("%Y%m%d%H%M%S"),
            extension
        );

        Self {
            bytes,
            label,
            file_name,
            content_type: format.to_mime_type(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Human-readable style name.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Unique-per-second file name, also used as the storage key.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

/// A successfully published artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// Name of the strategy that produced the reference.
    pub strategy: String,
    /// Publicly reachable reference (usually a URL).
    pub reference: String,
    /// PNG-encoded scannable code pointing at `reference`.
    pub scannable_code: Vec<u8>,
}

/// Reduces a label to lowercase ASCII words joined by underscores.
///
/// Emoji and punctuation are dropped, so "🎌 Anime" becomes "anime".
pub fn slugify(label: &str) -> String {
    let slug = label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_");

    if slug.is_empty() {
        "image".to_string()
    } else {
        slug
    }
}
