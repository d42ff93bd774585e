use super::model::StyleEntry;
use crate::error::{BoothError, Result};

/// Read-only list of styles, loaded once at process start.
///
/// The catalog preserves insertion order so presentation layers can lay the
/// styles out in a stable sequence.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    entries: Vec<StyleEntry>,
}

impl StyleCatalog {
    /// Builds a catalog from the given entries.
    ///
    /// # Errors
    ///
    /// Returns `BoothError::Config` if the list is empty, an id is blank, or
    /// two entries share an id.
    pub fn new(entries: Vec<StyleEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(BoothError::config("style catalog must contain at least one style"));
        }

        for (index, entry) in entries.iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(BoothError::config(format!(
                    "style at position {} has an empty id",
                    index
                )));
            }
            if entries[..index].iter().any(|other| other.id == entry.id) {
                return Err(BoothError::config(format!(
                    "duplicate style id '{}'",
                    entry.id
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Returns the catalog made of the built-in styles.
    pub fn builtin() -> Self {
        Self {
            entries: builtin_styles(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&StyleEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Looks up a style, failing with `InvalidStyle` when it is unknown.
    pub fn require(&self, id: &str) -> Result<&StyleEntry> {
        self.get(id)
            .ok_or_else(|| BoothError::InvalidStyle(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn entries(&self) -> &[StyleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The five styles the booth ships with.
pub fn builtin_styles() -> Vec<StyleEntry> {
    vec![
        StyleEntry::new(
            "anime",
            "🎌 Anime",
            "Create an image in anime/manga art style with the same composition, pose, and facial features as the reference image. Use cel-shaded coloring, bold black outlines, vibrant saturated colors, large expressive eyes typical of Japanese animation, and smooth gradients. Maintain the exact same pose, clothing, and scene layout.",
        ),
        StyleEntry::new(
            "ghibli",
            "🌿 Ghibli",
            "Create a Studio Ghibli style image with soft watercolor-like textures, gentle pastel colors, whimsical and dreamy atmosphere, hand-drawn animation quality, natural organic shapes, and the characteristic Miyazaki aesthetic with attention to environmental details and magical realism.",
        ),
        StyleEntry::new(
            "fantasy",
            "🧙‍♂️ Fantasy",
            "Create an image in fantasy art style with the same composition, pose, and facial features as the reference image. Add magical atmosphere with mystical lighting, rich deep colors with golden highlights, ornate fantasy details, and painterly quality like fantasy book illustrations.",
        ),
        StyleEntry::new(
            "cyberpunk",
            "🤖 Cyberpunk",
            "Create a cyberpunk style image with neon colors, futuristic elements, high contrast lighting, and sci-fi aesthetic, while maintaining the original composition and pose.",
        ),
        StyleEntry::new(
            "photorealistic",
            "📸 Realistic",
            "Create a photorealistic version with professional lighting, sharp details, realistic textures, and cinematic quality. Maintain the exact same pose, facial features, and scene layout but with enhanced realism.",
        ),
    ]
}
