use serde::{Deserialize, Serialize};

/// An immutable, selectable art style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    /// Stable identifier used in selection requests (e.g. `anime`).
    pub id: String,
    /// Label shown to the user and embedded in published artifacts.
    pub display_name: String,
    /// Fixed instruction sent to the synthesizer ahead of the scene description.
    pub synthesis_prompt: String,
}

impl StyleEntry {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        synthesis_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            synthesis_prompt: synthesis_prompt.into(),
        }
    }
}
