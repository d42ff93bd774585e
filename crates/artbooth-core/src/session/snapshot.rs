use super::model::Session;
use super::state::{SessionState, Stage};
use serde::Serialize;

/// Read-only view of a session for presentation layers.
///
/// Binary payloads are not included; they are fetched through the session
/// accessors when `has_result` / `has_scannable_code` are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub state: SessionState,
    pub step: u8,
    pub step_label: String,
    pub selected_style: Option<String>,
    pub description: Option<String>,
    pub has_result: bool,
    pub published_reference: Option<String>,
    pub has_scannable_code: bool,
    pub error: Option<String>,
    pub failed_stage: Option<Stage>,
    pub processing: bool,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        let state = session.state();
        Self {
            id: session.id().to_string(),
            state,
            step: state.step(),
            step_label: state.step_label(),
            selected_style: session.selected_style().map(str::to_string),
            description: session.description().map(str::to_string),
            has_result: session.result_image().is_some(),
            published_reference: session.published_reference().map(str::to_string),
            has_scannable_code: session.scannable_code().is_some(),
            error: session.error().map(str::to_string),
            failed_stage: session.failed_stage(),
            processing: session.is_processing(),
        }
    }
}
