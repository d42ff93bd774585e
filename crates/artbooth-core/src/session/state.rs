use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Number of user-visible steps in the workflow.
pub const TOTAL_STEPS: u8 = 3;

/// Where a session is in the style → capture → result workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    #[default]
    SelectingStyle,
    AwaitingImage,
    Processing,
    Complete,
    Failed,
}

impl SessionState {
    /// The 1-based step shown to the user ("Step N of 3").
    pub fn step(self) -> u8 {
        match self {
            SessionState::SelectingStyle => 1,
            SessionState::AwaitingImage => 2,
            SessionState::Processing | SessionState::Complete | SessionState::Failed => 3,
        }
    }

    pub fn step_label(self) -> String {
        format!("Step {} of {}", self.step(), TOTAL_STEPS)
    }
}

/// One stage of the processing pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Describe,
    Synthesize,
    Publish,
}
