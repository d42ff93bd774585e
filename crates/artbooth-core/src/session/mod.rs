//! Session domain module.
//!
//! - `state`: workflow states and pipeline stages
//! - `model`: the `Session` state machine and its transitions
//! - `snapshot`: a serializable read-only view for presentation layers

mod model;
mod snapshot;
mod state;

pub use model::{PipelineRun, Session};
pub use snapshot::SessionSnapshot;
pub use state::{SessionState, Stage, TOTAL_STEPS};
