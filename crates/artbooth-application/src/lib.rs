//! Application layer for Artbooth.
//!
//! Drives the describe → synthesize → publish pipeline for each booth
//! session and publishes results through an ordered fallback chain.

pub mod code;
pub mod publisher;
pub mod session;

pub use code::ScannableCodeRenderer;
pub use publisher::ArtifactPublisher;
pub use session::{BoothContext, BoothSession, SessionRegistry};
