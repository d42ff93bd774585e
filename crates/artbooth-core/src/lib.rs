//! Domain layer for Artbooth.
//!
//! Holds the session state machine, the style catalog, photo validation and
//! the interfaces of every external collaborator. Nothing in this crate
//! performs network I/O.

pub mod config;
pub mod error;
pub mod photo;
pub mod prompt;
pub mod publish;
pub mod secret;
pub mod session;
pub mod style;
pub mod vision;

// Re-export common error type
pub use error::{BoothError, FailureKind, ImageLimit, StageFailure};
